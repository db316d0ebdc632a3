//! Running argmax over scan positions.

use std::cmp::Ordering;

/// Scored placement of a template in the scene (top-left coordinates).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the placement.
    pub x: usize,
    /// Y coordinate (row) of the placement.
    pub y: usize,
    /// ZNCC score at the placement.
    pub score: f64,
}

/// Orders peaks so that `Greater` means "preferred".
///
/// Higher scores win; among equal scores the lower row-major scan index
/// (smaller `y`, then smaller `x`) wins.
pub(crate) fn peak_cmp(a: &Peak, b: &Peak) -> Ordering {
    a.score
        .partial_cmp(&b.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.y.cmp(&a.y))
        .then_with(|| b.x.cmp(&a.x))
}

/// Picks the preferred of two peaks; commutative and associative.
pub(crate) fn better(a: Peak, b: Peak) -> Peak {
    if peak_cmp(&b, &a) == Ordering::Greater {
        b
    } else {
        a
    }
}

/// Tracks the best peak of a row-major scan.
///
/// Updates only on a strictly greater score, so the first position reaching
/// the maximum is kept.
#[derive(Debug, Default)]
pub struct ArgMax {
    best: Option<Peak>,
}

impl ArgMax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a peak; positions must arrive in ascending scan order.
    pub fn push(&mut self, peak: Peak) {
        match self.best {
            Some(best) if peak.score <= best.score => {}
            _ => self.best = Some(peak),
        }
    }

    pub fn best(&self) -> Option<Peak> {
        self.best
    }

    pub fn into_best(self) -> Option<Peak> {
        self.best
    }
}
