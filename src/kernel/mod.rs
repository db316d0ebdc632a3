//! Correlation kernel implementations.

use crate::candidate::argmax::Peak;
use crate::template::TemplatePlan;
use crate::util::{GapError, GapResult};
use crate::ImageView;

pub(crate) mod integral;
pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use integral::WindowSums;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Windows with variance at or below this value score zero.
    pub min_var_i: f64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self { min_var_i: 0.0 }
    }
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Computes the score at a single placement (top-left coordinates).
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        sums: &WindowSums,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f64;

    /// Scans every valid placement and returns the best one.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> GapResult<Peak>;
}

/// Returns the inclusive placement range `(max_x, max_y)`.
///
/// Fails with `InvalidDimensions` (carrying the template size) when the
/// template does not fit inside the image along either axis.
pub(crate) fn placement_range(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
) -> GapResult<(usize, usize)> {
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    if tpl_width > image.width() || tpl_height > image.height() {
        return Err(GapError::InvalidDimensions {
            width: tpl_width,
            height: tpl_height,
        });
    }
    Ok((image.width() - tpl_width, image.height() - tpl_height))
}
