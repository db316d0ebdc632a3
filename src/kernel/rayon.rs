//! Rayon-parallel scan (feature-gated).
//!
//! Rows of placements are scored independently and reduced with
//! [`better`](crate::candidate::argmax::better), which orders peaks by score and
//! then by lowest scan index. The reduction is commutative and associative, so
//! the winner never depends on which thread finishes first.

use crate::candidate::argmax::{better, Peak};
use crate::kernel::scalar::{scan_row, zncc_at};
use crate::kernel::{placement_range, Kernel, ScanParams, WindowSums};
use crate::template::TemplatePlan;
use crate::util::{GapError, GapResult};
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel ZNCC kernel.
pub struct ZnccRayon;

impl Kernel for ZnccRayon {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        sums: &WindowSums,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f64 {
        match placement_range(image, plan) {
            Ok((max_x, max_y)) if x <= max_x && y <= max_y => {
                zncc_at(image, plan, sums, x, y, params.min_var_i)
            }
            _ => f64::NEG_INFINITY,
        }
    }

    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> GapResult<Peak> {
        let (max_x, max_y) = placement_range(image, plan)?;
        let sums = WindowSums::new(image);

        let best = (0..=max_y)
            .into_par_iter()
            .filter_map(|y| scan_row(image, plan, &sums, y, max_x, params))
            .reduce_with(better);
        best.ok_or(GapError::InvalidDimensions {
            width: plan.width(),
            height: plan.height(),
        })
    }
}
