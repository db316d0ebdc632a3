//! Template plan precomputation for ZNCC.

use crate::image::ImageView;
use crate::util::{GapError, GapResult};

/// Precomputed statistics and zero-mean buffer for template matching.
///
/// With `t'` the zero-mean template, the ZNCC numerator at a placement is
/// `Σ t'·I`, because `Σ t' = 0` removes the window mean for free. The
/// denominator needs `Σ t'^2` (stored as `var_t`) and the window variance.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    inv_std: f64,
    var_t: f64,
    zero_mean: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> GapResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(GapError::InvalidDimensions { width, height })?;

        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for y in 0..height {
            let row = row_of(tpl, y)?;
            for &value in row {
                let v = value as u64;
                sum += v;
                sum_sq += v * v;
            }
        }

        // n·Σv² − (Σv)² is exact in integers; zero means a flat template.
        let n = count as u128;
        let spread = n * sum_sq as u128 - (sum as u128) * (sum as u128);
        if spread == 0 {
            return Err(GapError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        let count_f = count as f64;
        let mean = sum as f64 / count_f;
        let variance = spread as f64 / (count_f * count_f);
        let inv_std = 1.0 / variance.sqrt();

        let mut zero_mean = Vec::with_capacity(count);
        let mut var_t = 0.0f64;
        for y in 0..height {
            for &value in row_of(tpl, y)? {
                let t = value as f64 - mean;
                var_t += t * t;
                zero_mean.push(t);
            }
        }

        Ok(Self {
            width,
            height,
            mean,
            inv_std,
            var_t,
            zero_mean,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of template samples.
    pub fn len(&self) -> usize {
        self.zero_mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zero_mean.is_empty()
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the inverse standard deviation of the template.
    pub fn inv_std(&self) -> f64 {
        self.inv_std
    }

    /// Sum of squared zero-mean samples.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}

fn row_of<'a>(tpl: ImageView<'a, u8>, y: usize) -> GapResult<&'a [u8]> {
    tpl.row(y).ok_or(GapError::BufferTooSmall {
        needed: (y + 1).saturating_mul(tpl.stride()),
        got: tpl.as_slice().len(),
    })
}
