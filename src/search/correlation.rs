//! Exhaustive ZNCC search of the piece template over the scene.

use crate::candidate::argmax::Peak;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::ZnccRayon;
use crate::kernel::scalar::ZnccScalar;
use crate::kernel::{Kernel, ScanParams};
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::{GapError, GapResult};
use crate::ImageView;

/// Configuration for correlation matching.
#[derive(Clone, Debug)]
pub struct CorrelationConfig {
    /// Scan rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
    /// Scene windows with variance at or below this value score zero.
    pub min_var_i: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_var_i: 0.0,
        }
    }
}

/// Best placement of the template in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrelationMatch {
    /// Top-left x of the placement.
    pub x: usize,
    /// Top-left y of the placement.
    pub y: usize,
    /// ZNCC score in `[-1, 1]`.
    pub score: f64,
}

impl From<Peak> for CorrelationMatch {
    fn from(peak: Peak) -> Self {
        Self {
            x: peak.x,
            y: peak.y,
            score: peak.score,
        }
    }
}

/// Scans every placement of `template` inside `scene` and returns the one
/// with the highest ZNCC score.
///
/// Placements are visited row-major and the first maximum wins, whether or
/// not the scan runs in parallel.
pub fn match_correlation(
    scene: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    cfg: &CorrelationConfig,
) -> GapResult<CorrelationMatch> {
    let _span = trace_span!(
        "correlation_scan",
        scene_w = scene.width(),
        scene_h = scene.height(),
        tpl_w = template.width(),
        tpl_h = template.height()
    )
    .entered();

    if template.width() > scene.width() || template.height() > scene.height() {
        return Err(GapError::InvalidDimensions {
            width: template.width(),
            height: template.height(),
        });
    }
    let plan = TemplatePlan::from_view(template)?;
    let params = ScanParams {
        min_var_i: cfg.min_var_i,
    };

    let peak = scan(scene, &plan, params, cfg.parallel)?;
    trace_event!("correlation_best", x = peak.x, y = peak.y, score = peak.score);
    Ok(peak.into())
}

#[cfg(feature = "rayon")]
fn scan(
    scene: ImageView<'_, u8>,
    plan: &TemplatePlan,
    params: ScanParams,
    parallel: bool,
) -> GapResult<Peak> {
    if parallel {
        ZnccRayon::scan_full(scene, plan, params)
    } else {
        ZnccScalar::scan_full(scene, plan, params)
    }
}

#[cfg(not(feature = "rayon"))]
fn scan(
    scene: ImageView<'_, u8>,
    plan: &TemplatePlan,
    params: ScanParams,
    _parallel: bool,
) -> GapResult<Peak> {
    ZnccScalar::scan_full(scene, plan, params)
}
