//! Gap search: strategy selection and result assembly.
//!
//! [`GapFinder`] runs one of two complete pipelines chosen by configuration.
//! `Correlation` trims the piece and locates it by ZNCC; `Shape` locates the
//! scene contour most similar to the piece silhouette and applies the
//! calibration correction. A failing strategy reports its error; the other
//! strategy is never tried as a fallback.

pub mod correlation;

pub use correlation::{match_correlation, CorrelationConfig, CorrelationMatch};

use crate::geometry::Rect;
use crate::image::decode::{decode, decode_base64};
use crate::image::gray::to_gray;
use crate::image::RasterImage;
use crate::shape::{match_shape, ShapeConfig};
use crate::trace::{trace_event, trace_span};
use crate::trim::trim_border;
use crate::util::GapResult;

/// Default horizontal correction subtracted from shape-matched boxes.
///
/// Observed registration bias between a detected gap contour and the drop
/// target for one provider's rendering; other providers may need another
/// value.
pub const DEFAULT_CALIBRATION: i64 = 6;

/// Matching strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Normalized cross-correlation of the trimmed piece over the scene.
    #[default]
    Correlation,
    /// Hu-moment matching of the piece silhouette against scene edge contours.
    Shape,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Correlation => "correlation",
            Strategy::Shape => "shape",
        }
    }
}

/// Gap search configuration.
#[derive(Clone, Debug)]
pub struct GapConfig {
    pub strategy: Strategy,
    /// Pixels subtracted from the shape match box; unused by correlation.
    pub calibration: i64,
    pub correlation: CorrelationConfig,
    pub shape: ShapeConfig,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Correlation,
            calibration: DEFAULT_CALIBRATION,
            correlation: CorrelationConfig::default(),
            shape: ShapeConfig::default(),
        }
    }
}

/// Offset with the score of the strategy that produced it.
///
/// Correlation scores lie in `[-1, 1]` (higher is better); shape scores are
/// non-negative distances (lower is better).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate {
    pub offset: i64,
    pub score: f64,
}

/// Result of a gap search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapMatch {
    pub candidate: MatchCandidate,
    pub strategy: Strategy,
    /// Matched region in scene coordinates, before calibration.
    pub bbox: Rect,
}

impl GapMatch {
    /// Horizontal pixel offset for the drag gesture.
    pub fn offset(&self) -> i64 {
        self.candidate.offset
    }

    pub fn score(&self) -> f64 {
        self.candidate.score
    }
}

/// Locates the gap of a slide puzzle.
#[derive(Clone, Debug, Default)]
pub struct GapFinder {
    cfg: GapConfig,
}

impl GapFinder {
    pub fn new(cfg: GapConfig) -> Self {
        Self { cfg }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: GapConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &GapConfig {
        &self.cfg
    }

    /// Decodes both encoded images and locates the gap.
    pub fn locate(&self, scene: &[u8], piece: &[u8]) -> GapResult<GapMatch> {
        self.locate_rasters(decode(scene)?, decode(piece)?)
    }

    /// Same as [`locate`](Self::locate) for base64-encoded images.
    pub fn locate_base64(&self, scene: &str, piece: &str) -> GapResult<GapMatch> {
        self.locate_rasters(decode_base64(scene)?, decode_base64(piece)?)
    }

    /// Locates the gap for already decoded rasters.
    pub fn locate_rasters(&self, scene: RasterImage, piece: RasterImage) -> GapResult<GapMatch> {
        let _span = trace_span!("locate", strategy = self.cfg.strategy.name()).entered();

        let scene_gray = to_gray(&scene);
        drop(scene);
        let found = match self.cfg.strategy {
            Strategy::Correlation => {
                let trimmed = trim_border(piece)?;
                let best = match_correlation(
                    scene_gray.view(),
                    trimmed.gray.view(),
                    &self.cfg.correlation,
                )?;
                GapMatch {
                    candidate: MatchCandidate {
                        offset: best.x as i64,
                        score: best.score,
                    },
                    strategy: Strategy::Correlation,
                    bbox: Rect::new(best.x, best.y, trimmed.gray.width(), trimmed.gray.height()),
                }
            }
            Strategy::Shape => {
                let best = match_shape(&scene_gray, &piece, &self.cfg.shape)?;
                GapMatch {
                    candidate: MatchCandidate {
                        offset: best.bbox.x as i64 - self.cfg.calibration,
                        score: best.distance,
                    },
                    strategy: Strategy::Shape,
                    bbox: best.bbox,
                }
            }
        };

        trace_event!("gap_offset", offset = found.offset(), score = found.score());
        Ok(found)
    }
}

/// Decodes both images and returns the gap offset under `cfg`.
pub fn locate_gap(scene: &[u8], piece: &[u8], cfg: &GapConfig) -> GapResult<i64> {
    GapFinder::new(cfg.clone())
        .locate(scene, piece)
        .map(|found| found.offset())
}
