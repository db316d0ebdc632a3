//! Contour and shape matching.
//!
//! The piece silhouette is traced from its foreground mask, the scene is
//! reduced to a Canny edge map, and every outermost edge contour is compared
//! with the silhouette through log-scaled Hu moment invariants. The bounding
//! box of the closest candidate locates the gap.

pub mod contour;
pub mod edges;
pub mod moments;

pub use contour::{piece_contour, trace_outer_contours, Contour};
pub use edges::edge_map;
pub use moments::{shape_distance, HuMoments, Moments, ShapeMetric};

use crate::geometry::Rect;
use crate::image::{OwnedImage, RasterImage};
use crate::trace::{trace_detail, trace_event, trace_span};
use crate::trim::ForegroundMask;
use crate::util::{GapError, GapResult};

/// Configuration for shape matching.
#[derive(Clone, Debug)]
pub struct ShapeConfig {
    /// Weak-edge hysteresis threshold on the gradient magnitude.
    pub canny_low: f32,
    /// Strong-edge hysteresis threshold on the gradient magnitude.
    pub canny_high: f32,
    /// Distance used to compare Hu invariants.
    pub metric: ShapeMetric,
    /// Candidates enclosing less area (in px²) are discarded.
    pub min_candidate_area: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            canny_low: 100.0,
            canny_high: 200.0,
            metric: ShapeMetric::I2,
            min_candidate_area: 25.0,
        }
    }
}

/// Winning scene contour of a shape match.
#[derive(Clone, Debug)]
pub struct ShapeMatch {
    /// Bounding box of the winning contour in scene coordinates.
    pub bbox: Rect,
    /// Shape distance to the piece silhouette; lower is more similar.
    pub distance: f64,
    /// Index of the winner among the retained candidates.
    pub index: usize,
    /// Number of candidates compared.
    pub candidates: usize,
    pub contour: Contour,
}

/// Finds the scene contour most similar in shape to the piece silhouette.
///
/// Fails with `NoContourFound` when the piece mask is empty or the scene has
/// no edge contour of at least `min_candidate_area`. Ties keep the first
/// candidate in tracing order.
pub fn match_shape(
    scene_gray: &OwnedImage,
    piece: &RasterImage,
    cfg: &ShapeConfig,
) -> GapResult<ShapeMatch> {
    let _span = trace_span!(
        "shape_match",
        scene_w = scene_gray.width(),
        scene_h = scene_gray.height()
    )
    .entered();

    let silhouette = piece_contour(&ForegroundMask::from_raster(piece))?;
    let target = HuMoments::of_contour(&silhouette);

    let edges = edge_map(scene_gray, cfg.canny_low, cfg.canny_high)?;
    let candidates: Vec<Contour> = trace_outer_contours(&edges)
        .into_iter()
        .filter(|c| c.area() >= cfg.min_candidate_area)
        .collect();
    trace_event!("shape_candidates", count = candidates.len());

    let count = candidates.len();
    let mut best: Option<(usize, f64, Contour)> = None;
    for (index, contour) in candidates.into_iter().enumerate() {
        let distance = shape_distance(&target, &HuMoments::of_contour(&contour), cfg.metric);
        trace_detail!("shape_candidate", index = index, distance = distance);
        match &best {
            Some((_, best_distance, _)) if distance >= *best_distance => {}
            _ => best = Some((index, distance, contour)),
        }
    }

    let (index, distance, contour) = best.ok_or(GapError::NoContourFound {
        context: "scene edge map",
    })?;
    let bbox = contour.bounding_box();
    trace_event!("shape_best", index = index, distance = distance, x = bbox.x);
    Ok(ShapeMatch {
        bbox,
        distance,
        index,
        candidates: count,
        contour,
    })
}
