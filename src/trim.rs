//! Foreground masks and border trimming for puzzle pieces.
//!
//! A piece is usually delivered as a larger canvas with the silhouette in the
//! middle and a transparent (or black) margin around it. Trimming crops the
//! canvas to the tightest box around the foreground so the correlation
//! template carries no margin.

use crate::geometry::Rect;
use crate::image::gray::{alpha_plane, to_gray};
use crate::image::{OwnedImage, RasterImage};
use crate::trace::{trace_event, trace_span};
use crate::util::GapResult;

/// Binary foreground mask; samples are `1` for foreground and `0` elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForegroundMask {
    img: OwnedImage,
}

impl ForegroundMask {
    /// Builds the mask of a raster: `alpha > 0` when alpha is present,
    /// otherwise `luma > 0`.
    pub fn from_raster(raster: &RasterImage) -> Self {
        let source = alpha_plane(raster).unwrap_or_else(|| to_gray(raster));
        Self::from_plane(&source)
    }

    /// Thresholds a single-channel plane at `> 0`.
    pub fn from_plane(plane: &OwnedImage) -> Self {
        let data = plane.data().iter().map(|&v| u8::from(v > 0)).collect();
        Self {
            img: OwnedImage::from_raw_parts(data, plane.width(), plane.height()),
        }
    }

    pub fn width(&self) -> usize {
        self.img.width()
    }

    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns the 0/1 samples in row-major order.
    pub fn data(&self) -> &[u8] {
        self.img.data()
    }

    /// Returns the mask as a plane of 0/1 samples.
    pub fn plane(&self) -> &OwnedImage {
        &self.img
    }

    pub fn count(&self) -> usize {
        self.img.data().iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.img.data().iter().all(|&v| v == 0)
    }

    /// Minimal box enclosing every foreground sample.
    pub fn bounding_box(&self) -> Option<Rect> {
        let width = self.width();
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        for (y, row) in self.img.data().chunks_exact(width).enumerate() {
            let Some(first) = row.iter().position(|&v| v != 0) else {
                continue;
            };
            let last = row.iter().rposition(|&v| v != 0).unwrap_or(first);
            min_x = min_x.min(first);
            max_x = max_x.max(last);
            min_y = min_y.min(y);
            max_y = y;
        }
        if min_x == usize::MAX {
            return None;
        }
        Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

/// A piece cropped to its foreground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrimmedPiece {
    /// Cropped raster in the original channel layout.
    pub color: RasterImage,
    /// Luminance of the cropped raster.
    pub gray: OwnedImage,
    /// Crop box in the coordinates of the untrimmed raster.
    pub bbox: Rect,
}

/// Crops a piece raster to the bounding box of its foreground.
///
/// When the mask is empty the raster is returned unmodified with a
/// full-frame box, so a fully transparent or fully black piece never aborts
/// here. A fully black piece is still flat, though, and correlation then
/// rejects it as a degenerate template: flat scene windows score zero, but a
/// flat template has no defined ZNCC. Trimming an already tight raster is a
/// no-op.
pub fn trim_border(raster: RasterImage) -> GapResult<TrimmedPiece> {
    let _span = trace_span!("trim_border", width = raster.width(), height = raster.height())
        .entered();

    let full = Rect::new(0, 0, raster.width(), raster.height());
    let bbox = ForegroundMask::from_raster(&raster)
        .bounding_box()
        .unwrap_or(full);
    trace_event!(
        "trim_box",
        x = bbox.x,
        y = bbox.y,
        width = bbox.width,
        height = bbox.height
    );

    let color = if bbox == full {
        raster
    } else {
        raster.crop(bbox.x, bbox.y, bbox.width, bbox.height)?
    };
    let gray = to_gray(&color);
    Ok(TrimmedPiece { color, gray, bbox })
}
