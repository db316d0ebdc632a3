//! Closed boundary contours traced from binary rasters.
//!
//! Tracing is Suzuki–Abe border following as implemented by
//! `imageproc::contours`. Only outermost outer borders are kept, the same set
//! a "retrieve external" mode yields.

use crate::geometry::{Point, Rect};
use crate::shape::edges::to_gray_image;
use crate::trim::ForegroundMask;
use crate::util::{GapError, GapResult};
use ::image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

/// Ordered, closed sequence of boundary points; never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Wraps a point sequence, `None` when it is empty.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> Rect {
        // Non-empty by construction.
        Rect::enclosing(self.points.iter().copied()).unwrap_or(Rect::new(0, 0, 1, 1))
    }

    /// Shoelace area of the closed polygon; positive for counter-clockwise
    /// traversal in a y-up frame.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut acc = 0i64;
        for i in 0..n {
            let p = self.points[(i + n - 1) % n];
            let q = self.points[i];
            acc += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }
        acc as f64 * 0.5
    }

    /// Enclosed polygon area, independent of traversal direction.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Returns a copy shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }
}

/// Traces every outermost outer border of a binary image, in tracing order
/// (row-major by starting pixel). Any non-zero sample is foreground.
///
/// Foreground touching the frame is traced along the frame itself, so a
/// fully set image yields one contour around its whole extent.
pub fn trace_outer_contours(binary: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(&with_empty_border(binary))
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            Contour::new(c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect())
        })
        .collect()
}

/// Copies `binary` into a canvas one pixel larger on every side, with the
/// added border left at zero.
fn with_empty_border(binary: &GrayImage) -> GrayImage {
    let mut padded = GrayImage::new(binary.width() + 2, binary.height() + 2);
    for (x, y, pixel) in binary.enumerate_pixels() {
        padded.put_pixel(x + 1, y + 1, *pixel);
    }
    padded
}

/// Extracts the silhouette contour of a piece mask.
///
/// When the mask has several components, the outer border enclosing the
/// largest area is the silhouette; the first traced one wins ties.
pub fn piece_contour(mask: &ForegroundMask) -> GapResult<Contour> {
    if mask.is_empty() {
        return Err(GapError::NoContourFound {
            context: "piece mask",
        });
    }

    let mut best: Option<(f64, Contour)> = None;
    for contour in trace_outer_contours(&to_gray_image(mask.plane())?) {
        let area = contour.area();
        match &best {
            Some((best_area, _)) if area <= *best_area => {}
            _ => best = Some((area, contour)),
        }
    }
    best.map(|(_, contour)| contour)
        .ok_or(GapError::NoContourFound {
            context: "piece mask",
        })
}

#[cfg(test)]
mod tests {
    use super::{piece_contour, trace_outer_contours, Contour};
    use crate::geometry::{Point, Rect};
    use crate::image::{ChannelLayout, RasterImage};
    use crate::trim::ForegroundMask;
    use crate::util::GapError;
    use ::image::{GrayImage, Luma};

    fn filled(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        for &(x0, y0, w, h) in rects {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    img.put_pixel(x, y, Luma([255]));
                }
            }
        }
        img
    }

    #[test]
    fn square_area_and_box() {
        let contour = Contour::new(vec![
            Point::new(2, 3),
            Point::new(2, 7),
            Point::new(6, 7),
            Point::new(6, 3),
        ])
        .unwrap();
        assert_eq!(contour.area(), 16.0);
        assert_eq!(contour.bounding_box(), Rect::new(2, 3, 5, 5));
        assert_eq!(contour.translated(1, -1).bounding_box(), Rect::new(3, 2, 5, 5));
        assert!(Contour::new(Vec::new()).is_none());
    }

    #[test]
    fn traces_only_outermost_borders() {
        // A ring with a blob inside its hole, plus a separate square.
        let mut img = filled(30, 20, &[(2, 2, 12, 12), (20, 4, 5, 5)]);
        for y in 4..12 {
            for x in 4..12 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        for y in 7..9 {
            for x in 7..9 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let contours = trace_outer_contours(&img);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].bounding_box(), Rect::new(2, 2, 12, 12));
        assert_eq!(contours[1].bounding_box(), Rect::new(20, 4, 5, 5));
    }

    #[test]
    fn foreground_touching_the_frame_is_traced() {
        let full = filled(7, 5, &[(0, 0, 7, 5)]);
        let contours = trace_outer_contours(&full);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_box(), Rect::new(0, 0, 7, 5));

        let edge_run = filled(12, 8, &[(0, 0, 12, 1), (9, 3, 3, 5)]);
        let contours = trace_outer_contours(&edge_run);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].bounding_box(), Rect::new(0, 0, 12, 1));
        assert_eq!(contours[1].bounding_box(), Rect::new(9, 3, 3, 5));
    }

    #[test]
    fn fully_opaque_piece_has_frame_contour() {
        let raster = RasterImage::new(vec![255u8; 6 * 4 * 4], 6, 4, ChannelLayout::Rgba).unwrap();
        let contour = piece_contour(&ForegroundMask::from_raster(&raster)).unwrap();
        assert_eq!(contour.bounding_box(), Rect::new(0, 0, 6, 4));
        assert_eq!(contour.area(), 15.0);
    }

    #[test]
    fn piece_contour_picks_largest_component() {
        let mut data = vec![0u8; 20 * 10];
        for y in 1..3 {
            for x in 1..3 {
                data[y * 20 + x] = 200;
            }
        }
        for y in 2..9 {
            for x in 8..18 {
                data[y * 20 + x] = 200;
            }
        }
        let raster = RasterImage::new(data, 20, 10, ChannelLayout::Gray).unwrap();
        let contour = piece_contour(&ForegroundMask::from_raster(&raster)).unwrap();
        assert_eq!(contour.bounding_box(), Rect::new(8, 2, 10, 7));
    }

    #[test]
    fn empty_piece_has_no_contour() {
        let raster = RasterImage::new(vec![0u8; 16], 4, 4, ChannelLayout::Gray).unwrap();
        let err = piece_contour(&ForegroundMask::from_raster(&raster)).unwrap_err();
        assert!(matches!(err, GapError::NoContourFound { .. }));
    }
}
