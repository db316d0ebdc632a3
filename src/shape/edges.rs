//! Scene edge maps.

use crate::image::OwnedImage;
use crate::util::{GapError, GapResult};
use ::image::GrayImage;
use imageproc::edges::canny;

/// Runs Canny edge detection with hysteresis thresholds `low` / `high`.
///
/// The result holds 255 on edge pixels and 0 elsewhere. Weak edges survive
/// only when connected to strong ones, which favors closed boundaries over
/// isolated texture responses.
pub fn edge_map(gray: &OwnedImage, low: f32, high: f32) -> GapResult<GrayImage> {
    let img = to_gray_image(gray)?;
    Ok(canny(&img, low, high))
}

pub(crate) fn to_gray_image(gray: &OwnedImage) -> GapResult<GrayImage> {
    let width = u32::try_from(gray.width()).ok();
    let height = u32::try_from(gray.height()).ok();
    width
        .zip(height)
        .and_then(|(w, h)| GrayImage::from_raw(w, h, gray.data().to_vec()))
        .ok_or(GapError::InvalidDimensions {
            width: gray.width(),
            height: gray.height(),
        })
}

#[cfg(test)]
mod tests {
    use super::edge_map;
    use crate::image::OwnedImage;

    #[test]
    fn flat_image_has_no_edges() {
        let gray = OwnedImage::new(vec![90u8; 32 * 24], 32, 24).unwrap();
        let edges = edge_map(&gray, 100.0, 200.0).unwrap();
        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn step_produces_vertical_edge() {
        let width = 40;
        let height = 30;
        let mut data = vec![30u8; width * height];
        for y in 0..height {
            for x in 20..width {
                data[y * width + x] = 230;
            }
        }
        let gray = OwnedImage::new(data, width, height).unwrap();
        let edges = edge_map(&gray, 100.0, 200.0).unwrap();
        let mid = (height / 2) as u32;
        let hits: Vec<u32> = (0..width as u32)
            .filter(|&x| edges.get_pixel(x, mid).0[0] == 255)
            .collect();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|&x| (18..=21).contains(&x)));
    }
}
