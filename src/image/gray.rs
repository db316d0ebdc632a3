//! Grayscale projection and alpha extraction.

use crate::image::{ChannelLayout, OwnedImage, RasterImage};
use crate::util::math::luma_u8;

/// Projects a raster onto single-channel luminance.
///
/// Uses `0.299 R + 0.587 G + 0.114 B` rounded to nearest; alpha is ignored.
pub fn to_gray(raster: &RasterImage) -> OwnedImage {
    let data: Vec<u8> = match raster.layout() {
        ChannelLayout::Gray => raster.data().to_vec(),
        ChannelLayout::Rgb | ChannelLayout::Rgba => raster
            .pixels()
            .map(|px| luma_u8(px[0], px[1], px[2]))
            .collect(),
    };
    plane(data, raster)
}

/// Returns the alpha plane when the raster carries one.
pub fn alpha_plane(raster: &RasterImage) -> Option<OwnedImage> {
    if !raster.has_alpha() {
        return None;
    }
    let data = raster.pixels().map(|px| px[3]).collect();
    Some(plane(data, raster))
}

fn plane(data: Vec<u8>, raster: &RasterImage) -> OwnedImage {
    OwnedImage::from_raw_parts(data, raster.width(), raster.height())
}

#[cfg(test)]
mod tests {
    use super::{alpha_plane, to_gray};
    use crate::image::{ChannelLayout, RasterImage};

    #[test]
    fn gray_uses_perceptual_weights_and_ignores_alpha() {
        let data = vec![255, 0, 0, 0, 0, 255, 0, 255, 0, 0, 255, 7];
        let raster = RasterImage::new(data, 3, 1, ChannelLayout::Rgba).unwrap();
        let gray = to_gray(&raster);
        assert_eq!(gray.data(), &[76, 150, 29]);
        let alpha = alpha_plane(&raster).unwrap();
        assert_eq!(alpha.data(), &[0, 255, 7]);
    }

    #[test]
    fn gray_raster_passes_through() {
        let raster = RasterImage::new(vec![1, 2, 3, 4], 2, 2, ChannelLayout::Gray).unwrap();
        assert_eq!(to_gray(&raster).data(), &[1, 2, 3, 4]);
        assert!(alpha_plane(&raster).is_none());
    }
}
