//! Decoding of compressed image bytes via the `image` crate.
//!
//! Buffers are supplied fully materialized by the caller; nothing here
//! touches the filesystem or the network.

use crate::image::{ChannelLayout, RasterImage};
use crate::trace::{trace_event, trace_span};
use crate::util::{GapError, GapResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ::image::DynamicImage;

/// Decodes an encoded raster (PNG, JPEG, GIF, WebP or BMP).
///
/// Grayscale inputs stay single-channel, inputs carrying alpha become RGBA and
/// everything else becomes RGB. Deeper sample formats are reduced to 8 bits.
pub fn decode(bytes: &[u8]) -> GapResult<RasterImage> {
    let _span = trace_span!("decode", len = bytes.len()).entered();

    if bytes.is_empty() {
        return Err(GapError::decode("empty input"));
    }
    let img =
        ::image::load_from_memory(bytes).map_err(|err| GapError::decode(err.to_string()))?;
    let raster = raster_from_dynamic(img)?;
    trace_event!(
        "decoded",
        width = raster.width(),
        height = raster.height(),
        channels = raster.channels()
    );
    Ok(raster)
}

/// Decodes a base64 string holding an encoded raster.
///
/// ASCII whitespace anywhere in the text is ignored and a leading
/// `data:<mime>;base64,` prefix is stripped.
pub fn decode_base64(text: &str) -> GapResult<RasterImage> {
    let payload = strip_data_uri(text.trim());
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| GapError::decode(format!("base64: {err}")))?;
    decode(&bytes)
}

/// Converts an already decoded `image` value into a raster.
pub fn raster_from_dynamic(img: DynamicImage) -> GapResult<RasterImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    if width == 0 || height == 0 {
        return Err(GapError::decode(format!(
            "zero-dimension image {width}x{height}"
        )));
    }

    let color = img.color();
    let (data, layout) = match img {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw(), ChannelLayout::Gray),
        DynamicImage::ImageRgb8(buf) => (buf.into_raw(), ChannelLayout::Rgb),
        DynamicImage::ImageRgba8(buf) => (buf.into_raw(), ChannelLayout::Rgba),
        other if color.has_alpha() => (other.to_rgba8().into_raw(), ChannelLayout::Rgba),
        other if color.has_color() => (other.to_rgb8().into_raw(), ChannelLayout::Rgb),
        other => (other.to_luma8().into_raw(), ChannelLayout::Gray),
    };
    RasterImage::new(data, width, height, layout).map_err(|err| GapError::decode(err.to_string()))
}

fn strip_data_uri(text: &str) -> &str {
    if !text.starts_with("data:") {
        return text;
    }
    match text.find(";base64,") {
        Some(idx) => &text[idx + ";base64,".len()..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_base64, strip_data_uri};
    use crate::image::ChannelLayout;
    use crate::util::GapError;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use ::image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_rgba_png() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(1, 1, ::image::Rgba([10, 20, 30, 40]));
        let raster = decode(&png_bytes(img)).unwrap();
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.layout(), ChannelLayout::Rgba);
        assert_eq!(raster.pixel(1, 1), Some(&[10u8, 20, 30, 40][..]));
    }

    #[test]
    fn rejects_garbage_and_truncation() {
        assert!(matches!(decode(&[]), Err(GapError::Decode { .. })));
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(GapError::Decode { .. })
        ));
        let bytes = png_bytes(RgbaImage::new(16, 16));
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(decode(truncated), Err(GapError::Decode { .. })));
    }

    #[test]
    fn base64_accepts_data_uri_and_wrapping() {
        let bytes = png_bytes(RgbaImage::new(4, 4));
        let encoded = STANDARD.encode(&bytes);
        let (head, tail) = encoded.split_at(encoded.len() / 2);
        let text = format!("data:image/png;base64,{head}\n{tail}\n");
        let raster = decode_base64(&text).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 4));

        assert!(matches!(
            decode_base64("@@not base64@@"),
            Err(GapError::Decode { .. })
        ));
    }

    #[test]
    fn strip_data_uri_leaves_plain_text() {
        assert_eq!(strip_data_uri("abcd"), "abcd");
        assert_eq!(strip_data_uri("data:image/png;base64,abcd"), "abcd");
    }
}
