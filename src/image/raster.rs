use crate::util::{GapError, GapResult};

/// Interleaved channel layout of a [`RasterImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Gray,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    /// Number of interleaved samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, ChannelLayout::Rgba)
    }
}

/// Decoded 8-bit raster with interleaved channels.
///
/// The buffer always holds exactly `width * height * channels` samples and
/// both dimensions are non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        layout: ChannelLayout,
    ) -> GapResult<Self> {
        if width == 0 || height == 0 {
            return Err(GapError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(layout.channels()))
            .ok_or(GapError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(GapError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    /// Returns the interleaved sample buffer in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the samples of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let start = (y * self.width + x) * c;
        self.data.get(start..start + c)
    }

    /// Iterates over pixels in row-major order, one channel slice per pixel.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels())
    }

    /// Copies out the region `(x, y, width, height)` keeping the layout.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> GapResult<Self> {
        if width == 0 || height == 0 {
            return Err(GapError::InvalidDimensions { width, height });
        }
        let fits = x
            .checked_add(width)
            .zip(y.checked_add(height))
            .is_some_and(|(end_x, end_y)| end_x <= self.width && end_y <= self.height);
        if !fits {
            return Err(GapError::RoiOutOfBounds {
                x,
                y,
                width,
                height,
                img_width: self.width,
                img_height: self.height,
            });
        }

        let c = self.channels();
        let mut data = Vec::with_capacity(width * height * c);
        for row in y..y + height {
            let start = (row * self.width + x) * c;
            data.extend_from_slice(&self.data[start..start + width * c]);
        }
        Self::new(data, width, height, self.layout)
    }
}
