//! Rasters, views and the decode/grayscale stages.
//!
//! `RasterImage` is the owned, decoded form of an input buffer. `ImageView` is
//! a borrowed 2D view into a 1D buffer with an explicit stride; the stride
//! counts elements between the starts of consecutive rows, so ROI slices are
//! zero-copy views that keep the stride of their parent. `OwnedImage` holds a
//! contiguous single-channel plane (luma, alpha, or a mask).

use crate::util::{GapError, GapResult};

pub mod decode;
pub mod gray;
mod raster;

pub use raster::{ChannelLayout, RasterImage};

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> GapResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> GapResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(GapError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(&self, x: usize, y: usize, width: usize, height: usize) -> GapResult<Self> {
        if width == 0 || height == 0 {
            return Err(GapError::InvalidDimensions { width, height });
        }
        let out_of_bounds = GapError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x;
        ImageView::new(&self.data[start..], width, height, self.stride)
    }
}

impl<T: Copy> ImageView<'_, T> {
    /// Copies the view into a contiguous row-major buffer.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            out.extend_from_slice(&self.data[start..start + self.width]);
        }
        out
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> GapResult<usize> {
    if width == 0 || height == 0 {
        return Err(GapError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(GapError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(GapError::InvalidDimensions { width, height })
}

/// Owned single-channel `u8` image stored contiguously.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous buffer of exactly `width * height` samples.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> GapResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() != needed {
            return Err(GapError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image from parts already known to be consistent.
    pub(crate) fn from_raw_parts(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns a borrowed view over the whole image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Copies out the region `(x, y, width, height)`.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> GapResult<Self> {
        let roi = self.view().roi(x, y, width, height)?;
        Self::new(roi.to_vec(), width, height)
    }
}
