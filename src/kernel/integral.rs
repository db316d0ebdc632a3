//! Integral images for constant-time window statistics.

use crate::image::ImageView;

/// Summed-area tables of values and squared values.
///
/// Both tables have one extra leading row and column of zeros, so the sum
/// over `[x, x + w) × [y, y + h)` is four lookups. Sums are exact in `u64`.
pub struct WindowSums {
    width: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl WindowSums {
    pub fn new(image: ImageView<'_, u8>) -> Self {
        let width = image.width() + 1;
        let height = image.height() + 1;
        let mut sum = vec![0u64; width * height];
        let mut sum_sq = vec![0u64; width * height];

        for y in 0..image.height() {
            let Some(row) = image.row(y) else { break };
            let mut row_sum = 0u64;
            let mut row_sum_sq = 0u64;
            for (x, &value) in row.iter().enumerate() {
                let v = value as u64;
                row_sum += v;
                row_sum_sq += v * v;
                let idx = (y + 1) * width + x + 1;
                sum[idx] = sum[idx - width] + row_sum;
                sum_sq[idx] = sum_sq[idx - width] + row_sum_sq;
            }
        }

        Self { width, sum, sum_sq }
    }

    /// Returns `(Σv, Σv²)` over the window with top-left `(x, y)`.
    #[inline]
    pub fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (u64, u64) {
        let stride = self.width;
        let a = y * stride + x;
        let b = a + w;
        let c = (y + h) * stride + x;
        let d = c + w;
        (
            self.sum[d] + self.sum[a] - self.sum[b] - self.sum[c],
            self.sum_sq[d] + self.sum_sq[a] - self.sum_sq[b] - self.sum_sq[c],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::WindowSums;
    use crate::ImageView;

    #[test]
    fn window_sums_match_direct_sums() {
        let data: Vec<u8> = (0u8..20).map(|v| v.wrapping_mul(37)).collect();
        let view = ImageView::from_slice(&data, 5, 4).unwrap();
        let sums = WindowSums::new(view);
        for y in 0..3 {
            for x in 0..3 {
                let mut s = 0u64;
                let mut s2 = 0u64;
                for ty in 0..2 {
                    for tx in 0..3 {
                        let v = *view.get(x + tx, y + ty).unwrap() as u64;
                        s += v;
                        s2 += v * v;
                    }
                }
                assert_eq!(sums.window(x, y, 3, 2), (s, s2));
            }
        }
    }
}
