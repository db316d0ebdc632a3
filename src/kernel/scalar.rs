//! Scalar reference kernel for ZNCC evaluation.

use crate::candidate::argmax::{better, ArgMax, Peak};
use crate::kernel::{placement_range, Kernel, ScanParams, WindowSums};
use crate::template::TemplatePlan;
use crate::util::{GapError, GapResult};
use crate::ImageView;

/// Scalar unmasked ZNCC kernel.
pub struct ZnccScalar;

/// Zero-mean normalized cross-correlation at `(x, y)`.
///
/// The window statistics come from the integral images; only the dot product
/// with the zero-mean template touches the pixels. Flat windows score zero.
#[inline]
pub(crate) fn zncc_at(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    sums: &WindowSums,
    x: usize,
    y: usize,
    min_var_i: f64,
) -> f64 {
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    let (sum_i, sum_i2) = sums.window(x, y, tpl_width, tpl_height);

    let n = plan.len() as u128;
    let spread = n * sum_i2 as u128 - (sum_i as u128) * (sum_i as u128);
    let var_i = spread as f64 / n as f64;
    if spread == 0 || var_i <= min_var_i {
        return 0.0;
    }

    let data = image.as_slice();
    let stride = image.stride();
    let t_prime = plan.zero_mean();
    let mut dot = 0.0f64;
    for ty in 0..tpl_height {
        let start = (y + ty) * stride + x;
        let img_row = &data[start..start + tpl_width];
        let tpl_row = &t_prime[ty * tpl_width..(ty + 1) * tpl_width];
        for (&t, &value) in tpl_row.iter().zip(img_row) {
            dot += t * value as f64;
        }
    }

    let score = dot / (plan.var_t() * var_i).sqrt();
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Best placement within row `y`, scanning `x` ascending.
pub(crate) fn scan_row(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    sums: &WindowSums,
    y: usize,
    max_x: usize,
    params: ScanParams,
) -> Option<Peak> {
    let mut best = ArgMax::new();
    for x in 0..=max_x {
        let score = zncc_at(image, plan, sums, x, y, params.min_var_i);
        best.push(Peak { x, y, score });
    }
    best.into_best()
}

impl Kernel for ZnccScalar {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        sums: &WindowSums,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> f64 {
        match placement_range(image, plan) {
            Ok((max_x, max_y)) if x <= max_x && y <= max_y => {
                zncc_at(image, plan, sums, x, y, params.min_var_i)
            }
            _ => f64::NEG_INFINITY,
        }
    }

    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        params: ScanParams,
    ) -> GapResult<Peak> {
        let (max_x, max_y) = placement_range(image, plan)?;
        let sums = WindowSums::new(image);

        let best = (0..=max_y)
            .filter_map(|y| scan_row(image, plan, &sums, y, max_x, params))
            .reduce(better);
        best.ok_or(GapError::InvalidDimensions {
            width: plan.width(),
            height: plan.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ZnccScalar;
    use crate::kernel::{Kernel, ScanParams, WindowSums};
    use crate::template::TemplatePlan;
    use crate::util::GapError;
    use crate::ImageView;

    #[test]
    fn zncc_scan_matches_bruteforce() {
        let img_width = 6;
        let img_height = 5;
        let mut image = Vec::with_capacity(img_width * img_height);
        for y in 0..img_height {
            for x in 0..img_width {
                image.push(((x * 17 + y * 9 + x * y) & 0xFF) as u8);
            }
        }
        let tpl_width = 3;
        let tpl_height = 2;
        let mut tpl = Vec::with_capacity(tpl_width * tpl_height);
        for y in 0..tpl_height {
            for x in 0..tpl_width {
                tpl.push(((x * 5 + y * 11 + x * y) & 0xFF) as u8);
            }
        }

        let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();
        let tpl_view = ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap();
        let plan = TemplatePlan::from_view(tpl_view).unwrap();
        let best = ZnccScalar::scan_full(image_view, &plan, ScanParams::default()).unwrap();

        let n = (tpl_width * tpl_height) as f64;
        let t_mean = tpl.iter().map(|&v| v as f64).sum::<f64>() / n;
        let mut best_score = f64::NEG_INFINITY;
        let mut best_x = 0;
        let mut best_y = 0;
        for y in 0..=(img_height - tpl_height) {
            for x in 0..=(img_width - tpl_width) {
                let mut window = Vec::with_capacity(tpl.len());
                for ty in 0..tpl_height {
                    let row = image_view.row(y + ty).unwrap();
                    window.extend(row[x..x + tpl_width].iter().map(|&v| v as f64));
                }
                let i_mean = window.iter().sum::<f64>() / n;
                let mut num = 0.0;
                let mut den_t = 0.0;
                let mut den_i = 0.0;
                for (t, i) in tpl.iter().zip(&window) {
                    let dt = *t as f64 - t_mean;
                    let di = i - i_mean;
                    num += dt * di;
                    den_t += dt * dt;
                    den_i += di * di;
                }
                let score = if den_i == 0.0 { 0.0 } else { num / (den_t * den_i).sqrt() };
                if score > best_score {
                    best_score = score;
                    best_x = x;
                    best_y = y;
                }
            }
        }

        assert_eq!(best.x, best_x);
        assert_eq!(best.y, best_y);
        assert!((best.score - best_score).abs() < 1e-9);
    }

    #[test]
    fn scan_keeps_first_row_of_tied_maxima() {
        let width = 12;
        let height = 9;
        let tpl = [10u8, 200, 60, 90];
        let mut image = vec![50u8; width * height];
        for &(x0, y0) in &[(8, 1), (2, 1), (1, 6)] {
            image[y0 * width + x0] = tpl[0];
            image[y0 * width + x0 + 1] = tpl[1];
            image[(y0 + 1) * width + x0] = tpl[2];
            image[(y0 + 1) * width + x0 + 1] = tpl[3];
        }
        let image_view = ImageView::from_slice(&image, width, height).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 2, 2).unwrap()).unwrap();
        let best = ZnccScalar::scan_full(image_view, &plan, ScanParams::default()).unwrap();
        assert_eq!((best.x, best.y), (2, 1));
        assert!((best.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn score_at_is_out_of_range_outside_placements() {
        let image = vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let image_view = ImageView::from_slice(&image, 3, 3).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&[1u8, 2], 2, 1).unwrap())
            .unwrap();
        let sums = WindowSums::new(image_view);
        let params = ScanParams::default();
        assert_eq!(
            ZnccScalar::score_at(image_view, &plan, &sums, 2, 0, params),
            f64::NEG_INFINITY
        );
        assert!((ZnccScalar::score_at(image_view, &plan, &sums, 1, 2, params) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn template_larger_than_image_is_rejected() {
        let image = vec![0u8, 1, 2, 3];
        let image_view = ImageView::from_slice(&image, 2, 2).unwrap();
        let tpl = vec![0u8, 1, 2];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 3, 1).unwrap()).unwrap();
        let err = ZnccScalar::scan_full(image_view, &plan, ScanParams::default()).unwrap_err();
        assert_eq!(err, GapError::InvalidDimensions { width: 3, height: 1 });
    }
}
