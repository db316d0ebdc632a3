//! Polygon moments, Hu invariants and shape distances.
//!
//! Raw moments are integrated over the polygon a contour encloses (Green's
//! theorem), so a contour and any translated, rotated or uniformly scaled copy
//! produce the same seven Hu invariants up to rounding.

use crate::shape::contour::Contour;
use crate::util::math::signed_log10;

/// Raw spatial moments up to third order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
}

impl Moments {
    /// Integrates the moments of the polygon traced by `contour`.
    ///
    /// The sign of the enclosed area is normalized away, so both traversal
    /// directions give the same result. Degenerate polygons (a point or a
    /// line) yield all-zero moments.
    pub fn of_contour(contour: &Contour) -> Self {
        let points = contour.points();
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut a = [0.0f64; 10];
        let mut prev = points[n - 1];
        for &cur in points {
            let (xp, yp) = (prev.x as f64, prev.y as f64);
            let (xc, yc) = (cur.x as f64, cur.y as f64);
            let (xp2, yp2) = (xp * xp, yp * yp);
            let (xc2, yc2) = (xc * xc, yc * yc);
            let cross = xp * yc - xc * yp;
            let sx = xp + xc;
            let sy = yp + yc;

            a[0] += cross;
            a[1] += cross * sx;
            a[2] += cross * sy;
            a[3] += cross * (xp * sx + xc2);
            a[4] += cross * (xp * (sy + yp) + xc * (sy + yc));
            a[5] += cross * (yp * sy + yc2);
            a[6] += cross * sx * (xp2 + xc2);
            a[7] += cross * (xp2 * (3.0 * yp + yc) + 2.0 * xc * xp * sy + xc2 * (yp + 3.0 * yc));
            a[8] += cross * (yp2 * (3.0 * xp + xc) + 2.0 * yc * yp * sx + yc2 * (xp + 3.0 * xc));
            a[9] += cross * sy * (yp2 + yc2);
            prev = cur;
        }

        if a[0].abs() <= f64::EPSILON {
            return Self::default();
        }
        let sign = a[0].signum();
        Self {
            m00: sign * a[0] / 2.0,
            m10: sign * a[1] / 6.0,
            m01: sign * a[2] / 6.0,
            m20: sign * a[3] / 12.0,
            m11: sign * a[4] / 24.0,
            m02: sign * a[5] / 12.0,
            m30: sign * a[6] / 20.0,
            m21: sign * a[7] / 60.0,
            m12: sign * a[8] / 60.0,
            m03: sign * a[9] / 20.0,
        }
    }

    /// Seven Hu moment invariants.
    pub fn hu(&self) -> HuMoments {
        if self.m00.abs() <= f64::EPSILON {
            return HuMoments([0.0; 7]);
        }
        let cx = self.m10 / self.m00;
        let cy = self.m01 / self.m00;

        let mu20 = self.m20 - self.m10 * cx;
        let mu11 = self.m11 - self.m10 * cy;
        let mu02 = self.m02 - self.m01 * cy;
        let mu30 = self.m30 - cx * (3.0 * mu20 + cx * self.m10);
        let mu21 = self.m21 - cx * (2.0 * mu11 + cx * self.m01) - cy * mu20;
        let mu12 = self.m12 - cy * (2.0 * mu11 + cy * self.m10) - cx * mu02;
        let mu03 = self.m03 - cy * (3.0 * mu02 + cy * self.m01);

        let s2 = 1.0 / (self.m00 * self.m00);
        let s3 = s2 / self.m00.abs().sqrt();
        let (n20, n11, n02) = (mu20 * s2, mu11 * s2, mu02 * s2);
        let (n30, n21, n12, n03) = (mu30 * s3, mu21 * s3, mu12 * s3, mu03 * s3);

        let t0 = n30 + n12;
        let t1 = n21 + n03;
        let q0 = n20 - n02;
        let q1 = n30 - 3.0 * n12;
        let q2 = 3.0 * n21 - n03;
        let t0_sq = t0 * t0;
        let t1_sq = t1 * t1;
        let n4 = t0_sq - 3.0 * t1_sq;
        let n4b = 3.0 * t0_sq - t1_sq;

        HuMoments([
            n20 + n02,
            q0 * q0 + 4.0 * n11 * n11,
            q1 * q1 + q2 * q2,
            t0_sq + t1_sq,
            q1 * t0 * n4 + q2 * t1 * n4b,
            q0 * (t0_sq - t1_sq) + 4.0 * n11 * t0 * t1,
            q2 * t0 * n4 - q1 * t1 * n4b,
        ])
    }
}

/// Hu's seven translation, rotation and scale invariants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HuMoments(pub [f64; 7]);

impl HuMoments {
    pub fn of_contour(contour: &Contour) -> Self {
        Moments::of_contour(contour).hu()
    }
}

/// How log-scaled Hu invariants are combined into one distance.
///
/// With `a` and `b` the signed log10 invariants of the two shapes:
/// `I1 = Σ |1/a − 1/b|`, `I2 = Σ |a − b|`, `I3 = max |a − b| / |a|`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeMetric {
    I1,
    #[default]
    I2,
    I3,
}

/// Shape distance between two invariant sets; zero for identical shapes.
///
/// Invariants too small on either side to carry a logarithm are skipped.
pub fn shape_distance(a: &HuMoments, b: &HuMoments, metric: ShapeMetric) -> f64 {
    let mut acc = 0.0f64;
    for (&ha, &hb) in a.0.iter().zip(b.0.iter()) {
        let (Some(la), Some(lb)) = (signed_log10(ha), signed_log10(hb)) else {
            continue;
        };
        match metric {
            ShapeMetric::I1 => {
                if la != 0.0 && lb != 0.0 {
                    acc += (1.0 / la - 1.0 / lb).abs();
                }
            }
            ShapeMetric::I2 => acc += (la - lb).abs(),
            ShapeMetric::I3 => {
                if la != 0.0 {
                    acc = acc.max(((la - lb) / la).abs());
                }
            }
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::{shape_distance, HuMoments, Moments, ShapeMetric};
    use crate::geometry::Point;
    use crate::shape::contour::Contour;

    fn polygon(points: &[(i32, i32)]) -> Contour {
        Contour::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn rectangle_moments_match_closed_form() {
        let rect = polygon(&[(0, 0), (4, 0), (4, 2), (0, 2)]);
        let m = Moments::of_contour(&rect);
        assert!((m.m00 - 8.0).abs() < 1e-9);
        assert!((m.m10 / m.m00 - 2.0).abs() < 1e-9);
        assert!((m.m01 / m.m00 - 1.0).abs() < 1e-9);
        // ∫x² over [0,4]×[0,2] = 2 · 64/3
        assert!((m.m20 - 128.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn traversal_direction_does_not_matter() {
        let cw = polygon(&[(0, 0), (0, 5), (3, 7), (6, 1)]);
        let ccw = polygon(&[(6, 1), (3, 7), (0, 5), (0, 0)]);
        assert_eq!(Moments::of_contour(&cw), Moments::of_contour(&ccw));
    }

    #[test]
    fn square_first_invariant() {
        let square = polygon(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let hu = HuMoments::of_contour(&square);
        assert!((hu.0[0] - 1.0 / 6.0).abs() < 1e-12);
        assert!(hu.0[1].abs() < 1e-12);
    }

    #[test]
    fn invariants_survive_translation_and_scale() {
        let shape = polygon(&[(0, 0), (8, 1), (11, 6), (4, 9), (-2, 5)]);
        let moved = shape.translated(37, -12);
        let scaled = polygon(&[(0, 0), (24, 3), (33, 18), (12, 27), (-6, 15)]);
        let hu = HuMoments::of_contour(&shape);
        for metric in [ShapeMetric::I1, ShapeMetric::I2, ShapeMetric::I3] {
            assert!(shape_distance(&hu, &HuMoments::of_contour(&moved), metric) < 1e-6);
            assert!(shape_distance(&hu, &HuMoments::of_contour(&scaled), metric) < 1e-6);
        }
    }

    #[test]
    fn different_shapes_are_far_apart() {
        let square = HuMoments::of_contour(&polygon(&[(0, 0), (20, 0), (20, 20), (0, 20)]));
        let bar = HuMoments::of_contour(&polygon(&[(0, 0), (60, 0), (60, 6), (0, 6)]));
        assert!(shape_distance(&square, &bar, ShapeMetric::I2) > 0.3);
    }

    #[test]
    fn degenerate_contours_have_zero_moments() {
        let line = polygon(&[(0, 0), (5, 5)]);
        assert_eq!(Moments::of_contour(&line), Moments::default());
        assert_eq!(HuMoments::of_contour(&line), HuMoments([0.0; 7]));
    }
}
