//! Numeric helpers shared by the matchers.

/// Hu invariants at or below this magnitude are treated as absent.
pub(crate) const HU_EPS: f64 = 1e-5;

/// Maps a moment invariant onto a signed log10 scale.
///
/// Returns `None` when the magnitude is too small for the logarithm to carry
/// shape information.
pub(crate) fn signed_log10(value: f64) -> Option<f64> {
    let magnitude = value.abs();
    if magnitude <= HU_EPS || !magnitude.is_finite() {
        return None;
    }
    Some(value.signum() * magnitude.log10())
}

/// Rounds a weighted luminance sum to the nearest `u8`.
#[inline]
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let value = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{luma_u8, signed_log10};

    #[test]
    fn signed_log10_keeps_sign() {
        assert!((signed_log10(0.01).unwrap() + 2.0).abs() < 1e-12);
        assert!((signed_log10(-0.01).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn signed_log10_drops_tiny_values() {
        assert!(signed_log10(0.0).is_none());
        assert!(signed_log10(1e-6).is_none());
        assert!(signed_log10(f64::NAN).is_none());
    }

    #[test]
    fn luma_matches_weights() {
        assert_eq!(luma_u8(0, 0, 0), 0);
        assert_eq!(luma_u8(255, 255, 255), 255);
        assert_eq!(luma_u8(255, 0, 0), 76);
        assert_eq!(luma_u8(0, 255, 0), 150);
        assert_eq!(luma_u8(0, 0, 255), 29);
    }
}
