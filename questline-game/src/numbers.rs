//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Apply a percentage delta to a value: `round(value * (100 + delta) / 100)`.
#[must_use]
pub fn apply_percentage(value: i32, delta: i32) -> i32 {
    round_f64_to_i32(f64::from(value) * (100.0 + f64::from(delta)) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        assert_eq!(apply_percentage(10, 15), 12);
        assert_eq!(apply_percentage(10, -15), 9);
        assert_eq!(apply_percentage(3, 50), 5);
        assert_eq!(apply_percentage(0, 300), 0);
    }
}
