//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{RealField, Vector2};
use num_traits::Float;

/// Map a value from one range into another.
///
/// No clamping is performed, values outside the source range are
/// extrapolated.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Gradually transition an output between two values as an input moves
/// through a range.
///
/// - `value <= x_low` gives `y_low`
/// - `value >= x_high` gives `y_high`
/// - otherwise `y` is linearly interpolated between `y_low` and `y_high`.
///
/// If `x_low == x_high` the transition is a step at that value, with the
/// step itself giving `y_high`.
pub fn gradual<T>(value: T, x_low: T, x_high: T, y_low: T, y_high: T) -> T
where
    T: Float
{
    if value >= x_high {
        y_high
    }
    else if value <= x_low {
        y_low
    }
    else {
        lin_map((x_low, x_high), (y_low, y_high), value)
    }
}

/// Return the unit vector in the direction of `v`, or the zero vector if `v`
/// has no length.
pub fn unit_or_zero<T>(v: &Vector2<T>) -> Vector2<T>
where
    T: RealField + Copy
{
    let n = v.norm();

    if n > T::zero() {
        v / n
    }
    else {
        Vector2::zeros()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_gradual() {
        // Clamped either side of the range
        assert_eq!(gradual(0.0, 5.0, 10.0, 3.0, 1.5), 3.0);
        assert_eq!(gradual(5.0, 5.0, 10.0, 3.0, 1.5), 3.0);
        assert_eq!(gradual(10.0, 5.0, 10.0, 3.0, 1.5), 1.5);
        assert_eq!(gradual(50.0, 5.0, 10.0, 3.0, 1.5), 1.5);

        // Linear in the middle
        assert!((gradual(7.5, 5.0, 10.0, 3.0, 1.5) - 2.25).abs() < EPS);
        assert!((gradual(6.0, 5.0, 10.0, 3.0, 1.5) - 2.7).abs() < EPS);
    }

    #[test]
    fn test_gradual_degenerate() {
        // Equal thresholds give a step, never a NaN
        assert_eq!(gradual(4.9, 5.0, 5.0, 3.0, 1.5), 3.0);
        assert_eq!(gradual(5.0, 5.0, 5.0, 3.0, 1.5), 1.5);
        assert_eq!(gradual(5.1, 5.0, 5.0, 3.0, 1.5), 1.5);
    }

    #[test]
    fn test_gradual_monotonic() {
        let mut prev = gradual(0.0, 2.0, 8.0, 4.0, 1.0);

        for i in 1..100 {
            let y = gradual(i as f64 * 0.1, 2.0, 8.0, 4.0, 1.0);
            assert!(y <= prev);
            prev = y;
        }
    }

    #[test]
    fn test_unit_or_zero() {
        let u = unit_or_zero(&Vector2::new(3.0, 4.0));
        assert!((u.x - 0.6).abs() < EPS);
        assert!((u.y - 0.8).abs() < EPS);

        let z = unit_or_zero(&Vector2::new(0.0f64, 0.0));
        assert_eq!(z, Vector2::zeros());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-2.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.5, -1.0, 1.0), 0.5);
    }
}
