use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Bounded squashing for observations
// ---------------------------------------------------------------------------

/// Scale used for angular velocity when no explicit knee is given.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Largest magnitude `sigmoid_scalar` returns; the raw formula rounds to
/// exactly 1.0 once |x|/s exceeds ~37.
pub const MAX_MAGNITUDE: f64 = 1.0 - f64::EPSILON;

/// Odd sigmoid: `sign(x) * (2 / (1 + e^(-|x|/s)) - 1)`.
///
/// Output lies in (-1, 1), is ~`x / (2s)` near zero and saturates toward
/// ±1 as |x| grows. NaN in, NaN out.
pub fn sigmoid_scalar(x: f64, scale: f64) -> f64 {
    let mut magnitude = 2.0 / (1.0 + (-x.abs() / scale).exp()) - 1.0;
    if magnitude > MAX_MAGNITUDE {
        magnitude = MAX_MAGNITUDE;
    }
    magnitude.copysign(x)
}

/// Component-wise [`sigmoid_scalar`].
pub fn sigmoid(v: &Vector3<f64>, scale: f64) -> Vector3<f64> {
    v.map(|x| sigmoid_scalar(x, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(sigmoid_scalar(0.0, 1.0), 0.0);
    }

    #[test]
    fn output_is_bounded() {
        for &x in &[-1e6, -1e3, -50.0, -10.0, -1.0, -1e-3, 1e-3, 1.0, 10.0, 50.0, 1e3, 1e6] {
            for &s in &[0.25, 1.0, 5.0] {
                let y = sigmoid_scalar(x, s);
                assert!(y.abs() < 1.0, "sigmoid({x}, {s}) = {y}");
            }
        }
        // 10 m/s at the linear-velocity knee used to round to exactly 1.0.
        assert!(sigmoid_scalar(10.0, 0.25) < 1.0);
        assert!(sigmoid_scalar(-10.0, 0.25) > -1.0);
        assert!(sigmoid_scalar(f64::INFINITY, 1.0) < 1.0);
    }

    #[test]
    fn odd_symmetry() {
        let v = Vector3::new(0.3, -7.0, 42.0);
        let pos = sigmoid(&v, 0.25);
        let neg = sigmoid(&-v, 0.25);
        assert!((pos + neg).norm() < 1e-12);
    }

    #[test]
    fn scale_moves_the_knee() {
        let sharp = sigmoid_scalar(1.0, 0.25);
        let soft = sigmoid_scalar(1.0, 5.0);
        assert!(sharp > soft);
    }

    #[test]
    fn monotonic_in_input() {
        let mut prev = -1.0;
        for i in -100..=100 {
            let y = sigmoid_scalar(i as f64 * 0.1, 1.0);
            assert!(y >= prev);
            prev = y;
        }
    }

    #[test]
    fn nan_propagates() {
        assert!(sigmoid_scalar(f64::NAN, 1.0).is_nan());
    }
}
