//! Bounded quadrature.

use crate::error::{ProcessError, ProcessResult};

/// Composite Simpson integral of `f` over `[a, b]` with `intervals` panels.
///
/// `intervals` is rounded up to the next even number. Exact for cubics.
pub fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, intervals: usize) -> ProcessResult<f64> {
    if !a.is_finite() || !b.is_finite() || b < a {
        return Err(ProcessError::InvalidConfig {
            what: format!("integration interval [{a}, {b}] is invalid"),
        });
    }
    if intervals == 0 {
        return Err(ProcessError::InvalidConfig {
            what: "integration needs at least one interval".into(),
        });
    }
    let n = intervals + intervals % 2;
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    let value = sum * h / 3.0;
    if !value.is_finite() {
        return Err(ProcessError::InvalidConfig {
            what: "integrand is not finite over the interval".into(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_for_cubics() {
        let v = simpson(|t| t * t * t - 2.0 * t + 1.0, 0.0, 2.0, 4).unwrap();
        // ∫ = 4 - 4 + 2
        assert!((v - 2.0).abs() < 1e-12);
    }

    #[test]
    fn odd_interval_count_is_rounded_up() {
        let v = simpson(|t| 0.02 * (1.0 - t / 600.0), 0.0, 600.0, 3).unwrap();
        assert!((v - 6.0).abs() < 1e-12);
    }

    #[test]
    fn zero_width_interval() {
        assert_eq!(simpson(|_| 1.0, 5.0, 5.0, 10).unwrap(), 0.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(simpson(|t| t, 1.0, 0.0, 10).is_err());
        assert!(simpson(|t| t, 0.0, 1.0, 0).is_err());
        assert!(simpson(|t| 1.0 / t, 0.0, 1.0, 10).is_err());
    }
}
