use crate::TcError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute and relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TcError::NonFinite { what, value: v })
    }
}

/// Relative deviation `|actual - target| / |target|`.
///
/// A zero target has no relative scale and is reported as degenerate rather
/// than producing an infinite or NaN error.
pub fn relative_error(actual: Real, target: Real) -> Result<Real, TcError> {
    if target == 0.0 {
        return Err(TcError::Degenerate {
            what: "relative error against a zero target",
        });
    }
    Ok((actual - target).abs() / target.abs())
}
