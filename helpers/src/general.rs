use std::error::Error;
use std::fmt;

/// InputValueError is used if some option or parameter does not fulfill the posed requirements,
/// e.g., a non-positive suspension rest length or a sweep interval of zero.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

/// clamp_abs limits x to the range [-limit, limit]. In contrast to f64::clamp it does not panic
/// for a negative limit but returns zero in that case.
pub fn clamp_abs(x: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 0.0;
    }
    x.max(-limit).min(limit)
}

/// is_positive_finite checks if x is a usable divisor for physical quantities such as time steps
/// and lengths.
pub fn is_positive_finite(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// lin_interp returns the linearly interpolated value between a (t = 0) and b (t = 1). t is not
/// clamped.
pub fn lin_interp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
