//! Checked descriptive statistics over `f64` slices.
//!
//! Thin wrappers around [`statrs::statistics::Statistics`] that turn the
//! NaN results statrs produces for undersized input into [`SpcError`]s.
//! Finite input can still overflow (e.g. a range of `1e308 - -1e308`); such
//! results are reported as domain errors rather than returned.

use statrs::statistics::Statistics;

use crate::error::{Result, SpcError};

/// Fail with a domain error if any value is NaN or infinite.
pub fn ensure_finite(data: &[f64], context: &str) -> Result<()> {
    if data.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(SpcError::non_finite(context))
    }
}

/// Arithmetic mean. Requires at least one value.
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(SpcError::insufficient(1, 0));
    }
    finite(Statistics::mean(data), "mean")
}

/// Sample standard deviation (`n - 1` denominator). Requires at least two values.
pub fn std_dev(data: &[f64]) -> Result<f64> {
    if data.len() < 2 {
        return Err(SpcError::insufficient(2, data.len()));
    }
    finite(Statistics::std_dev(data), "standard deviation")
}

/// Range (`max - min`). Requires at least one value.
pub fn range(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(SpcError::insufficient(1, 0));
    }
    finite(Statistics::max(data) - Statistics::min(data), "range")
}

/// Pass `value` through if finite, otherwise fail with a domain error naming `what`.
pub fn finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpcError::Domain(format!("{what} is not finite ({value})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[1.0, 4.0, 7.0]).unwrap(), 4.0);
        assert_eq!(mean(&[]), Err(SpcError::insufficient(1, 0)));
    }

    #[test]
    fn test_std_dev_sample() {
        // Sample variance of [2, 4, 4, 4, 5, 5, 7, 9] is 32/7
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(std_dev(&data).unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_single_value() {
        assert_eq!(std_dev(&[3.0]), Err(SpcError::insufficient(2, 1)));
    }

    #[test]
    fn test_range() {
        assert_relative_eq!(range(&[1.0, 5.0, 3.0]).unwrap(), 4.0);
        assert_relative_eq!(range(&[10.0, 10.0, 10.0]).unwrap(), 0.0);
        assert_relative_eq!(range(&[-2.0]).unwrap(), 0.0);
        assert!(range(&[]).is_err());
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[1.0, 2.0], "data").is_ok());
        assert!(matches!(
            ensure_finite(&[1.0, f64::NAN], "data"),
            Err(SpcError::Domain(_))
        ));
        assert!(ensure_finite(&[f64::INFINITY], "data").is_err());
    }

    #[test]
    fn test_overflow_is_domain_error() {
        let extreme = [-1e308, 1e308];
        assert!(matches!(mean(&extreme), Err(SpcError::Domain(_))));
        assert!(matches!(std_dev(&extreme), Err(SpcError::Domain(_))));
        assert!(matches!(range(&extreme), Err(SpcError::Domain(_))));
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(1.5, "value"), Ok(1.5));
        assert!(matches!(finite(f64::NAN, "value"), Err(SpcError::Domain(_))));
        assert!(matches!(finite(f64::NEG_INFINITY, "value"), Err(SpcError::Domain(_))));
    }
}
