//! Process capability indices (Cp, Cpk, Cpu, Cpl).
//!
//! Capability indices quantify how well a process fits within its
//! specification limits. The indices here are short-term: they use the
//! within-subgroup sigma a control chart estimates (R-bar/d2 or S-bar/c4).
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.

use serde::Serialize;

use crate::error::{Result, SpcError};

/// Specification limits for capability analysis.
///
/// At least one of the upper (USL) and lower (LSL) limits must be given.
///
/// # Examples
///
/// ```
/// use spc_engine::capability::ProcessCapability;
///
/// // Two-sided specification: LSL = 9.0, USL = 11.0
/// let spec = ProcessCapability::new(Some(11.0), Some(9.0)).unwrap();
///
/// let indices = spec.compute(10.0, 0.25).unwrap();
/// assert!((indices.cp.unwrap() - 4.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessCapability {
    usl: Option<f64>,
    lsl: Option<f64>,
}

/// Computed capability indices.
///
/// Fields are `Option<f64>` because not every index exists for a one-sided
/// specification. Cp requires both limits.
///
/// | Index | Value | Interpretation |
/// |-------|-------|----------------|
/// | Cp | >= 1.33 | Process spread fits the tolerance |
/// | Cpk | >= 1.33 | Process is capable and centered |
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityIndices {
    /// Cp = (USL - LSL) / (6 * sigma).
    pub cp: Option<f64>,
    /// Cpk = min(Cpu, Cpl) over the limits present.
    pub cpk: Option<f64>,
    /// Cpu = (USL - mean) / (3 * sigma).
    pub cpu: Option<f64>,
    /// Cpl = (mean - LSL) / (3 * sigma).
    pub cpl: Option<f64>,
    /// Process mean the indices were computed for.
    pub mean: f64,
    /// Within-subgroup sigma the indices were computed for.
    pub sigma: f64,
}

impl ProcessCapability {
    /// Creates a new capability specification.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidArgument`] if:
    /// - both `usl` and `lsl` are `None`
    /// - either limit is NaN or infinite
    /// - `usl <= lsl` when both are provided
    ///
    /// # Examples
    ///
    /// ```
    /// use spc_engine::capability::ProcessCapability;
    ///
    /// assert!(ProcessCapability::new(Some(10.0), None).is_ok());
    /// assert!(ProcessCapability::new(None, Some(5.0)).is_ok());
    /// assert!(ProcessCapability::new(None, None).is_err());
    /// assert!(ProcessCapability::new(Some(5.0), Some(10.0)).is_err());
    /// ```
    pub fn new(usl: Option<f64>, lsl: Option<f64>) -> Result<Self> {
        if usl.is_none() && lsl.is_none() {
            return Err(SpcError::InvalidArgument(
                "at least one specification limit (USL or LSL) is required".to_string(),
            ));
        }
        if usl.is_some_and(|u| !u.is_finite()) {
            return Err(SpcError::InvalidArgument("USL must be finite".to_string()));
        }
        if lsl.is_some_and(|l| !l.is_finite()) {
            return Err(SpcError::InvalidArgument("LSL must be finite".to_string()));
        }
        if let (Some(u), Some(l)) = (usl, lsl) {
            if u <= l {
                return Err(SpcError::InvalidArgument(format!(
                    "USL ({u}) must be greater than LSL ({l})"
                )));
            }
        }
        Ok(Self { usl, lsl })
    }

    /// Upper specification limit.
    pub fn usl(&self) -> Option<f64> {
        self.usl
    }

    /// Lower specification limit.
    pub fn lsl(&self) -> Option<f64> {
        self.lsl
    }

    /// Computes the indices for a process with the given mean and sigma.
    ///
    /// # Errors
    ///
    /// [`SpcError::Domain`] if `mean` is not finite or `sigma` is not a
    /// finite positive number.
    pub fn compute(&self, mean: f64, sigma: f64) -> Result<CapabilityIndices> {
        if !mean.is_finite() {
            return Err(SpcError::Domain(format!("process mean must be finite, got {mean}")));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(SpcError::Domain(format!(
                "sigma must be finite and positive, got {sigma}"
            )));
        }

        let cpu = self.usl.map(|u| (u - mean) / (3.0 * sigma));
        let cpl = self.lsl.map(|l| (mean - l) / (3.0 * sigma));
        let cp = match (self.usl, self.lsl) {
            (Some(u), Some(l)) => Some((u - l) / (6.0 * sigma)),
            _ => None,
        };
        let cpk = match (cpu, cpl) {
            (Some(u), Some(l)) => Some(u.min(l)),
            (Some(u), None) => Some(u),
            (None, Some(l)) => Some(l),
            (None, None) => None,
        };

        Ok(CapabilityIndices {
            cp,
            cpk,
            cpu,
            cpl,
            mean,
            sigma,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_requires_at_least_one_limit() {
        assert!(matches!(
            ProcessCapability::new(None, None),
            Err(SpcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn new_rejects_usl_leq_lsl() {
        assert!(ProcessCapability::new(Some(5.0), Some(10.0)).is_err());
        assert!(ProcessCapability::new(Some(5.0), Some(5.0)).is_err());
    }

    #[test]
    fn new_rejects_non_finite() {
        assert!(ProcessCapability::new(Some(f64::NAN), Some(1.0)).is_err());
        assert!(ProcessCapability::new(Some(10.0), Some(f64::INFINITY)).is_err());
    }

    /// Montgomery (2019), Example 8.1 style: LSL = 200, USL = 220, sigma = 2.
    ///
    /// Cp = 20 / 12 = 1.6667
    #[test]
    fn centered_process() {
        let spec = ProcessCapability::new(Some(220.0), Some(200.0)).unwrap();
        let indices = spec.compute(210.0, 2.0).unwrap();

        assert_relative_eq!(indices.cp.unwrap(), 20.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(indices.cpk.unwrap(), indices.cp.unwrap(), epsilon = 1e-12);
    }

    /// Mean shifted toward USL.
    ///
    /// Cpu = (220 - 215) / 6 = 0.8333, Cpl = 15 / 6 = 2.5, Cpk = Cpu.
    #[test]
    fn off_center_process() {
        let spec = ProcessCapability::new(Some(220.0), Some(200.0)).unwrap();
        let indices = spec.compute(215.0, 2.0).unwrap();

        assert_relative_eq!(indices.cpu.unwrap(), 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(indices.cpl.unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(indices.cpk.unwrap(), 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(indices.cp.unwrap(), 20.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn usl_only() {
        let spec = ProcessCapability::new(Some(10.0), None).unwrap();
        let indices = spec.compute(8.0, 0.5).unwrap();

        assert!(indices.cp.is_none(), "Cp requires both limits");
        assert!(indices.cpl.is_none());
        assert_eq!(indices.cpk, indices.cpu);
    }

    #[test]
    fn lsl_only() {
        let spec = ProcessCapability::new(None, Some(5.0)).unwrap();
        let indices = spec.compute(8.0, 0.5).unwrap();

        assert!(indices.cp.is_none());
        assert!(indices.cpu.is_none());
        assert_eq!(indices.cpk, indices.cpl);
        assert_relative_eq!(indices.cpl.unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn mean_outside_spec_gives_negative_cpk() {
        let spec = ProcessCapability::new(Some(10.0), Some(0.0)).unwrap();
        let indices = spec.compute(12.0, 1.0).unwrap();
        assert!(indices.cpk.unwrap() < 0.0);
    }

    #[test]
    fn rejects_invalid_sigma() {
        let spec = ProcessCapability::new(Some(10.0), Some(0.0)).unwrap();
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(spec.compute(5.0, sigma), Err(SpcError::Domain(_))),
                "sigma={sigma} should be rejected"
            );
        }
        assert!(spec.compute(f64::NAN, 1.0).is_err());
    }
}
