//! Core control chart types and trait.
//!
//! Defines the building blocks shared by all charts: control limits, the
//! scalar-or-per-point [`SpreadParameter`], the serializable
//! [`ChartSummary`] snapshot, and the [`ControlChart`] trait that the
//! variables charts implement for external renderers.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};

/// Control limits for one chart track.
///
/// Represents the upper control limit (UCL), center line (CL), and lower
/// control limit (LCL) computed from the process data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line.
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ControlLimits {
    /// Symmetric limits `cl ± half_width`.
    pub fn symmetric(cl: f64, half_width: f64) -> Self {
        Self {
            ucl: cl + half_width,
            cl,
            lcl: cl - half_width,
        }
    }

    /// One sigma of the charted statistic, `(UCL - CL) / 3`.
    pub fn sigma(&self) -> f64 {
        (self.ucl - self.cl) / 3.0
    }

    /// Whether `value` lies strictly outside the limits.
    pub fn is_beyond(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }

    /// Fail with a domain error if any limit overflowed.
    pub(crate) fn checked(self, track: &str) -> Result<Self> {
        if self.ucl.is_finite() && self.cl.is_finite() && self.lcl.is_finite() {
            Ok(self)
        } else {
            Err(SpcError::Domain(format!("{track} limits are not finite: {self:?}")))
        }
    }
}

/// A parameter that is either shared by all points or given per point.
///
/// Used for rule-evaluator centers and sigmas and for P chart sample sizes.
/// Deserializes from either a bare number or an array of numbers.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::SpreadParameter;
///
/// let shared = SpreadParameter::Scalar(1.0);
/// assert_eq!(shared.at(7), Some(1.0));
///
/// let per_point = SpreadParameter::PerPoint(vec![1.0, 2.0]);
/// assert_eq!(per_point.at(1), Some(2.0));
/// assert_eq!(per_point.at(2), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpreadParameter {
    /// One value for every point.
    Scalar(f64),
    /// One value per point, aligned by index.
    PerPoint(Vec<f64>),
}

impl SpreadParameter {
    /// Value applying to point `index`, or `None` past the end of a per-point sequence.
    pub fn at(&self, index: usize) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::PerPoint(values) => values.get(index).copied(),
        }
    }

    /// Check that this parameter can be applied to a series of `len` points.
    ///
    /// # Errors
    ///
    /// [`SpcError::ShapeMismatch`] when a per-point sequence has a different length.
    pub fn check_len(&self, len: usize) -> Result<()> {
        match self {
            Self::Scalar(_) => Ok(()),
            Self::PerPoint(values) if values.len() == len => Ok(()),
            Self::PerPoint(values) => Err(SpcError::ShapeMismatch {
                expected: len,
                actual: values.len(),
            }),
        }
    }

    /// Values as a slice; a scalar is a one-element slice.
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::PerPoint(values) => values,
        }
    }
}

impl From<f64> for SpreadParameter {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for SpreadParameter {
    fn from(values: Vec<f64>) -> Self {
        Self::PerPoint(values)
    }
}

/// Chart family of a [`ChartSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// X-bar and Range.
    XBarR,
    /// X-bar and Standard Deviation.
    XBarS,
    /// Individuals and Moving Range.
    IndividualMR,
}

/// Read-only snapshot of a variables chart for renderers and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    /// Chart family.
    pub kind: ChartKind,
    /// Limits of the location track (X-bar or individuals).
    pub primary: ControlLimits,
    /// Limits of the dispersion track (R, S or MR).
    pub secondary: ControlLimits,
    /// Points on the location track.
    pub points: usize,
}

/// Query surface shared by the variables charts.
///
/// Charts are computed at construction; every accessor is a side-effect-free
/// read, so repeated queries return identical values.
pub trait ControlChart {
    /// Chart family.
    fn kind(&self) -> ChartKind;

    /// Limits of the location track.
    fn primary_limits(&self) -> ControlLimits;

    /// Limits of the dispersion track.
    fn secondary_limits(&self) -> ControlLimits;

    /// Plotted values of the location track.
    fn primary_series(&self) -> &[f64];

    /// Plotted values of the dispersion track.
    fn secondary_series(&self) -> &[f64];

    /// Snapshot of both tracks.
    fn summary(&self) -> ChartSummary {
        ChartSummary {
            kind: self.kind(),
            primary: self.primary_limits(),
            secondary: self.secondary_limits(),
            points: self.primary_series().len(),
        }
    }
}
