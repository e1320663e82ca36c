//! Attributes control chart: P chart.
//!
//! Monitors the proportion of defective items per sample. Sample sizes may be
//! constant (one shared value) or vary per sample; with variable sizes every
//! point gets its own control limits.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 7: Control Charts for Attributes.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use serde::Serialize;
use tracing::{debug, instrument};

use super::chart::{ControlLimits, SpreadParameter};
use crate::error::{Result, SpcError};
use crate::stats;

/// Control limits of a [`PChart`].
///
/// Scalar when the sample size is shared by all points, one set per point
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PChartLimits {
    /// Limits shared by all points (constant sample size).
    Scalar(ControlLimits),
    /// Limits for each point, aligned with the defect counts.
    PerPoint(Vec<ControlLimits>),
}

impl PChartLimits {
    /// Limits applying to point `index`.
    pub fn at(&self, index: usize) -> Option<ControlLimits> {
        match self {
            Self::Scalar(limits) => Some(*limits),
            Self::PerPoint(limits) => limits.get(index).copied(),
        }
    }
}

/// Proportion nonconforming (P) chart.
///
/// # Formulas
///
/// - p_i = defects_i / n_i
/// - CL = p-bar = mean(p_i)
/// - UCL_i / LCL_i = p-bar +/- 3 * sqrt(p-bar * (1 - p-bar) / n_i)
///
/// Limits are reported as computed; a negative LCL is not clamped to zero.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::{PChart, PChartLimits, SpreadParameter};
///
/// let chart = PChart::new(&[3.0, 5.0, 2.0, 4.0, 6.0], SpreadParameter::Scalar(100.0)).unwrap();
/// assert!((chart.center_line() - 0.04).abs() < 1e-12);
/// assert!(matches!(chart.limits(), PChartLimits::Scalar(_)));
/// ```
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 7, Section 7.2.
#[derive(Debug, Clone)]
pub struct PChart {
    defects: Vec<f64>,
    sample_size: SpreadParameter,
    proportions: Vec<f64>,
    p_bar: f64,
    limits: PChartLimits,
}

impl PChart {
    /// Build the chart from defect counts and sample size(s).
    ///
    /// # Errors
    ///
    /// - [`SpcError::InsufficientData`] if `defects` is empty
    /// - [`SpcError::ShapeMismatch`] if per-point sample sizes differ in length from `defects`
    /// - [`SpcError::Domain`] if a sample size is not a finite positive number, a
    ///   defect count is negative or non-finite, or a proportion exceeds 1
    #[instrument(level = "debug", skip(defects, sample_size), fields(n = defects.len()))]
    pub fn new(defects: &[f64], sample_size: SpreadParameter) -> Result<Self> {
        if defects.is_empty() {
            return Err(SpcError::insufficient(1, 0));
        }
        sample_size.check_len(defects.len())?;
        stats::ensure_finite(defects, "defect counts")?;
        if let Some(&bad) = sample_size
            .values()
            .iter()
            .find(|n| !n.is_finite() || **n <= 0.0)
        {
            return Err(SpcError::Domain(format!(
                "sample size must be finite and positive, got {bad}"
            )));
        }

        let mut proportions = Vec::with_capacity(defects.len());
        for (i, &d) in defects.iter().enumerate() {
            if d < 0.0 {
                return Err(SpcError::Domain(format!(
                    "defect count must be non-negative, got {d} at index {i}"
                )));
            }
            let n = sample_size
                .at(i)
                .ok_or(SpcError::ShapeMismatch {
                    expected: defects.len(),
                    actual: i,
                })?;
            let p = d / n;
            if p > 1.0 {
                return Err(SpcError::Domain(format!(
                    "proportion {p} outside [0, 1] at index {i} ({d} defects in {n})"
                )));
            }
            proportions.push(p);
        }

        let p_bar = stats::mean(&proportions)?;
        let half_width = |n: f64| 3.0 * (p_bar * (1.0 - p_bar) / n).sqrt();
        let limits = match &sample_size {
            SpreadParameter::Scalar(n) => {
                PChartLimits::Scalar(ControlLimits::symmetric(p_bar, half_width(*n)))
            }
            SpreadParameter::PerPoint(sizes) => PChartLimits::PerPoint(
                sizes
                    .iter()
                    .map(|&n| ControlLimits::symmetric(p_bar, half_width(n)))
                    .collect(),
            ),
        };

        debug!(points = proportions.len(), p_bar, "computed P chart limits");

        Ok(Self {
            defects: defects.to_vec(),
            sample_size,
            proportions,
            p_bar,
            limits,
        })
    }

    /// Defect counts the chart was built from.
    pub fn defects(&self) -> &[f64] {
        &self.defects
    }

    /// Sample size(s) the chart was built from.
    pub fn sample_size(&self) -> &SpreadParameter {
        &self.sample_size
    }

    /// Proportion defective per sample.
    pub fn proportions(&self) -> &[f64] {
        &self.proportions
    }

    /// Average proportion defective (p-bar).
    pub fn center_line(&self) -> f64 {
        self.p_bar
    }

    /// Control limits, scalar or per point.
    pub fn limits(&self) -> &PChartLimits {
        &self.limits
    }

    /// Indices of proportions strictly outside their limits.
    pub fn out_of_control(&self) -> Vec<usize> {
        self.proportions
            .iter()
            .enumerate()
            .filter(|&(i, &p)| self.limits.at(i).is_some_and(|l| l.is_beyond(p)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether every proportion lies within its limits.
    pub fn is_in_control(&self) -> bool {
        self.out_of_control().is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn per_point_limits_align_with_defects(
            samples in proptest::collection::vec((0_u32..=50, 50_u32..=500), 1..=40)
        ) {
            let defects: Vec<f64> = samples.iter().map(|&(d, _)| f64::from(d)).collect();
            let sizes: Vec<f64> = samples.iter().map(|&(_, n)| f64::from(n)).collect();
            let chart = PChart::new(&defects, SpreadParameter::PerPoint(sizes)).unwrap();

            let p_bar = chart.center_line();
            prop_assert!((0.0..=1.0).contains(&p_bar));
            match chart.limits() {
                PChartLimits::PerPoint(limits) => {
                    prop_assert_eq!(limits.len(), defects.len());
                    for l in limits {
                        prop_assert!(l.lcl <= l.cl && l.cl <= l.ucl);
                    }
                }
                PChartLimits::Scalar(_) => prop_assert!(false, "expected per-point limits"),
            }
        }
    }
}
