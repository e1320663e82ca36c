//! Western Electric (WECO) run rules.
//!
//! Detects non-random patterns in a point series relative to a center line
//! and a sigma, either shared by all points or given per point (e.g. per
//! subgroup).
//!
//! | Rule | Window | Condition (same side of center) |
//! |------|--------|---------------------------------|
//! | 1 | 1 | beyond 3 sigma |
//! | 2 | 2 | both beyond 2 sigma |
//! | 3 | 4 | all beyond 1 sigma |
//! | 4 | 8 | all strictly above or all strictly below center |
//!
//! Windows slide over every consecutive position; the scan stops at the
//! first matching window.
//!
//! # References
//!
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use serde::Serialize;
use tracing::trace;

use super::chart::{ControlLimits, SpreadParameter};
use crate::error::{Result, SpcError};
use crate::stats;

/// One of the four Western Electric rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WecoRule {
    /// Rule 1: one point beyond 3 sigma.
    BeyondThreeSigma,
    /// Rule 2: two consecutive points beyond 2 sigma, same side.
    TwoBeyondTwoSigma,
    /// Rule 3: four consecutive points beyond 1 sigma, same side.
    FourBeyondOneSigma,
    /// Rule 4: eight consecutive points on the same side of center.
    EightOneSide,
}

impl WecoRule {
    /// All rules, in rule-number order.
    pub const ALL: [WecoRule; 4] = [
        WecoRule::BeyondThreeSigma,
        WecoRule::TwoBeyondTwoSigma,
        WecoRule::FourBeyondOneSigma,
        WecoRule::EightOneSide,
    ];

    /// Consecutive points the rule inspects.
    pub fn window(self) -> usize {
        match self {
            Self::BeyondThreeSigma => 1,
            Self::TwoBeyondTwoSigma => 2,
            Self::FourBeyondOneSigma => 4,
            Self::EightOneSide => 8,
        }
    }

    /// Zone boundary as a multiple of sigma.
    pub fn sigma_multiple(self) -> f64 {
        match self {
            Self::BeyondThreeSigma => 3.0,
            Self::TwoBeyondTwoSigma => 2.0,
            Self::FourBeyondOneSigma => 1.0,
            Self::EightOneSide => 0.0,
        }
    }
}

/// Side of the center line a violation occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Above the center line.
    Upper,
    /// Below the center line.
    Lower,
}

/// First window that matched a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleViolation {
    /// Rule that fired.
    pub rule: WecoRule,
    /// Index of the first point in the window.
    pub start: usize,
    /// Window length.
    pub len: usize,
    /// Side of the center line.
    pub side: Side,
}

/// Western Electric rule evaluator.
///
/// Holds a center and sigma, each a scalar or a per-point sequence. The
/// state is fixed at construction.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::WecoRules;
///
/// let weco = WecoRules::new(0.0, 1.0).unwrap();
/// assert!(weco.rule_1(&[0.0, 0.0, 0.0, 4.0]).unwrap());
/// assert!(!weco.rule_1(&[0.0, 0.0, 0.0, 2.9]).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WecoRules {
    center: SpreadParameter,
    sigma: SpreadParameter,
}

impl WecoRules {
    /// Evaluator with explicit center and sigma.
    ///
    /// # Errors
    ///
    /// - [`SpcError::Domain`] if a center is not finite or a sigma is not a
    ///   finite non-negative number
    /// - [`SpcError::ShapeMismatch`] if both are per-point sequences of different lengths
    pub fn new(center: impl Into<SpreadParameter>, sigma: impl Into<SpreadParameter>) -> Result<Self> {
        let center = center.into();
        let sigma = sigma.into();

        stats::ensure_finite(center.values(), "center")?;
        if let Some(&bad) = sigma.values().iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(SpcError::Domain(format!(
                "sigma must be finite and non-negative, got {bad}"
            )));
        }
        if let (SpreadParameter::PerPoint(c), SpreadParameter::PerPoint(s)) = (&center, &sigma) {
            if c.len() != s.len() {
                return Err(SpcError::ShapeMismatch {
                    expected: c.len(),
                    actual: s.len(),
                });
            }
        }
        Ok(Self { center, sigma })
    }

    /// Start building an evaluator; both center and sigma must be set.
    pub fn builder() -> WecoRulesBuilder {
        WecoRulesBuilder::default()
    }

    /// Scalar center and sigma from the mean and sample standard deviation of `x`.
    ///
    /// # Errors
    ///
    /// [`SpcError::InsufficientData`] if `x` has fewer than 2 values.
    pub fn from_series(x: &[f64]) -> Result<Self> {
        stats::ensure_finite(x, "series")?;
        let center = stats::mean(x)?;
        let sigma = stats::std_dev(x)?;
        Self::new(center, sigma)
    }

    /// Per-subgroup center and sigma from each subgroup's mean and sample
    /// standard deviation.
    ///
    /// # Errors
    ///
    /// [`SpcError::InsufficientData`] if no subgroup is given or any subgroup
    /// has fewer than 2 values.
    pub fn from_subgroups<I, G>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = G>,
        G: AsRef<[f64]>,
    {
        let mut centers = Vec::new();
        let mut sigmas = Vec::new();
        for group in groups {
            let group = group.as_ref();
            stats::ensure_finite(group, "subgroup")?;
            centers.push(stats::mean(group)?);
            sigmas.push(stats::std_dev(group)?);
        }
        if centers.is_empty() {
            return Err(SpcError::insufficient(1, 0));
        }
        Self::new(centers, sigmas)
    }

    /// Scalar center and sigma from control limits: CL and (UCL - CL) / 3.
    pub fn from_limits(limits: &ControlLimits) -> Result<Self> {
        Self::new(limits.cl, limits.sigma())
    }

    /// Center line(s).
    pub fn center(&self) -> &SpreadParameter {
        &self.center
    }

    /// Sigma(s).
    pub fn sigma(&self) -> &SpreadParameter {
        &self.sigma
    }

    /// Rule 1: any point outside center +/- 3 sigma.
    pub fn rule_1(&self, x: &[f64]) -> Result<bool> {
        self.check(WecoRule::BeyondThreeSigma, x)
    }

    /// Rule 2: two consecutive points beyond 2 sigma on the same side.
    pub fn rule_2(&self, x: &[f64]) -> Result<bool> {
        self.check(WecoRule::TwoBeyondTwoSigma, x)
    }

    /// Rule 3: four consecutive points beyond 1 sigma on the same side.
    pub fn rule_3(&self, x: &[f64]) -> Result<bool> {
        self.check(WecoRule::FourBeyondOneSigma, x)
    }

    /// Rule 4: eight consecutive points on the same side of center.
    pub fn rule_4(&self, x: &[f64]) -> Result<bool> {
        self.check(WecoRule::EightOneSide, x)
    }

    /// Whether `rule` matches anywhere in `x`.
    pub fn check(&self, rule: WecoRule, x: &[f64]) -> Result<bool> {
        Ok(self.first_violation(rule, x)?.is_some())
    }

    /// First window of `x` matching `rule`, scanning left to right.
    ///
    /// # Errors
    ///
    /// - [`SpcError::ShapeMismatch`] if a per-point center or sigma differs in length from `x`
    /// - [`SpcError::Domain`] if `x` contains NaN or infinite values
    pub fn first_violation(&self, rule: WecoRule, x: &[f64]) -> Result<Option<RuleViolation>> {
        self.center.check_len(x.len())?;
        self.sigma.check_len(x.len())?;
        stats::ensure_finite(x, "points")?;

        let window = rule.window();
        let multiple = rule.sigma_multiple();

        // Run lengths of consecutive points beyond the zone boundary.
        let mut lower_run = 0_usize;
        let mut upper_run = 0_usize;
        for (i, &value) in x.iter().enumerate() {
            let (center, sigma) = self.params_at(i)?;
            let offset = multiple * sigma;

            lower_run = if value < center - offset { lower_run + 1 } else { 0 };
            upper_run = if value > center + offset { upper_run + 1 } else { 0 };

            let side = if lower_run >= window {
                Side::Lower
            } else if upper_run >= window {
                Side::Upper
            } else {
                continue;
            };

            let violation = RuleViolation {
                rule,
                start: i + 1 - window,
                len: window,
                side,
            };
            trace!(?violation, "run rule matched");
            return Ok(Some(violation));
        }
        Ok(None)
    }

    /// First violation of each rule, in rule order. Rules that do not match are omitted.
    pub fn violations(&self, x: &[f64]) -> Result<Vec<RuleViolation>> {
        let mut found = Vec::new();
        for rule in WecoRule::ALL {
            if let Some(v) = self.first_violation(rule, x)? {
                found.push(v);
            }
        }
        Ok(found)
    }

    fn params_at(&self, index: usize) -> Result<(f64, f64)> {
        match (self.center.at(index), self.sigma.at(index)) {
            (Some(c), Some(s)) => Ok((c, s)),
            _ => Err(SpcError::ShapeMismatch {
                expected: index + 1,
                actual: index,
            }),
        }
    }
}

/// Builder for [`WecoRules`] with optional center and sigma.
#[derive(Debug, Clone, Default)]
pub struct WecoRulesBuilder {
    center: Option<SpreadParameter>,
    sigma: Option<SpreadParameter>,
}

impl WecoRulesBuilder {
    /// Set the center line(s).
    pub fn center(mut self, center: impl Into<SpreadParameter>) -> Self {
        self.center = Some(center.into());
        self
    }

    /// Set the sigma(s).
    pub fn sigma(mut self, sigma: impl Into<SpreadParameter>) -> Self {
        self.sigma = Some(sigma.into());
        self
    }

    /// Build the evaluator.
    ///
    /// # Errors
    ///
    /// [`SpcError::MissingParameter`] if center or sigma was not set, plus
    /// the errors of [`WecoRules::new`].
    pub fn build(self) -> Result<WecoRules> {
        let center = self.center.ok_or(SpcError::MissingParameter("center"))?;
        let sigma = self.sigma.ok_or(SpcError::MissingParameter("sigma"))?;
        WecoRules::new(center, sigma)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Dense-window definition of a rule with per-point parameters, checked window by window.
    fn naive(rule: WecoRule, x: &[f64], center: &[f64], sigma: &[f64]) -> bool {
        let w = rule.window();
        if x.len() < w {
            return false;
        }
        let m = rule.sigma_multiple();
        let below = |i: usize| x[i] < center[i] - m * sigma[i];
        let above = |i: usize| x[i] > center[i] + m * sigma[i];
        (0..=x.len() - w).any(|s| (s..s + w).all(below) || (s..s + w).all(above))
    }

    proptest! {
        #[test]
        fn run_scan_matches_dense_windows(
            x in proptest::collection::vec(-4.0_f64..4.0, 0..=40),
            center in -1.0_f64..1.0,
            sigma in 0.1_f64..2.0,
        ) {
            let weco = WecoRules::new(center, sigma).unwrap();
            let centers = vec![center; x.len()];
            let sigmas = vec![sigma; x.len()];
            for rule in WecoRule::ALL {
                prop_assert_eq!(weco.check(rule, &x).unwrap(), naive(rule, &x, &centers, &sigmas));
            }
        }

        #[test]
        fn per_point_scan_matches_dense_windows(
            points in proptest::collection::vec((-4.0_f64..4.0, -2.0_f64..2.0, 0.1_f64..2.0), 0..=40),
        ) {
            let x: Vec<f64> = points.iter().map(|p| p.0).collect();
            let centers: Vec<f64> = points.iter().map(|p| p.1).collect();
            let sigmas: Vec<f64> = points.iter().map(|p| p.2).collect();
            let weco = WecoRules::new(centers.clone(), sigmas.clone()).unwrap();
            for rule in WecoRule::ALL {
                prop_assert_eq!(weco.check(rule, &x).unwrap(), naive(rule, &x, &centers, &sigmas));
            }
        }

        #[test]
        fn violation_window_is_in_bounds(
            x in proptest::collection::vec(-4.0_f64..4.0, 0..=40),
        ) {
            let weco = WecoRules::new(0.0, 1.0).unwrap();
            for v in weco.violations(&x).unwrap() {
                prop_assert!(v.start + v.len <= x.len());
                prop_assert_eq!(v.len, v.rule.window());
            }
        }

        #[test]
        fn repeated_queries_agree(
            x in proptest::collection::vec(-4.0_f64..4.0, 0..=30),
        ) {
            let weco = WecoRules::new(0.0, 1.0).unwrap();
            prop_assert_eq!(weco.violations(&x).unwrap(), weco.violations(&x).unwrap());
        }
    }
}
