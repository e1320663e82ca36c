//! Variables control charts: X-bar-R, X-bar-S, and Individual-MR.
//!
//! These charts monitor continuous (variables) data from a process.
//! Subgroup charts (X-bar-R, X-bar-S) partition the observation series into
//! consecutive subgroups and track the subgroup means and within-subgroup
//! variation; the Individual-MR chart handles single observations.
//!
//! Every chart is computed once, at construction, from a series it owns.
//! Accessors are plain reads.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

use tracing::{debug, instrument};

use super::chart::{ChartKind, ControlChart, ControlLimits};
use super::constants::{self, AntiBiasConstants};
use super::subgroup::{partition, Subgroups};
use crate::capability::{CapabilityIndices, ProcessCapability};
use crate::error::{Result, SpcError};
use crate::stats;

/// Subgroup size used by [`XBarRChart::new`] and [`XBarSChart::new`].
pub const DEFAULT_SUBGROUP_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// X-bar-R Chart
// ---------------------------------------------------------------------------

/// X-bar and Range (X-bar-R) control chart.
///
/// Monitors the process mean (X-bar chart) and process variability (R chart)
/// using subgroup ranges. Intended for subgroup sizes up to 8; the factor
/// table supports 2..=25.
///
/// # Algorithm
///
/// 1. Partition the series into subgroups of size `k` (the last may be shorter).
/// 2. For each subgroup, compute the mean (X-bar) and range (R = max - min).
/// 3. X-bar chart: CL = mean(X-bar), UCL/LCL = CL +/- A2 * R-bar.
/// 4. R chart: CL = R-bar = mean(R), UCL = D4 * R-bar, LCL = D3 * R-bar.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::XBarRChart;
///
/// let data: Vec<f64> = (0..9).map(f64::from).collect();
/// let chart = XBarRChart::with_subgroup_size(&data, 3).unwrap();
///
/// assert_eq!(chart.x_bar(), &[1.0, 4.0, 7.0]);
/// assert_eq!(chart.ranges(), &[2.0, 2.0, 2.0]);
/// assert!((chart.center_line_x() - 4.0).abs() < 1e-12);
/// ```
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 6: Control Charts for Variables.
#[derive(Debug, Clone)]
pub struct XBarRChart {
    observations: Vec<f64>,
    subgroup_size: usize,
    constants: &'static AntiBiasConstants,
    x_bar: Vec<f64>,
    ranges: Vec<f64>,
    x_limits: ControlLimits,
    r_limits: ControlLimits,
}

impl XBarRChart {
    /// Build the chart with the default subgroup size of 5.
    pub fn new(series: &[f64]) -> Result<Self> {
        Self::with_subgroup_size(series, DEFAULT_SUBGROUP_SIZE)
    }

    /// Build the chart from `series` partitioned into subgroups of `subgroup_size`.
    ///
    /// # Errors
    ///
    /// - [`SpcError::InvalidArgument`] if `subgroup_size < 1`
    /// - [`SpcError::Lookup`] if `subgroup_size` is outside 2..=25
    /// - [`SpcError::Domain`] if the series contains NaN or infinite values, or a
    ///   statistic or limit overflows
    /// - [`SpcError::InsufficientData`] if fewer than 2 subgroups result
    #[instrument(level = "debug", skip(series), fields(n = series.len()))]
    pub fn with_subgroup_size(series: &[f64], subgroup_size: usize) -> Result<Self> {
        let groups = partition(series, subgroup_size)?;
        let constants = constants::lookup(subgroup_size)?;
        stats::ensure_finite(series, "observations")?;
        let (x_bar, ranges) = reduce_subgroups(groups, stats::range)?;

        let grand_mean = stats::mean(&x_bar)?;
        let r_bar = stats::mean(&ranges)?;

        let x_limits =
            ControlLimits::symmetric(grand_mean, constants.a2 * r_bar).checked("X-bar")?;
        let r_limits = ControlLimits {
            ucl: constants.d4 * r_bar,
            cl: r_bar,
            lcl: constants.d3 * r_bar,
        }
        .checked("R")?;

        debug!(
            subgroups = x_bar.len(),
            cl_x = grand_mean,
            cl_r = r_bar,
            "computed X-bar-R limits"
        );

        Ok(Self {
            observations: series.to_vec(),
            subgroup_size,
            constants,
            x_bar,
            ranges,
            x_limits,
            r_limits,
        })
    }

    /// The observation series the chart was built from.
    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    /// Target subgroup size.
    pub fn subgroup_size(&self) -> usize {
        self.subgroup_size
    }

    /// Subgroup means.
    pub fn x_bar(&self) -> &[f64] {
        &self.x_bar
    }

    /// Subgroup ranges.
    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    /// Grand mean (X-double-bar).
    pub fn center_line_x(&self) -> f64 {
        self.x_limits.cl
    }

    /// Average range (R-bar).
    pub fn center_line_r(&self) -> f64 {
        self.r_limits.cl
    }

    /// X-bar chart limits.
    pub fn x_limits(&self) -> ControlLimits {
        self.x_limits
    }

    /// R chart limits.
    pub fn r_limits(&self) -> ControlLimits {
        self.r_limits
    }

    /// Within-subgroup sigma estimate, R-bar / d2.
    pub fn sigma_within(&self) -> f64 {
        self.r_limits.cl / self.constants.d2
    }

    /// Cp/Cpk of the process using the grand mean and R-bar / d2.
    ///
    /// # Errors
    ///
    /// [`SpcError::Domain`] when R-bar is zero (every subgroup constant).
    pub fn capability(&self, spec: &ProcessCapability) -> Result<CapabilityIndices> {
        spec.compute(self.center_line_x(), self.sigma_within())
    }
}

impl ControlChart for XBarRChart {
    fn kind(&self) -> ChartKind {
        ChartKind::XBarR
    }

    fn primary_limits(&self) -> ControlLimits {
        self.x_limits
    }

    fn secondary_limits(&self) -> ControlLimits {
        self.r_limits
    }

    fn primary_series(&self) -> &[f64] {
        &self.x_bar
    }

    fn secondary_series(&self) -> &[f64] {
        &self.ranges
    }
}

// ---------------------------------------------------------------------------
// X-bar-S Chart
// ---------------------------------------------------------------------------

/// X-bar and Standard Deviation (X-bar-S) control chart.
///
/// Monitors the process mean (X-bar chart) and process variability (S chart)
/// using subgroup sample standard deviations. Preferred over X-bar-R for
/// subgroups of 9 or more, where the range is a less efficient estimator.
///
/// # Algorithm
///
/// 1. Partition the series into subgroups of size `k` (the last may be shorter).
/// 2. For each subgroup, compute the mean (X-bar) and sample standard deviation (S).
/// 3. X-bar chart: CL = mean(X-bar), UCL/LCL = CL +/- A3 * S-bar.
/// 4. S chart: CL = S-bar = mean(S), UCL = B4 * S-bar, LCL = B3 * S-bar.
///
/// # Reference
///
/// Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
/// Chapter 6: Control Charts for Variables.
#[derive(Debug, Clone)]
pub struct XBarSChart {
    observations: Vec<f64>,
    subgroup_size: usize,
    constants: &'static AntiBiasConstants,
    x_bar: Vec<f64>,
    std_devs: Vec<f64>,
    x_limits: ControlLimits,
    s_limits: ControlLimits,
}

impl XBarSChart {
    /// Build the chart with the default subgroup size of 5.
    pub fn new(series: &[f64]) -> Result<Self> {
        Self::with_subgroup_size(series, DEFAULT_SUBGROUP_SIZE)
    }

    /// Build the chart from `series` partitioned into subgroups of `subgroup_size`.
    ///
    /// # Errors
    ///
    /// As [`XBarRChart::with_subgroup_size`], plus
    /// [`SpcError::InsufficientData`] when any subgroup (including a short
    /// last subgroup) holds a single value.
    #[instrument(level = "debug", skip(series), fields(n = series.len()))]
    pub fn with_subgroup_size(series: &[f64], subgroup_size: usize) -> Result<Self> {
        let groups = partition(series, subgroup_size)?;
        let constants = constants::lookup(subgroup_size)?;
        stats::ensure_finite(series, "observations")?;
        let (x_bar, std_devs) = reduce_subgroups(groups, stats::std_dev)?;

        let grand_mean = stats::mean(&x_bar)?;
        let s_bar = stats::mean(&std_devs)?;

        let x_limits =
            ControlLimits::symmetric(grand_mean, constants.a3 * s_bar).checked("X-bar")?;
        let s_limits = ControlLimits {
            ucl: constants.b4 * s_bar,
            cl: s_bar,
            lcl: constants.b3 * s_bar,
        }
        .checked("S")?;

        debug!(
            subgroups = x_bar.len(),
            cl_x = grand_mean,
            cl_s = s_bar,
            "computed X-bar-S limits"
        );

        Ok(Self {
            observations: series.to_vec(),
            subgroup_size,
            constants,
            x_bar,
            std_devs,
            x_limits,
            s_limits,
        })
    }

    /// The observation series the chart was built from.
    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    /// Target subgroup size.
    pub fn subgroup_size(&self) -> usize {
        self.subgroup_size
    }

    /// Subgroup means.
    pub fn x_bar(&self) -> &[f64] {
        &self.x_bar
    }

    /// Subgroup sample standard deviations.
    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Grand mean (X-double-bar).
    pub fn center_line_x(&self) -> f64 {
        self.x_limits.cl
    }

    /// Average standard deviation (S-bar).
    pub fn center_line_s(&self) -> f64 {
        self.s_limits.cl
    }

    /// X-bar chart limits.
    pub fn x_limits(&self) -> ControlLimits {
        self.x_limits
    }

    /// S chart limits.
    pub fn s_limits(&self) -> ControlLimits {
        self.s_limits
    }

    /// Within-subgroup sigma estimate, S-bar / c4.
    pub fn sigma_within(&self) -> f64 {
        self.s_limits.cl / self.constants.c4
    }

    /// Cp/Cpk of the process using the grand mean and S-bar / c4.
    ///
    /// # Errors
    ///
    /// [`SpcError::Domain`] when S-bar is zero.
    pub fn capability(&self, spec: &ProcessCapability) -> Result<CapabilityIndices> {
        spec.compute(self.center_line_x(), self.sigma_within())
    }
}

impl ControlChart for XBarSChart {
    fn kind(&self) -> ChartKind {
        ChartKind::XBarS
    }

    fn primary_limits(&self) -> ControlLimits {
        self.x_limits
    }

    fn secondary_limits(&self) -> ControlLimits {
        self.s_limits
    }

    fn primary_series(&self) -> &[f64] {
        &self.x_bar
    }

    fn secondary_series(&self) -> &[f64] {
        &self.std_devs
    }
}

// ---------------------------------------------------------------------------
// Individual-MR Chart
// ---------------------------------------------------------------------------

/// Individual and Moving Range (I-MR) control chart.
///
/// Monitors individual observations (no subgrouping) using the moving range
/// of consecutive observations.
///
/// # Algorithm
///
/// 1. Moving ranges: MR_i = |x_i - x_{i-1}| for i >= 1 (one fewer than the observations).
/// 2. I chart: CL = mean(x), UCL/LCL = CL +/- 3 * stdev(x).
/// 3. MR chart: CL = MR-bar = mean(MR), UCL/LCL = MR-bar +/- 3 * CL_I / d2,
///    with d2 taken from the n=2 row of the factor table.
///
/// The MR half-width scales with the individuals center line, so it is
/// negative (UCL below LCL) when the process mean is negative.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::IndividualMRChart;
///
/// let chart = IndividualMRChart::new(&[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(chart.moving_ranges(), &[1.0, 1.0]);
/// assert!((chart.center_line_i() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct IndividualMRChart {
    observations: Vec<f64>,
    moving_ranges: Vec<f64>,
    i_limits: ControlLimits,
    mr_limits: ControlLimits,
}

impl IndividualMRChart {
    /// Build the chart from individual observations.
    ///
    /// # Errors
    ///
    /// - [`SpcError::InsufficientData`] if fewer than 2 observations are given
    /// - [`SpcError::Domain`] if the series contains NaN or infinite values, or a
    ///   statistic or limit overflows
    #[instrument(level = "debug", skip(series), fields(n = series.len()))]
    pub fn new(series: &[f64]) -> Result<Self> {
        stats::ensure_finite(series, "observations")?;
        if series.len() < 2 {
            return Err(SpcError::insufficient(2, series.len()));
        }

        let moving_ranges: Vec<f64> = series.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        stats::ensure_finite(&moving_ranges, "moving ranges")?;

        let x_bar = stats::mean(series)?;
        let sd = stats::std_dev(series)?;
        let mr_bar = stats::mean(&moving_ranges)?;
        let d2 = constants::lookup(2)?.d2;

        let i_limits = ControlLimits::symmetric(x_bar, 3.0 * sd).checked("I")?;
        let mr_limits = ControlLimits::symmetric(mr_bar, 3.0 * x_bar / d2).checked("MR")?;

        debug!(cl_i = x_bar, cl_mr = mr_bar, "computed I-MR limits");

        Ok(Self {
            observations: series.to_vec(),
            moving_ranges,
            i_limits,
            mr_limits,
        })
    }

    /// Individual observations.
    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    /// Moving ranges; `moving_ranges()[i]` pairs observations `i` and `i + 1`.
    pub fn moving_ranges(&self) -> &[f64] {
        &self.moving_ranges
    }

    /// Mean of the observations.
    pub fn center_line_i(&self) -> f64 {
        self.i_limits.cl
    }

    /// Average moving range (MR-bar).
    pub fn center_line_mr(&self) -> f64 {
        self.mr_limits.cl
    }

    /// I chart limits.
    pub fn i_limits(&self) -> ControlLimits {
        self.i_limits
    }

    /// MR chart limits.
    pub fn mr_limits(&self) -> ControlLimits {
        self.mr_limits
    }
}

impl ControlChart for IndividualMRChart {
    fn kind(&self) -> ChartKind {
        ChartKind::IndividualMR
    }

    fn primary_limits(&self) -> ControlLimits {
        self.i_limits
    }

    fn secondary_limits(&self) -> ControlLimits {
        self.mr_limits
    }

    fn primary_series(&self) -> &[f64] {
        &self.observations
    }

    fn secondary_series(&self) -> &[f64] {
        &self.moving_ranges
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reduce every subgroup to `(mean, dispersion)`.
///
/// Requires at least two subgroups.
fn reduce_subgroups(
    groups: Subgroups<'_>,
    dispersion: fn(&[f64]) -> Result<f64>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut means = Vec::with_capacity(groups.len());
    let mut spreads = Vec::with_capacity(groups.len());
    for group in groups {
        means.push(stats::mean(group)?);
        spreads.push(dispersion(group)?);
    }

    if means.len() < 2 {
        return Err(SpcError::insufficient(2, means.len()));
    }
    Ok((means, spreads))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn xbar_r_limits_bracket_center(
            data in proptest::collection::vec(-1e3_f64..1e3, 16..=80),
            k in 2_usize..=8,
        ) {
            let chart = XBarRChart::with_subgroup_size(&data, k).unwrap();
            let x = chart.x_limits();
            let r = chart.r_limits();
            prop_assert!(x.lcl <= x.cl && x.cl <= x.ucl, "{x:?}");
            prop_assert!(r.lcl <= r.cl && r.cl <= r.ucl, "{r:?}");
            prop_assert_eq!(chart.x_bar().len(), data.len().div_ceil(k));
        }

        #[test]
        fn xbar_s_limits_bracket_center(
            data in proptest::collection::vec(-1e3_f64..1e3, 20..=80),
            k in 9_usize..=10,
        ) {
            // Only full subgroups, so every subgroup has a standard deviation.
            let full = &data[..data.len() - data.len() % k];
            prop_assume!(full.len() >= 2 * k);
            let chart = XBarSChart::with_subgroup_size(full, k).unwrap();
            let x = chart.x_limits();
            let s = chart.s_limits();
            prop_assert!(x.lcl <= x.cl && x.cl <= x.ucl, "{x:?}");
            prop_assert!(s.lcl <= s.cl && s.cl <= s.ucl, "{s:?}");
        }

        #[test]
        fn imr_moving_ranges_non_negative(
            data in proptest::collection::vec(-1e3_f64..1e3, 2..=60),
        ) {
            let chart = IndividualMRChart::new(&data).unwrap();
            prop_assert_eq!(chart.moving_ranges().len(), data.len() - 1);
            prop_assert!(chart.moving_ranges().iter().all(|&mr| mr >= 0.0));
            let i = chart.i_limits();
            prop_assert!(i.lcl <= i.cl && i.cl <= i.ucl);
        }
    }
}
