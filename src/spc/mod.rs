//! Statistical Process Control (SPC) charts.
//!
//! Provides control chart calculators for variables and attributes data and
//! a Western Electric rule evaluator. Every chart is computed once at
//! construction and is read-only afterwards.
//!
//! # Variables Charts
//!
//! - [`XBarRChart`] — X-bar and Range chart for subgroup data (k=2..25)
//! - [`XBarSChart`] — X-bar and Standard Deviation chart for subgroup data (k=2..25)
//! - [`IndividualMRChart`] — Individual and Moving Range chart for individual observations
//!
//! # Attributes Charts
//!
//! - [`PChart`] — Proportion nonconforming (constant or variable sample size)
//!
//! # Run Rules
//!
//! - [`WecoRules`] — the 4 classic Western Electric rules
//!
//! # Examples
//!
//! ```
//! use spc_engine::spc::{partition, WecoRules, XBarRChart};
//!
//! let series: Vec<f64> = (0..40).map(|i| 10.0 + f64::from(i % 5) * 0.1).collect();
//! let chart = XBarRChart::with_subgroup_size(&series, 4).unwrap();
//! assert_eq!(chart.x_bar().len(), 10);
//!
//! // Per-subgroup rule parameters
//! let weco = WecoRules::from_subgroups(partition(&series, 4).unwrap()).unwrap();
//! assert!(!weco.rule_1(chart.x_bar()).unwrap());
//! ```
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

mod attributes;
mod chart;
pub mod constants;
mod rules;
mod subgroup;
mod variables;

pub use attributes::{PChart, PChartLimits};
pub use chart::{ChartKind, ChartSummary, ControlChart, ControlLimits, SpreadParameter};
pub use rules::{RuleViolation, Side, WecoRule, WecoRules, WecoRulesBuilder};
pub use subgroup::{partition, subgroup_count, Subgroups};
pub use variables::{IndividualMRChart, XBarRChart, XBarSChart, DEFAULT_SUBGROUP_SIZE};
