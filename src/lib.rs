//! # spc-engine
//!
//! Statistical process control (SPC) engine: control chart limits, run-rule
//! detection and short-term process capability.
//!
//! The crate operates on raw `f64` data without knowledge of any specific
//! measurement domain. Every computation is a pure function of its inputs;
//! invalid input is reported as an [`SpcError`], never clamped.
//!
//! ## Modules
//!
//! - [`spc`] — Control charts (X̄-R, X̄-S, I-MR, P), subgrouping, the anti-bias
//!   constant table and Western Electric run rules
//! - [`capability`] — Process capability indices (Cp, Cpk, Cpu, Cpl)
//! - [`stats`] — Descriptive statistics shared by the charts
//! - [`error`] — Error type
//!
//! ## Logging
//!
//! Chart constructors emit `tracing` spans and events at `debug` level; rule
//! matches are reported at `trace`. Install any `tracing` subscriber to see them.

pub mod capability;
pub mod error;
pub mod spc;
pub mod stats;

pub use error::{Result, SpcError};
