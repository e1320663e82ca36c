//! Process capability analysis.
//!
//! Computes short-term capability indices for assessing how well a process
//! meets specification limits, given the within-subgroup sigma estimated by a
//! control chart.
//!
//! # Indices
//!
//! - **Cp** — Potential capability (spread vs tolerance)
//! - **Cpk** — Actual capability (centering considered)
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod indices;

pub use indices::{CapabilityIndices, ProcessCapability};
