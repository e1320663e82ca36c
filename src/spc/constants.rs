//! Anti-bias control chart factors, indexed by subgroup size n = 2..=25.
//!
//! All constants (A2, A3, d2, D3, D4, B3, B4, c4) are sourced from
//! ASTM E2587 — Standard Practice for Use of Control Charts in Statistical
//! Process Control.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Appendix Table VI.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use crate::error::{Result, SpcError};

/// Smallest subgroup size with tabulated factors.
pub const MIN_SUBGROUP_SIZE: usize = 2;

/// Largest subgroup size with tabulated factors.
pub const MAX_SUBGROUP_SIZE: usize = 25;

/// One row of the anti-bias factor table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiBiasConstants {
    /// Subgroup size this row applies to.
    pub n: usize,
    /// X-bar limits from R-bar: CL ± A2 * R-bar.
    pub a2: f64,
    /// X-bar limits from S-bar: CL ± A3 * S-bar.
    pub a3: f64,
    /// Mean of the relative range distribution: sigma-hat = R-bar / d2.
    pub d2: f64,
    /// R chart lower limit factor: LCL_R = D3 * R-bar.
    pub d3: f64,
    /// R chart upper limit factor: UCL_R = D4 * R-bar.
    pub d4: f64,
    /// S chart lower limit factor: LCL_S = B3 * S-bar.
    pub b3: f64,
    /// S chart upper limit factor: UCL_S = B4 * S-bar.
    pub b4: f64,
    /// Bias of the sample standard deviation: sigma-hat = S-bar / c4.
    pub c4: f64,
}

#[allow(clippy::too_many_arguments)]
const fn row(
    n: usize,
    a2: f64,
    a3: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    b3: f64,
    b4: f64,
    c4: f64,
) -> AntiBiasConstants {
    AntiBiasConstants {
        n,
        a2,
        a3,
        d2,
        d3,
        d4,
        b3,
        b4,
        c4,
    }
}

// Index 0 corresponds to n=2.
#[rustfmt::skip]
static TABLE: [AntiBiasConstants; MAX_SUBGROUP_SIZE - MIN_SUBGROUP_SIZE + 1] = [
    //   n    A2     A3     d2     D3     D4     B3     B4     c4
    row(2,  1.880, 2.659, 1.128, 0.000, 3.267, 0.000, 3.267, 0.7979),
    row(3,  1.023, 1.954, 1.693, 0.000, 2.574, 0.000, 2.568, 0.8862),
    row(4,  0.729, 1.628, 2.059, 0.000, 2.282, 0.000, 2.266, 0.9213),
    row(5,  0.577, 1.427, 2.326, 0.000, 2.114, 0.000, 2.089, 0.9400),
    row(6,  0.483, 1.287, 2.534, 0.000, 2.004, 0.030, 1.970, 0.9515),
    row(7,  0.419, 1.182, 2.704, 0.076, 1.924, 0.118, 1.882, 0.9594),
    row(8,  0.373, 1.099, 2.847, 0.136, 1.864, 0.185, 1.815, 0.9650),
    row(9,  0.337, 1.032, 2.970, 0.184, 1.816, 0.239, 1.761, 0.9693),
    row(10, 0.308, 0.975, 3.078, 0.223, 1.777, 0.284, 1.716, 0.9727),
    row(11, 0.285, 0.927, 3.173, 0.256, 1.744, 0.321, 1.679, 0.9754),
    row(12, 0.266, 0.886, 3.258, 0.283, 1.717, 0.354, 1.646, 0.9776),
    row(13, 0.249, 0.850, 3.336, 0.307, 1.693, 0.382, 1.618, 0.9794),
    row(14, 0.235, 0.817, 3.407, 0.328, 1.672, 0.406, 1.594, 0.9810),
    row(15, 0.223, 0.789, 3.472, 0.347, 1.653, 0.428, 1.572, 0.9823),
    row(16, 0.212, 0.763, 3.532, 0.363, 1.637, 0.448, 1.552, 0.9835),
    row(17, 0.203, 0.739, 3.588, 0.378, 1.622, 0.466, 1.534, 0.9845),
    row(18, 0.194, 0.718, 3.640, 0.391, 1.608, 0.482, 1.518, 0.9854),
    row(19, 0.187, 0.698, 3.689, 0.403, 1.597, 0.497, 1.503, 0.9862),
    row(20, 0.180, 0.680, 3.735, 0.415, 1.585, 0.510, 1.490, 0.9869),
    row(21, 0.173, 0.663, 3.778, 0.425, 1.575, 0.523, 1.477, 0.9876),
    row(22, 0.167, 0.647, 3.819, 0.434, 1.566, 0.534, 1.466, 0.9882),
    row(23, 0.162, 0.633, 3.858, 0.443, 1.557, 0.545, 1.455, 0.9887),
    row(24, 0.157, 0.619, 3.895, 0.451, 1.548, 0.555, 1.445, 0.9892),
    row(25, 0.153, 0.606, 3.931, 0.459, 1.541, 0.565, 1.435, 0.9896),
];

/// Look up the anti-bias factors for subgroup size `n`.
///
/// # Errors
///
/// [`SpcError::Lookup`] when `n` is outside `2..=25`.
///
/// # Examples
///
/// ```
/// use spc_engine::spc::constants;
///
/// let row = constants::lookup(5).unwrap();
/// assert!((row.a2 - 0.577).abs() < 1e-12);
/// assert!(constants::lookup(1).is_err());
/// ```
pub fn lookup(n: usize) -> Result<&'static AntiBiasConstants> {
    if !(MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE).contains(&n) {
        return Err(SpcError::Lookup(n));
    }
    Ok(&TABLE[n - MIN_SUBGROUP_SIZE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rows_are_keyed_by_size() {
        for n in MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE {
            assert_eq!(lookup(n).unwrap().n, n);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(lookup(0), Err(SpcError::Lookup(0)));
        assert_eq!(lookup(1), Err(SpcError::Lookup(1)));
        assert_eq!(lookup(26), Err(SpcError::Lookup(26)));
    }

    #[test]
    fn test_textbook_values() {
        let n2 = lookup(2).unwrap();
        assert_abs_diff_eq!(n2.a2, 1.880);
        assert_abs_diff_eq!(n2.d2, 1.128);
        assert_abs_diff_eq!(n2.d4, 3.267);

        let n5 = lookup(5).unwrap();
        assert_abs_diff_eq!(n5.a2, 0.577);
        assert_abs_diff_eq!(n5.a3, 1.427);
        assert_abs_diff_eq!(n5.d3, 0.0);
        assert_abs_diff_eq!(n5.d4, 2.114);
        assert_abs_diff_eq!(n5.b4, 2.089);

        let n25 = lookup(25).unwrap();
        assert_abs_diff_eq!(n25.a3, 0.606);
        assert_abs_diff_eq!(n25.b3, 0.565);
        assert_abs_diff_eq!(n25.c4, 0.9896);
    }

    #[test]
    fn test_factor_trends() {
        // Limits tighten as the subgroup grows.
        for n in MIN_SUBGROUP_SIZE..MAX_SUBGROUP_SIZE {
            let (a, b) = (lookup(n).unwrap(), lookup(n + 1).unwrap());
            assert!(b.a2 < a.a2, "A2 not decreasing at n={n}");
            assert!(b.a3 < a.a3, "A3 not decreasing at n={n}");
            assert!(b.d2 > a.d2, "d2 not increasing at n={n}");
            assert!(b.c4 > a.c4, "c4 not increasing at n={n}");
            assert!(b.d3 >= a.d3 && b.d4 <= a.d4);
            assert!(b.b3 >= a.b3 && b.b4 <= a.b4);
        }
    }

    #[test]
    fn test_a2_matches_three_over_d2_sqrt_n() {
        // A2 = 3 / (d2 * sqrt(n)), to table precision
        for n in MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE {
            let row = lookup(n).unwrap();
            let derived = 3.0 / (row.d2 * (n as f64).sqrt());
            assert_abs_diff_eq!(row.a2, derived, epsilon = 2e-3);
        }
    }
}
