//! Numeric kernels for the calculator core.
//!
//! Stateless routines over plain numeric data:
//! - matrix reduction and products
//! - one/two-variable statistics and regressions
//! - combinatorics
//! - bisection roots, golden-section extrema, Simpson integrals,
//!   symmetric-difference derivatives
//! - inverse normal quantiles
//! - plot sampling into connected segments

pub mod combin;
pub mod invnorm;
pub mod matrix;
pub mod plot;
pub mod solve;
pub mod stats;
