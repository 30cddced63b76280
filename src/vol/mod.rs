//! Volatility analytics.

pub mod implied;

pub use implied::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, ImpliedVolSolver, VOL_LOWER_BOUND, VOL_UPPER_BOUND,
    implied_vol,
};
