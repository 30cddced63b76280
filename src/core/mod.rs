//! Core traits, common domain types, and library-wide result/error structures.

use serde::{Deserialize, Serialize};

use crate::instruments::OptionContract;

pub mod types;

pub use types::*;

/// Standardized Greeks container returned by every pricer.
///
/// `vega` and `rho` are reported per one-percentage-point move of volatility
/// and rate respectively (the raw derivatives divided by 100). `rho` is only
/// available from the closed-form model; lattice pricers report `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// Calendar-time decay, dV/dt.
    pub theta: f64,
    /// Sensitivity per 1% volatility move.
    pub vega: f64,
    /// Sensitivity per 1% rate move; closed-form model only.
    pub rho: Option<f64>,
}

/// Uniform pricing capability implemented by every model-bound pricer.
///
/// A pricer binds an [`OptionContract`] (and, for lattices, a step count) at
/// construction, where all validation happens. Pricing itself is therefore
/// infallible: `price` and `greeks` are pure functions of the bound state.
/// Aggregators hold `Box<dyn PricedInstrument>` and never inspect the
/// concrete model type.
pub trait PricedInstrument: std::fmt::Debug {
    /// The contract this pricer is bound to.
    fn contract(&self) -> &OptionContract;

    /// Present value of the contract under the bound model.
    fn price(&self) -> f64;

    /// Full sensitivity bundle under the bound model.
    fn greeks(&self) -> Greeks;

    /// First derivative of price to spot.
    fn delta(&self) -> f64 {
        self.greeks().delta
    }

    /// Second derivative of price to spot.
    fn gamma(&self) -> f64 {
        self.greeks().gamma
    }
}

/// Errors surfaced by contract validation, pricer construction, the model
/// factory, and the implied-volatility solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A constructor argument violates its domain (non-positive spot, strike,
    /// volatility, or maturity; zero lattice steps; branch probabilities
    /// outside [0, 1]).
    InvalidParameter(String),
    /// The requested model cannot price the contract's exercise style.
    UnsupportedExercise(String),
    /// The factory was given an unrecognized model name.
    UnknownModel(String),
    /// An implied-volatility target lies outside the bracketing bound prices.
    PriceOutOfBounds(String),
    /// An iterative algorithm exhausted its iteration budget.
    ConvergenceFailure(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::UnsupportedExercise(msg) => write!(f, "unsupported exercise: {msg}"),
            Self::UnknownModel(msg) => write!(f, "unknown model: {msg}"),
            Self::PriceOutOfBounds(msg) => write!(f, "price out of bounds: {msg}"),
            Self::ConvergenceFailure(msg) => write!(f, "convergence failure: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}
