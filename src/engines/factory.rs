//! Model-name dispatch for constructing pricers.

use std::str::FromStr;

use crate::core::{PricedInstrument, PricingError};
use crate::engines::analytic::BlackScholesPricer;
use crate::engines::tree::{BinomialTreePricer, TrinomialTreePricer};
use crate::instruments::OptionContract;

/// Lattice depth used when a caller does not specify one.
pub const DEFAULT_TREE_STEPS: usize = 100;

/// Supported pricing models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingModel {
    /// Closed-form Black-Scholes, European exercise only.
    BlackScholes,
    /// Cox-Ross-Rubinstein binomial lattice.
    BinomialTree,
    /// Log-space trinomial lattice.
    TrinomialTree,
}

impl PricingModel {
    /// Canonical model name, the same string [`FromStr`] accepts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlackScholes => "BlackScholes",
            Self::BinomialTree => "BinomialTree",
            Self::TrinomialTree => "TrinomialTree",
        }
    }
}

impl FromStr for PricingModel {
    type Err = PricingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "BlackScholes" => Ok(Self::BlackScholes),
            "BinomialTree" => Ok(Self::BinomialTree),
            "TrinomialTree" => Ok(Self::TrinomialTree),
            other => Err(PricingError::UnknownModel(format!(
                "unknown pricing model `{other}`"
            ))),
        }
    }
}

/// Constructs a pricer for `model` bound to `contract`.
///
/// `steps` applies to the lattice models and is ignored by
/// [`PricingModel::BlackScholes`].
///
/// # Errors
/// Propagates the selected pricer's construction errors
/// ([`PricingError::UnsupportedExercise`], [`PricingError::InvalidParameter`]).
pub fn build_pricer(
    model: PricingModel,
    contract: OptionContract,
    steps: usize,
) -> Result<Box<dyn PricedInstrument>, PricingError> {
    match model {
        PricingModel::BlackScholes => Ok(Box::new(BlackScholesPricer::new(contract)?)),
        PricingModel::BinomialTree => Ok(Box::new(BinomialTreePricer::new(contract, steps)?)),
        PricingModel::TrinomialTree => Ok(Box::new(TrinomialTreePricer::new(contract, steps)?)),
    }
}

/// Constructs a pricer from a model name.
///
/// # Errors
/// [`PricingError::UnknownModel`] for an unrecognized name, otherwise as
/// [`build_pricer`].
///
/// # Examples
/// ```
/// use openvanilla::core::PricedInstrument;
/// use openvanilla::engines::factory::build_pricer_from_name;
/// use openvanilla::instruments::OptionContract;
///
/// let contract = OptionContract::american_put(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
/// let pricer = build_pricer_from_name("BinomialTree", contract, 200).unwrap();
/// assert!(pricer.price() > 0.0);
/// ```
pub fn build_pricer_from_name(
    name: &str,
    contract: OptionContract,
    steps: usize,
) -> Result<Box<dyn PricedInstrument>, PricingError> {
    build_pricer(name.parse()?, contract, steps)
}
