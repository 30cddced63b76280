//! Pricing engines: closed-form, lattice, and the model-name factory.

pub mod analytic;
pub mod factory;
pub mod tree;

pub use analytic::BlackScholesPricer;
pub use factory::{DEFAULT_TREE_STEPS, PricingModel, build_pricer, build_pricer_from_name};
pub use tree::{BinomialTreePricer, TrinomialTreePricer};
