//! Discrete-time lattice pricing engines.

pub mod binomial;
pub mod trinomial;

pub use binomial::{BinomialTreePricer, CrrParameters, binomial_tree_price};
pub use trinomial::{TrinomialParameters, TrinomialTreePricer, trinomial_tree_price};
