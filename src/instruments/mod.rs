//! Option contract definitions.

pub mod contract;

pub use contract::{ContractTerms, OptionContract};
