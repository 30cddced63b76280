//! OpenVanilla prices vanilla equity options under three models — analytic
//! Black-Scholes and two discrete-time lattices — and derives Greeks and
//! implied volatility from those prices.
//!
//! An immutable, validated [`instruments::OptionContract`] carries the full
//! pricing state. Each model binds a contract (plus a step count for the
//! lattices) at construction, where all validation happens, and then exposes
//! the uniform [`core::PricedInstrument`] capability: `price()`, `greeks()`,
//! `delta()`, `gamma()`. The closed form differentiates exactly; the lattices
//! estimate sensitivities by bump-and-reprice ([`greeks`]). A bracketed
//! bisection solver ([`vol::implied`]) inverts the analytic price in its
//! volatility argument.
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13, 15,
//!   19, 27.
//! - Cox, Ross, and Rubinstein (1979) for the binomial parameterization.
//! - Clewlow and Strickland (1998), Ch. 5, for the log-space trinomial.
//!
//! Everything is synchronous and pure: a pricing call reads an immutable
//! contract, allocates transient lattice storage, and returns. No shared
//! mutable state exists anywhere in the crate.
//!
//! # Quick Start
//! Price a European call and read its Greeks:
//! ```rust
//! use openvanilla::core::PricedInstrument;
//! use openvanilla::engines::BlackScholesPricer;
//! use openvanilla::instruments::OptionContract;
//!
//! let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
//! let pricer = BlackScholesPricer::new(contract).unwrap();
//! assert!((pricer.price() - 10.4506).abs() < 1e-3);
//! assert!((pricer.greeks().delta - 0.6368).abs() < 1e-3);
//! ```
//!
//! Price an American put on a lattice:
//! ```rust
//! use openvanilla::core::PricedInstrument;
//! use openvanilla::engines::{BinomialTreePricer, TrinomialTreePricer};
//! use openvanilla::instruments::OptionContract;
//!
//! let contract = OptionContract::american_put(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
//! let binomial = BinomialTreePricer::new(contract, 500).unwrap();
//! let trinomial = TrinomialTreePricer::new(contract, 250).unwrap();
//! assert!((binomial.price() - trinomial.price()).abs() < 0.05);
//! ```
//!
//! Recover an implied volatility:
//! ```rust
//! use openvanilla::core::OptionType;
//! use openvanilla::engines::analytic::bs_price;
//! use openvanilla::vol::implied::implied_vol;
//!
//! let target = bs_price(OptionType::Call, 100.0, 105.0, 0.02, 0.25, 1.0);
//! let vol = implied_vol(OptionType::Call, 100.0, 105.0, 0.02, 1.0, target).unwrap();
//! assert!((vol - 0.25).abs() < 1e-4);
//! ```
//!
//! Aggregate a small book through the model factory:
//! ```rust
//! use openvanilla::engines::factory::build_pricer_from_name;
//! use openvanilla::instruments::OptionContract;
//! use openvanilla::portfolio::Portfolio;
//!
//! let call = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
//! let put = OptionContract::american_put(100.0, 95.0, 0.05, 0.2, 1.0).unwrap();
//!
//! let mut book = Portfolio::new();
//! book.add_position(build_pricer_from_name("BlackScholes", call, 0).unwrap(), 10.0);
//! book.add_position(build_pricer_from_name("TrinomialTree", put, 100).unwrap(), -4.0);
//! assert!(book.delta().is_finite());
//! ```

pub mod core;
pub mod engines;
pub mod greeks;
pub mod instruments;
pub mod math;
pub mod portfolio;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::{
        BinomialTreePricer, BlackScholesPricer, DEFAULT_TREE_STEPS, PricingModel,
        TrinomialTreePricer, build_pricer, build_pricer_from_name,
    };
    pub use crate::greeks::finite_difference_greeks;
    pub use crate::instruments::OptionContract;
    pub use crate::portfolio::Portfolio;
    pub use crate::vol::implied::{ImpliedVolSolver, implied_vol};
}
