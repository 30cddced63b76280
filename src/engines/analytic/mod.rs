//! Closed-form pricing engines.

pub mod black_scholes;

pub use black_scholes::{
    BlackScholesPricer, bs_delta, bs_gamma, bs_price, bs_rho, bs_theta, bs_vega,
};
