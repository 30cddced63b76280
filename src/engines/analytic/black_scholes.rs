//! Analytic Black-Scholes model for European vanilla options.
//!
//! Free-function kernels price directly from scalars; [`BlackScholesPricer`]
//! binds a validated [`OptionContract`] and exposes the uniform
//! [`PricedInstrument`] capability. Greeks here are exact derivatives of the
//! closed form, not finite differences.
//!
//! References: Hull (11th ed.) Ch. 15 for the pricing formula and Ch. 19 for
//! the sensitivity formulas.

use crate::core::{ExerciseStyle, Greeks, OptionType, PricedInstrument, PricingError};
use crate::instruments::OptionContract;
use crate::math::{normal_cdf, normal_pdf};

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes price of a European vanilla option.
///
/// Degenerate inputs collapse to intrinsic value: `expiry <= 0` returns the
/// immediate payoff, `vol <= 0` the discounted forward intrinsic.
///
/// # Examples
/// ```
/// use openvanilla::core::OptionType;
/// use openvanilla::engines::analytic::bs_price;
///
/// let call = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0);
/// assert!((call - 10.4506).abs() < 2e-4);
/// ```
#[inline]
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 {
        return option_type.payoff(spot, strike);
    }
    let df = (-rate * expiry).exp();
    if vol <= 0.0 {
        return match option_type {
            OptionType::Call => (spot - strike * df).max(0.0),
            OptionType::Put => (strike * df - spot).max(0.0),
        };
    }

    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

/// Closed-form delta, dV/dS.
#[inline]
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => normal_cdf(d1) - 1.0,
    }
}

/// Closed-form gamma, d²V/dS². Identical for calls and puts.
#[inline]
pub fn bs_gamma(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    normal_pdf(d1) / (spot * vol * expiry.sqrt())
}

/// Closed-form theta, dV/dt in calendar time (unscaled, per year).
#[inline]
pub fn bs_theta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let sqrt_t = expiry.sqrt();
    let df = (-rate * expiry).exp();
    let decay = -spot * normal_pdf(d1) * vol / (2.0 * sqrt_t);
    match option_type {
        OptionType::Call => decay - rate * strike * df * normal_cdf(d2),
        OptionType::Put => decay + rate * strike * df * normal_cdf(-d2),
    }
}

/// Closed-form vega, dV/dσ (unscaled, per unit of volatility).
#[inline]
pub fn bs_vega(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, vol, expiry);
    spot * expiry.sqrt() * normal_pdf(d1)
}

/// Closed-form rho, dV/dr (unscaled, per unit of rate).
#[inline]
pub fn bs_rho(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 {
        return 0.0;
    }
    let (_, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => strike * expiry * df * normal_cdf(d2),
        OptionType::Put => -strike * expiry * df * normal_cdf(-d2),
    }
}

/// Closed-form Black-Scholes pricer bound to a European contract.
///
/// # Examples
/// ```
/// use openvanilla::core::PricedInstrument;
/// use openvanilla::engines::analytic::BlackScholesPricer;
/// use openvanilla::instruments::OptionContract;
///
/// let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
/// let pricer = BlackScholesPricer::new(contract).unwrap();
/// let greeks = pricer.greeks();
/// assert!(pricer.price() > 10.0);
/// assert!(greeks.rho.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholesPricer {
    contract: OptionContract,
}

impl BlackScholesPricer {
    /// Binds the model to a contract.
    ///
    /// # Errors
    /// Returns [`PricingError::UnsupportedExercise`] for American contracts;
    /// the closed form has no early-exercise term.
    pub fn new(contract: OptionContract) -> Result<Self, PricingError> {
        if contract.exercise() == ExerciseStyle::American {
            return Err(PricingError::UnsupportedExercise(
                "Black-Scholes prices European exercise only".to_string(),
            ));
        }
        Ok(Self { contract })
    }
}

impl PricedInstrument for BlackScholesPricer {
    fn contract(&self) -> &OptionContract {
        &self.contract
    }

    fn price(&self) -> f64 {
        let c = &self.contract;
        bs_price(
            c.option_type(),
            c.spot(),
            c.strike(),
            c.rate(),
            c.volatility(),
            c.expiry(),
        )
    }

    fn greeks(&self) -> Greeks {
        let c = &self.contract;
        let (side, s, k, r, v, t) = (
            c.option_type(),
            c.spot(),
            c.strike(),
            c.rate(),
            c.volatility(),
            c.expiry(),
        );
        Greeks {
            delta: bs_delta(side, s, k, r, v, t),
            gamma: bs_gamma(s, k, r, v, t),
            theta: bs_theta(side, s, k, r, v, t),
            vega: bs_vega(s, k, r, v, t) / 100.0,
            rho: Some(bs_rho(side, s, k, r, v, t) / 100.0),
        }
    }

    fn delta(&self) -> f64 {
        let c = &self.contract;
        bs_delta(
            c.option_type(),
            c.spot(),
            c.strike(),
            c.rate(),
            c.volatility(),
            c.expiry(),
        )
    }

    fn gamma(&self) -> f64 {
        let c = &self.contract;
        bs_gamma(c.spot(), c.strike(), c.rate(), c.volatility(), c.expiry())
    }
}
