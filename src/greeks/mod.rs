//! Finite-difference sensitivity estimation.
//!
//! Lattice prices have no closed-form derivatives once early exercise is in
//! play, so Greeks are estimated by bump-and-reprice: build a new contract
//! with one perturbed field, re-price, difference. Bump sizes are relative to
//! the perturbed variable. Finite-difference noise competes with the
//! lattice's own discretization error, so convergence studies should raise
//! the step count for Greek accuracy as well as price accuracy.

use crate::core::Greeks;
use crate::instruments::OptionContract;

/// Relative spot bump for delta and gamma (0.1%).
pub const SPOT_BUMP: f64 = 1.0e-3;
/// Relative volatility bump for vega (1%).
pub const VOL_BUMP: f64 = 1.0e-2;
/// Relative maturity bump for theta (1%, one-sided).
pub const EXPIRY_BUMP: f64 = 1.0e-2;

/// Re-pricing capability consumed by the estimator.
///
/// Implemented for any `Fn(&OptionContract) -> f64`, so a pricer exposes its
/// kernel as a closure:
///
/// ```
/// use openvanilla::engines::analytic::bs_price;
/// use openvanilla::greeks::finite_difference_greeks;
/// use openvanilla::instruments::OptionContract;
///
/// let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
/// let greeks = finite_difference_greeks(
///     &|c: &OptionContract| {
///         bs_price(c.option_type(), c.spot(), c.strike(), c.rate(), c.volatility(), c.expiry())
///     },
///     &contract,
/// );
/// assert!((greeks.delta - 0.6368).abs() < 1e-3);
/// ```
pub trait ContractPricer {
    /// Prices the given contract.
    fn price_contract(&self, contract: &OptionContract) -> f64;
}

impl<F> ContractPricer for F
where
    F: Fn(&OptionContract) -> f64,
{
    fn price_contract(&self, contract: &OptionContract) -> f64 {
        self(contract)
    }
}

/// Estimates Greeks for `contract` by perturbing it and re-pricing.
///
/// - delta: central difference on spot.
/// - gamma: central second difference on spot, same bump.
/// - theta: one-sided difference toward shorter maturity,
///   `(price(T - h) - price(T)) / h`, which reads as calendar decay directly.
///   The bump is capped at `T / 10` so the perturbed maturity stays positive.
/// - vega: central difference on volatility, scaled to a one-percentage-point
///   move.
///
/// `rho` is `None`; only the closed-form model reports a rate sensitivity.
pub fn finite_difference_greeks<P: ContractPricer>(
    pricer: &P,
    contract: &OptionContract,
) -> Greeks {
    let spot = contract.spot();
    let vol = contract.volatility();
    let expiry = contract.expiry();

    let base = pricer.price_contract(contract);

    let ds = spot * SPOT_BUMP;
    let spot_up = pricer.price_contract(&contract.with_spot(spot + ds));
    let spot_down = pricer.price_contract(&contract.with_spot(spot - ds));

    let dv = vol * VOL_BUMP;
    let vol_up = pricer.price_contract(&contract.with_volatility(vol + dv));
    let vol_down = pricer.price_contract(&contract.with_volatility(vol - dv));

    let dt = (expiry * EXPIRY_BUMP).min(expiry / 10.0);
    let expiry_down = pricer.price_contract(&contract.with_expiry(expiry - dt));

    Greeks {
        delta: (spot_up - spot_down) / (2.0 * ds),
        gamma: (spot_up - 2.0 * base + spot_down) / (ds * ds),
        theta: (expiry_down - base) / dt,
        vega: (vol_up - vol_down) / (2.0 * dv * 100.0),
        rho: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PricedInstrument;
    use crate::engines::analytic::{BlackScholesPricer, bs_price};

    fn analytic_closure(c: &OptionContract) -> f64 {
        bs_price(
            c.option_type(),
            c.spot(),
            c.strike(),
            c.rate(),
            c.volatility(),
            c.expiry(),
        )
    }

    #[test]
    fn finite_difference_matches_closed_form() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let fd = finite_difference_greeks(&analytic_closure, &contract);
        let cf = BlackScholesPricer::new(contract).unwrap().greeks();

        assert!((fd.delta - cf.delta).abs() < 2e-4);
        assert!((fd.gamma - cf.gamma).abs() < 2e-4);
        assert!((fd.vega - cf.vega).abs() < 1e-3);
        // One-sided theta carries O(h) truncation error.
        assert!((fd.theta - cf.theta).abs() < 5e-2);
        assert!(fd.rho.is_none());
    }

    #[test]
    fn put_side_matches_closed_form_too() {
        let contract = OptionContract::european_put(100.0, 110.0, 0.02, 0.3, 0.75).unwrap();
        let fd = finite_difference_greeks(&analytic_closure, &contract);
        let cf = BlackScholesPricer::new(contract).unwrap().greeks();

        assert!((fd.delta - cf.delta).abs() < 2e-4);
        assert!((fd.gamma - cf.gamma).abs() < 2e-4);
        assert!((fd.vega - cf.vega).abs() < 1e-3);
    }

    #[test]
    fn theta_is_negative_for_atm_options() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let fd = finite_difference_greeks(&analytic_closure, &contract);
        assert!(fd.theta < 0.0);
    }
}
