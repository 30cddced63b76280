//! Recombining log-space trinomial lattice for vanilla options.
//!
//! Node spacing is `dx = sigma*sqrt(3*dt)` and the branch probabilities come
//! from matching the first two moments of the log-price step to the
//! risk-neutral lognormal diffusion. The extra middle branch buys faster
//! convergence than the binomial lattice at the same step count.
//!
//! References: Hull (11th ed.) Ch. 27.6; Clewlow & Strickland,
//! "Implementing Derivative Models" (1998), Ch. 5.

use crate::core::{ExerciseStyle, Greeks, PricedInstrument, PricingError};
use crate::greeks::finite_difference_greeks;
use crate::instruments::OptionContract;

/// Trinomial discretization implied by a contract and step count.
///
/// With `nu = r - sigma^2/2`, matching `E[dx] = nu*dt` and
/// `E[dx^2] = sigma^2*dt + (nu*dt)^2` over one step gives
///
/// ```text
/// pu = ((sigma^2*dt + (nu*dt)^2)/dx^2 + nu*dt/dx) / 2
/// pd = ((sigma^2*dt + (nu*dt)^2)/dx^2 - nu*dt/dx) / 2
/// pm = 1 - pu - pd
/// ```
///
/// The probabilities sum to one by construction but only stay inside `[0, 1]`
/// while the drift term is small against `dx`; [`TrinomialTreePricer::new`]
/// enforces that bound.
#[derive(Debug, Clone, Copy)]
pub struct TrinomialParameters {
    /// Time step in years.
    pub dt: f64,
    /// Log-space node spacing `sigma*sqrt(3*dt)`.
    pub dx: f64,
    /// Up multiplier `e^(dx)`.
    pub u: f64,
    /// Down multiplier `e^(-dx)`.
    pub d: f64,
    /// Up-branch probability.
    pub pu: f64,
    /// Middle-branch probability.
    pub pm: f64,
    /// Down-branch probability.
    pub pd: f64,
    /// One-step discount factor `e^(-r*dt)`.
    pub discount: f64,
}

impl TrinomialParameters {
    /// Computes the discretization for `contract` over `steps` time steps.
    pub fn from_contract(contract: &OptionContract, steps: usize) -> Self {
        let sigma = contract.volatility();
        let rate = contract.rate();

        let dt = contract.expiry() / steps as f64;
        let dx = sigma * (3.0 * dt).sqrt();
        let nu = rate - 0.5 * sigma * sigma;

        let second_moment = sigma * sigma * dt + (nu * dt) * (nu * dt);
        let ratio = second_moment / (dx * dx);
        let drift = nu * dt / dx;

        let pu = 0.5 * (ratio + drift);
        let pd = 0.5 * (ratio - drift);
        let pm = 1.0 - pu - pd;

        Self {
            dt,
            dx,
            u: dx.exp(),
            d: (-dx).exp(),
            pu,
            pm,
            pd,
            discount: (-rate * dt).exp(),
        }
    }

    fn validate(&self) -> Result<(), PricingError> {
        for (label, p) in [("pu", self.pu), ("pm", self.pm), ("pd", self.pd)] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(PricingError::InvalidParameter(format!(
                    "trinomial branch probability {label} = {p} is outside [0, 1]; \
                     increase the step count so the drift stays small against dx"
                )));
            }
        }
        Ok(())
    }
}

/// Prices `contract` on a trinomial lattice with `steps` time steps.
///
/// Kernel shared by [`TrinomialTreePricer::price`] and its bump-and-reprice
/// Greeks; parameter bounds are the caller's responsibility.
pub fn trinomial_tree_price(contract: &OptionContract, steps: usize) -> f64 {
    roll_back(
        contract,
        steps,
        &TrinomialParameters::from_contract(contract, steps),
    )
}

fn roll_back(contract: &OptionContract, steps: usize, params: &TrinomialParameters) -> f64 {
    let spot = contract.spot();
    let strike = contract.strike();
    let side = contract.option_type();
    let is_american = contract.exercise() == ExerciseStyle::American;

    // Level i holds 2i+1 nodes j = -i..=i with spot * u^j, stored at offset
    // j + i. Node spots come from integer powers at each use, not a running
    // product.
    let node_spot = |j: i32| spot * params.u.powi(j);

    let mut values = vec![0.0_f64; 2 * steps + 1];
    for (offset, value) in values.iter_mut().enumerate() {
        *value = side.payoff(node_spot(offset as i32 - steps as i32), strike);
    }

    let disc_pu = params.discount * params.pu;
    let disc_pm = params.discount * params.pm;
    let disc_pd = params.discount * params.pd;

    // Single-buffer rollback: level i reads the 2i+3 values of level i+1 and
    // writes its own 2i+1 values at the front of the same buffer.
    for level in (0..steps).rev() {
        let width = 2 * level + 1;
        for offset in 0..width {
            let continuation = disc_pu.mul_add(
                values[offset + 2],
                disc_pm.mul_add(values[offset + 1], disc_pd * values[offset]),
            );
            values[offset] = if is_american {
                let j = offset as i32 - level as i32;
                continuation.max(side.payoff(node_spot(j), strike))
            } else {
                continuation
            };
        }
    }

    values[0]
}

/// Trinomial lattice pricer bound to a contract and step count.
///
/// # Examples
/// ```
/// use openvanilla::core::PricedInstrument;
/// use openvanilla::engines::tree::TrinomialTreePricer;
/// use openvanilla::instruments::OptionContract;
///
/// let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
/// let pricer = TrinomialTreePricer::new(contract, 200).unwrap();
/// assert!((pricer.price() - 10.45).abs() < 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct TrinomialTreePricer {
    contract: OptionContract,
    steps: usize,
    params: TrinomialParameters,
}

impl TrinomialTreePricer {
    /// Binds the lattice to a contract and step count.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidParameter`] when `steps == 0` or when
    /// any branch probability falls outside `[0, 1]`.
    pub fn new(contract: OptionContract, steps: usize) -> Result<Self, PricingError> {
        if steps == 0 {
            return Err(PricingError::InvalidParameter(
                "steps must be >= 1".to_string(),
            ));
        }
        let params = TrinomialParameters::from_contract(&contract, steps);
        params.validate()?;
        Ok(Self {
            contract,
            steps,
            params,
        })
    }

    /// Number of lattice time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The discretization bound at construction.
    pub fn parameters(&self) -> &TrinomialParameters {
        &self.params
    }
}

impl PricedInstrument for TrinomialTreePricer {
    fn contract(&self) -> &OptionContract {
        &self.contract
    }

    fn price(&self) -> f64 {
        roll_back(&self.contract, self.steps, &self.params)
    }

    fn greeks(&self) -> Greeks {
        let steps = self.steps;
        finite_difference_greeks(
            &|c: &OptionContract| trinomial_tree_price(c, steps),
            &self.contract,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::analytic::bs_price;
    use crate::engines::tree::binomial::BinomialTreePricer;
    use approx::assert_relative_eq;

    #[test]
    fn probabilities_sum_to_one_and_stay_in_bounds() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let params = TrinomialParameters::from_contract(&contract, 150);

        assert_relative_eq!(params.pu + params.pm + params.pd, 1.0, epsilon = 1e-12);
        for p in [params.pu, params.pm, params.pd] {
            assert!((0.0..=1.0).contains(&p), "probability {p} out of bounds");
        }
        assert_relative_eq!(params.u * params.d, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn matched_moments_reproduce_the_diffusion() {
        let contract = OptionContract::european_call(100.0, 90.0, 0.03, 0.25, 2.0).unwrap();
        let params = TrinomialParameters::from_contract(&contract, 100);
        let nu = 0.03 - 0.5 * 0.25 * 0.25;

        let mean = params.pu * params.dx - params.pd * params.dx;
        assert_relative_eq!(mean, nu * params.dt, epsilon = 1e-14);

        let second = (params.pu + params.pd) * params.dx * params.dx;
        assert_relative_eq!(
            second,
            0.25 * 0.25 * params.dt + (nu * params.dt).powi(2),
            epsilon = 1e-14
        );
    }

    #[test]
    fn european_price_approaches_black_scholes() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let analytic = bs_price(contract.option_type(), 100.0, 100.0, 0.05, 0.2, 1.0);
        let lattice = TrinomialTreePricer::new(contract, 500).unwrap().price();
        assert!(
            (lattice - analytic).abs() < 0.01,
            "lattice={lattice} analytic={analytic}"
        );
    }

    #[test]
    fn converges_faster_than_binomial_at_same_steps() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let analytic = bs_price(contract.option_type(), 100.0, 100.0, 0.05, 0.2, 1.0);

        let steps = 50;
        let tri = TrinomialTreePricer::new(contract, steps).unwrap().price();
        let bin = BinomialTreePricer::new(contract, steps).unwrap().price();

        let tri_err = (tri - analytic).abs();
        let bin_err = (bin - analytic).abs();
        assert!(
            tri_err <= bin_err,
            "expected trinomial error <= binomial error, tri_err={tri_err} bin_err={bin_err}"
        );
    }

    #[test]
    fn american_put_matches_binomial_within_tolerance() {
        let contract = OptionContract::american_put(100.0, 100.0, 0.05, 0.3, 1.0).unwrap();

        let tri = TrinomialTreePricer::new(contract, 200).unwrap().price();
        let bin = BinomialTreePricer::new(contract, 200).unwrap().price();
        assert!(
            (tri - bin).abs() <= 0.05,
            "trinomial/binomial mismatch: tri={tri} bin={bin}"
        );
    }

    #[test]
    fn rejects_drift_dominated_discretization() {
        // nu*dt overwhelms dx at a single step, pushing pu above 1.
        let contract = OptionContract::european_call(100.0, 100.0, 2.0, 0.05, 1.0).unwrap();
        let err = TrinomialTreePricer::new(contract, 1).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter(_)));
    }

    #[test]
    fn finite_difference_greeks_have_expected_signs() {
        let contract = OptionContract::american_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let greeks = TrinomialTreePricer::new(contract, 300).unwrap().greeks();

        assert!(greeks.delta > 0.0 && greeks.delta < 1.0);
        assert!(greeks.gamma > 0.0);
        assert!(greeks.vega > 0.0);
        assert!(greeks.theta < 0.0);
        assert!(greeks.rho.is_none());
    }
}
