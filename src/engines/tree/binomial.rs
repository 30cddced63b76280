//! Cox-Ross-Rubinstein binomial lattice for vanilla options.
//!
//! References: Cox-Ross-Rubinstein (1979); Hull (11th ed.) Ch. 13 for the
//! backward-induction recursion and early-exercise comparison.

use crate::core::{ExerciseStyle, Greeks, PricedInstrument, PricingError};
use crate::greeks::finite_difference_greeks;
use crate::instruments::OptionContract;

/// CRR discretization implied by a contract and step count.
///
/// `u = e^(sigma*sqrt(dt))`, `d = 1/u`, and the risk-neutral up-probability
/// `p = (e^(r*dt) - d) / (u - d)`, under which the one-step discounted
/// expectation of the stock reproduces today's price.
#[derive(Debug, Clone, Copy)]
pub struct CrrParameters {
    /// Time step in years.
    pub dt: f64,
    /// Up multiplier.
    pub u: f64,
    /// Down multiplier.
    pub d: f64,
    /// Risk-neutral up probability.
    pub p: f64,
    /// One-step discount factor `e^(-r*dt)`.
    pub discount: f64,
}

impl CrrParameters {
    /// Computes the discretization for `contract` over `steps` time steps.
    pub fn from_contract(contract: &OptionContract, steps: usize) -> Self {
        let dt = contract.expiry() / steps as f64;
        let u = (contract.volatility() * dt.sqrt()).exp();
        let d = 1.0 / u;
        let p = ((contract.rate() * dt).exp() - d) / (u - d);
        let discount = (-contract.rate() * dt).exp();
        Self { dt, u, d, p, discount }
    }

    fn validate(&self) -> Result<(), PricingError> {
        if !self.p.is_finite() || !(0.0..=1.0).contains(&self.p) {
            return Err(PricingError::InvalidParameter(format!(
                "risk-neutral up-probability {} is outside [0, 1]; the drift term \
                 dominates the volatility term at this step size, increase the step count",
                self.p
            )));
        }
        Ok(())
    }
}

/// Prices `contract` on a CRR lattice with `steps` time steps.
///
/// Kernel shared by [`BinomialTreePricer::price`] and its bump-and-reprice
/// Greeks; parameter bounds are the caller's responsibility.
pub fn binomial_tree_price(contract: &OptionContract, steps: usize) -> f64 {
    roll_back(contract, steps, &CrrParameters::from_contract(contract, steps))
}

fn roll_back(contract: &OptionContract, steps: usize, params: &CrrParameters) -> f64 {
    let spot = contract.spot();
    let strike = contract.strike();
    let side = contract.option_type();
    let is_american = contract.exercise() == ExerciseStyle::American;

    // Node (level, i) carries spot * u^(level - i) * d^i; i = 0 is the top of
    // the level. Node spots come from integer powers at each use, not a
    // running product: running products drift over deep lattices.
    let node_spot =
        |level: usize, i: usize| spot * params.u.powi((level - i) as i32) * params.d.powi(i as i32);

    let mut values = vec![0.0_f64; steps + 1];
    for (i, value) in values.iter_mut().enumerate() {
        *value = side.payoff(node_spot(steps, i), strike);
    }

    let disc_up = params.discount * params.p;
    let disc_down = params.discount * (1.0 - params.p);

    for level in (0..steps).rev() {
        for i in 0..=level {
            let continuation = disc_up.mul_add(values[i], disc_down * values[i + 1]);
            values[i] = if is_american {
                continuation.max(side.payoff(node_spot(level, i), strike))
            } else {
                continuation
            };
        }
    }

    values[0]
}

/// CRR binomial lattice pricer bound to a contract and step count.
///
/// # Examples
/// ```
/// use openvanilla::core::PricedInstrument;
/// use openvanilla::engines::tree::BinomialTreePricer;
/// use openvanilla::instruments::OptionContract;
///
/// let contract = OptionContract::american_put(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
/// let pricer = BinomialTreePricer::new(contract, 500).unwrap();
/// assert!(pricer.price() > 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct BinomialTreePricer {
    contract: OptionContract,
    steps: usize,
    params: CrrParameters,
}

impl BinomialTreePricer {
    /// Binds the lattice to a contract and step count.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidParameter`] when `steps == 0` or when
    /// the implied risk-neutral probability falls outside `[0, 1]`.
    pub fn new(contract: OptionContract, steps: usize) -> Result<Self, PricingError> {
        if steps == 0 {
            return Err(PricingError::InvalidParameter(
                "steps must be >= 1".to_string(),
            ));
        }
        let params = CrrParameters::from_contract(&contract, steps);
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
    pub fn parameters(&self) -> &CrrParameters {
        &self.params
    }
}

impl PricedInstrument for BinomialTreePricer {
    fn contract(&self) -> &OptionContract {
        &self.contract
    }

    fn price(&self) -> f64 {
        roll_back(&self.contract, self.steps, &self.params)
    }

    fn greeks(&self) -> Greeks {
        let steps = self.steps;
        finite_difference_greeks(
            &|c: &OptionContract| binomial_tree_price(c, steps),
            &self.contract,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::analytic::bs_price;
    use approx::assert_relative_eq;

    #[test]
    fn parameters_satisfy_crr_identities() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let params = CrrParameters::from_contract(&contract, 250);

        assert_relative_eq!(params.u * params.d, 1.0, epsilon = 1e-12);
        assert!(params.p > 0.0 && params.p < 1.0);
        // One-step risk-neutral expectation grows at the risk-free rate.
        let growth = params.p * params.u + (1.0 - params.p) * params.d;
        assert_relative_eq!(growth, (0.05 * params.dt).exp(), epsilon = 1e-12);
    }

    #[test]
    fn european_price_approaches_black_scholes() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let analytic = bs_price(
            contract.option_type(),
            100.0,
            100.0,
            0.05,
            0.2,
            1.0,
        );
        let lattice = BinomialTreePricer::new(contract, 1000).unwrap().price();
        assert!(
            (lattice - analytic).abs() < 0.01,
            "lattice={lattice} analytic={analytic}"
        );
    }

    #[test]
    fn american_put_dominates_european_put() {
        let european = OptionContract::european_put(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let american = OptionContract::american_put(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();

        let eur = BinomialTreePricer::new(european, 500).unwrap().price();
        let amer = BinomialTreePricer::new(american, 500).unwrap().price();
        assert!(amer >= eur, "american={amer} european={eur}");
        assert!(amer - eur > 1e-3, "ATM put with r > 0 carries exercise premium");
    }

    #[test]
    fn deep_itm_american_put_is_worth_at_least_intrinsic() {
        let contract = OptionContract::american_put(60.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let price = BinomialTreePricer::new(contract, 500).unwrap().price();
        assert!(price >= 40.0 - 1e-9, "price={price}");
    }

    #[test]
    fn rejects_zero_steps() {
        let contract = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let err = BinomialTreePricer::new(contract, 0).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_drift_dominated_discretization() {
        // r*dt far above sigma*sqrt(dt) pushes p above 1.
        let contract = OptionContract::european_call(100.0, 100.0, 1.0, 0.05, 1.0).unwrap();
        let err = BinomialTreePricer::new(contract, 1).unwrap_err();
        assert!(matches!(err, PricingError::InvalidParameter(_)));
    }

    #[test]
    fn finite_difference_greeks_have_expected_signs() {
        let contract = OptionContract::american_put(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        let greeks = BinomialTreePricer::new(contract, 400).unwrap().greeks();

        assert!(greeks.delta < 0.0 && greeks.delta > -1.0);
        assert!(greeks.gamma > 0.0);
        assert!(greeks.vega > 0.0);
        assert!(greeks.theta < 0.0);
        assert!(greeks.rho.is_none());
    }
}
