//! Implied-volatility inversion by bracketed bisection.
//!
//! The solver inverts the analytic Black-Scholes price in its volatility
//! argument. Price is strictly increasing in volatility for a vanilla
//! European option, so a target strictly inside the prices at the bracket
//! bounds pins exactly one root. Bisection needs no derivative and cannot
//! diverge inside a verified bracket, which is why it is used here over a
//! Newton-type iteration.

use crate::core::{OptionType, PricingError};
use crate::engines::analytic::bs_price;

/// Lower volatility bracket bound (0.1%).
pub const VOL_LOWER_BOUND: f64 = 0.001;
/// Upper volatility bracket bound (200%).
pub const VOL_UPPER_BOUND: f64 = 2.0;
/// Default absolute price tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;
/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Bisection solver configuration.
///
/// # Examples
/// ```
/// use openvanilla::core::OptionType;
/// use openvanilla::engines::analytic::bs_price;
/// use openvanilla::vol::implied::ImpliedVolSolver;
///
/// let target = bs_price(OptionType::Put, 100.0, 110.0, 0.01, 0.35, 0.75);
/// let solver = ImpliedVolSolver::default();
/// let vol = solver
///     .solve(OptionType::Put, 100.0, 110.0, 0.01, 0.75, target)
///     .unwrap();
/// assert!((vol - 0.35).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImpliedVolSolver {
    /// Absolute price tolerance for convergence.
    pub tolerance: f64,
    /// Iteration budget before reporting failure.
    pub max_iterations: usize,
}

impl Default for ImpliedVolSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ImpliedVolSolver {
    /// Builds a solver with explicit tolerance and iteration budget.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Finds the volatility at which the analytic model reproduces
    /// `target_price` for the given contract terms.
    ///
    /// # Errors
    /// - [`PricingError::InvalidParameter`] for non-finite or non-positive
    ///   spot, strike, or expiry, or a negative target price.
    /// - [`PricingError::PriceOutOfBounds`] when `target_price` does not lie
    ///   strictly between the prices at the bracket bounds
    ///   ([`VOL_LOWER_BOUND`], [`VOL_UPPER_BOUND`]).
    /// - [`PricingError::ConvergenceFailure`] when the iteration budget runs
    ///   out before the price tolerance is met.
    pub fn solve(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        expiry: f64,
        target_price: f64,
    ) -> Result<f64, PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "spot must be > 0, got {spot}"
            )));
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "strike must be > 0, got {strike}"
            )));
        }
        if !rate.is_finite() {
            return Err(PricingError::InvalidParameter(format!(
                "rate must be finite, got {rate}"
            )));
        }
        if !expiry.is_finite() || expiry <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "expiry must be > 0, got {expiry}"
            )));
        }
        if !target_price.is_finite() || target_price < 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "target price must be >= 0, got {target_price}"
            )));
        }

        let price_low = bs_price(option_type, spot, strike, rate, VOL_LOWER_BOUND, expiry);
        let price_high = bs_price(option_type, spot, strike, rate, VOL_UPPER_BOUND, expiry);
        if target_price <= price_low || target_price >= price_high {
            return Err(PricingError::PriceOutOfBounds(format!(
                "target price {target_price} is outside the bracket \
                 [{price_low}, {price_high}] spanned by volatilities \
                 [{VOL_LOWER_BOUND}, {VOL_UPPER_BOUND}]"
            )));
        }

        let mut low = VOL_LOWER_BOUND;
        let mut high = VOL_UPPER_BOUND;
        let mut vol = 0.5 * (low + high);

        for _ in 0..self.max_iterations {
            let price = bs_price(option_type, spot, strike, rate, vol, expiry);
            if (price - target_price).abs() < self.tolerance {
                return Ok(vol);
            }

            // Price is strictly increasing in volatility, so the root lies in
            // whichever half the target falls into.
            if price < target_price {
                low = vol;
            } else {
                high = vol;
            }
            vol = 0.5 * (low + high);
        }

        Err(PricingError::ConvergenceFailure(format!(
            "bisection did not reach tolerance {} within {} iterations",
            self.tolerance, self.max_iterations
        )))
    }
}

/// Solves with the default tolerance and iteration budget.
///
/// # Errors
/// As [`ImpliedVolSolver::solve`].
///
/// # Examples
/// ```
/// use openvanilla::core::OptionType;
/// use openvanilla::engines::analytic::bs_price;
/// use openvanilla::vol::implied::implied_vol;
///
/// let target = bs_price(OptionType::Call, 100.0, 100.0, 0.03, 0.25, 1.0);
/// let vol = implied_vol(OptionType::Call, 100.0, 100.0, 0.03, 1.0, target).unwrap();
/// assert!((vol - 0.25).abs() < 1e-4);
/// ```
pub fn implied_vol(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
    target_price: f64,
) -> Result<f64, PricingError> {
    ImpliedVolSolver::default().solve(option_type, spot, strike, rate, expiry, target_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_true_sigma_call() {
        let (s, k, r, t, sigma) = (100.0, 100.0, 0.05, 1.0, 0.2);
        let price = bs_price(OptionType::Call, s, k, r, sigma, t);
        let iv = implied_vol(OptionType::Call, s, k, r, t, price).unwrap();
        assert_relative_eq!(iv, sigma, epsilon = 1e-6);
    }

    #[test]
    fn recovers_true_sigma_put() {
        let (s, k, r, t, sigma) = (100.0, 110.0, 0.02, 0.75, 0.35);
        let price = bs_price(OptionType::Put, s, k, r, sigma, t);
        let iv = implied_vol(OptionType::Put, s, k, r, t, price).unwrap();
        assert_relative_eq!(iv, sigma, epsilon = 1e-6);
    }

    #[test]
    fn round_trip_reprices_the_target() {
        let (s, k, r, t, sigma) = (100.0, 105.0, 0.03, 1.4, 0.28);
        let target = bs_price(OptionType::Call, s, k, r, sigma, t);
        let iv = implied_vol(OptionType::Call, s, k, r, t, target).unwrap();
        let repriced = bs_price(OptionType::Call, s, k, r, iv, t);
        assert!((repriced - target).abs() < DEFAULT_TOLERANCE);
    }

    #[test]
    fn target_above_upper_bound_price_is_rejected() {
        // A call is worth less than spot for any volatility in the bracket.
        let err = implied_vol(OptionType::Call, 100.0, 100.0, 0.05, 1.0, 95.0).unwrap_err();
        assert!(matches!(err, PricingError::PriceOutOfBounds(_)));
    }

    #[test]
    fn target_below_lower_bound_price_is_rejected() {
        // At sigma = 0.1% an ATM call with r > 0 is still worth nearly its
        // discounted forward intrinsic, well above this target.
        let err = implied_vol(OptionType::Call, 100.0, 100.0, 0.05, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, PricingError::PriceOutOfBounds(_)));
    }

    #[test]
    fn exhausted_iteration_budget_is_reported() {
        let target = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0);
        let solver = ImpliedVolSolver::new(1.0e-12, 3);
        let err = solver
            .solve(OptionType::Call, 100.0, 100.0, 0.05, 1.0, target)
            .unwrap_err();
        assert!(matches!(err, PricingError::ConvergenceFailure(_)));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            implied_vol(OptionType::Call, -100.0, 100.0, 0.05, 1.0, 5.0),
            Err(PricingError::InvalidParameter(_))
        ));
        assert!(matches!(
            implied_vol(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 5.0),
            Err(PricingError::InvalidParameter(_))
        ));
        assert!(matches!(
            implied_vol(OptionType::Call, 100.0, 100.0, 0.05, 1.0, -1.0),
            Err(PricingError::InvalidParameter(_))
        ));
    }
}
