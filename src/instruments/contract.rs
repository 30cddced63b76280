//! Canonical vanilla option contract used throughout the library.
//!
//! [`OptionContract`] stores the full pricing state: spot, strike,
//! continuously-compounded risk-free rate, annualized volatility, expiry in
//! year fractions, side, and exercise rights. Validation runs once at
//! construction; the fields are private and never mutated afterwards, so a
//! contract in hand always satisfies `spot > 0`, `strike > 0`,
//! `volatility > 0`, `expiry > 0`. Sensitivity estimation builds *new*
//! perturbed contracts rather than touching an existing one.

use serde::{Deserialize, Serialize};

use crate::core::{ExerciseStyle, OptionType, PricingError};

/// Immutable vanilla option contract.
///
/// # Examples
/// ```
/// use openvanilla::core::{ExerciseStyle, OptionType};
/// use openvanilla::instruments::OptionContract;
///
/// let call = OptionContract::new(
///     100.0,
///     100.0,
///     0.05,
///     0.20,
///     1.0,
///     OptionType::Call,
///     ExerciseStyle::European,
/// )
/// .unwrap();
/// assert_eq!(call.spot(), 100.0);
///
/// // Non-positive fields are rejected at construction.
/// assert!(
///     OptionContract::new(
///         0.0,
///         100.0,
///         0.05,
///         0.20,
///         1.0,
///         OptionType::Call,
///         ExerciseStyle::European,
///     )
///     .is_err()
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContractTerms", into = "ContractTerms")]
pub struct OptionContract {
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    option_type: OptionType,
    exercise: ExerciseStyle,
}

impl OptionContract {
    /// Validates and builds a contract.
    ///
    /// `rate` may take any sign; `spot`, `strike`, `volatility`, and `expiry`
    /// must be strictly positive.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidParameter`] naming the offending field.
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
        option_type: OptionType,
        exercise: ExerciseStyle,
    ) -> Result<Self, PricingError> {
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
        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "volatility must be > 0, got {volatility}"
            )));
        }
        if !expiry.is_finite() || expiry <= 0.0 {
            return Err(PricingError::InvalidParameter(format!(
                "expiry must be > 0, got {expiry}"
            )));
        }

        Ok(Self {
            spot,
            strike,
            rate,
            volatility,
            expiry,
            option_type,
            exercise,
        })
    }

    /// Builds a European call contract.
    ///
    /// # Examples
    /// ```
    /// use openvanilla::core::OptionType;
    /// use openvanilla::instruments::OptionContract;
    ///
    /// let call = OptionContract::european_call(100.0, 105.0, 0.03, 0.25, 0.5).unwrap();
    /// assert_eq!(call.option_type(), OptionType::Call);
    /// ```
    pub fn european_call(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
    ) -> Result<Self, PricingError> {
        Self::new(
            spot,
            strike,
            rate,
            volatility,
            expiry,
            OptionType::Call,
            ExerciseStyle::European,
        )
    }

    /// Builds a European put contract.
    pub fn european_put(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
    ) -> Result<Self, PricingError> {
        Self::new(
            spot,
            strike,
            rate,
            volatility,
            expiry,
            OptionType::Put,
            ExerciseStyle::European,
        )
    }

    /// Builds an American call contract.
    pub fn american_call(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
    ) -> Result<Self, PricingError> {
        Self::new(
            spot,
            strike,
            rate,
            volatility,
            expiry,
            OptionType::Call,
            ExerciseStyle::American,
        )
    }

    /// Builds an American put contract.
    pub fn american_put(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
    ) -> Result<Self, PricingError> {
        Self::new(
            spot,
            strike,
            rate,
            volatility,
            expiry,
            OptionType::Put,
            ExerciseStyle::American,
        )
    }

    /// Current underlying price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike level.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Continuously-compounded risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Annualized volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Time to maturity in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Exercise rights.
    #[inline]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Immediate-exercise payoff at the contract's own spot.
    #[inline]
    pub fn intrinsic(&self) -> f64 {
        self.option_type.payoff(self.spot, self.strike)
    }

    // The bump helpers below exist for the finite-difference estimator. The
    // caller owns the invariant that the bumped value stays positive.
    #[inline]
    pub(crate) fn with_spot(&self, spot: f64) -> Self {
        Self { spot, ..*self }
    }

    #[inline]
    pub(crate) fn with_volatility(&self, volatility: f64) -> Self {
        Self { volatility, ..*self }
    }

    #[inline]
    pub(crate) fn with_expiry(&self, expiry: f64) -> Self {
        Self { expiry, ..*self }
    }
}

/// Raw field bundle used for serde transport of [`OptionContract`].
///
/// Deserialization routes through [`OptionContract::new`], so a transported
/// contract is re-validated before it can be used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContractTerms {
    /// Current underlying price.
    pub spot: f64,
    /// Strike level.
    pub strike: f64,
    /// Continuously-compounded risk-free rate.
    pub rate: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Time to maturity in years.
    pub expiry: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Exercise rights.
    pub exercise: ExerciseStyle,
}

impl TryFrom<ContractTerms> for OptionContract {
    type Error = PricingError;

    fn try_from(terms: ContractTerms) -> Result<Self, Self::Error> {
        Self::new(
            terms.spot,
            terms.strike,
            terms.rate,
            terms.volatility,
            terms.expiry,
            terms.option_type,
            terms.exercise,
        )
    }
}

impl From<OptionContract> for ContractTerms {
    fn from(contract: OptionContract) -> Self {
        Self {
            spot: contract.spot,
            strike: contract.strike,
            rate: contract.rate,
            volatility: contract.volatility,
            expiry: contract.expiry,
            option_type: contract.option_type,
            exercise: contract.exercise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_each_non_positive_field() {
        let cases = [
            (0.0, 100.0, 0.2, 1.0, "spot"),
            (100.0, -5.0, 0.2, 1.0, "strike"),
            (100.0, 100.0, 0.0, 1.0, "volatility"),
            (100.0, 100.0, 0.2, 0.0, "expiry"),
        ];

        for (spot, strike, vol, expiry, field) in cases {
            let err = OptionContract::new(
                spot,
                strike,
                0.05,
                vol,
                expiry,
                OptionType::Call,
                ExerciseStyle::European,
            )
            .unwrap_err();
            match err {
                PricingError::InvalidParameter(msg) => {
                    assert!(msg.contains(field), "expected `{field}` in `{msg}`")
                }
                other => panic!("expected InvalidParameter, got {other:?}"),
            }
        }
    }

    #[test]
    fn accepts_negative_rates() {
        let contract = OptionContract::european_put(100.0, 100.0, -0.01, 0.2, 1.0);
        assert!(contract.is_ok());
    }

    #[test]
    fn bump_helpers_build_new_contracts() {
        let base = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();

        let bumped = base.with_spot(101.0);
        assert_eq!(bumped.spot(), 101.0);
        assert_eq!(base.spot(), 100.0);
        assert_eq!(bumped.strike(), base.strike());

        let bumped = base.with_volatility(0.21);
        assert_eq!(bumped.volatility(), 0.21);

        let bumped = base.with_expiry(0.99);
        assert_eq!(bumped.expiry(), 0.99);
    }

    #[test]
    fn serde_round_trip_revalidates() {
        let contract = OptionContract::american_put(95.0, 100.0, 0.02, 0.3, 0.75).unwrap();
        let json = serde_json::to_string(&contract).unwrap();
        let decoded: OptionContract = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, contract);

        let bad = r#"{"spot":-1.0,"strike":100.0,"rate":0.02,"volatility":0.3,"expiry":0.75,"option_type":"Put","exercise":"American"}"#;
        assert!(serde_json::from_str::<OptionContract>(bad).is_err());
    }
}
