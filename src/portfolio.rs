//! Quantity-weighted aggregation over heterogeneous pricers.
//!
//! Positions hold any [`PricedInstrument`] behind a trait object, so a book
//! can mix closed-form and lattice pricers and the aggregates never inspect
//! the concrete model type.

use crate::core::PricedInstrument;

/// Book of `(pricer, quantity)` positions.
///
/// Quantities may be negative for short positions.
///
/// # Examples
/// ```
/// use openvanilla::engines::factory::build_pricer_from_name;
/// use openvanilla::instruments::OptionContract;
/// use openvanilla::portfolio::Portfolio;
///
/// let call = OptionContract::european_call(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
/// let put = OptionContract::american_put(100.0, 95.0, 0.05, 0.2, 1.0).unwrap();
///
/// let mut book = Portfolio::new();
/// book.add_position(build_pricer_from_name("BlackScholes", call, 0).unwrap(), 10.0);
/// book.add_position(build_pricer_from_name("BinomialTree", put, 200).unwrap(), -4.0);
///
/// assert_eq!(book.len(), 2);
/// assert!(book.total_value() > 0.0);
/// ```
#[derive(Debug, Default)]
pub struct Portfolio {
    positions: Vec<(Box<dyn PricedInstrument>, f64)>,
}

impl Portfolio {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a position with the given quantity.
    pub fn add_position(&mut self, pricer: Box<dyn PricedInstrument>, quantity: f64) {
        self.positions.push((pricer, quantity));
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the book holds no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Quantity-weighted sum of position values.
    pub fn total_value(&self) -> f64 {
        self.positions
            .iter()
            .map(|(pricer, quantity)| pricer.price() * quantity)
            .sum()
    }

    /// Quantity-weighted sum of position deltas.
    pub fn delta(&self) -> f64 {
        self.positions
            .iter()
            .map(|(pricer, quantity)| pricer.delta() * quantity)
            .sum()
    }

    /// Quantity-weighted sum of position gammas.
    pub fn gamma(&self) -> f64 {
        self.positions
            .iter()
            .map(|(pricer, quantity)| pricer.gamma() * quantity)
            .sum()
    }
}
