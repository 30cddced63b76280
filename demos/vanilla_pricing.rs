//! Vanilla option pricing walkthrough: all three models, Greeks, implied
//! volatility, and a small aggregated book.

use openvanilla::core::{OptionType, PricedInstrument};
use openvanilla::engines::analytic::{BlackScholesPricer, bs_price};
use openvanilla::engines::factory::{DEFAULT_TREE_STEPS, build_pricer_from_name};
use openvanilla::engines::tree::{BinomialTreePricer, TrinomialTreePricer};
use openvanilla::instruments::OptionContract;
use openvanilla::portfolio::Portfolio;
use openvanilla::vol::implied::implied_vol;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (spot, strike, rate, vol, expiry) = (100.0, 100.0, 0.05, 0.20, 1.0);

    // 1. European call under all three models.
    let european = OptionContract::european_call(spot, strike, rate, vol, expiry)?;
    let analytic = BlackScholesPricer::new(european)?;
    let binomial = BinomialTreePricer::new(european, 1000)?;
    let trinomial = TrinomialTreePricer::new(european, 500)?;

    println!("European call, S={spot}, K={strike}, r={rate}, vol={vol}, T={expiry}:");
    println!("  BlackScholes   = {:.4}", analytic.price());
    println!("  BinomialTree   = {:.4}  (1000 steps)", binomial.price());
    println!("  TrinomialTree  = {:.4}  (500 steps)", trinomial.price());

    // 2. Closed-form Greeks vs the lattice's finite-difference estimates.
    let cf = analytic.greeks();
    let fd = binomial.greeks();
    println!("\nGreeks (closed form vs binomial bump-and-reprice):");
    println!("  delta  {:.4}  vs  {:.4}", cf.delta, fd.delta);
    println!("  gamma  {:.4}  vs  {:.4}", cf.gamma, fd.gamma);
    println!("  theta  {:.4}  vs  {:.4}", cf.theta, fd.theta);
    println!("  vega   {:.4}  vs  {:.4}  (per 1% vol)", cf.vega, fd.vega);
    if let Some(rho) = cf.rho {
        println!("  rho    {rho:.4}  (per 1% rate, closed form only)");
    }

    // 3. American put: the early-exercise premium.
    let amer_put = OptionContract::american_put(spot, strike, rate, vol, expiry)?;
    let eur_put = OptionContract::european_put(spot, strike, rate, vol, expiry)?;
    let amer = BinomialTreePricer::new(amer_put, 1000)?.price();
    let eur = BinomialTreePricer::new(eur_put, 1000)?.price();
    println!("\nATM put on a 1000-step binomial lattice:");
    println!("  European = {eur:.4}, American = {amer:.4}, premium = {:.4}", amer - eur);

    // 4. Implied volatility round trip.
    let market_price = bs_price(OptionType::Call, spot, strike, rate, 0.27, expiry);
    let recovered = implied_vol(OptionType::Call, spot, strike, rate, expiry, market_price)?;
    println!("\nImplied volatility from price {market_price:.4}: {:.2}%", 100.0 * recovered);

    // 5. A small book aggregated through the factory.
    let mut book = Portfolio::new();
    book.add_position(
        build_pricer_from_name("BlackScholes", european, 0)?,
        10.0,
    );
    book.add_position(
        build_pricer_from_name("BinomialTree", amer_put, DEFAULT_TREE_STEPS)?,
        -4.0,
    );
    book.add_position(
        build_pricer_from_name("TrinomialTree", amer_put, DEFAULT_TREE_STEPS)?,
        2.0,
    );
    println!("\nBook of {} positions:", book.len());
    println!("  value = {:.4}", book.total_value());
    println!("  delta = {:.4}", book.delta());
    println!("  gamma = {:.4}", book.gamma());

    Ok(())
}
