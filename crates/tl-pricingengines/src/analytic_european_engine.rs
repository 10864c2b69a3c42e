//! Analytic European option engine (Black-Scholes).
//!
//! Prices European vanilla options on a dividend-free underlying with the
//! closed-form Black-Scholes formula. The lattice engine uses it as a
//! reference value.

use statrs::distribution::{ContinuousCDF, Normal};
use tl_core::{ensure, errors::Error, errors::Result, Rate, Real, Time, Volatility};
use tl_instruments::{OptionContract, OptionType, PricingEngine, PricingResults};
use tl_processes::MarketData;

/// Analytic pricing engine for European vanilla options.
///
/// $$C = S N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r \pm \sigma^2/2)T}{\sigma\sqrt{T}}$
#[derive(Debug, Clone)]
pub struct AnalyticEuropeanEngine {
    market: MarketData,
}

impl AnalyticEuropeanEngine {
    /// Create a new engine on the given market.
    pub fn new(market: MarketData) -> Self {
        Self { market }
    }
}

/// Black-Scholes price of a European option without dividends.
pub fn black_scholes(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    rate: Rate,
    volatility: Volatility,
    maturity: Time,
) -> Result<Real> {
    let phi = option_type.sign();
    if maturity <= 0.0 {
        return Ok((phi * (spot - strike)).max(0.0));
    }

    let std_dev = volatility * maturity.sqrt();
    let df = (-rate * maturity).exp();
    if std_dev <= 1e-15 {
        return Ok((phi * (spot - strike * df)).max(0.0));
    }

    let d1 = ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * maturity) / std_dev;
    let d2 = d1 - std_dev;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::NumericalDegeneracy(format!("standard normal: {e}")))?;

    Ok(phi * (spot * normal.cdf(phi * d1) - strike * df * normal.cdf(phi * d2)))
}

impl PricingEngine<OptionContract> for AnalyticEuropeanEngine {
    fn calculate(&self, contract: &OptionContract) -> Result<PricingResults> {
        ensure!(
            !contract.is_american(),
            "analytic engine prices European exercise only"
        );
        ensure!(
            self.market.dividend().is_none(),
            "analytic engine does not price discrete dividends"
        );
        let price = black_scholes(
            contract.option_type(),
            self.market.spot(),
            contract.strike(),
            self.market.rate(),
            self.market.volatility(),
            contract.maturity(),
        )?;
        Ok(PricingResults::from_npv(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bs_call_price() {
        let price = black_scholes(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
        assert!((price - 10.4506).abs() < 0.01, "price = {price}");
    }

    #[test]
    fn reference_call_and_put() {
        let call = black_scholes(OptionType::Call, 100.0, 102.0, 0.05, 0.2, 0.25).unwrap();
        let put = black_scholes(OptionType::Put, 100.0, 102.0, 0.05, 0.2, 0.25).unwrap();
        assert_abs_diff_eq!(call, 3.646566, epsilon = 1e-5);
        assert_abs_diff_eq!(put, 4.3795, epsilon = 1e-3);
    }

    #[test]
    fn bs_put_call_parity() {
        let (s, k, r, sigma, t) = (100.0, 105.0, 0.08, 0.25, 0.5);
        let call = black_scholes(OptionType::Call, s, k, r, sigma, t).unwrap();
        let put = black_scholes(OptionType::Put, s, k, r, sigma, t).unwrap();
        let parity = call - s + k * (-r * t).exp();
        assert!((put - parity).abs() < 1e-10, "put={put}, parity={parity}");
    }

    #[test]
    fn bs_zero_vol_call() {
        let price = black_scholes(OptionType::Call, 100.0, 95.0, 0.05, 0.0, 1.0).unwrap();
        let expected = 100.0 - 95.0 * (-0.05_f64).exp();
        assert_abs_diff_eq!(price, expected, epsilon = 1e-12);
    }

    #[test]
    fn engine_rejects_american_and_dividends() {
        let market = MarketData::new(100.0, 0.05, 0.2).unwrap();
        let engine = AnalyticEuropeanEngine::new(market);
        let american = OptionContract::american(OptionType::Put, 100.0, 1.0).unwrap();
        assert!(matches!(
            engine.calculate(&american),
            Err(Error::InvalidParameter(_))
        ));
        let european = OptionContract::european(OptionType::Put, 100.0, 1.0).unwrap();
        let npv = engine.calculate(&european).unwrap().npv;
        assert!(npv > 0.0);
    }
}
