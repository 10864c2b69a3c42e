//! Risk-neutral market parameters.
//!
//! `dS/S = r dt + σ dW` between dividend dates, with at most one discrete
//! dividend. All parameters are constant over the life of the contract.

use crate::dividend::Dividend;
use tl_core::{ensure, errors::Result, DiscountFactor, Rate, Real, Time, Volatility};

/// Immutable market description consumed by the lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketData {
    spot: Real,
    rate: Rate,
    volatility: Volatility,
    dividend: Option<Dividend>,
}

impl MarketData {
    /// Create market data without dividends.
    ///
    /// # Errors
    /// `InvalidParameter` unless `spot > 0`, `rate ≥ 0`, `volatility > 0`
    /// and all three are finite.
    pub fn new(spot: Real, rate: Rate, volatility: Volatility) -> Result<Self> {
        ensure!(spot.is_finite() && spot > 0.0, "spot must be > 0, got {spot}");
        ensure!(rate.is_finite() && rate >= 0.0, "rate must be >= 0, got {rate}");
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be > 0, got {volatility}"
        );
        Ok(Self {
            spot,
            rate,
            volatility,
            dividend: None,
        })
    }

    /// Attach a discrete dividend.
    pub fn with_dividend(mut self, dividend: Dividend) -> Self {
        self.dividend = Some(dividend);
        self
    }

    /// Same market with a different spot.
    pub fn with_spot(&self, spot: Real) -> Result<Self> {
        let mut bumped = Self::new(spot, self.rate, self.volatility)?;
        bumped.dividend = self.dividend;
        Ok(bumped)
    }

    /// Spot price `S0`.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Continuously compounded risk-free rate `r`.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Volatility `σ`.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// The discrete dividend, if any.
    pub fn dividend(&self) -> Option<&Dividend> {
        self.dividend.as_ref()
    }

    /// Forward growth factor `exp(r·dt)`.
    pub fn growth(&self, dt: Time) -> Real {
        (self.rate * dt).exp()
    }

    /// Discount factor `exp(−r·dt)`.
    pub fn discount(&self, dt: Time) -> DiscountFactor {
        (-self.rate * dt).exp()
    }

    /// One-step variance around the expected value `expected`:
    /// `expected² · (exp(σ²·dt) − 1)`.
    ///
    /// Without a dividend `expected = value · exp(r·dt)`; on the dividend
    /// transition it is the ex-dividend expectation.
    pub fn step_variance(&self, expected: Real, dt: Time) -> Real {
        expected * expected * ((self.volatility * self.volatility * dt).exp() - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dividend::DividendTiming;
    use approx::assert_abs_diff_eq;
    use tl_core::Error;

    #[test]
    fn accessors() {
        let m = MarketData::new(100.0, 0.05, 0.2).unwrap();
        assert_abs_diff_eq!(m.spot(), 100.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m.rate(), 0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(m.volatility(), 0.2, epsilon = 1e-15);
        assert!(m.dividend().is_none());
        assert_abs_diff_eq!(m.growth(1.0) * m.discount(1.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn step_variance_matches_lognormal() {
        let m = MarketData::new(100.0, 0.05, 0.2).unwrap();
        let dt: f64 = 0.01;
        let expected = 100.0_f64.powi(2) * (2.0 * 0.05 * dt).exp() * ((0.04 * dt).exp() - 1.0);
        assert_abs_diff_eq!(m.step_variance(100.0 * m.growth(dt), dt), expected, epsilon = 1e-12);
        // Ex-dividend expectation scales the variance with it.
        let ratio = m.step_variance(49.0, dt) / m.step_variance(98.0, dt);
        assert_abs_diff_eq!(ratio, 0.25, epsilon = 1e-15);
    }

    #[test]
    fn rejects_out_of_domain() {
        assert!(matches!(
            MarketData::new(0.0, 0.05, 0.2),
            Err(Error::InvalidParameter(_))
        ));
        assert!(MarketData::new(100.0, -0.01, 0.2).is_err());
        assert!(MarketData::new(100.0, 0.05, 0.0).is_err());
        assert!(MarketData::new(f64::INFINITY, 0.05, 0.2).is_err());
        // Zero rate is allowed
        assert!(MarketData::new(100.0, 0.0, 0.2).is_ok());
    }

    #[test]
    fn bumped_spot_keeps_dividend() {
        let div = Dividend::cash(1.0, DividendTiming::YearFraction(0.5)).unwrap();
        let m = MarketData::new(100.0, 0.05, 0.2).unwrap().with_dividend(div);
        let bumped = m.with_spot(101.0).unwrap();
        assert_abs_diff_eq!(bumped.spot(), 101.0, epsilon = 1e-15);
        assert_eq!(bumped.dividend(), Some(&div));
        assert!(m.with_spot(-1.0).is_err());
    }
}
