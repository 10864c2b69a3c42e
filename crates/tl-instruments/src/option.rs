//! Vanilla option contract.
//!
//! An [`OptionContract`] carries the terms the lattice needs: strike, type,
//! exercise style and time to maturity in years. Contracts built from dates
//! also remember their start date, which is the origin for resolving
//! ex-dividend dates.

use crate::exercise::ExerciseType;
use crate::instrument::{PricingEngine, PricingResults};
use crate::payoff::{OptionType, Payoff, PlainVanillaPayoff};
use tl_core::{date_fail, ensure, errors::Result, Real, Time};
use tl_time::{Actual365Fixed, Date, DayCounter};

// ────────────────────────────────────────────────────────────────────────────
// OptionContract
// ────────────────────────────────────────────────────────────────────────────

/// A plain vanilla option on a single underlying asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionContract {
    payoff: PlainVanillaPayoff,
    exercise: ExerciseType,
    maturity: Time,
    start_date: Option<Date>,
    maturity_date: Option<Date>,
}

impl OptionContract {
    /// Create a contract expiring `maturity` years from now.
    ///
    /// # Errors
    /// `InvalidParameter` unless `strike > 0` and `maturity > 0`, both finite.
    pub fn new(
        option_type: OptionType,
        exercise: ExerciseType,
        strike: Real,
        maturity: Time,
    ) -> Result<Self> {
        ensure!(strike.is_finite() && strike > 0.0, "strike must be > 0, got {strike}");
        ensure!(
            maturity.is_finite() && maturity > 0.0,
            "time to maturity must be > 0, got {maturity}"
        );
        Ok(Self {
            payoff: PlainVanillaPayoff::new(option_type, strike),
            exercise,
            maturity,
            start_date: None,
            maturity_date: None,
        })
    }

    /// Convenience: a European call/put.
    pub fn european(option_type: OptionType, strike: Real, maturity: Time) -> Result<Self> {
        Self::new(option_type, ExerciseType::European, strike, maturity)
    }

    /// Convenience: an American call/put.
    pub fn american(option_type: OptionType, strike: Real, maturity: Time) -> Result<Self> {
        Self::new(option_type, ExerciseType::American, strike, maturity)
    }

    /// Create a contract running from `start` to `maturity`.
    ///
    /// Time to maturity is Actual/365 (Fixed) between the two dates.
    ///
    /// # Errors
    /// `DateResolution` when `maturity` is not after `start`.
    pub fn from_dates(
        option_type: OptionType,
        exercise: ExerciseType,
        strike: Real,
        start: Date,
        maturity: Date,
    ) -> Result<Self> {
        if maturity <= start {
            date_fail!("maturity date {maturity} must be after start date {start}");
        }
        let t = Actual365Fixed.year_fraction(start, maturity);
        let mut contract = Self::new(option_type, exercise, strike, t)?;
        contract.start_date = Some(start);
        contract.maturity_date = Some(maturity);
        Ok(contract)
    }

    /// Same as [`from_dates`](Self::from_dates) with `YYYY-MM-DD` strings.
    pub fn from_iso_dates(
        option_type: OptionType,
        exercise: ExerciseType,
        strike: Real,
        start: &str,
        maturity: &str,
    ) -> Result<Self> {
        let start = Date::parse_iso(start)?;
        let maturity = Date::parse_iso(maturity)?;
        Self::from_dates(option_type, exercise, strike, start, maturity)
    }

    /// Attach a start date to a contract given in year fractions, so that
    /// ex-dividend dates can be resolved against it.
    pub fn with_start_date(mut self, start: Date) -> Self {
        self.start_date = Some(start);
        self
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        self.payoff.strike
    }

    /// The option type (call/put).
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type
    }

    /// The exercise style.
    pub fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    /// `true` for American exercise.
    pub fn is_american(&self) -> bool {
        self.exercise.allows_early_exercise()
    }

    /// Time to maturity in years.
    pub fn maturity(&self) -> Time {
        self.maturity
    }

    /// Start date, if the contract has one.
    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// Maturity date, if the contract was built from dates.
    pub fn maturity_date(&self) -> Option<Date> {
        self.maturity_date
    }

    /// The payoff.
    pub fn payoff(&self) -> &PlainVanillaPayoff {
        &self.payoff
    }

    /// Exercise value at underlying price `spot`.
    pub fn intrinsic(&self, spot: Real) -> Real {
        self.payoff.value(spot)
    }

    /// Price this contract with the given engine.
    pub fn price_with(&self, engine: &dyn PricingEngine<OptionContract>) -> Result<PricingResults> {
        engine.calculate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tl_core::Error;

    #[test]
    fn direct_construction() {
        let c = OptionContract::european(OptionType::Call, 102.0, 0.25).unwrap();
        assert_abs_diff_eq!(c.strike(), 102.0);
        assert_abs_diff_eq!(c.maturity(), 0.25);
        assert_eq!(c.option_type(), OptionType::Call);
        assert!(!c.is_american());
        assert!(c.start_date().is_none());
        assert_abs_diff_eq!(c.intrinsic(110.0), 8.0);
    }

    #[test]
    fn rejects_bad_terms() {
        assert!(matches!(
            OptionContract::european(OptionType::Put, 0.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(OptionContract::american(OptionType::Put, 100.0, 0.0).is_err());
        assert!(OptionContract::american(OptionType::Put, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn from_iso_dates_uses_actual_365() {
        let c = OptionContract::from_iso_dates(
            OptionType::Put,
            ExerciseType::American,
            100.0,
            "2025-09-01",
            "2026-09-01",
        )
        .unwrap();
        assert_abs_diff_eq!(c.maturity(), 1.0, epsilon = 1e-15);
        assert!(c.is_american());
        assert_eq!(c.start_date().map(|d| d.to_string()), Some("2025-09-01".to_string()));
    }

    #[test]
    fn date_errors() {
        let inverted = OptionContract::from_iso_dates(
            OptionType::Call,
            ExerciseType::European,
            100.0,
            "2026-09-01",
            "2025-09-01",
        );
        assert!(matches!(inverted, Err(Error::DateResolution(_))));
        let same_day = OptionContract::from_iso_dates(
            OptionType::Call,
            ExerciseType::European,
            100.0,
            "2026-09-01",
            "2026-09-01",
        );
        assert!(matches!(same_day, Err(Error::DateResolution(_))));
        let malformed = OptionContract::from_iso_dates(
            OptionType::Call,
            ExerciseType::European,
            100.0,
            "2026/09/01",
            "2027-09-01",
        );
        assert!(matches!(malformed, Err(Error::DateResolution(_))));
    }
}
