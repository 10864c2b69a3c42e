//! Discrete dividend definition.
//!
//! A [`Dividend`] is a single payment, either a fixed cash amount or a
//! fraction of the underlying, scheduled either as a year fraction from the
//! valuation date or as an absolute ex-dividend date. Lattices consume it
//! through [`Dividend::step_index`], which maps the payment onto one time
//! step.

use tl_core::{ensure, errors::Result, Real, Size, Time};
use tl_core::date_fail;
use tl_time::{Actual365Fixed, Date, DayCounter};
use tracing::debug;

/// Largest share of a node's value a cash dividend can take out of it.
pub const MAX_CASH_FRACTION: Real = 0.5;

/// How much the dividend pays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DividendAmount {
    /// A fixed cash amount `D ≥ 0`.
    Cash(Real),
    /// A fraction `δ ∈ [0, 1)` of the underlying value on the ex-date.
    Proportional(Real),
}

impl DividendAmount {
    /// Amount paid by a node whose cum-dividend value is `value`.
    ///
    /// Cash is capped at [`MAX_CASH_FRACTION`] of `value`, so the ex-dividend
    /// value of a positive node stays positive.
    pub fn paid_on(&self, value: Real) -> Real {
        match *self {
            DividendAmount::Cash(d) => d.min(MAX_CASH_FRACTION * value),
            DividendAmount::Proportional(q) => q * value,
        }
    }

    /// Value left after the payment.
    pub fn ex_dividend(&self, value: Real) -> Real {
        value - self.paid_on(value)
    }

    /// `true` when the dividend pays nothing.
    pub fn is_zero(&self) -> bool {
        match *self {
            DividendAmount::Cash(d) | DividendAmount::Proportional(d) => d == 0.0,
        }
    }
}

/// When the dividend goes ex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DividendTiming {
    /// Years from the valuation date.
    YearFraction(Time),
    /// Absolute ex-dividend date, measured from the contract start date.
    ExDate(Date),
}

/// A single discrete dividend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dividend {
    amount: DividendAmount,
    timing: DividendTiming,
}

impl Dividend {
    /// A fixed cash dividend.
    pub fn cash(amount: Real, timing: DividendTiming) -> Result<Self> {
        ensure!(
            amount.is_finite() && amount >= 0.0,
            "dividend amount must be >= 0, got {amount}"
        );
        Self::checked(DividendAmount::Cash(amount), timing)
    }

    /// A dividend paying the fraction `rate` of the underlying.
    pub fn proportional(rate: Real, timing: DividendTiming) -> Result<Self> {
        ensure!(
            (0.0..1.0).contains(&rate),
            "proportional dividend must lie in [0, 1), got {rate}"
        );
        Self::checked(DividendAmount::Proportional(rate), timing)
    }

    fn checked(amount: DividendAmount, timing: DividendTiming) -> Result<Self> {
        if let DividendTiming::YearFraction(t) = timing {
            ensure!(t.is_finite(), "dividend time must be finite, got {t}");
        }
        Ok(Self { amount, timing })
    }

    /// The amount.
    pub fn amount(&self) -> DividendAmount {
        self.amount
    }

    /// The timing.
    pub fn timing(&self) -> DividendTiming {
        self.timing
    }

    /// Year fraction from the valuation date to the ex-date.
    ///
    /// An ex-date needs the contract's start date as origin; without one the
    /// timing cannot be resolved.
    pub fn time_from(&self, start: Option<Date>) -> Result<Time> {
        match self.timing {
            DividendTiming::YearFraction(t) => Ok(t),
            DividendTiming::ExDate(ex_date) => match start {
                Some(start) => Ok(Actual365Fixed.year_fraction(start, ex_date)),
                None => date_fail!(
                    "ex-dividend date {ex_date} needs a contract start date to resolve"
                ),
            },
        }
    }

    /// Dividend time if the dividend takes effect before `maturity`.
    ///
    /// Returns `None` when the amount is zero or the time falls outside
    /// `(0, maturity)`.
    pub fn effective_time(&self, start: Option<Date>, maturity: Time) -> Result<Option<Time>> {
        if self.amount.is_zero() {
            return Ok(None);
        }
        let t = self.time_from(start)?;
        if t > 0.0 && t < maturity {
            Ok(Some(t))
        } else {
            debug!(t, maturity, "dividend outside (0, T), ignored");
            Ok(None)
        }
    }

    /// Lattice step at which the dividend is paid: `ceil(t / T · N)`.
    pub fn step_index(
        &self,
        start: Option<Date>,
        maturity: Time,
        steps: Size,
    ) -> Result<Option<Size>> {
        let Some(t) = self.effective_time(start, maturity)? else {
            return Ok(None);
        };
        let step = ((t / maturity) * steps as Real).ceil() as Size;
        let step = step.clamp(1, steps);
        debug!(t, maturity, steps, step, "dividend step resolved");
        Ok(Some(step))
    }
}
