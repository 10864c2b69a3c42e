//! # tl-processes
//!
//! Risk-neutral description of the underlying: a geometric diffusion with
//! constant rate and volatility, plus at most one discrete dividend.
//!
//! * [`MarketData`]: spot, rate, volatility, optional dividend
//! * [`Dividend`]: cash or proportional amount with a year-fraction or
//!   ex-date timing

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Discrete dividend amount and timing.
pub mod dividend;

/// Immutable market parameters.
pub mod market_data;

pub use dividend::{Dividend, DividendAmount, DividendTiming, MAX_CASH_FRACTION};
pub use market_data::MarketData;
