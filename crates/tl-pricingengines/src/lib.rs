//! # tl-pricingengines
//!
//! Pricing engines for vanilla options.
//!
//! ## Engines
//!
//! - [`TrinomialEngine`]: trinomial lattice with pruning fallback and an
//!   analytic comparison in its report
//! - [`AnalyticEuropeanEngine`]: Black-Scholes closed form for European
//!   options without dividends

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod trinomial_engine;

pub use analytic_european_engine::{black_scholes, AnalyticEuropeanEngine};
pub use trinomial_engine::{AttemptOutcome, FallbackAttempt, LatticePricing, TrinomialEngine};
