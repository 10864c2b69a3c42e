//! # trilattice
//!
//! Vanilla option pricing on a recombining trinomial lattice, with adaptive
//! pruning of low-probability branches and a single discrete dividend.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `tl-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! trilattice = "0.1"
//! ```
//!
//! ```rust
//! use trilattice::core::LatticeSettings;
//! use trilattice::instruments::{OptionContract, OptionType};
//! use trilattice::pricingengines::TrinomialEngine;
//! use trilattice::processes::MarketData;
//!
//! let market = MarketData::new(100.0, 0.05, 0.2).unwrap();
//! let put = OptionContract::american(OptionType::Put, 102.0, 0.25).unwrap();
//! let settings = LatticeSettings::with_steps(100).pruning_threshold(1e-6);
//! let engine = TrinomialEngine::new(market, settings).unwrap();
//! let report = engine.price_with_fallback(&put).unwrap();
//! assert!((report.price - 4.534).abs() < 0.01);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, error definitions, and settings.
pub use tl_core as core;

/// Dates and day counters.
pub use tl_time as time;

/// Market data and dividends.
pub use tl_processes as processes;

/// Option contracts, payoffs, and the pricing engine interface.
pub use tl_instruments as instruments;

/// The trinomial lattice.
pub use tl_methods as methods;

/// Pricing engines.
pub use tl_pricingengines as pricingengines;
