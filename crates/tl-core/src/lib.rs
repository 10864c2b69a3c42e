//! # tl-core
//!
//! Core types, error definitions, and settings for trilattice.
//!
//! This crate provides the building blocks shared across the other crates in
//! the workspace: primitive type aliases, the error taxonomy with its
//! `ensure!` / `ensure_sane!` / `date_fail!` macros, and [`LatticeSettings`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_sane!` / `date_fail!` macros.
pub mod errors;

/// Lattice configuration (step count, pruning threshold, tolerances).
pub mod settings;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A probability in [0, 1].
pub type Probability = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use settings::LatticeSettings;
