//! # tl-instruments
//!
//! The vanilla option contract priced by the lattice, its payoff and
//! exercise style, and the `PricingEngine` interface engines implement.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use exercise::ExerciseType;
pub use instrument::{PricingEngine, PricingResults};
pub use option::OptionContract;
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
