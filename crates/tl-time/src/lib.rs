//! # tl-time
//!
//! Calendar dates and day-count conventions used to turn contract dates into
//! year fractions.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Date` type.
pub mod date;

/// `DayCounter` trait and the Actual/365 (Fixed) convention.
pub mod day_counter;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use date::Date;
pub use day_counter::{Actual365Fixed, DayCounter};
