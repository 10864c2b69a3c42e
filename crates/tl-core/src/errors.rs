//! Error types for trilattice.
//!
//! A single `thiserror`-derived enum covers every failure the pricer can
//! report. Parameter checks go through [`ensure!`](crate::ensure), numerical
//! sanity checks through [`ensure_sane!`](crate::ensure_sane), and date
//! failures through [`date_fail!`](crate::date_fail).

use thiserror::Error;

/// The top-level error type used throughout trilattice.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A market, contract, or lattice parameter is outside its domain.
    ///
    /// Raised before a lattice is ever constructed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A date string could not be parsed, or a date pair is inverted.
    #[error("date resolution error: {0}")]
    DateResolution(String),

    /// Pruning removed every node needed to finish backward induction.
    ///
    /// Recoverable: retry with a lower threshold.
    #[error("pruning collapse at step {step} with threshold {threshold}")]
    PruningCollapse {
        /// First step whose valuation could not be completed.
        step: usize,
        /// Pruning threshold in force when the collapse happened.
        threshold: f64,
    },

    /// The moment-matching scheme is not well-posed for these parameters.
    #[error("numerical degeneracy: {0}")]
    NumericalDegeneracy(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },
}

impl Error {
    /// `true` for errors the pricing facade may recover from by retrying
    /// with a lower pruning threshold.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::PruningCollapse { .. })
    }
}

/// Shorthand `Result` type used throughout trilattice.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parameter precondition.
///
/// Returns `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tl_core::{ensure, errors::Error};
/// fn positive(x: f64) -> tl_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidParameter(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}

/// Numerical sanity postcondition.
///
/// Returns `Err(Error::NumericalDegeneracy(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use tl_core::{ensure_sane, errors::Error};
/// fn spacing(x: f64) -> tl_core::errors::Result<f64> {
///     let alpha = x.exp();
///     ensure_sane!(alpha.is_finite() && alpha > 1.0, "alpha = {alpha}");
///     Ok(alpha)
/// }
/// assert!(spacing(0.1).is_ok());
/// assert!(matches!(spacing(0.0), Err(Error::NumericalDegeneracy(_))));
/// ```
#[macro_export]
macro_rules! ensure_sane {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::NumericalDegeneracy(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::DateResolution(...))` immediately.
///
/// # Example
/// ```
/// use tl_core::{date_fail, errors::Error};
/// fn parse(_s: &str) -> tl_core::errors::Result<()> {
///     date_fail!("cannot parse {_s:?}");
/// }
/// assert!(matches!(parse("x"), Err(Error::DateResolution(_))));
/// ```
#[macro_export]
macro_rules! date_fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::DateResolution(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_collapse_is_recoverable() {
        let collapse = Error::PruningCollapse {
            step: 3,
            threshold: 0.5,
        };
        assert!(collapse.is_recoverable());
        assert!(!Error::InvalidParameter("spot".into()).is_recoverable());
        assert!(!Error::NumericalDegeneracy("alpha".into()).is_recoverable());
    }

    #[test]
    fn messages_name_the_failure() {
        let e = Error::PruningCollapse {
            step: 2,
            threshold: 0.99,
        };
        assert_eq!(e.to_string(), "pruning collapse at step 2 with threshold 0.99");
        let e = Error::InvalidParameter("spot must be > 0".into());
        assert_eq!(e.to_string(), "invalid parameter: spot must be > 0");
    }
}
