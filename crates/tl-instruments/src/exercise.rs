//! Option exercise styles.
//!
//! The lattice only needs to know whether early exercise is allowed at every
//! step, so the exercise is a plain style tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tl_core::Error;

/// Type of exercise right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    /// Can only be exercised at expiry.
    European,
    /// Can be exercised at any time up to expiry.
    American,
}

impl ExerciseType {
    /// `true` if the holder may exercise before expiry.
    pub fn allows_early_exercise(self) -> bool {
        matches!(self, ExerciseType::American)
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseType::European => write!(f, "european"),
            ExerciseType::American => write!(f, "american"),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(ExerciseType::European),
            "american" => Ok(ExerciseType::American),
            other => Err(Error::InvalidParameter(format!(
                "exercise style must be 'european' or 'american', got {other:?}"
            ))),
        }
    }
}
