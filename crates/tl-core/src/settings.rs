//! Lattice settings.
//!
//! [`LatticeSettings`] gathers the knobs of a pricing run: the step count,
//! the pruning threshold, the numerical tolerances, and whether the pricing
//! facade may fall back to lower thresholds after a pruning collapse.
//!
//! Settings are plain values. There is no process-wide instance; every
//! pricing request carries its own copy, so repeated pricing with perturbed
//! inputs never shares state.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::{ensure, Probability, Real, Size};

/// Configuration of a trinomial lattice build.
///
/// Deserialises from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeSettings {
    /// Number of time steps `N`.
    pub steps: Size,
    /// Cumulative-probability threshold `θ` below which nodes are not expanded.
    pub pruning_threshold: Probability,
    /// Relative tolerance under which two node values are the same node.
    pub recombination_tolerance: Real,
    /// Slack allowed outside `[0, 1]` before probabilities count as degenerate.
    pub probability_tolerance: Real,
    /// Retry with halved, then zero, threshold after a pruning collapse.
    pub fallback: bool,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            steps: 100,
            pruning_threshold: 0.0,
            recombination_tolerance: 1e-8,
            probability_tolerance: 1e-9,
            fallback: true,
        }
    }
}

impl LatticeSettings {
    /// Default settings with `steps` time steps.
    pub fn with_steps(steps: Size) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Replace the pruning threshold.
    pub fn pruning_threshold(mut self, threshold: Probability) -> Self {
        self.pruning_threshold = threshold;
        self
    }

    /// Enable or disable the facade fallback policy.
    pub fn fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.steps > 0, "steps must be > 0, got {}", self.steps);
        validate_threshold(self.pruning_threshold)?;
        ensure!(
            self.recombination_tolerance.is_finite() && self.recombination_tolerance > 0.0,
            "recombination tolerance must be > 0, got {}",
            self.recombination_tolerance
        );
        ensure!(
            self.probability_tolerance.is_finite() && self.probability_tolerance >= 0.0,
            "probability tolerance must be >= 0, got {}",
            self.probability_tolerance
        );
        Ok(())
    }
}

/// Check that a pruning threshold lies in `[0, 1)`.
pub fn validate_threshold(threshold: Probability) -> Result<()> {
    ensure!(
        (0.0..1.0).contains(&threshold),
        "pruning threshold must lie in [0, 1), got {threshold}"
    );
    Ok(())
}
