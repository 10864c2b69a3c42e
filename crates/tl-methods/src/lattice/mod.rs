//! Lattice methods for option pricing.
//!
//! # Overview
//!
//! * [`TrinomialLattice`]: recombining trinomial lattice on a geometric
//!   diffusion, with pruning and one discrete dividend
//! * [`LatticeNode`] / [`NodeState`]: arena nodes and their lifecycle
//! * [`NodeSnapshot`]: serialisable node view for export
//! * [`TimeGrid`]: grid of time points used by the lattice

pub mod node;
pub mod trinomial_lattice;

pub use node::{Branches, LatticeNode, NodeSnapshot, NodeState, DOWN, MID, UP};
pub use trinomial_lattice::TrinomialLattice;

use tl_core::{ensure, errors::Result, Real, Size, Time};

// ─── TimeGrid ─────────────────────────────────────────────────────────────────

/// A grid of time points used by lattice methods.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    dts: Vec<Time>,
}

impl TimeGrid {
    /// Create a uniform time grid from 0 to `end` with `steps` intervals.
    pub fn uniform(end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0, "steps must be > 0");
        ensure!(end.is_finite() && end > 0.0, "grid end must be > 0, got {end}");
        let dt = end / steps as Real;
        Ok(Self {
            dts: vec![dt; steps],
        })
    }

    /// Number of steps (= time points − 1).
    pub fn steps(&self) -> usize {
        self.dts.len()
    }

    /// Time step between index `i` and `i+1`.
    pub fn dt(&self, i: usize) -> Time {
        self.dts[i]
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
