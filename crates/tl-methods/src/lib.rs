//! # tl-methods
//!
//! Numerical methods: the recombining trinomial lattice with pruning and a
//! discrete dividend, and the time grid it is built on.
//!
//! # Modules
//!
//! * [`lattice`]: lattice nodes, forward construction and backward induction

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: trinomial lattice, nodes, time grid.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    Branches, LatticeNode, NodeSnapshot, NodeState, TimeGrid, TrinomialLattice, DOWN, MID, UP,
};
