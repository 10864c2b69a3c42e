//! Lattice nodes.
//!
//! Nodes live in per-step arenas owned by the lattice and refer to each other
//! by index only. Branch slots follow the usual trinomial convention:
//! 0 = down, 1 = mid, 2 = up.

use serde::{Deserialize, Serialize};
use tl_core::{Probability, Real, Size};

/// Branch index of the down move.
pub const DOWN: usize = 0;
/// Branch index of the middle move.
pub const MID: usize = 1;
/// Branch index of the up move.
pub const UP: usize = 2;

/// Lifecycle state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Expanded into three children.
    Trinomial,
    /// Pruned, continues through its mid branch only with probability 1.
    Monomial,
    /// Pruned with nothing left to continue into.
    Pruned,
    /// Node of the final step.
    Terminal,
}

/// A single node of a trinomial lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeNode {
    pub(crate) value: Real,
    pub(crate) step: Size,
    pub(crate) index: Size,
    pub(crate) state: NodeState,
    pub(crate) forward: [Option<Size>; 3],
    pub(crate) probabilities: [Probability; 3],
    pub(crate) cum_prob: Probability,
    pub(crate) backward: Option<Size>,
    pub(crate) valuation: Option<Real>,
}

impl LatticeNode {
    pub(crate) fn new(step: Size, value: Real) -> Self {
        Self {
            value,
            step,
            index: 0,
            state: NodeState::Trinomial,
            forward: [None; 3],
            probabilities: [0.0; 3],
            cum_prob: 0.0,
            backward: None,
            valuation: None,
        }
    }

    /// Underlying value at this node.
    pub fn value(&self) -> Real {
        self.value
    }

    /// Time step of the node.
    pub fn step(&self) -> Size {
        self.step
    }

    /// Position of the node in its value-sorted level.
    pub fn index(&self) -> Size {
        self.index
    }

    /// Stable textual identifier, `node_{step}_{index}`.
    pub fn id(&self) -> String {
        node_id(self.step, self.index)
    }

    /// Lifecycle state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Index of the child reached through `branch` in the next level.
    pub fn forward(&self, branch: usize) -> Option<Size> {
        self.forward.get(branch).copied().flatten()
    }

    /// Transition probability of `branch`.
    pub fn probability(&self, branch: usize) -> Probability {
        self.probabilities.get(branch).copied().unwrap_or(0.0)
    }

    /// Probability of reaching this node from the root through expanded
    /// parents.
    pub fn cum_prob(&self) -> Probability {
        self.cum_prob
    }

    /// First parent that reached this node through its mid branch.
    pub fn backward(&self) -> Option<Size> {
        self.backward
    }

    /// Option value at this node, once backward induction has run.
    pub fn valuation(&self) -> Option<Real> {
        self.valuation
    }

    /// Down sibling: the adjacent lower node of the same level.
    pub fn sibling_down(&self) -> Option<Size> {
        self.index.checked_sub(1)
    }

    /// Up sibling index, if the level of size `level_size` has one.
    pub fn sibling_up(&self, level_size: Size) -> Option<Size> {
        (self.index + 1 < level_size).then_some(self.index + 1)
    }
}

pub(crate) fn node_id(step: Size, index: Size) -> String {
    format!("node_{step}_{index}")
}

/// Per-branch values keyed by direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branches<T> {
    /// Up move.
    pub up: T,
    /// Middle move.
    pub mid: T,
    /// Down move.
    pub down: T,
}

/// Serialisable view of one node, for export and inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// `node_{step}_{index}`.
    pub id: String,
    /// Time step.
    pub step: Size,
    /// Index in the value-sorted level.
    pub index: Size,
    /// Underlying value.
    pub value: Real,
    /// Option value, when priced.
    pub valuation: Option<Real>,
    /// Cumulative reachability probability.
    pub cum_prob: Probability,
    /// Lifecycle state.
    pub state: NodeState,
    /// Transition probabilities.
    pub probabilities: Branches<Probability>,
    /// Identifiers of the children.
    pub forward: Branches<Option<String>>,
    /// Identifier of the first mid-branch parent.
    pub backward: Option<String>,
}

impl From<&LatticeNode> for NodeSnapshot {
    fn from(node: &LatticeNode) -> Self {
        let child = |branch: usize| node.forward(branch).map(|j| node_id(node.step + 1, j));
        Self {
            id: node.id(),
            step: node.step,
            index: node.index,
            value: node.value,
            valuation: node.valuation,
            cum_prob: node.cum_prob,
            state: node.state,
            probabilities: Branches {
                up: node.probability(UP),
                mid: node.probability(MID),
                down: node.probability(DOWN),
            },
            forward: Branches {
                up: child(UP),
                mid: child(MID),
                down: child(DOWN),
            },
            backward: node
                .backward
                .and_then(|j| node.step.checked_sub(1).map(|s| node_id(s, j))),
        }
    }
}
