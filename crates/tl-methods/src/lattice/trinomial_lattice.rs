//! Recombining trinomial lattice for vanilla options.
//!
//! The underlying follows a risk-neutral geometric diffusion. Node values sit
//! on the multiplicative grid `S0 · e^{r·s·Δt} · α^k` with spacing
//! `α = exp(σ √(3Δt))`, and every expanded node branches to `mid / α`, `mid`
//! and `mid · α`. Transition probabilities match the first two moments of the
//! one-step distribution.
//!
//! Two features bend the plain scheme:
//!
//! * **Pruning.** A node whose cumulative reachability falls below the
//!   threshold `θ` is not expanded. It continues through a single branch into
//!   the nearest existing node of the next step with probability one. When a
//!   whole level is pruned the lattice records a collapse and pricing fails
//!   with [`Error::PruningCollapse`].
//! * **Discrete dividend.** On the transition into the dividend step the
//!   dividend is taken out of the expected value, and the mid branch snaps to
//!   the grid node nearest to it, so levels keep recombining. The variance is
//!   taken around the ex-dividend expectation. Cash never takes more than
//!   [`MAX_CASH_FRACTION`] of a node's value. Once the lattice is built the
//!   values of the dividend step are relabelled ex-dividend.
//!
//! [`MAX_CASH_FRACTION`]: tl_processes::MAX_CASH_FRACTION
//!
//! # Example
//!
//! ```
//! use tl_instruments::{OptionContract, OptionType};
//! use tl_methods::TrinomialLattice;
//! use tl_processes::MarketData;
//!
//! let market = MarketData::new(100.0, 0.05, 0.2).unwrap();
//! let call = OptionContract::european(OptionType::Call, 102.0, 0.25).unwrap();
//! let mut lattice = TrinomialLattice::new(&market, &call, 100, 0.0).unwrap();
//! let price = lattice.price().unwrap();
//! assert!((price - 3.6466).abs() < 0.01);
//! assert_eq!(lattice.node_count(), 101 * 101);
//! ```

use super::node::{LatticeNode, NodeSnapshot, NodeState, DOWN, MID, UP};
use super::TimeGrid;
use tl_core::errors::{Error, Result};
use tl_core::{ensure_sane, LatticeSettings, Probability, Real, Size, Time};
use tl_instruments::OptionContract;
use tl_processes::{DividendAmount, MarketData};
use tracing::{debug, info};

/// A recombining trinomial lattice built for one contract.
///
/// Levels are stored as value-sorted `Vec`s, one per time step; nodes refer
/// to their children by index into the next level.
#[derive(Debug, Clone)]
pub struct TrinomialLattice {
    levels: Vec<Vec<LatticeNode>>,
    grid: TimeGrid,
    alpha: Real,
    threshold: Probability,
    market: MarketData,
    contract: OptionContract,
    dividend: Option<(Size, DividendAmount)>,
    collapsed_at: Option<Size>,
}

impl TrinomialLattice {
    /// Build a lattice with `steps` time steps and pruning threshold
    /// `threshold`, default tolerances otherwise.
    pub fn new(
        market: &MarketData,
        contract: &OptionContract,
        steps: Size,
        threshold: Probability,
    ) -> Result<Self> {
        let settings = LatticeSettings::with_steps(steps).pruning_threshold(threshold);
        Self::with_settings(market, contract, &settings)
    }

    /// Build a lattice from explicit settings.
    ///
    /// # Errors
    /// * `InvalidParameter` for settings outside their domain.
    /// * `DateResolution` when an ex-dividend date cannot be resolved.
    /// * `NumericalDegeneracy` when the moment matching is not well-posed.
    pub fn with_settings(
        market: &MarketData,
        contract: &OptionContract,
        settings: &LatticeSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let steps = settings.steps;
        let grid = TimeGrid::uniform(contract.maturity(), steps)?;
        let dt = grid.dt(0);
        let alpha = (market.volatility() * (3.0 * dt).sqrt()).exp();
        ensure_sane!(
            alpha.is_finite() && alpha > 1.0,
            "lattice spacing alpha = {alpha} for dt = {dt}"
        );

        let dividend = match market.dividend() {
            Some(d) => d
                .step_index(contract.start_date(), contract.maturity(), steps)?
                .map(|step| (step, d.amount())),
            None => None,
        };

        let mut lattice = Self {
            levels: Vec::with_capacity(steps + 1),
            grid,
            alpha,
            threshold: settings.pruning_threshold,
            market: *market,
            contract: *contract,
            dividend,
            collapsed_at: None,
        };
        lattice.build(settings)?;
        Ok(lattice)
    }

    // ── Forward construction ─────────────────────────────────────────────────

    fn build(&mut self, settings: &LatticeSettings) -> Result<()> {
        let steps = self.steps();
        let dt = self.dt();
        let growth = self.market.growth(dt);
        let ln_alpha = self.alpha.ln();
        let tolerance = settings.probability_tolerance;

        let mut root = LatticeNode::new(0, self.market.spot());
        root.cum_prob = 1.0;
        self.levels.push(vec![root]);

        for s in 0..steps {
            let paying = self
                .dividend
                .filter(|&(step, _)| step == s + 1)
                .map(|(_, amount)| amount);
            let mut next = LevelBuilder::new(s + 1, settings.recombination_tolerance);
            let mut pruned = Vec::new();

            for j in 0..self.levels[s].len() {
                let (value, cum_prob) = {
                    let node = &self.levels[s][j];
                    (node.value, node.cum_prob)
                };
                if self.threshold > 0.0 && cum_prob < self.threshold {
                    pruned.push(j);
                    continue;
                }

                let forward = value * growth;
                let expected = paying.map_or(forward, |amount| amount.ex_dividend(forward));
                ensure_sane!(
                    expected.is_finite() && expected > 0.0,
                    "expected value {expected} is not positive at step {s}, node value {value}"
                );
                let shift = match paying {
                    Some(_) => ((expected / forward).ln() / ln_alpha).round() as i32,
                    None => 0,
                };
                let mid = forward * self.alpha.powi(shift);
                let variance = self.market.step_variance(expected, dt);
                let probabilities = match_moments(expected, mid, variance, self.alpha);
                for p in probabilities {
                    ensure_sane!(
                        p.is_finite() && p >= -tolerance && p <= 1.0 + tolerance,
                        "transition probability {p} outside [0, 1] at step {s}, node value {value}"
                    );
                }

                let mut children = [0; 3];
                children[DOWN] = next.find_or_insert(mid / self.alpha);
                children[MID] = next.find_or_insert(mid);
                children[UP] = next.find_or_insert(mid * self.alpha);
                for (&child, &p) in children.iter().zip(&probabilities) {
                    next.nodes[child].cum_prob += cum_prob * p;
                }
                next.link_backward(children[MID], j);

                let node = &mut self.levels[s][j];
                node.state = NodeState::Trinomial;
                node.forward = children.map(Some);
                node.probabilities = probabilities;
            }

            if next.is_empty() {
                for &j in &pruned {
                    self.levels[s][j].state = NodeState::Pruned;
                }
                debug!(step = s + 1, threshold = self.threshold, "every node pruned, lattice collapsed");
                self.collapsed_at = Some(s + 1);
                break;
            }

            for &j in &pruned {
                let forward = self.levels[s][j].value * growth;
                let target = next.nearest(forward);
                if let Some(target) = target {
                    next.link_backward(target, j);
                }
                let node = &mut self.levels[s][j];
                node.state = NodeState::Monomial;
                node.forward = [None, target, None];
                node.probabilities = [0.0, 1.0, 0.0];
            }

            let (level, remap) = next.finish();
            for node in self.levels[s].iter_mut() {
                for slot in node.forward.iter_mut() {
                    *slot = slot.map(|i| remap[i]);
                }
            }
            debug!(step = s + 1, size = level.len(), monomial = pruned.len(), "level built");
            self.levels.push(level);
        }

        // Collapsed lattices keep their full step count with empty levels.
        self.levels.resize_with(steps + 1, Vec::new);
        for node in self.levels[steps].iter_mut() {
            node.state = NodeState::Terminal;
        }

        if let Some((step, amount)) = self.dividend {
            for node in self.levels[step].iter_mut() {
                node.value = amount.ex_dividend(node.value);
            }
        }

        info!(
            steps,
            nodes = self.node_count(),
            alpha = self.alpha,
            threshold = self.threshold,
            dividend_step = ?self.dividend_step(),
            collapsed_at = ?self.collapsed_at,
            "trinomial lattice built"
        );
        Ok(())
    }

    // ── Backward induction ───────────────────────────────────────────────────

    /// Value the contract by backward induction and return the root value.
    ///
    /// Pricing the same lattice again recomputes the same valuations.
    ///
    /// # Errors
    /// `PruningCollapse` when pruning left a level without continuation.
    pub fn price(&mut self) -> Result<Real> {
        let threshold = self.threshold;
        if let Some(step) = self.collapsed_at {
            return Err(Error::PruningCollapse { step, threshold });
        }

        let steps = self.steps();
        let discount = self.market.discount(self.dt());
        let contract = self.contract;
        let american = contract.is_american();

        for node in self.levels[steps].iter_mut() {
            node.valuation = Some(contract.intrinsic(node.value));
        }

        for s in (0..steps).rev() {
            let (head, tail) = self.levels.split_at_mut(s + 1);
            let children = &tail[0];
            for node in head[s].iter_mut() {
                if node.state == NodeState::Pruned {
                    return Err(Error::PruningCollapse { step: s + 1, threshold });
                }
                let mut continuation = 0.0;
                for branch in [DOWN, MID, UP] {
                    let Some(child) = node.forward[branch] else {
                        continue;
                    };
                    let Some(value) = children.get(child).and_then(|c| c.valuation) else {
                        return Err(Error::PruningCollapse { step: s + 1, threshold });
                    };
                    continuation += node.probabilities[branch] * value;
                }
                continuation *= discount;
                node.valuation = Some(if american {
                    continuation.max(contract.intrinsic(node.value))
                } else {
                    continuation
                });
            }
        }

        let price = self.levels[0]
            .first()
            .and_then(LatticeNode::valuation)
            .ok_or(Error::PruningCollapse { step: 0, threshold })?;
        info!(price, steps, threshold, "lattice priced");
        Ok(price)
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.grid.steps()
    }

    /// Uniform time step `Δt`.
    pub fn dt(&self) -> Time {
        self.grid.dt(0)
    }

    /// The time grid.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Multiplicative grid spacing `α`.
    pub fn alpha(&self) -> Real {
        self.alpha
    }

    /// Pruning threshold the lattice was built with.
    pub fn threshold(&self) -> Probability {
        self.threshold
    }

    /// Step at which the dividend is paid, if any.
    pub fn dividend_step(&self) -> Option<Size> {
        self.dividend.map(|(step, _)| step)
    }

    /// First step left without nodes by pruning, if any.
    pub fn collapsed_at(&self) -> Option<Size> {
        self.collapsed_at
    }

    /// Number of nodes at time step `i` (0 past the end).
    pub fn size(&self, i: Size) -> Size {
        self.levels.get(i).map_or(0, Vec::len)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> Size {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Nodes of step `i`, value-sorted ascending.
    pub fn level(&self, i: Size) -> &[LatticeNode] {
        self.levels.get(i).map_or(&[], Vec::as_slice)
    }

    /// Node `j` of step `i`.
    pub fn node(&self, i: Size, j: Size) -> Result<&LatticeNode> {
        let level = self.levels.get(i).ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.levels.len(),
        })?;
        level.get(j).ok_or(Error::IndexOutOfRange {
            index: j,
            size: level.len(),
        })
    }

    /// Underlying value at node `(i, j)`.
    ///
    /// # Panics
    /// If `(i, j)` is not a node; see [`node`](Self::node) for a checked
    /// lookup.
    pub fn underlying(&self, i: Size, j: Size) -> Real {
        self.levels[i][j].value
    }

    /// Index at step `i + 1` of the child of node `(i, j)` along `branch`
    /// (0 = down, 1 = mid, 2 = up).
    ///
    /// # Panics
    /// If `(i, j)` is not a node.
    pub fn descendant(&self, i: Size, j: Size, branch: usize) -> Option<Size> {
        self.levels[i][j].forward(branch)
    }

    /// Transition probability of node `(i, j)` along `branch`.
    ///
    /// # Panics
    /// If `(i, j)` is not a node.
    pub fn probability(&self, i: Size, j: Size, branch: usize) -> Probability {
        self.levels[i][j].probability(branch)
    }

    /// Serialisable view of every node, ordered by step then value.
    pub fn snapshots(&self) -> Vec<NodeSnapshot> {
        self.levels
            .iter()
            .flatten()
            .map(NodeSnapshot::from)
            .collect()
    }
}

// ── Moment matching ──────────────────────────────────────────────────────────

/// Branch probabilities `[down, mid, up]` over `mid / α`, `mid`, `mid · α`
/// matching mean `expected` and variance `variance`.
fn match_moments(expected: Real, mid: Real, variance: Real, alpha: Real) -> [Probability; 3] {
    let drift = expected / mid - 1.0;
    let second = (variance + expected * expected) / (mid * mid);
    let p_down =
        (second - 1.0 - (alpha + 1.0) * drift) / ((1.0 - alpha) * (alpha.powi(-2) - 1.0));
    let p_up = (drift - (alpha.recip() - 1.0) * p_down) / (alpha - 1.0);
    let p_mid = 1.0 - p_up - p_down;
    [p_down, p_mid, p_up]
}

// ── Level builder ────────────────────────────────────────────────────────────

/// A level under construction, with a value-sorted index for lookups.
struct LevelBuilder {
    step: Size,
    tolerance: Real,
    nodes: Vec<LatticeNode>,
    order: Vec<Size>,
}

impl LevelBuilder {
    fn new(step: Size, tolerance: Real) -> Self {
        Self {
            step,
            tolerance,
            nodes: Vec::new(),
            order: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First position in `order` whose value is not below `value`.
    fn position(&self, value: Real) -> usize {
        self.order.partition_point(|&i| self.nodes[i].value < value)
    }

    fn neighbours(&self, value: Real) -> impl Iterator<Item = Size> + '_ {
        let pos = self.position(value);
        [pos.checked_sub(1), Some(pos)]
            .into_iter()
            .flatten()
            .filter_map(move |p| self.order.get(p).copied())
    }

    fn find(&self, value: Real) -> Option<Size> {
        self.neighbours(value).find(|&i| {
            let other = self.nodes[i].value;
            (other - value).abs() <= self.tolerance * other.abs().max(value.abs()).max(1.0)
        })
    }

    fn find_or_insert(&mut self, value: Real) -> Size {
        if let Some(i) = self.find(value) {
            return i;
        }
        let pos = self.position(value);
        let i = self.nodes.len();
        self.nodes.push(LatticeNode::new(self.step, value));
        self.order.insert(pos, i);
        i
    }

    fn nearest(&self, value: Real) -> Option<Size> {
        self.neighbours(value).min_by(|&a, &b| {
            let da = (self.nodes[a].value - value).abs();
            let db = (self.nodes[b].value - value).abs();
            da.total_cmp(&db)
        })
    }

    fn link_backward(&mut self, child: Size, parent: Size) {
        let node = &mut self.nodes[child];
        if node.backward.is_none() {
            node.backward = Some(parent);
        }
    }

    /// Sorted level and the map from insertion index to sorted index.
    fn finish(self) -> (Vec<LatticeNode>, Vec<Size>) {
        let mut remap = vec![0; self.nodes.len()];
        let level = self
            .order
            .iter()
            .enumerate()
            .map(|(sorted, &i)| {
                remap[i] = sorted;
                LatticeNode {
                    index: sorted,
                    ..self.nodes[i]
                }
            })
            .collect();
        (level, remap)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tl_instruments::OptionType;
    use tl_processes::{Dividend, DividendTiming};

    fn market() -> MarketData {
        MarketData::new(100.0, 0.05, 0.2).unwrap()
    }

    fn call() -> OptionContract {
        OptionContract::european(OptionType::Call, 102.0, 0.25).unwrap()
    }

    #[test]
    fn unpruned_levels_grow_by_two() {
        let lattice = TrinomialLattice::new(&market(), &call(), 10, 0.0).unwrap();
        for s in 0..=10 {
            assert_eq!(lattice.size(s), 2 * s + 1);
        }
        assert_eq!(lattice.node_count(), 121);
        assert_eq!(lattice.collapsed_at(), None);
        assert_eq!(lattice.dividend_step(), None);
    }

    #[test]
    fn levels_are_sorted_and_recombine() {
        let lattice = TrinomialLattice::new(&market(), &call(), 8, 0.0).unwrap();
        for s in 0..8 {
            let level = lattice.level(s);
            for w in level.windows(2) {
                assert!(w[0].value() < w[1].value());
            }
            for j in 0..level.len() {
                let down = lattice.descendant(s, j, DOWN).unwrap();
                let mid = lattice.descendant(s, j, MID).unwrap();
                let up = lattice.descendant(s, j, UP).unwrap();
                assert_eq!(mid, down + 1);
                assert_eq!(up, mid + 1);
                if j + 1 < level.len() {
                    assert_eq!(lattice.descendant(s, j + 1, MID), Some(up));
                }
                let forward = lattice.underlying(s, j) * market().growth(lattice.dt());
                assert_abs_diff_eq!(lattice.underlying(s + 1, mid), forward, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn probabilities_are_normalised() {
        let lattice = TrinomialLattice::new(&market(), &call(), 20, 0.0).unwrap();
        for s in 0..20 {
            for j in 0..lattice.size(s) {
                let p: Vec<Real> = (0..3).map(|b| lattice.probability(s, j, b)).collect();
                assert_abs_diff_eq!(p.iter().sum::<Real>(), 1.0, epsilon = 1e-12);
                assert!(p.iter().all(|&x| x > 0.0 && x < 1.0));
            }
        }
    }

    #[test]
    fn spacing_matches_volatility() {
        let lattice = TrinomialLattice::new(&market(), &call(), 25, 0.0).unwrap();
        assert_abs_diff_eq!(lattice.dt(), 0.01, epsilon = 1e-15);
        assert_eq!(lattice.time_grid().steps(), 25);
        assert_abs_diff_eq!(lattice.alpha(), (0.2 * 0.03_f64.sqrt()).exp(), epsilon = 1e-15);
    }

    #[test]
    fn prices_near_black_scholes() {
        let mut lattice = TrinomialLattice::new(&market(), &call(), 100, 0.0).unwrap();
        let price = lattice.price().unwrap();
        assert_abs_diff_eq!(price, 3.6512, epsilon = 1e-3);
        // Idempotent
        assert_eq!(lattice.price().unwrap(), price);
    }

    #[test]
    fn terminal_values_are_payoffs() {
        let mut lattice = TrinomialLattice::new(&market(), &call(), 30, 0.0).unwrap();
        lattice.price().unwrap();
        for node in lattice.level(30) {
            assert_eq!(node.state(), NodeState::Terminal);
            assert_eq!(node.valuation(), Some((node.value() - 102.0).max(0.0)));
        }
    }

    #[test]
    fn mild_pruning_keeps_price() {
        let mut full = TrinomialLattice::new(&market(), &call(), 100, 0.0).unwrap();
        let mut pruned = TrinomialLattice::new(&market(), &call(), 100, 1e-4).unwrap();
        assert!(pruned.node_count() < full.node_count());
        assert!(pruned
            .level(50)
            .iter()
            .any(|n| n.state() == NodeState::Trinomial));
        let diff = (pruned.price().unwrap() - full.price().unwrap()).abs();
        assert!(diff < 1e-3, "diff = {diff}");
    }

    #[test]
    fn monomial_nodes_continue_through_mid() {
        let lattice = TrinomialLattice::new(&market(), &call(), 60, 1e-3).unwrap();
        let mut seen = 0;
        for s in 0..60 {
            for node in lattice.level(s) {
                if node.state() == NodeState::Monomial {
                    seen += 1;
                    assert_eq!(node.forward(UP), None);
                    assert_eq!(node.forward(DOWN), None);
                    assert!(node.forward(MID).is_some());
                    assert_eq!(node.probability(MID), 1.0);
                }
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn heavy_pruning_collapses() {
        let mut lattice = TrinomialLattice::new(&market(), &call(), 50, 0.99).unwrap();
        assert_eq!(lattice.size(0), 1);
        assert_eq!(lattice.size(1), 3);
        assert_eq!(lattice.size(2), 0);
        assert_eq!(lattice.collapsed_at(), Some(2));
        assert_eq!(lattice.steps(), 50);
        assert!(lattice
            .level(1)
            .iter()
            .all(|n| n.state() == NodeState::Pruned));
        match lattice.price() {
            Err(Error::PruningCollapse { step, threshold }) => {
                assert_eq!(step, 2);
                assert_abs_diff_eq!(threshold, 0.99);
            }
            other => panic!("expected collapse, got {other:?}"),
        }
    }

    #[test]
    fn dividend_lowers_call_and_relabels_step() {
        let contract = OptionContract::european(OptionType::Call, 102.0, 1.0).unwrap();
        let div = Dividend::cash(1.0, DividendTiming::YearFraction(0.5)).unwrap();
        let plain = market();
        let paying = plain.with_dividend(div);

        let mut without = TrinomialLattice::new(&plain, &contract, 100, 0.0).unwrap();
        let mut with = TrinomialLattice::new(&paying, &contract, 100, 0.0).unwrap();
        assert_eq!(with.dividend_step(), Some(50));
        assert!(with.price().unwrap() < without.price().unwrap());

        // Relabelled values sit one dividend below the grid they were built on.
        let grid_value = with.underlying(50, 0) + 1.0;
        let ratio = (grid_value / 100.0).ln() - 50.0 * 0.05 * with.dt();
        let k = ratio / with.alpha().ln();
        assert_abs_diff_eq!(k, k.round(), epsilon = 1e-6);
    }

    #[test]
    fn oversized_dividend_is_capped() {
        let div = Dividend::cash(150.0, DividendTiming::YearFraction(0.1)).unwrap();
        let paying = market().with_dividend(div);
        let contract = OptionContract::european(OptionType::Put, 100.0, 1.0).unwrap();
        let mut lattice = TrinomialLattice::new(&paying, &contract, 10, 0.0).unwrap();
        assert_eq!(lattice.dividend_step(), Some(1));
        assert!(lattice.level(1).iter().all(|n| n.value() > 0.0));
        for j in 0..lattice.size(0) {
            for b in [DOWN, MID, UP] {
                assert!(lattice.probability(0, j, b) > 0.0);
            }
        }
        let plain = TrinomialLattice::new(&market(), &contract, 10, 0.0)
            .unwrap()
            .price()
            .unwrap();
        assert!(lattice.price().unwrap() > plain);
    }

    #[test]
    fn excessive_step_variance_is_degenerate() {
        // σ²·Δt = 4 leaves no room for a positive mid probability.
        let wild = MarketData::new(100.0, 0.05, 2.0).unwrap();
        let contract = OptionContract::european(OptionType::Put, 100.0, 1.0).unwrap();
        let err = TrinomialLattice::new(&wild, &contract, 1, 0.0).unwrap_err();
        assert!(matches!(err, Error::NumericalDegeneracy(_)));
    }

    #[test]
    fn ex_date_needs_start_date() {
        let ex = tl_time::Date::from_ymd(2026, 4, 21).unwrap();
        let div = Dividend::cash(1.0, DividendTiming::ExDate(ex)).unwrap();
        let paying = market().with_dividend(div);
        let contract = OptionContract::european(OptionType::Call, 100.0, 1.0).unwrap();
        assert!(matches!(
            TrinomialLattice::new(&paying, &contract, 10, 0.0),
            Err(Error::DateResolution(_))
        ));
        let start = tl_time::Date::from_ymd(2025, 9, 1).unwrap();
        let dated = contract.with_start_date(start);
        // 232 / 365 * 100 = 63.6 → 64
        let lattice = TrinomialLattice::new(&paying, &dated, 100, 0.0).unwrap();
        assert_eq!(lattice.dividend_step(), Some(64));
    }

    #[test]
    fn checked_node_lookup() {
        let lattice = TrinomialLattice::new(&market(), &call(), 3, 0.0).unwrap();
        assert_eq!(lattice.node(3, 6).unwrap().id(), "node_3_6");
        assert!(matches!(
            lattice.node(3, 7),
            Err(Error::IndexOutOfRange { index: 7, size: 7 })
        ));
        assert!(matches!(
            lattice.node(4, 0),
            Err(Error::IndexOutOfRange { index: 4, size: 4 })
        ));
        assert!(lattice.level(9).is_empty());
    }

    #[test]
    fn snapshots_cover_every_node() {
        let mut lattice = TrinomialLattice::new(&market(), &call(), 4, 0.0).unwrap();
        lattice.price().unwrap();
        let snaps = lattice.snapshots();
        assert_eq!(snaps.len(), lattice.node_count());
        assert_eq!(snaps[0].id, "node_0_0");
        assert_eq!(snaps[0].forward.mid.as_deref(), Some("node_1_1"));
        assert!(snaps.iter().all(|s| s.valuation.is_some()));
        let json = serde_json::to_string(&snaps[0]).unwrap();
        assert!(json.contains("\"state\":\"trinomial\""));
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(matches!(
            TrinomialLattice::new(&market(), &call(), 0, 0.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(TrinomialLattice::new(&market(), &call(), 10, 1.0).is_err());
    }
}
