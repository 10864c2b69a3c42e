//! Trinomial lattice engine with pruning fallback.
//!
//! The engine builds a [`TrinomialLattice`] for each request. When pruning
//! removes every node of some step it retries with half the threshold, then
//! with no pruning at all, and reports every attempt alongside the price.

use serde::Serialize;
use tl_core::errors::{Error, Result};
use tl_core::{LatticeSettings, Probability, Real, Size};
use tl_instruments::{OptionContract, PricingEngine, PricingResults};
use tl_methods::{NodeSnapshot, TrinomialLattice};
use tl_processes::MarketData;
use tracing::{info, warn};

use crate::analytic_european_engine::black_scholes;

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

/// How a single pricing attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttemptOutcome {
    /// Backward induction reached the root.
    Priced,
    /// Pruning left step `step` without nodes.
    Collapsed {
        /// First empty step.
        step: Size,
    },
}

/// One lattice build-and-price attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackAttempt {
    /// Pruning threshold of the attempt.
    pub threshold: Probability,
    /// Nodes the lattice held.
    pub node_count: Size,
    /// Outcome.
    pub outcome: AttemptOutcome,
}

/// Result of [`TrinomialEngine::price_with_fallback`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticePricing {
    /// Root valuation.
    pub price: Real,
    /// Threshold of the lattice that produced the price.
    pub threshold_used: Probability,
    /// Nodes of that lattice.
    pub node_count: Size,
    /// Every attempt, in order.
    pub attempts: Vec<FallbackAttempt>,
    /// Black-Scholes value, for European contracts without a dividend.
    pub black_scholes: Option<Real>,
    /// `price − black_scholes`.
    pub difference: Option<Real>,
    /// Node snapshots of the pricing lattice, when requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<NodeSnapshot>,
}

// ────────────────────────────────────────────────────────────────────────────
// TrinomialEngine
// ────────────────────────────────────────────────────────────────────────────

/// Pricing engine backed by a trinomial lattice.
#[derive(Debug, Clone)]
pub struct TrinomialEngine {
    market: MarketData,
    settings: LatticeSettings,
    keep_snapshots: bool,
}

impl TrinomialEngine {
    /// Create an engine on `market` with the given lattice settings.
    pub fn new(market: MarketData, settings: LatticeSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            market,
            settings,
            keep_snapshots: false,
        })
    }

    /// Include node snapshots of the pricing lattice in reports.
    pub fn with_snapshots(mut self, keep: bool) -> Self {
        self.keep_snapshots = keep;
        self
    }

    /// The market.
    pub fn market(&self) -> &MarketData {
        &self.market
    }

    /// The lattice settings.
    pub fn settings(&self) -> &LatticeSettings {
        &self.settings
    }

    /// Thresholds tried in order: `θ`, `θ/2`, `0` with fallback enabled.
    pub fn thresholds(&self) -> Vec<Probability> {
        let theta = self.settings.pruning_threshold;
        if self.settings.fallback && theta > 0.0 {
            vec![theta, theta / 2.0, 0.0]
        } else {
            vec![theta]
        }
    }

    /// Build the lattice this engine would use at `threshold`.
    pub fn lattice(
        &self,
        contract: &OptionContract,
        threshold: Probability,
    ) -> Result<TrinomialLattice> {
        let settings = LatticeSettings {
            pruning_threshold: threshold,
            ..self.settings
        };
        TrinomialLattice::with_settings(&self.market, contract, &settings)
    }

    /// Price `contract`, lowering the pruning threshold after a collapse.
    ///
    /// # Errors
    /// The last `PruningCollapse` when every threshold collapses, or the
    /// first non-recoverable error.
    pub fn price_with_fallback(&self, contract: &OptionContract) -> Result<LatticePricing> {
        let mut attempts = Vec::new();
        let mut collapse = None;

        for threshold in self.thresholds() {
            if let Some(Error::PruningCollapse { step, threshold: failed }) = collapse {
                warn!(failed, step, retry = threshold, "pruning collapse, retrying with lower threshold");
            }

            let mut lattice = self.lattice(contract, threshold)?;
            let node_count = lattice.node_count();
            match lattice.price() {
                Ok(price) => {
                    attempts.push(FallbackAttempt {
                        threshold,
                        node_count,
                        outcome: AttemptOutcome::Priced,
                    });
                    return self.report(contract, &lattice, price, attempts);
                }
                Err(err @ Error::PruningCollapse { step, .. }) => {
                    attempts.push(FallbackAttempt {
                        threshold,
                        node_count,
                        outcome: AttemptOutcome::Collapsed { step },
                    });
                    collapse = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(collapse.unwrap_or_else(|| {
            Error::InvalidParameter("no pruning threshold to try".to_string())
        }))
    }

    fn report(
        &self,
        contract: &OptionContract,
        lattice: &TrinomialLattice,
        price: Real,
        attempts: Vec<FallbackAttempt>,
    ) -> Result<LatticePricing> {
        let black_scholes = if contract.is_american() || lattice.dividend_step().is_some() {
            None
        } else {
            Some(black_scholes(
                contract.option_type(),
                self.market.spot(),
                contract.strike(),
                self.market.rate(),
                self.market.volatility(),
                contract.maturity(),
            )?)
        };
        let difference = black_scholes.map(|bs| price - bs);
        info!(
            price,
            threshold_used = lattice.threshold(),
            attempts = attempts.len(),
            ?difference,
            "contract priced"
        );
        Ok(LatticePricing {
            price,
            threshold_used: lattice.threshold(),
            node_count: lattice.node_count(),
            attempts,
            black_scholes,
            difference,
            snapshots: if self.keep_snapshots {
                lattice.snapshots()
            } else {
                Vec::new()
            },
        })
    }
}

impl PricingEngine<OptionContract> for TrinomialEngine {
    fn calculate(&self, contract: &OptionContract) -> Result<PricingResults> {
        let report = self.price_with_fallback(contract)?;
        let mut results = PricingResults::from_npv(report.price)
            .with_result("threshold_used", report.threshold_used)
            .with_result("node_count", report.node_count as Real)
            .with_result("attempts", report.attempts.len() as Real);
        if let (Some(bs), Some(diff)) = (report.black_scholes, report.difference) {
            results = results
                .with_result("black_scholes", bs)
                .with_result("difference", diff);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(threshold: Probability, fallback: bool) -> TrinomialEngine {
        let market = MarketData::new(100.0, 0.05, 0.2).unwrap();
        let settings = LatticeSettings::with_steps(50)
            .pruning_threshold(threshold)
            .fallback(fallback);
        TrinomialEngine::new(market, settings).unwrap()
    }

    #[test]
    fn threshold_schedule() {
        assert_eq!(engine(0.2, true).thresholds(), vec![0.2, 0.1, 0.0]);
        assert_eq!(engine(0.2, false).thresholds(), vec![0.2]);
        assert_eq!(engine(0.0, true).thresholds(), vec![0.0]);
    }

    #[test]
    fn rejects_invalid_settings() {
        let market = MarketData::new(100.0, 0.05, 0.2).unwrap();
        let settings = LatticeSettings::with_steps(50).pruning_threshold(1.5);
        assert!(matches!(
            TrinomialEngine::new(market, settings),
            Err(Error::InvalidParameter(_))
        ));
    }
}
