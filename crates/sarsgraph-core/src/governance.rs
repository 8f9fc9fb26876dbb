//! Evidence governance
//!
//! A [`GovernanceRule`] sets a minimum summed evidence count per domain.
//! Checking a graph against it always succeeds in producing a
//! [`GovernanceCheckResult`]; a failed check is an ordinary outcome that
//! callers report, not an error.

use crate::domain::Domain;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label attached to a passing check
pub const LABEL_EVIDENCE_COMPLETE: &str = "evidence-complete";
/// Label attached to a failing check
pub const LABEL_MERGE_BLOCKED: &str = "unsafe-merge-blocked";

/// Minimum evidence per domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Domain, u64>", into = "BTreeMap<Domain, u64>")]
pub struct GovernanceRule {
    thresholds: BTreeMap<Domain, u64>,
}

impl GovernanceRule {
    /// Build a rule; at least one domain must be gated
    pub fn new(thresholds: BTreeMap<Domain, u64>) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(GraphError::invalid_argument(
                "governance rule needs at least one domain threshold",
            ));
        }
        Ok(Self { thresholds })
    }

    /// Build a rule from `(domain, minimum)` pairs; later pairs win
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Domain, u64)>,
    {
        Self::new(pairs.into_iter().collect())
    }

    /// Thresholds in canonical domain order
    #[must_use]
    pub fn thresholds(&self) -> &BTreeMap<Domain, u64> {
        &self.thresholds
    }

    /// Check `graph` against this rule
    #[must_use]
    pub fn check(&self, graph: &Graph) -> GovernanceCheckResult {
        check(graph, self)
    }
}

impl TryFrom<BTreeMap<Domain, u64>> for GovernanceRule {
    type Error = GraphError;

    fn try_from(value: BTreeMap<Domain, u64>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<GovernanceRule> for BTreeMap<Domain, u64> {
    fn from(value: GovernanceRule) -> Self {
        value.thresholds
    }
}

/// A domain that fell short of its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainShortfall {
    /// Gated domain
    pub domain: Domain,
    /// Minimum required
    pub required: u64,
    /// Summed evidence found
    pub actual: u64,
}

/// Outcome of a governance check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceCheckResult {
    /// True when every gated domain met its threshold
    pub passed: bool,
    /// Shortfalls in canonical domain order
    pub failing_domains: Vec<DomainShortfall>,
    /// One-line explanation
    pub reason: String,
}

impl GovernanceCheckResult {
    /// `evidence-complete` or `unsafe-merge-blocked`
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.passed {
            LABEL_EVIDENCE_COMPLETE
        } else {
            LABEL_MERGE_BLOCKED
        }
    }
}

/// Compare per-domain evidence totals in `graph` with `rule`
#[must_use]
pub fn check(graph: &Graph, rule: &GovernanceRule) -> GovernanceCheckResult {
    let totals = graph.evidence_by_domain();

    let failing_domains: Vec<DomainShortfall> = rule
        .thresholds
        .iter()
        .filter_map(|(&domain, &required)| {
            let actual = totals.get(&domain).copied().unwrap_or(0);
            (actual < required).then_some(DomainShortfall {
                domain,
                required,
                actual,
            })
        })
        .collect();

    let passed = failing_domains.is_empty();
    let reason = match failing_domains.first() {
        None => "Merge allowed: thresholds satisfied".to_string(),
        Some(first) => format!(
            "Insufficient {} evidence: {} < {}",
            first.domain, first.actual, first.required
        ),
    };

    if passed {
        tracing::info!(graph = %graph.id(), "governance check passed");
    } else {
        tracing::warn!(
            graph = %graph.id(),
            failing = failing_domains.len(),
            %reason,
            "governance check failed"
        );
    }

    GovernanceCheckResult {
        passed,
        failing_domains,
        reason,
    }
}
