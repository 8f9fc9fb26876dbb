//! Serendipity traces
//!
//! A trace records the hypotheses an agent explored while answering one
//! research question, in order. Steps are append-only; every metric is a
//! pure function of the step sequence and is recomputed on demand.

use crate::domain::Domain;
use crate::error::{check_unit_interval, GraphError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Kind of hypothesis explored by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HypothesisType {
    /// "mutation X increases transmissibility"
    Transmissibility,
    /// "mutation X affects vaccine efficacy"
    VaccineEfficacy,
    /// "variant X responds to treatment Y"
    TreatmentResponse,
    /// "mutation X enables immune escape"
    ImmuneEscape,
    /// "policy X reduces transmission"
    PublicHealthImpact,
}

/// One exploration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationStep {
    /// 1-based position in the trace
    pub step_number: usize,
    /// Hypothesis explored
    pub hypothesis: HypothesisType,
    /// What was looked at
    pub description: String,
    /// Domains touched
    pub domains: BTreeSet<Domain>,
    /// Evidence documents found
    pub evidence_count: u32,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// When the step was recorded
    pub timestamp: DateTime<Utc>,
}

/// Exploration record for one research session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerendipityTrace {
    id: Uuid,
    session_id: String,
    question: String,
    steps: Vec<ExplorationStep>,
    created_at: DateTime<Utc>,
}

impl SerendipityTrace {
    /// Start an empty trace
    pub fn new(session_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            question: question.into(),
            steps: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a step
    ///
    /// Fails without touching the trace when `confidence` is outside `[0, 1]`.
    pub fn add_step<I>(
        &mut self,
        hypothesis: HypothesisType,
        description: impl Into<String>,
        domains: I,
        evidence_count: u32,
        confidence: f64,
    ) -> Result<&ExplorationStep>
    where
        I: IntoIterator<Item = Domain>,
    {
        check_unit_interval("step confidence", confidence)?;

        self.steps.push(ExplorationStep {
            step_number: self.steps.len() + 1,
            hypothesis,
            description: description.into(),
            domains: domains.into_iter().collect(),
            evidence_count,
            confidence,
            timestamp: Utc::now(),
        });
        Ok(&self.steps[self.steps.len() - 1])
    }

    /// Trace id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Session the trace belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Original question text
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Steps in recording order
    #[must_use]
    pub fn steps(&self) -> &[ExplorationStep] {
        &self.steps
    }

    /// Creation time
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Step count per hypothesis type
    #[must_use]
    pub fn hypothesis_counts(&self) -> BTreeMap<HypothesisType, usize> {
        let mut counts = BTreeMap::new();
        for step in &self.steps {
            *counts.entry(step.hypothesis).or_insert(0) += 1;
        }
        counts
    }

    /// Number of distinct hypothesis types explored
    #[must_use]
    pub fn unique_hypotheses(&self) -> usize {
        self.hypothesis_counts().len()
    }

    /// Average number of steps spent per hypothesis branch
    ///
    /// `steps / distinct hypothesis types`, or 0 for an empty trace.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let branches = self.unique_hypotheses();
        if branches == 0 {
            return 0.0;
        }
        self.steps.len() as f64 / branches as f64
    }

    /// Normalized Shannon entropy of the hypothesis distribution
    ///
    /// `-Σ p·log2(p) / log2(K)` with K distinct types observed. Defined as 0
    /// when fewer than two types were explored.
    #[must_use]
    pub fn diversity_score(&self) -> f64 {
        let counts = self.hypothesis_counts();
        let k = counts.len();
        if k < 2 {
            return 0.0;
        }

        let total = self.steps.len() as f64;
        let entropy: f64 = counts
            .values()
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum();

        entropy / (k as f64).log2()
    }

    /// Adjacent step pairs whose domain sets differ
    #[must_use]
    pub fn cross_domain_jumps(&self) -> usize {
        self.steps
            .windows(2)
            .filter(|pair| pair[0].domains != pair[1].domains)
            .count()
    }

    /// Sum of evidence found across steps
    #[must_use]
    pub fn total_evidence(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.evidence_count)).sum()
    }

    /// Mean step confidence, 0 for an empty trace
    #[must_use]
    pub fn avg_confidence(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.steps.iter().map(|s| s.confidence).sum::<f64>() / self.steps.len() as f64
    }

    /// All derived metrics in one record
    #[must_use]
    pub fn summary(&self) -> SerendipitySummary {
        SerendipitySummary {
            trace_id: self.id,
            session_id: self.session_id.clone(),
            question: self.question.clone(),
            total_steps: self.steps.len(),
            unique_hypotheses: self.unique_hypotheses(),
            branching_factor: self.branching_factor(),
            diversity_score: self.diversity_score(),
            cross_domain_jumps: self.cross_domain_jumps(),
            total_evidence: self.total_evidence(),
            avg_confidence: self.avg_confidence(),
        }
    }

    /// Re-check a trace that did not come through `add_step`
    pub(crate) fn revalidate(&self) -> Result<()> {
        if self.session_id.trim().is_empty() {
            return Err(GraphError::validation("trace session id must not be empty"));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if step.step_number != index + 1 {
                return Err(GraphError::validation(format!(
                    "trace {} step {} is numbered {}",
                    self.session_id,
                    index + 1,
                    step.step_number
                )));
            }
            check_unit_interval("step confidence", step.confidence)?;
        }
        Ok(())
    }
}

/// Derived metrics for one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerendipitySummary {
    /// Trace id
    pub trace_id: Uuid,
    /// Session id
    pub session_id: String,
    /// Question text
    pub question: String,
    /// Step count
    pub total_steps: usize,
    /// Distinct hypothesis types
    pub unique_hypotheses: usize,
    /// See [`SerendipityTrace::branching_factor`]
    pub branching_factor: f64,
    /// See [`SerendipityTrace::diversity_score`]
    pub diversity_score: f64,
    /// See [`SerendipityTrace::cross_domain_jumps`]
    pub cross_domain_jumps: usize,
    /// Evidence across steps
    pub total_evidence: u64,
    /// Mean step confidence
    pub avg_confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use HypothesisType::*;

    fn trace_of(hypotheses: &[HypothesisType]) -> SerendipityTrace {
        let mut trace = SerendipityTrace::new("s", "q");
        for (i, h) in hypotheses.iter().enumerate() {
            trace
                .add_step(*h, format!("step {i}"), [Domain::Virology], 1, 0.5)
                .unwrap();
        }
        trace
    }

    #[test]
    fn empty_trace_metrics_are_zero() {
        let trace = SerendipityTrace::new("s", "q");
        assert_eq!(trace.branching_factor(), 0.0);
        assert_eq!(trace.diversity_score(), 0.0);
        assert_eq!(trace.cross_domain_jumps(), 0);
        assert_eq!(trace.avg_confidence(), 0.0);
    }

    #[test]
    fn single_hypothesis_has_zero_diversity() {
        let trace = trace_of(&[ImmuneEscape; 4]);
        assert_eq!(trace.diversity_score(), 0.0);
        assert_eq!(trace.branching_factor(), 4.0);
    }

    #[test]
    fn even_split_has_unit_diversity() {
        let trace = trace_of(&[Transmissibility, VaccineEfficacy, ImmuneEscape, TreatmentResponse]);
        assert!((trace.diversity_score() - 1.0).abs() < 1e-12);
        assert_eq!(trace.branching_factor(), 1.0);
    }

    #[test]
    fn skewed_split_is_between_bounds() {
        let trace = trace_of(&[ImmuneEscape, ImmuneEscape, ImmuneEscape, VaccineEfficacy]);
        let d = trace.diversity_score();
        // H(0.75, 0.25) / log2(2)
        let expected = -(0.75f64 * 0.75f64.log2() + 0.25 * 0.25f64.log2());
        assert!((d - expected).abs() < 1e-12);
        assert_eq!(trace.branching_factor(), 2.0);
    }

    #[test]
    fn jumps_compare_sets_not_sizes() {
        let mut trace = SerendipityTrace::new("s", "q");
        trace
            .add_step(Transmissibility, "a", [Domain::Genomics, Domain::Virology], 1, 0.5)
            .unwrap();
        trace
            .add_step(VaccineEfficacy, "b", [Domain::Immunology, Domain::Genomics], 1, 0.5)
            .unwrap();
        trace
            .add_step(VaccineEfficacy, "c", [Domain::Genomics, Domain::Immunology], 1, 0.5)
            .unwrap();
        assert_eq!(trace.cross_domain_jumps(), 1);
    }

    #[test]
    fn bad_confidence_leaves_trace_unchanged() {
        let mut trace = trace_of(&[Transmissibility]);
        let err = trace.add_step(ImmuneEscape, "x", [Domain::Immunology], 1, 1.5);
        assert!(err.is_err());
        assert_eq!(trace.steps().len(), 1);
    }

    #[test]
    fn steps_are_numbered_from_one() {
        let trace = trace_of(&[Transmissibility, ImmuneEscape]);
        let numbers: Vec<_> = trace.steps().iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(trace.revalidate().is_ok());
    }
}
