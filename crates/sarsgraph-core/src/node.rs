//! Root entity and typed domain nodes
//!
//! Nodes are value types: every factory validates its input and returns a
//! finished [`DomainNode`]. There are no setters; "updating" a node means
//! building a replacement and handing it to
//! [`GraphBuilder::replace_node`](crate::builder::GraphBuilder::replace_node).

use crate::domain::Domain;
use crate::error::{check_unit_interval, GraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Node identity, unique within one graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a caller-chosen id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow as str
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The single subject of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootEntity {
    id: Uuid,
    name: String,
    genome_kb: f64,
}

impl RootEntity {
    /// Create a root entity; `genome_kb` must be finite and positive
    pub fn new(name: impl Into<String>, genome_kb: f64) -> Result<Self> {
        Self::with_id(Uuid::new_v4(), name, genome_kb)
    }

    /// Create a root entity with a known id (used when importing snapshots)
    pub fn with_id(id: Uuid, name: impl Into<String>, genome_kb: f64) -> Result<Self> {
        if !genome_kb.is_finite() || genome_kb <= 0.0 {
            return Err(GraphError::validation(format!(
                "genome size must be a positive number of kilobases, got {genome_kb}"
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            genome_kb,
        })
    }

    /// Root id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Genome size in kilobases
    #[must_use]
    pub fn genome_kb(&self) -> f64 {
        self.genome_kb
    }
}

/// Attributes shared by every domain node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    /// Human-readable label
    pub label: String,
    /// Research intent the node answers, e.g. `transmissibility`; empty when untagged
    pub intent: String,
    /// Number of supporting documents
    pub evidence_count: u32,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Documents the evidence count was drawn from
    pub sources: Vec<String>,
}

impl NodeAttrs {
    /// Bundle the common node attributes; intent and sources start empty
    pub fn new(label: impl Into<String>, evidence_count: u32, confidence: f64) -> Self {
        Self {
            label: label.into(),
            intent: String::new(),
            evidence_count,
            confidence,
            sources: Vec::new(),
        }
    }

    /// Tag the node with a research intent
    #[must_use]
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = intent.into();
        self
    }

    /// Record the source documents
    #[must_use]
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }
}

/// Domain-specific node content
///
/// The variant determines the node's [`Domain`], so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain")]
pub enum NodePayload {
    /// e.g. "Spike-ACE2 binding"
    Virology {
        /// Research topic
        topic: String,
        /// Mechanistic detail
        details: String,
    },
    /// e.g. "Antibody neutralization"
    Immunology {
        /// Research topic
        topic: String,
        /// Response detail
        details: String,
    },
    /// e.g. "Omicron BA.5" with its mutation codes
    Genomics {
        /// Variant name
        variant: String,
        /// Mutation codes such as `N501Y`
        mutations: Vec<String>,
    },
    /// e.g. "Paxlovid", "Protease inhibitor"
    Treatment {
        /// Intervention name
        therapy: String,
        /// Target mechanism
        mechanism: String,
    },
    /// e.g. "Mask mandate", "Reduced transmission"
    PublicHealth {
        /// Policy or intervention
        policy: String,
        /// Observed effect
        effect: String,
    },
}

impl NodePayload {
    /// Domain implied by the variant
    #[must_use]
    pub fn domain(&self) -> Domain {
        match self {
            Self::Virology { .. } => Domain::Virology,
            Self::Immunology { .. } => Domain::Immunology,
            Self::Genomics { .. } => Domain::Genomics,
            Self::Treatment { .. } => Domain::Treatment,
            Self::PublicHealth { .. } => Domain::PublicHealth,
        }
    }
}

/// A typed, validated node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainNode {
    id: NodeId,
    label: String,
    #[serde(default)]
    intent: String,
    payload: NodePayload,
    evidence_count: u32,
    confidence: f64,
    #[serde(default)]
    sources: Vec<String>,
}

impl DomainNode {
    /// Generic factory; the domain-specific ones below delegate here
    pub fn new(id: impl Into<NodeId>, attrs: NodeAttrs, payload: NodePayload) -> Result<Self> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(GraphError::validation("node id must not be empty"));
        }
        check_unit_interval("node confidence", attrs.confidence)?;

        Ok(Self {
            id,
            label: attrs.label,
            intent: attrs.intent.trim().to_string(),
            payload,
            evidence_count: attrs.evidence_count,
            confidence: attrs.confidence,
            sources: attrs.sources,
        })
    }

    /// Virology node
    pub fn virology(
        id: impl Into<NodeId>,
        attrs: NodeAttrs,
        topic: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            id,
            attrs,
            NodePayload::Virology {
                topic: topic.into(),
                details: details.into(),
            },
        )
    }

    /// Immunology node
    pub fn immunology(
        id: impl Into<NodeId>,
        attrs: NodeAttrs,
        topic: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            id,
            attrs,
            NodePayload::Immunology {
                topic: topic.into(),
                details: details.into(),
            },
        )
    }

    /// Genomics node
    pub fn genomics<I, S>(
        id: impl Into<NodeId>,
        attrs: NodeAttrs,
        variant: impl Into<String>,
        mutations: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            id,
            attrs,
            NodePayload::Genomics {
                variant: variant.into(),
                mutations: mutations.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Treatment node
    pub fn treatment(
        id: impl Into<NodeId>,
        attrs: NodeAttrs,
        therapy: impl Into<String>,
        mechanism: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            id,
            attrs,
            NodePayload::Treatment {
                therapy: therapy.into(),
                mechanism: mechanism.into(),
            },
        )
    }

    /// Public health node
    pub fn public_health(
        id: impl Into<NodeId>,
        attrs: NodeAttrs,
        policy: impl Into<String>,
        effect: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            id,
            attrs,
            NodePayload::PublicHealth {
                policy: policy.into(),
                effect: effect.into(),
            },
        )
    }

    /// Node id
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Research intent; empty when untagged
    #[must_use]
    pub fn intent(&self) -> &str {
        &self.intent
    }

    /// Domain, derived from the payload
    #[must_use]
    pub fn domain(&self) -> Domain {
        self.payload.domain()
    }

    /// Domain-specific content
    #[must_use]
    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    /// Supporting evidence count
    #[must_use]
    pub fn evidence_count(&self) -> u32 {
        self.evidence_count
    }

    /// Confidence in `[0, 1]`
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Source documents behind the evidence count
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Re-check invariants on a node that did not come through a factory
    /// (deserialized snapshots)
    pub(crate) fn revalidate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(GraphError::validation("node id must not be empty"));
        }
        check_unit_interval("node confidence", self.confidence)
    }
}
