//! SARS-CoV-2 multi-intent knowledge graph
//!
//! Typed nodes across five research domains, evidence-carrying edges between
//! them, and the analytics layered on top:
//! - [`GraphBuilder`] validates every insertion and seals an immutable [`Graph`]
//! - [`HypothesisPath`] records a scored argument through the graph
//! - [`PathFinder`] answers connectivity questions by depth-first search
//! - [`SerendipityTrace`] scores an exploration session for diversity
//! - [`RateDistortionCurve`] picks the knee batch size
//! - [`GovernanceRule`] gates merges on per-domain evidence
//!
//! # Example
//!
//! ```rust
//! use sarsgraph_core::prelude::*;
//!
//! # fn main() -> sarsgraph_core::Result<()> {
//! let graph = GraphBuilder::new(RootEntity::new("SARS-CoV-2", 29.9)?)
//!     .with_node(DomainNode::genomics(
//!         "ba5",
//!         NodeAttrs::new("Omicron BA.5", 12, 0.85),
//!         "Omicron BA.5",
//!         ["F486V"],
//!     )?)?
//!     .build();
//!
//! let rule = GovernanceRule::from_pairs([(Domain::Genomics, 10)])?;
//! assert!(rule.check(&graph).passed);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod builder;
pub mod config;
pub mod domain;
pub mod edge;
pub mod error;
pub mod export;
pub mod governance;
pub mod graph;
pub mod hypothesis;
pub mod node;
pub mod path;
pub mod rd;
pub mod registry;
pub mod sample;
pub mod stats;
pub mod trace;

// Re-exports for convenience
pub use builder::GraphBuilder;
pub use config::{GovernanceConfig, LoggingConfig, RateDistortionConfig, SarsGraphConfig};
pub use domain::Domain;
pub use edge::{builders, Edge, EdgeId, EdgeKind, EdgeSpec};
pub use error::{ConfigError, EntityKind, ErrorKind, GraphError, Result};
pub use export::GraphDocument;
pub use governance::{
    check as check_governance, DomainShortfall, GovernanceCheckResult, GovernanceRule,
    LABEL_EVIDENCE_COMPLETE, LABEL_MERGE_BLOCKED,
};
pub use graph::{Graph, GraphId, ProvenanceEntry};
pub use hypothesis::HypothesisPath;
pub use node::{DomainNode, NodeAttrs, NodeId, NodePayload, RootEntity};
pub use path::{find_path, find_path_to_domain, PathFinder};
pub use rd::{RateDistortionCurve, RdPoint};
pub use registry::GraphRegistry;
pub use stats::{GraphStatistics, MetricsReport};
pub use trace::{ExplorationStep, HypothesisType, SerendipitySummary, SerendipityTrace};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and querying graphs
    pub use crate::edge::builders;
    pub use crate::{
        Domain, DomainNode, EdgeKind, EdgeSpec, GovernanceRule, Graph, GraphBuilder, GraphError,
        HypothesisPath, HypothesisType, NodeAttrs, NodeId, PathFinder, RateDistortionCurve,
        RootEntity, SerendipityTrace,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
