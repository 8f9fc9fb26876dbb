//! Research domains
//!
//! The closed set of categories every node belongs to. Declaration order is
//! the canonical order used for reports and per-domain maps.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Research domain tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Viral biology: structure, binding, replication
    Virology,
    /// Host response: antibodies, T cells
    Immunology,
    /// Variants and mutations
    Genomics,
    /// Therapeutics and their mechanisms
    Treatment,
    /// Policies and population outcomes
    PublicHealth,
}

impl Domain {
    /// All domains in canonical order
    pub const ALL: [Domain; 5] = [
        Domain::Virology,
        Domain::Immunology,
        Domain::Genomics,
        Domain::Treatment,
        Domain::PublicHealth,
    ];

    /// Canonical tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Virology => "Virology",
            Self::Immunology => "Immunology",
            Self::Genomics => "Genomics",
            Self::Treatment => "Treatment",
            Self::PublicHealth => "PublicHealth",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "virology" => Ok(Self::Virology),
            "immunology" => Ok(Self::Immunology),
            "genomics" => Ok(Self::Genomics),
            "treatment" => Ok(Self::Treatment),
            "publichealth" => Ok(Self::PublicHealth),
            _ => Err(GraphError::validation(format!("unknown domain tag: {s:?}"))),
        }
    }
}
