//! Unique identifiers for HelixFlow entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for an Experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExperimentId(Ulid);

impl ExperimentId {
    /// Generate a new ExperimentId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ExperimentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ExperimentId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a Genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeId(Ulid);

impl GenomeId {
    /// Generate a new GenomeId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for GenomeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GenomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for GenomeId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identifier for a gene slot.
///
/// Assigned once per template; every genome's gene in that slot shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneId(Ulid);

impl GeneId {
    /// Generate a new GeneId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for GeneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for GeneId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
