//! HelixFlow core data models.
//!
//! This crate defines the genes, genomes and experiments that the
//! workflow evolution engine operates on.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Genetic material
mod gene;
mod genome;

// Experiments
mod experiment;
mod analytics;

// Re-exports
pub use id::*;
pub use error::{EvolutionError, Result};

pub use gene::{Gene, GeneCategory, GeneRole, GeneTemplate, TemplateSet, TemplateSetBuilder};
pub use genome::{Genome, MutationEvent, PerformanceMetrics};

pub use experiment::{
    Experiment, ExperimentConfig, ExperimentStatus, ExperimentSummary, GenerationStats,
    MAX_EVOLUTION_SPEED, MIN_EVOLUTION_SPEED,
};
pub use analytics::{ExperimentAnalytics, GeneDistribution, TrendPoint};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
