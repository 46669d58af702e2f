//! Analytics snapshot types.

use serde::{Deserialize, Serialize};

use crate::experiment::ExperimentStatus;
use crate::id::{ExperimentId, GeneId};

/// One point of the per-generation trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Generation index
    pub generation: u32,
    /// Best fitness
    pub best_fitness: f64,
    /// Mean fitness
    pub average_fitness: f64,
    /// Diversity index
    pub diversity_index: f64,
}

/// Distribution of one gene slot's value across a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneDistribution {
    /// Template slot id
    pub gene_id: GeneId,
    /// Gene name
    pub name: String,
    /// Mean value
    pub mean: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Read-only analytics report for an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentAnalytics {
    /// Experiment
    pub experiment_id: ExperimentId,

    /// Status when the snapshot was taken
    pub status: ExperimentStatus,

    /// Completed generations
    pub generation: u32,

    /// Current population size
    pub population_size: usize,

    /// Genomes with fitness at or above the elite cutoff
    pub elite_count: usize,

    /// Best fitness
    pub best_fitness: f64,

    /// Mean fitness
    pub average_fitness: f64,

    /// Diversity index scaled by 100
    pub diversity_percent: f64,

    /// Per-generation trend series
    pub trends: Vec<TrendPoint>,

    /// Per-gene distribution
    pub gene_distribution: Vec<GeneDistribution>,

    /// "High <name>" labels from the top performers
    pub optimal_traits: Vec<String>,
}
