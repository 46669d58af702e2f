//! Fitness and performance-metric evaluation.
//!
//! All functions here are pure over a gene vector.

use helixflow_core::{EvolutionError, Gene, Genome, PerformanceMetrics, Result};

/// Share of fitness contributed by the gene interaction bonus.
pub const INTERACTION_WEIGHT: f64 = 0.1;

/// Fitness functions an experiment may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessFunction {
    /// Category-weighted `value × expression_level` plus interaction bonus
    WeightedExpression,
}

impl FitnessFunction {
    /// Resolve a config tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "weighted_expression" | "default" => Ok(FitnessFunction::WeightedExpression),
            other => Err(EvolutionError::Configuration(format!(
                "unknown fitness function '{other}'"
            ))),
        }
    }
}

/// Weighted fitness of a gene vector, clamped to [0, 1].
pub fn fitness(genes: &[Gene]) -> f64 {
    let weighted: f64 = genes
        .iter()
        .map(|g| g.category.weight() * g.expressed_value())
        .sum();

    (weighted + INTERACTION_WEIGHT * interaction_bonus(genes)).clamp(0.0, 1.0)
}

/// Mean over all genes of their summed pairwise interaction terms.
///
/// Each term is `(1 - |value_a - value_b|) × dominance_a × dominance_b`.
/// Partners missing from the vector are skipped.
pub fn interaction_bonus(genes: &[Gene]) -> f64 {
    if genes.is_empty() {
        return 0.0;
    }

    let total: f64 = genes
        .iter()
        .map(|a| {
            a.interactions
                .iter()
                .filter_map(|id| genes.iter().find(|b| b.id == *id))
                .map(|b| (1.0 - (a.value - b.value).abs()) * a.dominance * b.dominance)
                .sum::<f64>()
        })
        .sum();

    total / genes.len() as f64
}

/// Map role-tagged genes onto the metric vector.
///
/// Genes without a role contribute nothing.
pub fn performance_metrics(genes: &[Gene]) -> PerformanceMetrics {
    let mut metrics = PerformanceMetrics::default();
    for gene in genes {
        if let Some(role) = gene.role {
            *metrics.slot_mut(role) = gene.expressed_value();
        }
    }
    metrics
}

/// Recompute fitness, metrics and survival probability in place.
pub fn evaluate(genome: &mut Genome) {
    genome.fitness = fitness(&genome.genes);
    genome.metrics = performance_metrics(&genome.genes);
    genome.survival_probability = genome.fitness;
}
