//! Analytics over an experiment snapshot.

use helixflow_core::{Experiment, ExperimentAnalytics, GeneDistribution, Genome, TrendPoint};

use crate::diversity::{diversity_index, optimal_traits};

/// Mean fitness, zero for an empty population.
pub fn average_fitness(population: &[Genome]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|g| g.fitness).sum::<f64>() / population.len() as f64
}

/// Highest fitness, zero for an empty population.
pub fn best_fitness(population: &[Genome]) -> f64 {
    population.iter().map(|g| g.fitness).fold(0.0, f64::max)
}

/// Per-slot mean/min/max/std of gene values.
pub fn gene_distribution(population: &[Genome]) -> Vec<GeneDistribution> {
    let Some(first) = population.first() else {
        return Vec::new();
    };
    let n = population.len() as f64;

    first
        .genes
        .iter()
        .enumerate()
        .map(|(slot, gene)| {
            let values: Vec<f64> = population
                .iter()
                .filter_map(|g| g.genes.get(slot))
                .map(|g| g.value)
                .collect();
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

            GeneDistribution {
                gene_id: gene.id,
                name: gene.name.clone(),
                mean,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                std_dev: variance.sqrt(),
            }
        })
        .collect()
}

/// Build the analytics report for an experiment.
///
/// `elite_fitness` is the cutoff at or above which a genome counts as elite.
pub fn analyze(experiment: &Experiment, elite_fitness: f64) -> ExperimentAnalytics {
    let population = &experiment.population;

    ExperimentAnalytics {
        experiment_id: experiment.id,
        status: experiment.status,
        generation: experiment.current_generation,
        population_size: population.len(),
        elite_count: population.iter().filter(|g| g.fitness >= elite_fitness).count(),
        best_fitness: best_fitness(population),
        average_fitness: average_fitness(population),
        diversity_percent: diversity_index(population) * 100.0,
        trends: experiment
            .evolution_history
            .iter()
            .map(|s| TrendPoint {
                generation: s.generation,
                best_fitness: s.best_fitness,
                average_fitness: s.average_fitness,
                diversity_index: s.diversity_index,
            })
            .collect(),
        gene_distribution: gene_distribution(population),
        optimal_traits: optimal_traits(population),
    }
}
