//! Population diversity and convergence analysis.

use helixflow_core::Genome;

/// Share of the population, by fitness, that [`optimal_traits`] inspects.
pub const TOP_PERFORMER_SHARE: f64 = 0.2;

/// Mean value above which a gene is reported as an optimal trait.
pub const TRAIT_THRESHOLD: f64 = 0.7;

/// How converged a population is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceState {
    /// Diversity at or above the convergence threshold
    Diverse,
    /// Below the convergence threshold; keeps evolving
    Converged,
    /// Below the extinction threshold; the run ends
    Extinct,
}

impl ConvergenceState {
    /// Classify a diversity index against the two thresholds.
    pub fn classify(diversity: f64, extinction_threshold: f64, diversity_threshold: f64) -> Self {
        if diversity < extinction_threshold {
            ConvergenceState::Extinct
        } else if diversity < diversity_threshold {
            ConvergenceState::Converged
        } else {
            ConvergenceState::Diverse
        }
    }
}

/// Mean over gene slots of the population variance of that slot's value.
pub fn diversity_index(population: &[Genome]) -> f64 {
    let Some(first) = population.first() else {
        return 0.0;
    };
    let slots = first.genes.len();
    if slots == 0 {
        return 0.0;
    }

    let total: f64 = (0..slots)
        .map(|slot| {
            let values: Vec<f64> = population
                .iter()
                .filter_map(|g| g.genes.get(slot))
                .map(|g| g.value)
                .collect();
            variance(&values)
        })
        .sum();

    total / slots as f64
}

/// Population variance, shifted by the first sample so identical values give exactly zero.
fn variance(values: &[f64]) -> f64 {
    let Some(&pivot) = values.first() else {
        return 0.0;
    };
    let n = values.len() as f64;
    let (sum, sum_sq) = values.iter().fold((0.0, 0.0), |(s, sq), &v| {
        let d = v - pivot;
        (s + d, sq + d * d)
    });
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// The fittest `ceil(len × share)` genomes, at least one, best first.
pub fn top_performers(population: &[Genome], share: f64) -> Vec<&Genome> {
    let mut ranked: Vec<&Genome> = population.iter().collect();
    ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    let count = ((population.len() as f64 * share).ceil() as usize)
        .max(1)
        .min(population.len());
    ranked.truncate(count);
    ranked
}

/// "High <name>" for each gene whose mean value among the top 20% exceeds 0.7.
pub fn optimal_traits(population: &[Genome]) -> Vec<String> {
    let top = top_performers(population, TOP_PERFORMER_SHARE);
    let Some(first) = top.first() else {
        return Vec::new();
    };

    first
        .genes
        .iter()
        .enumerate()
        .filter_map(|(slot, gene)| {
            let mean = top
                .iter()
                .filter_map(|g| g.genes.get(slot))
                .map(|g| g.value)
                .sum::<f64>()
                / top.len() as f64;
            (mean > TRAIT_THRESHOLD).then(|| format!("High {}", gene.name))
        })
        .collect()
}
