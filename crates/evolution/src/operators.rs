//! Genetic operators - uniform crossover and Gaussian mutation.

use helixflow_core::{Genome, MutationEvent};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::trace;

use crate::fitness::evaluate;

/// Standard deviation of the Gaussian perturbation applied by [`mutate`].
pub const MUTATION_SIGMA: f64 = 0.1;

/// Recombine two parents slot by slot.
///
/// A coin flip per slot decides which parent the first child inherits that
/// gene from; the second child gets the other. Both children's expression
/// level for the slot is the mean of the parents'.
pub fn crossover<R: Rng + ?Sized>(
    parent_a: &Genome,
    parent_b: &Genome,
    generation: u32,
    rng: &mut R,
) -> (Genome, Genome) {
    let slots = parent_a.genes.len().min(parent_b.genes.len());
    let mut genes_a = Vec::with_capacity(slots);
    let mut genes_b = Vec::with_capacity(slots);

    for (gene_a, gene_b) in parent_a.genes.iter().zip(&parent_b.genes) {
        let expression = (gene_a.expression_level + gene_b.expression_level) / 2.0;

        let (mut first, mut second) = if rng.gen_bool(0.5) {
            (gene_a.clone(), gene_b.clone())
        } else {
            (gene_b.clone(), gene_a.clone())
        };
        first.expression_level = expression;
        second.expression_level = expression;

        genes_a.push(first);
        genes_b.push(second);
    }

    let parents = vec![parent_a.id, parent_b.id];
    let mut child_a = Genome::new(generation, genes_a, parents.clone());
    let mut child_b = Genome::new(generation, genes_b, parents);
    evaluate(&mut child_a);
    evaluate(&mut child_b);

    (child_a, child_b)
}

/// Perturb each gene with probability `mutation_rate`.
///
/// Values get N(0, σ=0.1) noise and are clamped to [0, 1]; every change is
/// logged to the genome's mutation history. Fitness is recomputed when
/// anything changed. Returns whether any gene mutated.
pub fn mutate<R: Rng + ?Sized>(genome: &mut Genome, mutation_rate: f64, rng: &mut R) -> bool {
    let generation = genome.generation;
    let mut mutated = false;

    for gene in &mut genome.genes {
        if rng.gen::<f64>() >= mutation_rate {
            continue;
        }

        let noise: f64 = rng.sample(StandardNormal);
        let old_value = gene.value;
        let new_value = (old_value + noise * MUTATION_SIGMA).clamp(0.0, 1.0);
        gene.value = new_value;

        genome.mutation_history.push(MutationEvent {
            generation,
            gene_id: gene.id,
            old_value,
            new_value,
            impact: (new_value - old_value).abs(),
        });
        mutated = true;
    }

    if mutated {
        evaluate(genome);
        trace!("Mutated genome {} (fitness {:.4})", genome.id, genome.fitness);
    }

    mutated
}
