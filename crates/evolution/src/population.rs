//! Random population seeding.

use helixflow_core::{Gene, Genome, TemplateSet};
use rand::Rng;

use crate::fitness::evaluate;

/// Mutation rate stamped on freshly seeded genes.
pub const DEFAULT_GENE_MUTATION_RATE: f64 = 0.1;

/// Build one gene per template with random value, dominance and expression.
pub fn random_genes<R: Rng + ?Sized>(templates: &TemplateSet, rng: &mut R) -> Vec<Gene> {
    templates
        .templates()
        .iter()
        .map(|t| Gene {
            id: t.id,
            name: t.name.clone(),
            category: t.category,
            role: t.role,
            value: rng.gen_range(0.0..=1.0),
            dominance: rng.gen_range(0.0..=1.0),
            mutation_rate: DEFAULT_GENE_MUTATION_RATE,
            expression_level: rng.gen_range(0.0..=1.0),
            interactions: t.interacts_with.clone(),
        })
        .collect()
}

/// Seed `size` evaluated generation-0 genomes.
pub fn generate_population<R: Rng + ?Sized>(
    size: usize,
    templates: &TemplateSet,
    rng: &mut R,
) -> Vec<Genome> {
    (0..size)
        .map(|_| {
            let mut genome = Genome::new(0, random_genes(templates, rng), Vec::new());
            evaluate(&mut genome);
            genome
        })
        .collect()
}
