//! Genome model - the "workflow DNA" evolved by an experiment.

use serde::{Deserialize, Serialize};

use crate::gene::{Gene, GeneRole};
use crate::id::{GeneId, GenomeId};

/// Per-role performance readout derived from a genome's genes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Expressed value of the speed gene
    pub speed: f64,
    /// Expressed value of the accuracy gene
    pub accuracy: f64,
    /// Expressed value of the efficiency gene
    pub efficiency: f64,
    /// Expressed value of the adaptability gene
    pub adaptability: f64,
    /// Expressed value of the innovation gene
    pub innovation: f64,
}

impl PerformanceMetrics {
    /// Mutable slot for a role.
    pub fn slot_mut(&mut self, role: GeneRole) -> &mut f64 {
        match role {
            GeneRole::Speed => &mut self.speed,
            GeneRole::Accuracy => &mut self.accuracy,
            GeneRole::Efficiency => &mut self.efficiency,
            GeneRole::Adaptability => &mut self.adaptability,
            GeneRole::Innovation => &mut self.innovation,
        }
    }

    /// Value for a role.
    pub fn get(&self, role: GeneRole) -> f64 {
        match role {
            GeneRole::Speed => self.speed,
            GeneRole::Accuracy => self.accuracy,
            GeneRole::Efficiency => self.efficiency,
            GeneRole::Adaptability => self.adaptability,
            GeneRole::Innovation => self.innovation,
        }
    }
}

/// One recorded change to a gene value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEvent {
    /// Generation the mutation happened in
    pub generation: u32,

    /// Mutated slot
    pub gene_id: GeneId,

    /// Value before
    pub old_value: f64,

    /// Value after
    pub new_value: f64,

    /// |new - old|
    pub impact: f64,
}

/// A candidate workflow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Unique identifier
    pub id: GenomeId,

    /// Generation this genome was born in
    pub generation: u32,

    /// One gene per registered template, in template order
    pub genes: Vec<Gene>,

    /// Fitness in [0, 1]
    pub fitness: f64,

    /// Derived performance metrics
    pub metrics: PerformanceMetrics,

    /// Zero, one or two parents
    pub parent_ids: Vec<GenomeId>,

    /// Ordered mutation log
    pub mutation_history: Vec<MutationEvent>,

    /// Chance of surviving into the next generation
    pub survival_probability: f64,

    /// Generations survived as an elite
    pub age: u32,
}

impl Genome {
    /// Create an unevaluated genome from a gene vector.
    ///
    /// Fitness and metrics stay zero until the evaluator runs.
    pub fn new(generation: u32, genes: Vec<Gene>, parent_ids: Vec<GenomeId>) -> Self {
        Self {
            id: GenomeId::new(),
            generation,
            genes,
            fitness: 0.0,
            metrics: PerformanceMetrics::default(),
            parent_ids,
            mutation_history: Vec::new(),
            survival_probability: 0.0,
            age: 0,
        }
    }

    /// Look up a gene by slot id.
    pub fn gene(&self, id: GeneId) -> Option<&Gene> {
        self.genes.iter().find(|g| g.id == id)
    }

    /// Total mutations ever applied to this genome.
    pub fn mutation_count(&self) -> usize {
        self.mutation_history.len()
    }
}
