//! Experiment model - configuration, lifecycle status and generation history.

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, Result};
use crate::genome::Genome;
use crate::id::ExperimentId;
use crate::Time;

/// Slowest accepted `evolution_speed`.
pub const MIN_EVOLUTION_SPEED: f64 = 0.001;

/// Fastest accepted `evolution_speed`.
pub const MAX_EVOLUTION_SPEED: f64 = 1000.0;

/// Parameters for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Display name
    pub name: String,

    /// Genomes per generation
    pub population_size: usize,

    /// Generation count at which the run completes
    pub max_generations: u32,

    /// Chance a child is mutated, and per-gene chance once it is
    pub mutation_rate: f64,

    /// Chance a mating pair is recombined instead of cloned
    pub crossover_rate: f64,

    /// Tournament size
    pub selection_pressure: usize,

    /// Fitness function tag
    pub fitness_function: String,

    /// Pace multiplier within [0.001, 1000]; tick interval is divided by it
    pub evolution_speed: f64,

    /// Seed for the experiment's random source (entropy when unset)
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "experiment".to_string(),
            population_size: 20,
            max_generations: 50,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            selection_pressure: 3,
            fitness_function: "weighted_expression".to_string(),
            evolution_speed: 1.0,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Create a config with the given name and defaults elsewhere.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| EvolutionError::Configuration(format!("malformed config: {e}")))
    }

    /// Check every parameter before any state is built from it.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "population_size must be greater than zero".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(EvolutionError::Configuration(
                "max_generations must be greater than zero".to_string(),
            ));
        }
        check_rate("mutation_rate", self.mutation_rate)?;
        check_rate("crossover_rate", self.crossover_rate)?;
        if self.selection_pressure == 0 {
            return Err(EvolutionError::Configuration(
                "selection_pressure must be at least 1".to_string(),
            ));
        }
        if !(MIN_EVOLUTION_SPEED..=MAX_EVOLUTION_SPEED).contains(&self.evolution_speed) {
            return Err(EvolutionError::Configuration(format!(
                "evolution_speed must be within [{MIN_EVOLUTION_SPEED}, {MAX_EVOLUTION_SPEED}], got {}",
                self.evolution_speed
            )));
        }
        Ok(())
    }
}

fn check_rate(name: &str, rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(EvolutionError::Configuration(format!(
            "{name} must be within [0, 1], got {rate}"
        )))
    }
}

/// Lifecycle status of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperimentStatus {
    /// Not advancing; may be started
    Paused,
    /// Orchestrator loop attached
    Running,
    /// Reached max_generations
    Completed,
    /// Diversity collapsed below the extinction threshold
    Extinct,
}

impl ExperimentStatus {
    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExperimentStatus::Completed | ExperimentStatus::Extinct)
    }
}

impl std::fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperimentStatus::Paused => write!(f, "paused"),
            ExperimentStatus::Running => write!(f, "running"),
            ExperimentStatus::Completed => write!(f, "completed"),
            ExperimentStatus::Extinct => write!(f, "extinct"),
        }
    }
}

/// Statistics recorded for one completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index
    pub generation: u32,

    /// Best fitness in the population
    pub best_fitness: f64,

    /// Mean fitness
    pub average_fitness: f64,

    /// Mean per-gene variance
    pub diversity_index: f64,

    /// Whether diversity fell below the extinction threshold
    pub extinction: bool,

    /// Whether diversity fell below the convergence threshold
    pub converged: bool,

    /// Population size after the generation
    pub population_size: usize,

    /// Genomes mutated during the generation
    pub mutation_count: usize,

    /// Crossovers performed during the generation
    pub crossover_count: usize,

    /// When the generation was committed
    pub timestamp: Time,
}

/// An independent optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Unique identifier
    pub id: ExperimentId,

    /// Name
    pub name: String,

    /// Configuration
    pub config: ExperimentConfig,

    /// Completed generation count
    pub current_generation: u32,

    /// Current population
    pub population: Vec<Genome>,

    /// One entry per completed generation
    pub evolution_history: Vec<GenerationStats>,

    /// Lifecycle status
    pub status: ExperimentStatus,

    /// Created at
    pub created_at: Time,

    /// Last state change
    pub updated_at: Time,
}

impl Experiment {
    /// Create a paused experiment around a seeded generation-0 population.
    pub fn new(config: ExperimentConfig, population: Vec<Genome>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ExperimentId::new(),
            name: config.name.clone(),
            config,
            current_generation: 0,
            population,
            evolution_history: Vec::new(),
            status: ExperimentStatus::Paused,
            created_at: now,
            updated_at: now,
        }
    }

    /// Best genome by fitness, first one on ties.
    pub fn best_genome(&self) -> Option<&Genome> {
        self.population
            .iter()
            .fold(None, |best: Option<&Genome>, g| match best {
                Some(b) if b.fitness >= g.fitness => Some(b),
                _ => Some(g),
            })
    }

    /// Find a genome in the current population.
    pub fn genome(&self, id: crate::GenomeId) -> Option<&Genome> {
        self.population.iter().find(|g| g.id == id)
    }

    /// Short listing view.
    pub fn summary(&self) -> ExperimentSummary {
        ExperimentSummary {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            generation: self.current_generation,
            population_size: self.population.len(),
            best_fitness: self.best_genome().map(|g| g.fitness).unwrap_or(0.0),
            created_at: self.created_at,
        }
    }
}

/// Listing view of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Experiment id
    pub id: ExperimentId,
    /// Name
    pub name: String,
    /// Lifecycle status
    pub status: ExperimentStatus,
    /// Completed generation count
    pub generation: u32,
    /// Current population size
    pub population_size: usize,
    /// Best fitness in the current population
    pub best_fitness: f64,
    /// Created at
    pub created_at: Time,
}
