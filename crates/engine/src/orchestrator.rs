//! Generation orchestrator - the per-experiment evolution loop.
//!
//! Runs the cycle:
//! ```text
//! Select mating pool → Carry elites → Breed → Commit → Check termination → Tick
//! ```
//! Stop requests are observed only while sleeping between cycles.

use std::sync::Arc;

use helixflow_core::{
    EvolutionError, Experiment, ExperimentId, ExperimentStatus, GenerationStats, Genome, Result,
};
use helixflow_evolution::{
    crossover, diversity_index, mutate, tournament_select, ConvergenceState,
};
use helixflow_evolution::analytics::{average_fitness, best_fitness};
use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::config::EngineConfig;
use crate::observer::{EvolutionEvent, EvolutionObserver};

/// An experiment together with its random source.
///
/// Guarded by one lock so the orchestrator's read-breed-replace and manual
/// crossovers never interleave.
pub struct ExperimentCell {
    /// The experiment
    pub experiment: Experiment,
    /// Random source used by every operator on this experiment
    pub rng: StdRng,
}

/// Shared handle to an experiment.
pub type SharedExperiment = Arc<RwLock<ExperimentCell>>;

/// Output of one breeding pass, not yet committed.
#[derive(Debug, Clone)]
pub struct NextGeneration {
    /// The replacement population
    pub population: Vec<Genome>,
    /// Statistics for the new generation
    pub stats: GenerationStats,
}

/// Result of a committed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleResult {
    /// Keep evolving
    Continue,
    /// Reached a terminal status
    Finished(ExperimentStatus),
}

/// Breed the next generation from `experiment` without touching it.
///
/// Fails with [`EvolutionError::CycleExecution`] when the current
/// population is unusable or the bred population breaks an invariant.
pub fn breed_next_generation(
    experiment: &Experiment,
    rng: &mut StdRng,
    config: &EngineConfig,
    gene_count: usize,
) -> Result<NextGeneration> {
    let settings = &experiment.config;
    let population_size = settings.population_size;
    let generation = experiment.current_generation + 1;

    check_population(&experiment.population, gene_count)?;

    // 1. Mating pool
    let pool: Vec<Genome> = tournament_select(
        &experiment.population,
        settings.selection_pressure,
        population_size,
        rng,
    )
    .into_iter()
    .cloned()
    .collect();
    if pool.is_empty() {
        return Err(EvolutionError::CycleExecution(
            "mating pool is empty".to_string(),
        ));
    }

    // 2. Elitism
    let mut ranked: Vec<&Genome> = experiment.population.iter().collect();
    ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    let mut next: Vec<Genome> = ranked
        .into_iter()
        .take(config.elite_count(population_size))
        .map(|g| {
            let mut elite = g.clone();
            elite.age += 1;
            elite
        })
        .collect();

    // 3. Offspring
    let mut mutation_count = 0;
    let mut crossover_count = 0;
    let mut cursor = 0;
    while next.len() < population_size {
        let parent_a = &pool[cursor % pool.len()];
        let parent_b = &pool[(cursor + 1) % pool.len()];
        cursor += 2;

        let (child_a, child_b) = if rng.gen::<f64>() < settings.crossover_rate {
            crossover_count += 1;
            crossover(parent_a, parent_b, generation, rng)
        } else {
            (parent_a.clone(), parent_b.clone())
        };

        for mut child in [child_a, child_b] {
            if next.len() >= population_size {
                break;
            }
            if rng.gen::<f64>() < settings.mutation_rate
                && mutate(&mut child, settings.mutation_rate, rng)
            {
                mutation_count += 1;
            }
            next.push(child);
        }
    }

    check_population(&next, gene_count)?;
    if next.len() != population_size {
        return Err(EvolutionError::CycleExecution(format!(
            "bred {} genomes, expected {}",
            next.len(),
            population_size
        )));
    }

    // 4. Statistics
    let diversity = diversity_index(&next);
    let state = ConvergenceState::classify(
        diversity,
        config.extinction_threshold,
        config.diversity_threshold,
    );
    let stats = GenerationStats {
        generation,
        best_fitness: best_fitness(&next),
        average_fitness: average_fitness(&next),
        diversity_index: diversity,
        extinction: state == ConvergenceState::Extinct,
        converged: state != ConvergenceState::Diverse,
        population_size: next.len(),
        mutation_count,
        crossover_count,
        timestamp: chrono::Utc::now(),
    };

    Ok(NextGeneration {
        population: next,
        stats,
    })
}

fn check_population(population: &[Genome], gene_count: usize) -> Result<()> {
    if population.is_empty() {
        return Err(EvolutionError::CycleExecution(
            "population is empty".to_string(),
        ));
    }
    for genome in population {
        if genome.genes.len() != gene_count {
            return Err(EvolutionError::CycleExecution(format!(
                "genome {} has {} genes, expected {}",
                genome.id,
                genome.genes.len(),
                gene_count
            )));
        }
        if !(0.0..=1.0).contains(&genome.fitness) {
            return Err(EvolutionError::CycleExecution(format!(
                "genome {} has fitness {} outside [0, 1]",
                genome.id, genome.fitness
            )));
        }
    }
    Ok(())
}

/// Drives one experiment from Running to a terminal or paused state.
pub struct Orchestrator {
    id: ExperimentId,
    state: SharedExperiment,
    config: EngineConfig,
    observer: Arc<dyn EvolutionObserver>,
    stop: watch::Receiver<bool>,
    gene_count: usize,
}

impl Orchestrator {
    /// Create an orchestrator for an experiment already marked Running.
    pub fn new(
        id: ExperimentId,
        state: SharedExperiment,
        config: EngineConfig,
        observer: Arc<dyn EvolutionObserver>,
        stop: watch::Receiver<bool>,
        gene_count: usize,
    ) -> Self {
        Self {
            id,
            state,
            config,
            observer,
            stop,
            gene_count,
        }
    }

    /// Run one generation and commit it atomically.
    ///
    /// On error nothing is committed and the generation counter is unchanged.
    pub async fn run_cycle(&mut self) -> Result<CycleResult> {
        let mut cell = self.state.write().await;
        let ExperimentCell { experiment, rng } = &mut *cell;

        let generation = experiment.current_generation + 1;
        self.observer.on_event(&EvolutionEvent::CycleStarted {
            experiment_id: self.id,
            generation,
        });

        let next = breed_next_generation(experiment, rng, &self.config, self.gene_count)?;
        let stats = next.stats.clone();

        experiment.population = next.population;
        experiment.evolution_history.push(stats.clone());
        experiment.current_generation = generation;
        experiment.updated_at = chrono::Utc::now();

        self.observer.on_event(&EvolutionEvent::CycleCompleted {
            experiment_id: self.id,
            stats: stats.clone(),
        });

        let finished = if generation >= experiment.config.max_generations {
            Some(ExperimentStatus::Completed)
        } else if stats.extinction {
            self.observer.on_event(&EvolutionEvent::Extinct {
                experiment_id: self.id,
                generation,
                diversity: stats.diversity_index,
            });
            Some(ExperimentStatus::Extinct)
        } else {
            if stats.converged {
                self.observer.on_event(&EvolutionEvent::Converged {
                    experiment_id: self.id,
                    generation,
                    diversity: stats.diversity_index,
                });
            }
            None
        };

        match finished {
            Some(status) => {
                self.transition(experiment, status);
                Ok(CycleResult::Finished(status))
            }
            None => Ok(CycleResult::Continue),
        }
    }

    /// Run until a terminal status or a stop request.
    pub async fn run(mut self) {
        debug!("Orchestrator attached to experiment {}", self.id);

        let mut backoff = self.config.retry_backoff();
        let mut attempt = 0u32;

        loop {
            let pause = match self.run_cycle().await {
                Ok(CycleResult::Finished(status)) => {
                    debug!("Experiment {} finished as {}", self.id, status);
                    return;
                }
                Ok(CycleResult::Continue) => {
                    attempt = 0;
                    backoff = self.config.retry_backoff();
                    let speed = self.state.read().await.experiment.config.evolution_speed;
                    self.config.tick_interval(speed)
                }
                Err(e) => {
                    attempt += 1;
                    let generation = self.state.read().await.experiment.current_generation + 1;
                    self.observer.on_event(&EvolutionEvent::CycleFailed {
                        experiment_id: self.id,
                        generation,
                        attempt,
                        error: e.to_string(),
                    });
                    let delay = backoff;
                    backoff = self.config.next_backoff(backoff);
                    delay
                }
            };

            if self.suspend(pause).await {
                break;
            }
        }

        let mut cell = self.state.write().await;
        if cell.experiment.status == ExperimentStatus::Running {
            self.transition(&mut cell.experiment, ExperimentStatus::Paused);
        }
        debug!("Orchestrator detached from experiment {}", self.id);
    }

    /// Sleep for `duration`; returns whether a stop was requested.
    async fn suspend(&mut self, duration: std::time::Duration) -> bool {
        if *self.stop.borrow() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            changed = self.stop.changed() => {
                // Sender dropped: the experiment was removed.
                if changed.is_err() {
                    return true;
                }
            }
        }
        *self.stop.borrow()
    }

    fn transition(&self, experiment: &mut Experiment, to: ExperimentStatus) {
        let from = experiment.status;
        experiment.status = to;
        experiment.updated_at = chrono::Utc::now();
        self.observer.on_event(&EvolutionEvent::StatusChanged {
            experiment_id: self.id,
            from,
            to,
        });
    }
}
