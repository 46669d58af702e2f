//! Experiment registry - owns every experiment and its orchestrator task.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use helixflow_core::{
    EvolutionError, Experiment, ExperimentAnalytics, ExperimentConfig, ExperimentId,
    ExperimentStatus, ExperimentSummary, Genome, GenomeId, Result, TemplateSet,
};
use helixflow_evolution::{analyze, crossover, generate_population, FitnessFunction};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::observer::{EvolutionEvent, EvolutionObserver, TracingObserver};
use crate::orchestrator::{ExperimentCell, Orchestrator, SharedExperiment};

/// Commands and queries offered to collaborators.
#[async_trait]
pub trait EvolutionService: Send + Sync {
    /// Validate a config, seed generation 0 and store a paused experiment.
    async fn create_experiment(&self, config: ExperimentConfig) -> Result<ExperimentId>;

    /// Attach an orchestrator loop to a paused experiment.
    async fn start_evolution(&self, id: ExperimentId) -> Result<ExperimentStatus>;

    /// Request a cooperative stop; honoured at the next cycle boundary.
    async fn stop_evolution(&self, id: ExperimentId) -> Result<ExperimentStatus>;

    /// Cross two members of the live population and append both children.
    async fn perform_crossover(
        &self,
        id: ExperimentId,
        parent_a: GenomeId,
        parent_b: GenomeId,
    ) -> Result<(Genome, Genome)>;

    /// Snapshot of the current population.
    async fn get_population(&self, id: ExperimentId) -> Result<Vec<Genome>>;

    /// Snapshot of the whole experiment.
    async fn get_experiment(&self, id: ExperimentId) -> Result<Experiment>;

    /// Snapshot of one genome in the current population.
    async fn get_dna(&self, id: ExperimentId, genome_id: GenomeId) -> Result<Genome>;

    /// Analytics report for an experiment.
    async fn get_analytics(&self, id: ExperimentId) -> Result<ExperimentAnalytics>;

    /// Listing of every experiment, oldest first.
    async fn list_experiments(&self) -> Vec<ExperimentSummary>;
}

struct ExperimentEntry {
    state: SharedExperiment,
    stop: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

/// In-memory registry of experiments.
///
/// Constructed and owned by the host; there is no global instance.
pub struct ExperimentRegistry {
    experiments: RwLock<HashMap<ExperimentId, ExperimentEntry>>,
    templates: Arc<TemplateSet>,
    config: EngineConfig,
    observer: Arc<dyn EvolutionObserver>,
}

impl ExperimentRegistry {
    /// Create a registry with the standard gene templates.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            experiments: RwLock::new(HashMap::new()),
            templates: Arc::new(TemplateSet::standard()),
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Use a custom template set for experiments created from now on.
    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Arc::new(templates);
        self
    }

    /// Route lifecycle events to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn EvolutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The registered gene templates.
    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn state(&self, id: ExperimentId) -> Result<SharedExperiment> {
        let experiments = self.experiments.read().await;
        experiments
            .get(&id)
            .map(|entry| entry.state.clone())
            .ok_or_else(|| EvolutionError::NotFound(format!("experiment {}", id)))
    }

    /// Drop an experiment, stopping its loop at the next cycle boundary.
    pub async fn remove_experiment(&self, id: ExperimentId) -> Result<Experiment> {
        let entry = self
            .experiments
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| EvolutionError::NotFound(format!("experiment {}", id)))?;

        if let Some(stop) = &entry.stop {
            stop.send_replace(true);
        }
        let experiment = entry.state.read().await.experiment.clone();
        info!("Removed experiment {}", id);
        Ok(experiment)
    }

    /// Poll until the experiment is no longer Running, or `timeout` elapses.
    ///
    /// Returns the last observed status.
    pub async fn wait_for_status(
        &self,
        id: ExperimentId,
        timeout: Duration,
    ) -> Result<ExperimentStatus> {
        let state = self.state(id).await?;
        let start = Instant::now();
        let poll = Duration::from_millis(10);

        loop {
            let status = state.read().await.experiment.status;
            if status != ExperimentStatus::Running || start.elapsed() >= timeout {
                return Ok(status);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Stop every running loop and wait for the tasks to exit.
    pub async fn shutdown(&self) {
        let handles: Vec<(ExperimentId, JoinHandle<()>)> = {
            let mut experiments = self.experiments.write().await;
            experiments
                .iter_mut()
                .filter_map(|(id, entry)| {
                    if let Some(stop) = &entry.stop {
                        stop.send_replace(true);
                    }
                    entry.task.take().map(|task| (*id, task))
                })
                .collect()
        };

        for (id, handle) in handles {
            if let Err(e) = handle.await {
                warn!("Orchestrator for experiment {} ended abnormally: {}", id, e);
            }
        }
        info!("Registry shut down");
    }
}

impl Default for ExperimentRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[async_trait]
impl EvolutionService for ExperimentRegistry {
    async fn create_experiment(&self, config: ExperimentConfig) -> Result<ExperimentId> {
        config.validate()?;
        FitnessFunction::from_tag(&config.fitness_function)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let population = generate_population(config.population_size, &self.templates, &mut rng);
        let experiment = Experiment::new(config, population);
        let id = experiment.id;

        info!(
            "Created experiment {} '{}' with {} genomes",
            id,
            experiment.name,
            experiment.population.len()
        );

        let entry = ExperimentEntry {
            state: Arc::new(RwLock::new(ExperimentCell { experiment, rng })),
            stop: None,
            task: None,
        };
        self.experiments.write().await.insert(id, entry);

        Ok(id)
    }

    async fn start_evolution(&self, id: ExperimentId) -> Result<ExperimentStatus> {
        let mut experiments = self.experiments.write().await;
        let entry = experiments
            .get_mut(&id)
            .ok_or_else(|| EvolutionError::NotFound(format!("experiment {}", id)))?;

        {
            let mut cell = entry.state.write().await;
            let from = cell.experiment.status;
            if from != ExperimentStatus::Paused {
                return Err(EvolutionError::InvalidState(format!(
                    "cannot start experiment {} while {}",
                    id, from
                )));
            }
            cell.experiment.status = ExperimentStatus::Running;
            cell.experiment.updated_at = chrono::Utc::now();
            self.observer.on_event(&EvolutionEvent::StatusChanged {
                experiment_id: id,
                from,
                to: ExperimentStatus::Running,
            });
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let orchestrator = Orchestrator::new(
            id,
            entry.state.clone(),
            self.config.clone(),
            self.observer.clone(),
            stop_rx,
            self.templates.len(),
        );
        entry.stop = Some(stop_tx);
        entry.task = Some(tokio::spawn(orchestrator.run()));

        info!("Started evolution for experiment {}", id);
        Ok(ExperimentStatus::Running)
    }

    async fn stop_evolution(&self, id: ExperimentId) -> Result<ExperimentStatus> {
        let experiments = self.experiments.read().await;
        let entry = experiments
            .get(&id)
            .ok_or_else(|| EvolutionError::NotFound(format!("experiment {}", id)))?;

        let status = entry.state.read().await.experiment.status;
        match status {
            ExperimentStatus::Paused => {
                debug!("Experiment {} already paused", id);
                Ok(status)
            }
            ExperimentStatus::Running => {
                if let Some(stop) = &entry.stop {
                    stop.send_replace(true);
                }
                info!("Stop requested for experiment {}", id);
                Ok(status)
            }
            ExperimentStatus::Completed | ExperimentStatus::Extinct => {
                Err(EvolutionError::InvalidState(format!(
                    "cannot stop experiment {} while {}",
                    id, status
                )))
            }
        }
    }

    async fn perform_crossover(
        &self,
        id: ExperimentId,
        parent_a: GenomeId,
        parent_b: GenomeId,
    ) -> Result<(Genome, Genome)> {
        let state = self.state(id).await?;
        let mut cell = state.write().await;
        let ExperimentCell { experiment, rng } = &mut *cell;

        let missing = |genome_id: GenomeId| {
            EvolutionError::InvalidState(format!(
                "genome {} is not in the population of experiment {}",
                genome_id, id
            ))
        };
        let a = experiment.genome(parent_a).ok_or_else(|| missing(parent_a))?.clone();
        let b = experiment.genome(parent_b).ok_or_else(|| missing(parent_b))?.clone();

        let (child_a, child_b) = crossover(&a, &b, experiment.current_generation, rng);
        experiment.population.push(child_a.clone());
        experiment.population.push(child_b.clone());
        experiment.updated_at = chrono::Utc::now();

        debug!(
            "Manual crossover in experiment {}: {} x {} -> {}, {}",
            id, parent_a, parent_b, child_a.id, child_b.id
        );
        Ok((child_a, child_b))
    }

    async fn get_population(&self, id: ExperimentId) -> Result<Vec<Genome>> {
        let state = self.state(id).await?;
        let cell = state.read().await;
        Ok(cell.experiment.population.clone())
    }

    async fn get_experiment(&self, id: ExperimentId) -> Result<Experiment> {
        let state = self.state(id).await?;
        let cell = state.read().await;
        Ok(cell.experiment.clone())
    }

    async fn get_dna(&self, id: ExperimentId, genome_id: GenomeId) -> Result<Genome> {
        let state = self.state(id).await?;
        let cell = state.read().await;
        cell.experiment
            .genome(genome_id)
            .cloned()
            .ok_or_else(|| EvolutionError::NotFound(format!("genome {} in experiment {}", genome_id, id)))
    }

    async fn get_analytics(&self, id: ExperimentId) -> Result<ExperimentAnalytics> {
        let state = self.state(id).await?;
        let cell = state.read().await;
        Ok(analyze(&cell.experiment, self.config.elite_fitness))
    }

    async fn list_experiments(&self) -> Vec<ExperimentSummary> {
        let states: Vec<SharedExperiment> = self
            .experiments
            .read()
            .await
            .values()
            .map(|entry| entry.state.clone())
            .collect();

        let mut summaries = Vec::with_capacity(states.len());
        for state in states {
            summaries.push(state.read().await.experiment.summary());
        }
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    fn registry() -> ExperimentRegistry {
        ExperimentRegistry::new(
            EngineConfig::new()
                .with_base_tick(Duration::from_millis(5))
                .with_thresholds(0.0, 0.0),
        )
        .with_observer(Arc::new(NoopObserver))
    }

    fn config(population_size: usize, max_generations: u32) -> ExperimentConfig {
        ExperimentConfig {
            name: "test".to_string(),
            population_size,
            max_generations,
            seed: Some(99),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_stores_paused_generation_zero() {
        let registry = registry();
        let id = registry.create_experiment(config(6, 3)).await.unwrap();

        let experiment = registry.get_experiment(id).await.unwrap();
        assert_eq!(experiment.status, ExperimentStatus::Paused);
        assert_eq!(experiment.current_generation, 0);
        assert_eq!(experiment.population.len(), 6);
        for genome in &experiment.population {
            assert_eq!(genome.genes.len(), registry.templates().len());
        }
    }

    #[tokio::test]
    async fn test_invalid_config_stores_nothing() {
        let registry = registry();
        let result = registry.create_experiment(config(0, 3)).await;
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));

        let mut bad_tag = config(4, 3);
        bad_tag.fitness_function = "unknown".to_string();
        assert!(registry.create_experiment(bad_tag).await.is_err());

        assert!(registry.list_experiments().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let registry = registry();
        let ghost = ExperimentId::new();
        assert!(matches!(
            registry.start_evolution(ghost).await,
            Err(EvolutionError::NotFound(_))
        ));
        assert!(matches!(
            registry.get_analytics(ghost).await,
            Err(EvolutionError::NotFound(_))
        ));

        let id = registry.create_experiment(config(4, 1)).await.unwrap();
        assert!(matches!(
            registry.get_dna(id, GenomeId::new()).await,
            Err(EvolutionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_scenario_single_generation_of_clones() {
        let registry = registry();
        let mut settings = config(4, 1);
        settings.mutation_rate = 0.0;
        settings.crossover_rate = 0.0;
        let id = registry.create_experiment(settings).await.unwrap();
        let generation_zero = registry.get_population(id).await.unwrap();

        registry.start_evolution(id).await.unwrap();
        let status = registry
            .wait_for_status(id, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(status, ExperimentStatus::Completed);
        let experiment = registry.get_experiment(id).await.unwrap();
        assert_eq!(experiment.current_generation, 1);
        assert_eq!(experiment.population.len(), 4);
        assert_eq!(experiment.evolution_history.len(), 1);
        for genome in &experiment.population[1..] {
            assert!(generation_zero.contains(genome));
        }
    }

    #[tokio::test]
    async fn test_history_records_configured_population_size() {
        let registry = registry();
        let id = registry.create_experiment(config(9, 6)).await.unwrap();
        registry.start_evolution(id).await.unwrap();
        registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();

        let experiment = registry.get_experiment(id).await.unwrap();
        assert_eq!(experiment.status, ExperimentStatus::Completed);
        assert_eq!(experiment.current_generation, 6);
        for (i, stats) in experiment.evolution_history.iter().enumerate() {
            assert_eq!(stats.generation, i as u32 + 1);
            assert_eq!(stats.population_size, 9);
        }
        for genome in &experiment.population {
            assert!((0.0..=1.0).contains(&genome.fitness));
            assert!(genome.genes.iter().all(|g| (0.0..=1.0).contains(&g.value)));
        }
    }

    #[tokio::test]
    async fn test_start_requires_paused() {
        let registry = registry();
        let id = registry.create_experiment(config(4, 1)).await.unwrap();
        registry.start_evolution(id).await.unwrap();
        registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();

        assert!(matches!(
            registry.start_evolution(id).await,
            Err(EvolutionError::InvalidState(_))
        ));
        assert!(matches!(
            registry.stop_evolution(id).await,
            Err(EvolutionError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_on_paused_is_noop() {
        let registry = registry();
        let id = registry.create_experiment(config(4, 10)).await.unwrap();

        let first = registry.stop_evolution(id).await.unwrap();
        let second = registry.stop_evolution(id).await.unwrap();
        assert_eq!(first, ExperimentStatus::Paused);
        assert_eq!(second, ExperimentStatus::Paused);
        assert_eq!(registry.get_experiment(id).await.unwrap().current_generation, 0);
    }

    #[tokio::test]
    async fn test_stop_pauses_at_cycle_boundary_and_restart_resumes() {
        let registry = ExperimentRegistry::new(
            EngineConfig::new()
                .with_base_tick(Duration::from_millis(20))
                .with_thresholds(0.0, 0.0),
        )
        .with_observer(Arc::new(NoopObserver));
        let id = registry.create_experiment(config(6, 10_000)).await.unwrap();

        registry.start_evolution(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(
            registry.stop_evolution(id).await.unwrap(),
            ExperimentStatus::Running
        );
        let status = registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();
        assert_eq!(status, ExperimentStatus::Paused);

        let paused = registry.get_experiment(id).await.unwrap();
        assert!(paused.current_generation >= 1);
        assert_eq!(paused.evolution_history.len(), paused.current_generation as usize);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            registry.get_experiment(id).await.unwrap().current_generation,
            paused.current_generation
        );

        registry.start_evolution(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        registry.stop_evolution(id).await.unwrap();
        registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();
        assert!(registry.get_experiment(id).await.unwrap().current_generation > paused.current_generation);
    }

    #[tokio::test]
    async fn test_manual_crossover_appends_children() {
        let registry = registry();
        let id = registry.create_experiment(config(5, 3)).await.unwrap();
        let population = registry.get_population(id).await.unwrap();
        let (a, b) = (population[0].id, population[1].id);

        let (child_a, child_b) = registry.perform_crossover(id, a, b).await.unwrap();
        assert_eq!(child_a.parent_ids, vec![a, b]);

        let after = registry.get_population(id).await.unwrap();
        assert_eq!(after.len(), 7);
        assert_eq!(registry.get_dna(id, child_b.id).await.unwrap(), child_b);
    }

    #[tokio::test]
    async fn test_manual_crossover_rejects_foreign_genomes() {
        let registry = registry();
        let id = registry.create_experiment(config(5, 3)).await.unwrap();
        let population = registry.get_population(id).await.unwrap();

        let result = registry
            .perform_crossover(id, population[0].id, GenomeId::new())
            .await;
        assert!(matches!(result, Err(EvolutionError::InvalidState(_))));
        assert_eq!(registry.get_population(id).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_manual_children_survive_until_next_cycle() {
        let registry = registry();
        let id = registry.create_experiment(config(6, 2)).await.unwrap();
        let population = registry.get_population(id).await.unwrap();

        let (child_a, child_b) = registry
            .perform_crossover(id, population[0].id, population[1].id)
            .await
            .unwrap();
        let grown = registry.get_population(id).await.unwrap();
        assert_eq!(grown.len(), 8);
        assert!(grown.contains(&child_a) && grown.contains(&child_b));

        registry.start_evolution(id).await.unwrap();
        registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();

        let experiment = registry.get_experiment(id).await.unwrap();
        assert_eq!(experiment.current_generation, 2);
        assert!(experiment.evolution_history.iter().all(|s| s.population_size == 6));
        assert_eq!(experiment.population.len(), 6);
    }

    #[tokio::test]
    async fn test_manual_crossover_while_running_is_never_lost() {
        let registry = registry();
        let id = registry.create_experiment(config(6, 10_000)).await.unwrap();
        registry.start_evolution(id).await.unwrap();

        let mut crossed = 0;
        for _ in 0..500 {
            let population = registry.get_population(id).await.unwrap();
            let (a, b) = (population[0].id, population[1].id);
            let (child_a, child_b) = match registry.perform_crossover(id, a, b).await {
                Ok(children) => children,
                // parents were bred away between the two calls
                Err(EvolutionError::InvalidState(_)) => continue,
                Err(e) => panic!("unexpected error: {e}"),
            };

            let experiment = registry.get_experiment(id).await.unwrap();
            let kept = experiment.population.contains(&child_a)
                && experiment.population.contains(&child_b);
            assert!(kept || experiment.current_generation > child_a.generation);

            crossed += 1;
            if crossed == 20 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(crossed, 20);

        registry.stop_evolution(id).await.unwrap();
        let status = registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();
        assert_eq!(status, ExperimentStatus::Paused);

        let experiment = registry.get_experiment(id).await.unwrap();
        assert!(experiment.current_generation >= 1);
        assert_eq!(
            experiment.evolution_history.len(),
            experiment.current_generation as usize
        );
        assert!(experiment.evolution_history.iter().all(|s| s.population_size == 6));
    }

    #[tokio::test]
    async fn test_out_of_range_speed_is_rejected_at_create() {
        let registry = registry();
        let mut settings = config(4, 3);
        settings.evolution_speed = 1e-20;
        assert!(matches!(
            registry.create_experiment(settings).await,
            Err(EvolutionError::Configuration(_))
        ));
        assert!(registry.list_experiments().await.is_empty());
    }

    #[tokio::test]
    async fn test_slowest_speed_still_stops_promptly() {
        let registry = registry();
        let mut settings = config(4, 10_000);
        settings.evolution_speed = helixflow_core::MIN_EVOLUTION_SPEED;
        let id = registry.create_experiment(settings).await.unwrap();

        registry.start_evolution(id).await.unwrap();
        while registry.get_experiment(id).await.unwrap().current_generation == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert_eq!(
            registry.stop_evolution(id).await.unwrap(),
            ExperimentStatus::Running
        );
        let status = registry.wait_for_status(id, Duration::from_secs(2)).await.unwrap();
        assert_eq!(status, ExperimentStatus::Paused);
        assert_eq!(
            registry.start_evolution(id).await.unwrap(),
            ExperimentStatus::Running
        );
        registry.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_status_times_out_in_paused_time() {
        let registry = ExperimentRegistry::new(
            EngineConfig::new()
                .with_base_tick(Duration::from_secs(60))
                .with_thresholds(0.0, 0.0),
        )
        .with_observer(Arc::new(NoopObserver));
        let id = registry.create_experiment(config(4, 10_000)).await.unwrap();
        registry.start_evolution(id).await.unwrap();

        let status = registry
            .wait_for_status(id, Duration::from_secs(600))
            .await
            .unwrap();
        assert_eq!(status, ExperimentStatus::Running);
        let generation = registry.get_experiment(id).await.unwrap().current_generation;
        assert!((1..=11).contains(&generation));

        registry.shutdown().await;
    }

    #[tokio::test]
    async fn test_analytics_report() {
        let registry = registry();
        let id = registry.create_experiment(config(10, 4)).await.unwrap();
        registry.start_evolution(id).await.unwrap();
        registry.wait_for_status(id, Duration::from_secs(5)).await.unwrap();

        let analytics = registry.get_analytics(id).await.unwrap();
        assert_eq!(analytics.generation, 4);
        assert_eq!(analytics.trends.len(), 4);
        assert_eq!(analytics.gene_distribution.len(), registry.templates().len());
        assert!(analytics.diversity_percent >= 0.0);
        assert!(analytics.elite_count <= analytics.population_size);
    }

    #[tokio::test]
    async fn test_experiments_advance_independently() {
        let registry = registry();
        let fast = registry.create_experiment(config(4, 3)).await.unwrap();
        let mut slow_config = config(4, 2);
        slow_config.evolution_speed = 0.5;
        let slow = registry.create_experiment(slow_config).await.unwrap();

        registry.start_evolution(fast).await.unwrap();
        registry.start_evolution(slow).await.unwrap();
        registry.wait_for_status(fast, Duration::from_secs(5)).await.unwrap();
        registry.wait_for_status(slow, Duration::from_secs(5)).await.unwrap();

        assert_eq!(registry.get_experiment(fast).await.unwrap().current_generation, 3);
        assert_eq!(registry.get_experiment(slow).await.unwrap().current_generation, 2);

        let listing = registry.list_experiments().await;
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|s| s.status == ExperimentStatus::Completed));
    }

    #[tokio::test]
    async fn test_remove_and_shutdown() {
        let registry = registry();
        let id = registry.create_experiment(config(4, 10_000)).await.unwrap();
        let other = registry.create_experiment(config(4, 10_000)).await.unwrap();
        registry.start_evolution(id).await.unwrap();
        registry.start_evolution(other).await.unwrap();

        registry.remove_experiment(id).await.unwrap();
        assert!(matches!(
            registry.get_experiment(id).await,
            Err(EvolutionError::NotFound(_))
        ));

        registry.shutdown().await;
        assert_eq!(
            registry.get_experiment(other).await.unwrap().status,
            ExperimentStatus::Paused
        );
    }
}
