//! Observer hook for cycle lifecycle events.
//!
//! The orchestrator reports through [`EvolutionObserver`] only; hosts pick
//! where the events go. [`TracingObserver`] is the default sink.

use helixflow_core::{ExperimentId, ExperimentStatus, GenerationStats};
use tracing::{debug, error, info, warn};

/// Something that happened while an experiment evolved.
#[derive(Debug, Clone, PartialEq)]
pub enum EvolutionEvent {
    /// A generation cycle began
    CycleStarted {
        /// Experiment the event concerns
        experiment_id: ExperimentId,
        /// Generation index
        generation: u32,
    },
    /// A generation was committed
    CycleCompleted {
        /// Experiment the event concerns
        experiment_id: ExperimentId,
        /// Statistics of the committed generation
        stats: GenerationStats,
    },
    /// A cycle failed and will be retried
    CycleFailed {
        /// Experiment the event concerns
        experiment_id: ExperimentId,
        /// Generation index
        generation: u32,
        /// Consecutive failures so far, starting at 1
        attempt: u32,
        /// Error message
        error: String,
    },
    /// Diversity dropped below the convergence threshold
    Converged {
        /// Experiment the event concerns
        experiment_id: ExperimentId,
        /// Generation index
        generation: u32,
        /// Diversity index of the generation
        diversity: f64,
    },
    /// Diversity collapsed and the run ended
    Extinct {
        /// Experiment the event concerns
        experiment_id: ExperimentId,
        /// Generation index
        generation: u32,
        /// Diversity index of the generation
        diversity: f64,
    },
    /// The experiment changed status
    StatusChanged {
        /// Experiment the event concerns
        experiment_id: ExperimentId,
        /// Previous status
        from: ExperimentStatus,
        /// New status
        to: ExperimentStatus,
    },
}

/// Receives evolution events. Called inline from the orchestrator, so keep it cheap.
pub trait EvolutionObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &EvolutionEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EvolutionObserver for TracingObserver {
    fn on_event(&self, event: &EvolutionEvent) {
        match event {
            EvolutionEvent::CycleStarted { experiment_id, generation } => {
                debug!("Experiment {} starting generation {}", experiment_id, generation);
            }
            EvolutionEvent::CycleCompleted { experiment_id, stats } => {
                info!(
                    "Experiment {} generation {}: best {:.4}, avg {:.4}, diversity {:.5}",
                    experiment_id,
                    stats.generation,
                    stats.best_fitness,
                    stats.average_fitness,
                    stats.diversity_index
                );
            }
            EvolutionEvent::CycleFailed { experiment_id, generation, attempt, error } => {
                error!(
                    "Experiment {} generation {} failed (attempt {}): {}",
                    experiment_id, generation, attempt, error
                );
            }
            EvolutionEvent::Converged { experiment_id, generation, diversity } => {
                warn!(
                    "Experiment {} converged at generation {} (diversity {:.5})",
                    experiment_id, generation, diversity
                );
            }
            EvolutionEvent::Extinct { experiment_id, generation, diversity } => {
                warn!(
                    "Experiment {} went extinct at generation {} (diversity {:.5})",
                    experiment_id, generation, diversity
                );
            }
            EvolutionEvent::StatusChanged { experiment_id, from, to } => {
                info!("Experiment {} {} -> {}", experiment_id, from, to);
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EvolutionObserver for NoopObserver {
    fn on_event(&self, _event: &EvolutionEvent) {}
}
