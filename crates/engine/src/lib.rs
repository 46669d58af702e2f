//! Engine layer - per-experiment orchestration and the experiment registry.

#![warn(missing_docs)]

pub mod config;
pub mod observer;
pub mod orchestrator;
pub mod registry;

pub use config::{EngineConfig, MAX_TICK};
pub use observer::{EvolutionEvent, EvolutionObserver, NoopObserver, TracingObserver};
pub use orchestrator::{breed_next_generation, CycleResult, NextGeneration, Orchestrator};
pub use registry::{EvolutionService, ExperimentRegistry};
