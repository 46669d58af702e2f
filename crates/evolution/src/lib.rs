//! Evolution layer - genetic algorithms over workflow genomes.
//!
//! Everything here is synchronous and takes its random source as a
//! parameter, so a seeded `StdRng` makes every operator reproducible.

#![warn(missing_docs, unused_crate_dependencies)]

pub mod fitness;
pub mod population;
pub mod selection;
pub mod operators;
pub mod diversity;
pub mod analytics;

pub use fitness::{evaluate, fitness, performance_metrics, FitnessFunction};
pub use population::generate_population;
pub use selection::tournament_select;
pub use operators::{crossover, mutate};
pub use diversity::{diversity_index, optimal_traits, ConvergenceState};
pub use analytics::analyze;
