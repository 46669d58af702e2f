//! Engine-wide configuration shared by every orchestrator loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest pause between generations, whatever the speed.
pub const MAX_TICK: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the evolution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause between generations at evolution_speed 1.0, in milliseconds
    pub base_tick_ms: u64,
    /// First retry delay after a failed cycle, in milliseconds
    pub retry_backoff_ms: u64,
    /// Upper bound for the doubling retry delay, in milliseconds
    pub max_retry_backoff_ms: u64,
    /// Diversity below which an experiment goes extinct
    pub extinction_threshold: f64,
    /// Diversity below which a population is flagged as converged
    pub diversity_threshold: f64,
    /// Share of each generation carried over unchanged
    pub elitism_ratio: f64,
    /// Fitness at or above which analytics counts a genome as elite
    pub elite_fitness: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_tick_ms: 1000,
            retry_backoff_ms: 500,
            max_retry_backoff_ms: 30_000,
            extinction_threshold: 0.001,
            diversity_threshold: 0.01,
            elitism_ratio: 0.1,
            elite_fitness: 0.8,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base tick.
    pub fn with_base_tick(mut self, tick: Duration) -> Self {
        self.base_tick_ms = tick.as_millis() as u64;
        self
    }

    /// Set the retry backoff range.
    pub fn with_retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_backoff_ms = initial.as_millis() as u64;
        self.max_retry_backoff_ms = max.as_millis() as u64;
        self
    }

    /// Set the extinction and convergence thresholds.
    pub fn with_thresholds(mut self, extinction: f64, diversity: f64) -> Self {
        self.extinction_threshold = extinction;
        self.diversity_threshold = diversity;
        self
    }

    /// Pause between generations for an experiment running at `evolution_speed`.
    pub fn tick_interval(&self, evolution_speed: f64) -> Duration {
        let speed = if evolution_speed.is_finite() && evolution_speed > 0.0 {
            evolution_speed
        } else {
            1.0
        };
        Duration::try_from_secs_f64(self.base_tick_ms as f64 / 1000.0 / speed)
            .unwrap_or(MAX_TICK)
            .min(MAX_TICK)
    }

    /// Initial retry delay.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Next retry delay after `current`, doubled and capped.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current
            .saturating_mul(2)
            .min(Duration::from_millis(self.max_retry_backoff_ms))
    }

    /// Number of elites carried into a generation of `population_size`.
    pub fn elite_count(&self, population_size: usize) -> usize {
        ((population_size as f64 * self.elitism_ratio).ceil() as usize).min(population_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_scales_inversely_with_speed() {
        let config = EngineConfig::new().with_base_tick(Duration::from_millis(1000));
        assert_eq!(config.tick_interval(1.0), Duration::from_millis(1000));
        assert_eq!(config.tick_interval(4.0), Duration::from_millis(250));
        assert_eq!(config.tick_interval(0.5), Duration::from_millis(2000));
    }

    #[test]
    fn test_tick_is_capped_for_tiny_speed() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval(1e-20), MAX_TICK);
        assert_eq!(config.tick_interval(f64::MIN_POSITIVE), MAX_TICK);
        assert_eq!(config.tick_interval(1e-6), MAX_TICK);
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let config = EngineConfig::new()
            .with_retry_backoff(Duration::from_millis(100), Duration::from_millis(350));
        let first = config.retry_backoff();
        let second = config.next_backoff(first);
        let third = config.next_backoff(second);
        assert_eq!(second, Duration::from_millis(200));
        assert_eq!(third, Duration::from_millis(350));
    }

    #[test]
    fn test_elite_count_rounds_up() {
        let config = EngineConfig::default();
        assert_eq!(config.elite_count(4), 1);
        assert_eq!(config.elite_count(20), 2);
        assert_eq!(config.elite_count(21), 3);
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"base_tick_ms": 10}"#).unwrap();
        assert_eq!(config.base_tick_ms, 10);
        assert_eq!(config.extinction_threshold, 0.001);
    }
}
