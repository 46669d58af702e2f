//! HelixFlow CLI - evolve AI workflow configurations.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use helixflow_core::{ExperimentAnalytics, ExperimentConfig, ExperimentId};
use helixflow_engine::{EngineConfig, EvolutionService, ExperimentRegistry};

#[derive(Parser)]
#[command(name = "helixflow")]
#[command(about = "Evolve AI workflow configurations with a genetic algorithm", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more experiments to completion
    Run(RunArgs),
    /// List the standard gene templates
    Templates,
}

#[derive(Args)]
struct RunArgs {
    /// JSON experiment config; flags below override its fields
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Experiment name
    #[arg(long)]
    name: Option<String>,

    /// Genomes per generation
    #[arg(long)]
    population: Option<usize>,

    /// Generations to run
    #[arg(long)]
    generations: Option<u32>,

    /// Mutation rate (0-1)
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// Crossover rate (0-1)
    #[arg(long)]
    crossover_rate: Option<f64>,

    /// Tournament size
    #[arg(long)]
    tournament: Option<usize>,

    /// Evolution speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of concurrent experiments
    #[arg(long, default_value = "1")]
    experiments: usize,

    /// Base tick between generations, in milliseconds
    #[arg(long, default_value = "50")]
    tick_ms: u64,

    /// Print analytics as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                ExperimentConfig::from_json(&raw)?
            }
            None => ExperimentConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(v) = self.population {
            config.population_size = v;
        }
        if let Some(v) = self.generations {
            config.max_generations = v;
        }
        if let Some(v) = self.mutation_rate {
            config.mutation_rate = v;
        }
        if let Some(v) = self.crossover_rate {
            config.crossover_rate = v;
        }
        if let Some(v) = self.tournament {
            config.selection_pressure = v;
        }
        if let Some(v) = self.speed {
            config.evolution_speed = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await?,
        Commands::Templates => {
            let registry = ExperimentRegistry::default();
            println!("Gene templates ({})", registry.templates().len());
            for template in registry.templates().templates() {
                let role = template
                    .role
                    .map(|r| r.metric_name())
                    .unwrap_or("-");
                println!(
                    "  {:<16} {:<13} {:<13} {}",
                    template.name,
                    template.category.to_string(),
                    role,
                    template.description
                );
            }
        }
    }

    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let base = args.experiment_config()?;
    let registry = ExperimentRegistry::new(
        EngineConfig::new().with_base_tick(Duration::from_millis(args.tick_ms)),
    );

    let mut ids: Vec<ExperimentId> = Vec::with_capacity(args.experiments);
    for i in 0..args.experiments.max(1) {
        let mut config = base.clone();
        if args.experiments > 1 {
            config.name = format!("{}-{}", base.name, i + 1);
            config.seed = base.seed.map(|s| s.wrapping_add(i as u64));
        }
        let id = registry.create_experiment(config).await?;
        registry.start_evolution(id).await?;
        ids.push(id);
    }

    let wait = async {
        for id in &ids {
            registry.wait_for_status(*id, Duration::MAX).await?;
        }
        Ok::<_, anyhow::Error>(())
    };

    tokio::select! {
        result = wait => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, pausing experiments");
            registry.shutdown().await;
        }
    }

    for id in &ids {
        let analytics = registry.get_analytics(*id).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&analytics)?);
        } else {
            print_analytics(&analytics);
        }
    }

    info!("Done");
    Ok(())
}

fn print_analytics(analytics: &ExperimentAnalytics) {
    println!("Experiment {}", analytics.experiment_id);
    println!("  Status: {}", analytics.status);
    println!("  Generation: {}", analytics.generation);
    println!("  Best fitness: {:.4}", analytics.best_fitness);
    println!("  Average fitness: {:.4}", analytics.average_fitness);
    println!("  Diversity: {:.2}%", analytics.diversity_percent);
    println!("  Elites: {}/{}", analytics.elite_count, analytics.population_size);
    if analytics.optimal_traits.is_empty() {
        println!("  Optimal traits: none yet");
    } else {
        println!("  Optimal traits: {}", analytics.optimal_traits.join(", "));
    }
    println!("  Genes:");
    for gene in &analytics.gene_distribution {
        println!(
            "    {:<16} mean {:.3}  min {:.3}  max {:.3}  std {:.3}",
            gene.name, gene.mean, gene.min, gene.max, gene.std_dev
        );
    }
}
