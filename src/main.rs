use clap::Parser;
use log::info;
use qnet_sim::{
    replicate, summarize, ConcurrencyMode, ReplicationConfig, SimulationConfig, SimulationEngine,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qnet-sim", about = "Discrete-event simulator for queueing networks")]
struct Cli {
    /// YAML network description; the built-in reference network when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the generator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the random draw budget
    #[arg(long)]
    budget: Option<u64>,

    /// Number of independent replications (seeds seed, seed+1, ...)
    #[arg(long, default_value_t = 1)]
    replications: u64,

    /// Run replications on a Rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Thread pool size for parallel replications
    #[arg(long)]
    threads: Option<usize>,

    /// Print reports as YAML instead of text
    #[arg(long)]
    yaml: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load_from_path(path)?,
        None => SimulationConfig::reference_network(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(budget) = cli.budget {
        config = config.with_draw_budget(budget);
    }

    if cli.replications <= 1 {
        let mut engine = SimulationEngine::new(&config)?;
        let report = engine.run();
        if cli.yaml {
            print!("{}", serde_yaml::to_string(&report)?);
        } else {
            print!("{}", report);
        }
        return Ok(());
    }

    let seeds: Vec<u64> = (0..cli.replications)
        .map(|offset| config.seed.wrapping_add(offset))
        .collect();

    let mut replication = ReplicationConfig::new();
    if cli.parallel {
        replication = replication.with_concurrency(ConcurrencyMode::Rayon);
    }
    if let Some(threads) = cli.threads {
        replication = replication.with_thread_pool_size(threads);
    }

    let reports = replicate(&config, &seeds, &replication)?;
    let summary = summarize(&reports);
    info!("Completed {} replications", reports.len());

    if cli.yaml {
        print!("{}", serde_yaml::to_string(&summary)?);
        return Ok(());
    }

    println!("Replications: {} (seeds {}..={})", reports.len(), seeds[0], seeds[seeds.len() - 1]);
    for queue in &summary {
        println!("--- Queue {} ---", queue.queue + 1);
        println!(
            "   - Mean population: {:.4} ± {:.4}",
            queue.mean_population.mean, queue.mean_population.std_dev
        );
        println!(
            "   - Throughput:      {:.4} ± {:.4}",
            queue.throughput.mean, queue.throughput.std_dev
        );
        println!(
            "   - Utilization:     {:.4} ± {:.4}",
            queue.utilization.mean, queue.utilization.std_dev
        );
        println!(
            "   - Response time:   {:.4} ± {:.4}",
            queue.response_time.mean, queue.response_time.std_dev
        );
        println!(
            "   - Losses:          {:.1} ± {:.1}",
            queue.losses.mean, queue.losses.std_dev
        );
    }
    Ok(())
}
