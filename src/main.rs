use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use letsopt_cflp::{
    init_logger, FacilityLocationService, LindoExporter, Scenario, SolverBackend,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Capacitated facility location: solve scenarios or export them as LINDO models
#[derive(Debug, Parser)]
#[command(name = "letsopt-cflp", version)]
struct Cli {
    /// Debug-level logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve every instance of a scenario file in parallel
    Solve {
        scenario: PathBuf,

        /// Overrides the scenario's backend (auto, cbc, highs, microlp)
        #[arg(long)]
        backend: Option<SolverBackend>,

        /// Time limit per instance, in seconds
        #[arg(long)]
        time_limit: Option<f64>,
    },

    /// Write one LINDO text model per instance
    Export {
        scenario: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Start the gRPC service
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, default_value = "0.0.0.0:50051")]
        address: std::net::SocketAddr,

        /// Backend for requests that do not name one
        #[arg(long)]
        backend: Option<SolverBackend>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.json_logs);

    match cli.command {
        Command::Solve {
            scenario,
            backend,
            time_limit,
        } => solve(&scenario, backend, time_limit, cli.verbose).await,
        Command::Export { scenario, out_dir } => export(&scenario, &out_dir),
        #[cfg(feature = "server")]
        Command::Serve { address, backend } => {
            let config = letsopt_cflp::SolverConfig::default()
                .with_backend(backend.unwrap_or_default());
            letsopt_cflp::start_server(letsopt_cflp::ServerConfig::new(address, config))
                .await
                .map_err(|e| anyhow::anyhow!("server error: {}", e))
        }
    }
}

fn load(path: &Path) -> anyhow::Result<Scenario> {
    Scenario::from_file(path).with_context(|| format!("loading scenario {}", path.display()))
}

async fn solve(
    path: &Path,
    backend: Option<SolverBackend>,
    time_limit: Option<f64>,
    verbose: bool,
) -> anyhow::Result<()> {
    let scenario = load(path)?;

    let mut config = scenario.solver;
    if let Some(backend) = backend {
        config.backend = backend;
    }
    if time_limit.is_some() {
        config.time_limit = time_limit;
    }
    config.verbose |= verbose;

    let service = FacilityLocationService::from_config(config)?;
    info!(
        instances = scenario.instances.len(),
        solver = service.solver_name(),
        "solving scenario"
    );

    let mut combined = 0.0;
    let mut solved = 0;
    let mut failures = 0;

    for result in service.solve_batch(scenario.instances).await {
        match result {
            Ok(report) => {
                println!("{}", report);
                if let Some(objective) = report.objective_value() {
                    combined += objective;
                    solved += 1;
                }
            }
            Err(e) => {
                error!("{}", e);
                failures += 1;
            }
        }
    }

    if solved > 1 {
        println!("Combined optimal cost of {} instances: {:.2}", solved, combined);
    }
    if failures > 0 {
        bail!("{} instance(s) failed to solve", failures);
    }
    Ok(())
}

fn export(path: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let scenario = load(path)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for instance in &scenario.instances {
        let target = out_dir.join(format!("{}.ltx", instance.label()));
        LindoExporter::export_to_file(&target, instance, None, instance.label())
            .with_context(|| format!("exporting '{}'", instance.label()))?;
        println!("{}", target.display());
    }
    Ok(())
}
