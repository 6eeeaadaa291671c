//! Testnet Launcher CLI - start, stop, restart and signal the nodes of a test network

mod config;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use launcher_core::application::{ClusterSupervisor, SIGTERM};
use launcher_core::domain::{LaunchMode, Signum};
use launcher_core::port::SystemTimeProvider;
use launcher_infra_system::{liveness, load_topology, NodeosCommandBuilder, ProcessLauncher};

use config::{NodeCommandArgs, TopologyArgs};

#[derive(Parser)]
#[command(name = "launcher")]
#[command(about = "Test network process supervisor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    topology: TopologyArgs,

    #[command(flatten)]
    node_command: NodeCommandArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the nodes of the topology
    Launch {
        /// Which nodes to start: all, local or none
        #[arg(default_value = "all")]
        mode: LaunchMode,

        /// Seconds to wait between consecutive launches
        #[arg(short, long, env = "LAUNCHER_DELAY", default_value = "0")]
        delay: f64,
    },

    /// Shut down the named nodes
    Down {
        /// Node names, or node numbers relative to the network name (01 for testnet_01)
        #[arg(required = true, value_delimiter = ',')]
        names: Vec<String>,
    },

    /// Restart the named nodes
    Bounce {
        /// Node names, or node numbers relative to the network name (01 for testnet_01)
        #[arg(required = true, value_delimiter = ',')]
        names: Vec<String>,
    },

    /// Send a signal to every node and wait for it to exit
    Kill {
        /// Signal number
        #[arg(default_value_t = SIGTERM)]
        signum: Signum,
    },

    /// Show which nodes are running
    Status,
}

fn build_supervisor(cli: &Cli, launch_mode: LaunchMode, delay: f64) -> Result<ClusterSupervisor> {
    let topology_path = cli.topology.topology_path();
    let topology = load_topology(&topology_path, cli.topology.base_dir().as_deref())
        .with_context(|| format!("Failed to load topology {}", topology_path.display()))?;

    let config = config::supervisor_config(&cli.topology.server_name, launch_mode, delay)?;
    let command_builder = Arc::new(NodeosCommandBuilder::new(cli.node_command.to_config()));
    let launcher = Arc::new(ProcessLauncher::new(
        command_builder,
        Arc::new(SystemTimeProvider),
        config.server_name.clone(),
    ));
    let probe = liveness::detect();

    Ok(ClusterSupervisor::new(topology, launcher, probe, config))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init_logging()?;
    let cli = Cli::parse();

    info!("Testnet launcher v{}", launcher_core::VERSION);

    let exit_code = match &cli.command {
        Commands::Launch { mode, delay } => {
            let supervisor = build_supervisor(&cli, *mode, *delay)?;
            let outcomes = supervisor.start_all().await.context("Launch failed")?;
            output::print_launches(&outcomes);
            0
        }
        Commands::Down { names } => {
            let supervisor = build_supervisor(&cli, LaunchMode::All, 0.0)?;
            supervisor
                .down(names.as_slice(), false)
                .await
                .context("Shutdown failed")?;
            0
        }
        Commands::Bounce { names } => {
            let supervisor = build_supervisor(&cli, LaunchMode::All, 0.0)?;
            supervisor.bounce(names.as_slice()).await.context("Restart failed")?;
            0
        }
        Commands::Kill { signum } => {
            let supervisor = build_supervisor(&cli, LaunchMode::All, 0.0)?;
            let report = supervisor.kill(*signum).await;
            output::print_kill_report(&report);
            report.exit_code()
        }
        Commands::Status => {
            let supervisor = build_supervisor(&cli, LaunchMode::All, 0.0)?;
            let statuses = supervisor.status().context("Status check failed")?;
            output::print_status(&statuses);
            0
        }
    };

    Ok(ExitCode::from(exit_code as u8))
}
