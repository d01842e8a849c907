//! Startup Simulator CLI
//!
//! Every command prints its result as pretty JSON on stdout; logs go to
//! stderr. Errors are printed with a suggestion and map to an exit code.

mod cli;

use clap::Parser;
use serde::Serialize;
use tracing::debug;

use startup_simulator::config::{self, CliOverrides, SimulatorConfig};
use startup_simulator::error::{Error, Result};
use startup_simulator::logging;
use startup_simulator::SimulatorService;

use crate::cli::{CatalogSubcommand, Cli, Commands, ConfigSubcommand, SessionSubcommand};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Config {
            subcommand: ConfigSubcommand::Init { path, force },
        } => {
            let written = config::init_config(path.as_deref(), *force)?;
            println!("Configuration written to {}", written.display());
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Config { subcommand } => handle_config_command(subcommand, &config),
        Commands::Roles { details } => {
            let service = SimulatorService::from_config(&config)?;
            print_json(&service.list_roles(details))
        }
        Commands::Catalog { subcommand } => {
            let service = SimulatorService::from_config(&config)?;
            match subcommand {
                CatalogSubcommand::Scenarios { role } => print_json(&*service.scenarios(role)?),
                CatalogSubcommand::Archetypes { role } => print_json(&*service.archetypes(role)?),
            }
        }
        Commands::Session { subcommand } => {
            let service = SimulatorService::from_config(&config)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;
            runtime.block_on(handle_session_command(&service, subcommand))
        }
        Commands::Version => Ok(()),
    }
}

fn load_config(cli: &Cli) -> Result<SimulatorConfig> {
    let overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        backend: cli.backend.clone(),
    };
    let config = SimulatorConfig::load_with(cli.config.as_deref(), &overrides)?;

    debug!(
        catalog = ?config.catalog_source(),
        backend = %config.storage.backend,
        "Effective configuration"
    );
    Ok(config)
}

async fn handle_session_command(
    service: &SimulatorService,
    subcommand: SessionSubcommand,
) -> Result<()> {
    match subcommand {
        SessionSubcommand::Create { role } => print_json(&service.create_session(role).await?),
        SessionSubcommand::Submit {
            session_id,
            scenario_id,
            choice_id,
        } => print_json(
            &service
                .submit_response(session_id, &scenario_id, &choice_id)
                .await?,
        ),
        SessionSubcommand::State { session_id } => {
            print_json(&service.get_session_state(session_id).await?)
        }
        SessionSubcommand::Profile { session_id, report } => {
            let profile = service.compute_profile(session_id).await?;
            if report {
                print_json(&service.profile_report(session_id).await?)
            } else {
                print_json(&profile)
            }
        }
        SessionSubcommand::StoredProfile { session_id } => {
            print_json(&service.get_stored_profile(session_id).await?)
        }
        SessionSubcommand::Traits { session_id } => {
            print_json(&service.trait_scores(session_id).await?)
        }
    }
}

fn handle_config_command(subcommand: ConfigSubcommand, config: &SimulatorConfig) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigSubcommand::Validate => {
            println!("Configuration is valid.");
        }
        ConfigSubcommand::Init { .. } => {
            return Err(Error::Internal("config init is handled before loading".to_string()));
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
