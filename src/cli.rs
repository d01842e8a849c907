//! CLI argument parsing using clap v4

use clap::{Parser, Subcommand};
use uuid::Uuid;

use startup_simulator::types::Role;

/// Startup Simulator - role-based scenario questionnaire
///
/// Walks a participant through a role's scenarios, aggregates the traits
/// behind each choice and matches them to an archetype.
#[derive(Parser, Debug)]
#[command(name = "startup-simulator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "SIMULATOR_CONFIG", global = true)]
    pub config: Option<String>,

    /// Catalog data directory (overrides catalog.data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Session storage backend: memory, file (overrides storage.backend)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available roles
    Roles {
        /// Include display names and descriptions
        #[arg(long)]
        details: bool,
    },

    /// Inspect scenario and archetype definitions
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },

    /// Create and drive questionnaire sessions
    Session {
        #[command(subcommand)]
        subcommand: SessionSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CatalogSubcommand {
    /// Ordered scenarios for a role
    Scenarios {
        /// engineer, product_manager, founder
        role: Role,
    },

    /// Archetypes for a role
    Archetypes {
        /// engineer, product_manager, founder
        role: Role,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionSubcommand {
    /// Start a new session
    Create {
        /// engineer, product_manager, founder
        role: Role,
    },

    /// Answer a scenario
    Submit {
        session_id: Uuid,
        scenario_id: String,
        choice_id: String,
    },

    /// Show progression state
    State { session_id: Uuid },

    /// Compute and store the best matching archetype
    Profile {
        session_id: Uuid,

        /// Print every archetype ranked instead of the top match
        #[arg(long)]
        report: bool,
    },

    /// Show the last stored profile
    StoredProfile { session_id: Uuid },

    /// Show aggregated trait counts
    Traits { session_id: Uuid },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}
