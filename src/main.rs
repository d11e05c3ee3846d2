use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{debug, info};
use serde_json::Value;
use simple_logger::SimpleLogger;

use policyctl::calendar::Named;
use policyctl::config::DEFAULT_CONFIG_PATH;
use policyctl::report::{ChangeRow, SessionRow, TierRow};
use policyctl::session::decode;
use policyctl::{build, diff, BackupPolicy, Config, OperationSession, SessionEnvelope};

/// Backup policy schedules and job sessions
#[derive(Debug, Parser)]
#[clap(name = "policyctl")]
#[clap(about = "Backup policy schedules and job sessions", long_about = None)]
struct Cli {
    #[clap(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[clap(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints the request a declared policy translates to
    #[clap(arg_required_else_help = true)]
    Render {
        /// Declared policy, YAML or JSON
        #[clap(value_parser)]
        policy: PathBuf,
    },
    /// Validates a declared policy and prints its schedule tiers
    #[clap(arg_required_else_help = true)]
    Check {
        #[clap(value_parser)]
        policy: PathBuf,
    },
    /// Prints the field changes between two declared policies
    #[clap(arg_required_else_help = true)]
    Diff {
        #[clap(value_parser)]
        old: PathBuf,
        #[clap(value_parser)]
        new: PathBuf,
    },
    /// Decodes job session documents
    #[clap(arg_required_else_help = true)]
    Session {
        #[clap(value_parser)]
        envelopes: Vec<PathBuf>,
    },
}

fn read_declared(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    SimpleLogger::new()
        .with_level(args.verbose.log_level_filter())
        .init()?;
    debug!("{:?}", args);

    let config = Config::load(&args.config)?;
    debug!("{:?}", config);

    match args.command {
        Commands::Render { policy } => {
            let request = build(&read_declared(&policy)?)?;
            let (method, path) = request.route(&config.endpoints);
            println!("{} {}", method, path);
            println!("{}", serde_json::to_string_pretty(&request.body)?);
        }
        Commands::Check { policy } => {
            let policy = BackupPolicy::from_declared(&read_declared(&policy)?)?;
            TierRow::print_tabled(&policy);
            if let Some(scope) = &policy.scope {
                info!("backup type: {}", scope.backup_type().name());
            }
            if policy.health_check.is_none() {
                info!("policy '{}' has no health check schedule", policy.name);
            }
        }
        Commands::Diff { old, new } => {
            let old = BackupPolicy::from_declared(&read_declared(&old)?)?;
            let new = BackupPolicy::from_declared(&read_declared(&new)?)?;
            ChangeRow::print_tabled(&diff(&old, &new));
        }
        Commands::Session { envelopes } => {
            let mut rows = Vec::new();
            for path in envelopes {
                let envelope: SessionEnvelope = serde_json::from_str(&fs::read_to_string(&path)?)?;
                let session = OperationSession::try_from(envelope)?;
                let outcome = decode(&session)?;
                rows.push(SessionRow::new(&session, &outcome));
            }
            SessionRow::print_tabled(&rows);
        }
    }

    Ok(())
}
