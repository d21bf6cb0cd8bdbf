// # peoplectl - People Registry CLI
//
// Thin front end over people-core. It reads its store configuration from
// the environment, validates command payloads at the edge and prints the
// result of one service call as JSON on stdout.
//
// ## Configuration
//
// - `PEOPLE_STORE_PATH`: Snapshot file. Default: people.json
// - `PEOPLE_LOG_LEVEL`: trace, debug, info, warn, error. Default: warn
//
// Every invocation is a separate process, so records always live in the
// file store; overlapping invocations coordinate through its lock file.
//
// Logs go to stderr so stdout stays machine readable.
//
// ## Example
//
// ```bash
// export PEOPLE_STORE_PATH=/var/lib/people/people.json
//
// peoplectl person create --name Ana --birth-date 01/02/1990
// peoplectl address add 1 --street "Rua A" --postal-code 50000-000 --number 10 --city Recife
// peoplectl address set-principal 1 1
// peoplectl address principal 1
// ```

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use people_core::{PeopleConfig, Services, StoreConfig, StoreRegistry};
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the outcomes a caller can script against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeoplectlExitCode {
    Success = 0,
    /// Configuration or startup failure
    ConfigError = 1,
    /// Store or other unexpected failure
    RuntimeError = 2,
    /// Person or address does not exist
    NotFound = 3,
    /// Rejected input
    InvalidArguments = 4,
}

impl From<PeoplectlExitCode> for ExitCode {
    fn from(code: PeoplectlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&people_core::Error> for PeoplectlExitCode {
    fn from(err: &people_core::Error) -> Self {
        match err {
            people_core::Error::NotFound { .. } => Self::NotFound,
            people_core::Error::InvalidArguments(_) | people_core::Error::Validation(_) => {
                Self::InvalidArguments
            }
            people_core::Error::Config(_) => Self::ConfigError,
            _ => Self::RuntimeError,
        }
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    store_path: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            store_path: lookup("PEOPLE_STORE_PATH").unwrap_or_else(|| "people.json".to_string()),
            log_level: lookup("PEOPLE_LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.store_path.trim().is_empty() {
            anyhow::bail!("PEOPLE_STORE_PATH cannot be empty");
        }

        if let Some(parent) = std::path::Path::new(&self.store_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "PEOPLE_STORE_PATH parent directory does not exist: {}. \
                Create it first: mkdir -p {}",
                parent.display(),
                parent.display()
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "PEOPLE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    fn people_config(&self) -> PeopleConfig {
        PeopleConfig::new(StoreConfig::File {
            path: self.store_path.clone(),
        })
    }
}

fn main() -> ExitCode {
    // Parse arguments first so --help and usage errors never touch the store
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                PeoplectlExitCode::InvalidArguments.into()
            } else {
                PeoplectlExitCode::Success.into()
            };
        }
    };

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return PeoplectlExitCode::ConfigError.into();
    }

    let log_level = match config.level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return PeoplectlExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PeoplectlExitCode::ConfigError.into();
    }

    debug!(store_path = %config.store_path, "Configuration loaded");

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PeoplectlExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run(cli.command, &config).await {
            Ok(()) => PeoplectlExitCode::Success,
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_code_for(&e)
            }
        }
    });

    code.into()
}

/// Build the stores, run one command and print its output
async fn run(command: Command, config: &Config) -> Result<()> {
    let people_config = config.people_config();
    people_config.validate()?;

    let registry = StoreRegistry::with_builtin();
    let stores = registry.create_stores(&people_config.store).await?;
    let services = Services::new(stores);

    if let Some(value) = cli::execute(command, &services).await? {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> PeoplectlExitCode {
    match err.downcast_ref::<people_core::Error>() {
        Some(core) => PeoplectlExitCode::from(core),
        None => PeoplectlExitCode::RuntimeError,
    }
}
