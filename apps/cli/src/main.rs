//! `courier`: call actions on the in-process dispatcher from the shell.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use courier_action::{Dispatcher, builtin};

mod commands;
mod config;

use commands::call::CallArgs;
use config::{AppConfig, Overrides};

#[derive(Debug, Parser)]
#[command(name = "courier", version, about = "Dispatch named actions and print their response envelope")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML); defaults to ./courier.toml when present
    #[arg(short, long, global = true, env = "COURIER_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `info,courier_action=trace`
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Dispatch one action and print its envelope as JSON
    Call(CallArgs),
    /// List every registered action name
    Actions,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let overrides = Overrides {
        log_level: cli.log_level.clone(),
        timeout_ms: match &cli.command {
            Commands::Call(args) => args.timeout_ms,
            Commands::Actions => None,
        },
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;
    let _log = courier_log::try_init(config.log.clone())?;

    let registry = Arc::new(builtin::default_registry());
    let dispatcher = Dispatcher::with_config(registry, config.dispatch);

    let mut stdout = io::stdout().lock();
    let code = match &cli.command {
        Commands::Call(args) => {
            if commands::call::run(args, &dispatcher, &mut stdout).await? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Actions => {
            commands::actions::run(dispatcher.registry(), &mut stdout)?;
            ExitCode::SUCCESS
        }
    };
    stdout.flush()?;
    Ok(code)
}
