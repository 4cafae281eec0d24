//! coursecal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use coursecal_cli::commands::{self, extract::ExtractOptions};
use coursecal_cli::{Cli, CliConfig, CliError, CliResult, Command, ConfigAction};
use coursecal_core::{LogConfig, init_tracing};
use coursecal_pipeline::Pipeline;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    let config = match cli.config {
        Some(ref path) => CliConfig::load_from(path).map_err(CliError::Config)?,
        None => CliConfig::load().map_err(CliError::Config)?,
    };

    let format = config
        .log_format(cli.log_format.as_deref())
        .map_err(CliError::Config)?;
    init_tracing(LogConfig::for_cli(cli.debug || config.debug).with_format(format))?;

    let pipeline = Pipeline::new(config.pipeline_config(cli.year));
    debug!(default_year = pipeline.config().default_year, "Pipeline configured");

    match cli.command {
        Command::Extract {
            files,
            ics,
            output,
            keep_going,
        } => commands::extract::run(
            &pipeline,
            &ExtractOptions {
                files,
                ics,
                output,
                keep_going,
            },
        ),
        Command::Calendar { file, output } => {
            commands::calendar::run(&pipeline, &file, output.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
