//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// coursecal - Syllabus events to a clean calendar
#[derive(Debug, Parser)]
#[command(name = "coursecal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "COURSECAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Year assumed for dates written without one
    #[arg(long, short, global = true)]
    pub year: Option<i32>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log format: pretty, compact or json
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run raw extractor output (one file per page) through the pipeline
    Extract {
        /// Files holding extractor output, in page order (`-` reads stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write an iCalendar feed instead of the JSON response
        #[arg(long)]
        ics: bool,

        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip pages that fail to parse instead of stopping
        #[arg(long)]
        keep_going: bool,
    },

    /// Build an iCalendar feed from a JSON list of events
    Calendar {
        /// JSON file with an events array or an `extract` response (`-` reads stdin)
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_extract() {
        let cli = Cli::parse_from([
            "coursecal", "--year", "2026", "extract", "p1.txt", "p2.txt", "--ics", "-o", "out.ics",
        ]);
        assert_eq!(cli.year, Some(2026));
        match cli.command {
            Command::Extract {
                files,
                ics,
                output,
                keep_going,
            } => {
                assert_eq!(files, vec![PathBuf::from("p1.txt"), PathBuf::from("p2.txt")]);
                assert!(ics);
                assert_eq!(output, Some(PathBuf::from("out.ics")));
                assert!(!keep_going);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["coursecal", "calendar", "events.json", "--debug"]);
        assert!(cli.debug);
        assert!(matches!(cli.command, Command::Calendar { .. }));
    }

    #[test]
    fn extract_requires_a_file() {
        assert!(Cli::try_parse_from(["coursecal", "extract"]).is_err());
    }
}
