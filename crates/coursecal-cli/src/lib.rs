//! coursecal command-line client.
//!
//! Reads raw extractor output or event JSON, runs the syllabus pipeline and
//! writes event JSON or an iCalendar feed.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command, ConfigAction};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
