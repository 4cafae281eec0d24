//! `extract`: raw extractor pages to event JSON or an iCalendar feed.

use std::path::PathBuf;

use coursecal_pipeline::{CandidateBatch, Pipeline};
use tracing::{info, warn};

use super::{read_input, write_output};
use crate::error::{CliError, CliResult};

/// Options for the `extract` command.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub files: Vec<PathBuf>,
    pub ics: bool,
    pub output: Option<PathBuf>,
    pub keep_going: bool,
}

/// Parses every page in order, runs the pipeline once over the whole batch
/// and writes the result.
pub fn run(pipeline: &Pipeline, options: &ExtractOptions) -> CliResult<()> {
    let batch = collect(&options.files, options.keep_going)?;
    if batch.failed_pages() > 0 {
        warn!(
            failed = batch.failed_pages(),
            pages = batch.pages(),
            "Some pages could not be parsed"
        );
    }

    let bytes = if options.ics {
        pipeline.calendar(batch.events())
    } else {
        let response = pipeline.respond(batch.events());
        info!(message = %response.message, "Extraction finished");
        let mut json = serde_json::to_vec_pretty(&response)?;
        json.push(b'\n');
        json
    };

    write_output(options.output.as_deref(), &bytes)
}

fn collect(files: &[PathBuf], keep_going: bool) -> CliResult<CandidateBatch> {
    let mut batch = CandidateBatch::new();
    for path in files {
        let raw = read_input(path)?;
        if let Err(e) = batch.push_page(&raw)
            && !keep_going
        {
            return Err(CliError::parse(path, e));
        }
    }
    Ok(batch)
}
