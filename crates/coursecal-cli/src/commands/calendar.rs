//! `calendar`: a JSON list of events to an iCalendar feed.

use std::path::Path;

use coursecal_core::CandidateEvent;
use coursecal_pipeline::{ParseResult, Pipeline, parse_candidates, parse_candidates_value};
use serde_json::Value;
use tracing::info;

use super::{read_input, write_output};
use crate::error::{CliError, CliResult};

/// Runs the events in `file` through the pipeline and writes the feed.
///
/// The file holds either a bare events array or a whole `extract` response.
pub fn run(pipeline: &Pipeline, file: &Path, output: Option<&Path>) -> CliResult<()> {
    let raw = read_input(file)?;
    let candidates = events_in(&raw).map_err(|e| CliError::parse(file, e))?;
    info!(count = candidates.len(), "Building calendar");

    write_output(output, &pipeline.calendar(&candidates))
}

fn events_in(raw: &str) -> ParseResult<Vec<CandidateEvent>> {
    if let Ok(Value::Object(mut response)) = serde_json::from_str::<Value>(raw)
        && let Some(events) = response.remove("events")
    {
        return parse_candidates_value(events);
    }
    parse_candidates(raw)
}
