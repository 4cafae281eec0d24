//! Reading extractor output into [`CandidateEvent`] records.
//!
//! The extraction step answers with free text that is supposed to be a JSON
//! array of event objects. In practice it arrives wrapped in markdown fences or
//! surrounded by commentary, and individual objects carry numbers where
//! strings were asked for. This module finds the array, then maps each object
//! loosely, skipping anything that has no usable title.

use std::sync::LazyLock;

use coursecal_core::CandidateEvent;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ParseError, ParseResult};

static ARRAY_SPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("Invalid array span regex"));

static BYDAY_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("Invalid byday separator regex"));

/// Parses raw extractor text into candidate records.
///
/// Markdown fences are stripped, then the outermost `[ ... ]` span is decoded.
/// If that span is not valid JSON (stray brackets in the commentary), the first
/// well-formed array inside it is used instead.
///
/// # Errors
///
/// Returns [`ParseError::NoArray`] when the text has no array span and
/// [`ParseError::InvalidJson`] when no array inside the span decodes.
pub fn parse_candidates(raw: &str) -> ParseResult<Vec<CandidateEvent>> {
    let text = strip_fences(raw);
    let span = ARRAY_SPAN_REGEX
        .find(text)
        .ok_or(ParseError::NoArray)?
        .as_str();

    let value = match serde_json::from_str::<Value>(span) {
        Ok(value) => value,
        Err(e) => match first_embedded_array(span) {
            Some(value) => {
                debug!(error = %e, "Outer array span invalid, using first embedded array");
                value
            }
            None => return Err(e.into()),
        },
    };

    parse_candidates_value(value)
}

/// Maps an already-decoded JSON value into candidate records.
///
/// Non-object elements and objects without a non-empty `title` are skipped.
///
/// # Errors
///
/// Returns [`ParseError::NotAnArray`] if the value is not a JSON array.
pub fn parse_candidates_value(value: Value) -> ParseResult<Vec<CandidateEvent>> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(ParseError::not_an_array(&other)),
    };

    let total = items.len();
    let candidates: Vec<CandidateEvent> = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => candidate_from_object(map),
            _ => None,
        })
        .collect();

    if candidates.len() < total {
        debug!(
            total,
            kept = candidates.len(),
            "Skipped non-object or untitled array elements"
        );
    }

    Ok(candidates)
}

/// Removes a leading ```` ```json ```` / ```` ``` ```` fence and a trailing ```` ``` ````.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim();
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }
    text
}

/// Bracket positions tried by [`first_embedded_array`] before giving up.
const MAX_ARRAY_STARTS: usize = 32;

/// Decodes the first complete JSON array starting at one of the first
/// [`MAX_ARRAY_STARTS`] `[` characters in `text`.
fn first_embedded_array(text: &str) -> Option<Value> {
    text.match_indices('[').take(MAX_ARRAY_STARTS).find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value @ Value::Array(_))) => Some(value),
            _ => None,
        }
    })
}

fn candidate_from_object(map: &Map<String, Value>) -> Option<CandidateEvent> {
    let title = map
        .get("title")
        .and_then(scalar_text)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        return None;
    }

    let mut candidate = CandidateEvent::new(title);
    candidate.date = map.get("date").and_then(scalar_text);
    candidate.description = map.get("description").and_then(scalar_text);
    if let Some(event_type) = map.get("event_type").and_then(scalar_text) {
        candidate.event_type = event_type;
    }
    candidate.time = map.get("time").and_then(scalar_text);
    candidate.recurrence = map.get("recurrence").and_then(scalar_text);
    candidate.byday = map.get("byday").and_then(byday_codes);
    candidate.until = map.get("until").and_then(scalar_text);

    Some(candidate)
}

/// Strings pass through; numbers and booleans are stringified; anything else is absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Accepts `["MO", "WE"]` or `"MO,WE"` / `"MO WE"`.
fn byday_codes(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::String(s) => Some(
            BYDAY_SEPARATOR_REGEX
                .split(s)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Accumulates candidates across several extraction calls, one per page.
///
/// A page that fails to parse reports its error to the caller; events already
/// collected from other pages are kept.
#[derive(Debug, Default)]
pub struct CandidateBatch {
    events: Vec<CandidateEvent>,
    pages: usize,
    failed_pages: usize,
}

impl CandidateBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one page of raw extractor text and appends its candidates.
    ///
    /// Returns the number of candidates the page contributed.
    ///
    /// # Errors
    ///
    /// Returns the page's [`ParseError`]; the batch is left as it was.
    pub fn push_page(&mut self, raw: &str) -> ParseResult<usize> {
        let result = parse_candidates(raw);
        self.record(result)
    }

    /// Appends candidates from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NotAnArray`] if the value is not an array.
    pub fn push_value(&mut self, value: Value) -> ParseResult<usize> {
        let result = parse_candidates_value(value);
        self.record(result)
    }

    fn record(&mut self, result: ParseResult<Vec<CandidateEvent>>) -> ParseResult<usize> {
        self.pages += 1;
        match result {
            Ok(events) => {
                let count = events.len();
                debug!(page = self.pages, count, "Collected candidates from page");
                self.events.extend(events);
                Ok(count)
            }
            Err(e) => {
                self.failed_pages += 1;
                warn!(page = self.pages, error = %e, "Failed to parse page");
                Err(e)
            }
        }
    }

    /// Number of candidates collected so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no candidate has been collected.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pages pushed, failed ones included.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of pages that failed to parse.
    pub fn failed_pages(&self) -> usize {
        self.failed_pages
    }

    /// The candidates collected so far, in page order.
    pub fn events(&self) -> &[CandidateEvent] {
        &self.events
    }

    /// Consumes the batch, returning its candidates in page order.
    pub fn into_events(self) -> Vec<CandidateEvent> {
        self.events
    }
}
