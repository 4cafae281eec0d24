//! The end-to-end pipeline.

use coursecal_core::{CandidateEvent, MergedEvent, PipelineConfig};
use serde::Serialize;
use tracing::{debug, info};

use crate::anchor::resolve_week_dates;
use crate::canonical::canonicalize_midterms;
use crate::dedup::deduplicate;
use crate::filter::{FilterRules, filter_events};
use crate::ics::events_to_ics;
use crate::normalize::normalize_candidates;

/// Runs candidates through normalization, week resolution, filtering,
/// midterm canonicalization and merging.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    rules: FilterRules,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Creates a pipeline; filter rules come from the configuration.
    pub fn new(config: PipelineConfig) -> Self {
        let rules = FilterRules::from_config(&config);
        Self { config, rules }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the filter rules.
    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Turns candidates into calendar-ready events.
    ///
    /// Records are processed in the order given; when several pages are
    /// concatenated, earlier pages win merge ties.
    pub fn run(&self, candidates: &[CandidateEvent]) -> Vec<MergedEvent> {
        let events = normalize_candidates(candidates, self.config.default_year);
        debug!(input = candidates.len(), normalized = events.len(), "Normalized candidates");

        let events = resolve_week_dates(events);

        let before = events.len();
        let events = filter_events(events, &self.rules);
        debug!(before, after = events.len(), "Filtered events");

        let events = canonicalize_midterms(events);
        let merged = deduplicate(events);

        info!(
            candidates = candidates.len(),
            events = merged.len(),
            "Pipeline finished"
        );
        merged
    }

    /// Serializes events as iCalendar bytes.
    pub fn to_ics(&self, events: &[MergedEvent]) -> Vec<u8> {
        events_to_ics(events, &self.config)
    }

    /// Runs the pipeline and serializes the result as iCalendar bytes.
    pub fn calendar(&self, candidates: &[CandidateEvent]) -> Vec<u8> {
        self.to_ics(&self.run(candidates))
    }

    /// Runs the pipeline and wraps the result in a [`ParseResponse`].
    pub fn respond(&self, candidates: &[CandidateEvent]) -> ParseResponse {
        ParseResponse::new(self.run(candidates))
    }
}

/// JSON response: `{ "events": [...], "success": true, "message": "Extracted N events" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResponse {
    pub events: Vec<MergedEvent>,
    pub success: bool,
    pub message: String,
}

impl ParseResponse {
    /// Wraps a successful result.
    pub fn new(events: Vec<MergedEvent>) -> Self {
        let message = format!("Extracted {} events", events.len());
        Self {
            events,
            success: true,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use coursecal_core::EventType;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::new(2026))
    }

    #[test]
    fn runs_all_stages() {
        let candidates = vec![
            CandidateEvent::new("Classes start").with_date("Jan 5"),
            CandidateEvent::new("Week 3 Friday quiz").with_event_type("quiz"),
            CandidateEvent::new("Office hours").with_date("Jan 6"),
            CandidateEvent::new("Week 2: Sorting").with_date("Jan 12"),
            CandidateEvent::new("Reading").with_event_type("other"),
        ];
        let events = pipeline().run(&candidates);
        let titles: Vec<_> = events.iter().map(|m| m.event.title.as_str()).collect();
        assert_eq!(titles, vec!["Classes start", "Week 3 Friday quiz"]);
        assert_eq!(
            events[1].event.date,
            NaiveDate::from_ymd_opt(2026, 1, 23)
        );
        assert_eq!(events[1].event.event_type, EventType::Quiz);
    }

    #[test]
    fn configured_keywords_reach_the_filter() {
        let config = PipelineConfig::new(2026).with_policy_keyword("lab safety");
        let candidates = vec![CandidateEvent::new("Lab safety training").with_date("Jan 8")];
        assert!(Pipeline::new(config).run(&candidates).is_empty());
        assert_eq!(pipeline().run(&candidates).len(), 1);
    }

    #[test]
    fn response_message_counts_events() {
        let candidates = vec![
            CandidateEvent::new("Quiz 1").with_date("Feb 3").with_event_type("quiz"),
            CandidateEvent::new("Quiz 2").with_date("Feb 10").with_event_type("quiz"),
        ];
        let response = pipeline().respond(&candidates);
        assert!(response.success);
        assert_eq!(response.message, "Extracted 2 events");
        assert_eq!(response.events.len(), 2);
    }

    #[test]
    fn empty_input() {
        let response = pipeline().respond(&[]);
        assert_eq!(response.message, "Extracted 0 events");
        let ics = String::from_utf8(pipeline().calendar(&[])).unwrap();
        assert!(ics.contains("BEGIN:VCALENDAR"));
    }
}
