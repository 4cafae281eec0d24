//! CandidateEvent to NormalizedEvent conversion.
//!
//! The normalization process, per record:
//! 1. Rejects records whose title is empty after trimming
//! 2. Maps the free-text type onto the closed [`EventType`] set
//! 3. Parses date, time and recurrence end, degrading unparsable text to absent
//!    (an unparsable `Week N` date moves into the description for week resolution)
//! 4. Builds a [`WeeklyRule`] only when recurrence is `WEEKLY` and at least one weekday survives
//!
//! A bad field never fails a record; only a missing title does.

use coursecal_core::text::week_reference;
use coursecal_core::{
    CandidateEvent, EventType, NormalizedEvent, WEEKLY, Weekday, WeeklyRule, parse_date,
    parse_time,
};
use tracing::{debug, warn};

use crate::error::RecordError;

/// Converts a [`CandidateEvent`] to a [`NormalizedEvent`].
///
/// `default_year` is used for dates written without a year.
///
/// # Errors
///
/// Returns [`RecordError::EmptyTitle`] if the title is blank.
pub fn normalize_candidate(
    candidate: &CandidateEvent,
    default_year: i32,
) -> Result<NormalizedEvent, RecordError> {
    let title = candidate.title.trim();
    if title.is_empty() {
        return Err(RecordError::EmptyTitle);
    }

    let mut event = NormalizedEvent::new(title, EventType::from_label(&candidate.event_type));

    if let Some(ref description) = candidate.description
        && !description.trim().is_empty()
    {
        event = event.with_description(description.as_str());
    }

    if let Some(ref text) = candidate.date {
        match parse_date(text, default_year) {
            Some(date) => event = event.with_date(date),
            None if week_reference(text).is_some() => {
                debug!(title, date = %text, "Week reference kept in description");
                event.description = Some(with_note(event.description.take(), text.trim()));
            }
            None => debug!(title, date = %text, "Unparsable date dropped"),
        }
    }

    if let Some(ref text) = candidate.time {
        match parse_time(text) {
            Some(time) => event = event.with_time(time),
            None if !text.trim().is_empty() => debug!(title, time = %text, "Unparsable time dropped"),
            None => {}
        }
    }

    if let Some(rule) = weekly_rule(candidate, default_year) {
        event = event.with_recurrence(rule);
    }

    Ok(event)
}

/// Appends `note` to a description unless it already mentions it.
fn with_note(description: Option<String>, note: &str) -> String {
    match description {
        Some(text) if text.to_lowercase().contains(&note.to_lowercase()) => text,
        Some(text) => format!("{} {}", text.trim_end(), note),
        None => note.to_string(),
    }
}

/// Builds the recurrence, or `None` when it is not weekly or names no valid weekday.
fn weekly_rule(candidate: &CandidateEvent, default_year: i32) -> Option<WeeklyRule> {
    let recurrence = candidate.recurrence.as_deref()?.trim().to_uppercase();
    if recurrence != WEEKLY {
        debug!(title = %candidate.title, recurrence = %recurrence, "Unsupported recurrence dropped");
        return None;
    }

    let days = candidate
        .byday
        .iter()
        .flatten()
        .filter_map(|code| Weekday::from_code(code));
    let until = candidate
        .until
        .as_deref()
        .and_then(|text| parse_date(text, default_year));

    let rule = WeeklyRule::new(days, until);
    if rule.is_none() {
        debug!(title = %candidate.title, "Weekly recurrence without weekdays dropped");
    }
    rule
}

/// Normalizes a batch, skipping records that cannot be normalized.
///
/// Order is preserved. Each skipped record is logged at `warn`.
pub fn normalize_candidates(
    candidates: &[CandidateEvent],
    default_year: i32,
) -> Vec<NormalizedEvent> {
    candidates
        .iter()
        .enumerate()
        .filter_map(
            |(index, candidate)| match normalize_candidate(candidate, default_year) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(index, error = %e, "Skipping candidate record");
                    None
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    mod basic_normalization {
        use super::*;

        #[test]
        fn normalizes_minimal_candidate() {
            let event = normalize_candidate(&CandidateEvent::new("  Essay  "), 2026).unwrap();
            assert_eq!(event.title, "Essay");
            assert_eq!(event.event_type, EventType::Other);
            assert!(event.date.is_none());
            assert!(event.time.is_none());
            assert!(event.description.is_none());
            assert!(event.recurrence.is_none());
        }

        #[test]
        fn normalizes_all_fields() {
            let candidate = CandidateEvent::new("Midterm")
                .with_event_type(" EXAM ")
                .with_date("Feb 10")
                .with_time("2:30 PM - 3:20 PM")
                .with_description("Worth 25%");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert_eq!(event.event_type, EventType::Exam);
            assert_eq!(event.date, Some(date(2026, 2, 10)));
            assert_eq!(event.time, Some(time(14, 30)));
            assert_eq!(event.description.as_deref(), Some("Worth 25%"));
        }

        #[test]
        fn blank_title_is_an_error() {
            let err = normalize_candidate(&CandidateEvent::new("   "), 2026).unwrap_err();
            assert_eq!(err, RecordError::EmptyTitle);
        }

        #[test]
        fn unknown_type_becomes_other() {
            let candidate = CandidateEvent::new("Guest talk").with_event_type("seminar");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert_eq!(event.event_type, EventType::Other);
        }
    }

    mod field_defects {
        use super::*;

        #[test]
        fn unparsable_date_and_time_become_absent() {
            let candidate = CandidateEvent::new("Quiz 2")
                .with_date("TBA")
                .with_time("after lecture");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert!(event.date.is_none());
            assert!(event.time.is_none());
            assert!(event.description.is_none());
        }

        #[test]
        fn week_range_date_is_not_a_calendar_date() {
            let candidate = CandidateEvent::new("Project demo")
                .with_date("Week 3-4")
                .with_description("In lab.");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert!(event.date.is_none());
            assert_eq!(event.description.as_deref(), Some("In lab. Week 3-4"));
        }

        #[test]
        fn week_note_is_not_repeated() {
            let candidate = CandidateEvent::new("Project demo")
                .with_date("week 5")
                .with_description("Demo in Week 5");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert_eq!(event.description.as_deref(), Some("Demo in Week 5"));

            let undescribed = CandidateEvent::new("Project demo").with_date("Week 5");
            let event = normalize_candidate(&undescribed, 2026).unwrap();
            assert_eq!(event.description.as_deref(), Some("Week 5"));
        }

        #[test]
        fn blank_description_becomes_absent() {
            let candidate = CandidateEvent::new("Quiz 2").with_description("   ");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert!(event.description.is_none());
        }

        #[test]
        fn explicit_year_is_kept() {
            let candidate = CandidateEvent::new("Final exam").with_date("April 20, 2025");
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert_eq!(event.date, Some(date(2025, 4, 20)));
        }
    }

    mod recurrence {
        use super::*;

        #[test]
        fn weekly_with_days() {
            let candidate = CandidateEvent::new("Lecture").with_recurrence(
                "weekly",
                &["we", "MO", "XX", "MO"],
                Some("April 8"),
            );
            let event = normalize_candidate(&candidate, 2026).unwrap();
            let rule = event.recurrence.unwrap();
            assert_eq!(rule.days(), &[Weekday::Monday, Weekday::Wednesday]);
            assert_eq!(rule.until(), Some(date(2026, 4, 8)));
        }

        #[test]
        fn weekly_without_valid_days_is_cleared() {
            let candidate =
                CandidateEvent::new("Lecture").with_recurrence("WEEKLY", &["XX"], Some("2026-04-08"));
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert!(event.recurrence.is_none());
        }

        #[test]
        fn weekly_without_byday_is_cleared() {
            let mut candidate = CandidateEvent::new("Lecture");
            candidate.recurrence = Some("WEEKLY".to_string());
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert!(event.recurrence.is_none());
        }

        #[test]
        fn other_frequencies_are_dropped() {
            let candidate = CandidateEvent::new("Seminar").with_recurrence("MONTHLY", &["MO"], None);
            let event = normalize_candidate(&candidate, 2026).unwrap();
            assert!(event.recurrence.is_none());
        }
    }

    mod batch_normalization {
        use super::*;

        #[test]
        fn skips_bad_records_and_keeps_order() {
            let candidates = vec![
                CandidateEvent::new("Quiz 1"),
                CandidateEvent::new(""),
                CandidateEvent::new("Quiz 2"),
            ];
            let events = normalize_candidates(&candidates, 2026);
            let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
            assert_eq!(titles, vec!["Quiz 1", "Quiz 2"]);
        }
    }
}
