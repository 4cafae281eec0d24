//! Event types for syllabus events.
//!
//! Records move through three shapes:
//! - [`CandidateEvent`]: loosely typed output of the extraction step, also the JSON wire shape
//! - [`NormalizedEvent`]: every field constrained to its canonical form
//! - [`MergedEvent`]: a normalized event that absorbed its duplicates
//!
//! Weekly recurrence is carried as a single [`WeeklyRule`] so a recurrence can
//! never exist without at least one weekday.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::time::{format_date, format_time};

/// The literal recurrence value accepted from the extractor.
pub const WEEKLY: &str = "WEEKLY";

/// The classification of a syllabus event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Assignment,
    Project,
    Demo,
    Report,
    Quiz,
    Exam,
    Lab,
    Presentation,
    #[default]
    Other,
}

impl EventType {
    /// Every accepted event type.
    pub const ALL: [EventType; 9] = [
        Self::Assignment,
        Self::Project,
        Self::Demo,
        Self::Report,
        Self::Quiz,
        Self::Exam,
        Self::Lab,
        Self::Presentation,
        Self::Other,
    ];

    /// Returns the wire label for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Project => "project",
            Self::Demo => "demo",
            Self::Report => "report",
            Self::Quiz => "quiz",
            Self::Exam => "exam",
            Self::Lab => "lab",
            Self::Presentation => "presentation",
            Self::Other => "other",
        }
    }

    /// Maps a free-text label onto the closed set.
    ///
    /// The label is trimmed and lower-cased; anything unknown becomes [`EventType::Other`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == label)
            .unwrap_or_default()
    }

    /// Merge precedence. Higher wins when duplicates disagree.
    ///
    /// The gap between quiz and report is where a "test" family would sit; tests
    /// are stored as exams or quizzes.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Exam => 100,
            Self::Quiz => 90,
            Self::Report => 80,
            Self::Project => 70,
            Self::Assignment => 60,
            Self::Lab => 50,
            Self::Presentation => 40,
            Self::Demo => 30,
            Self::Other => 0,
        }
    }

    /// Returns true for types whose identity uses the canonical assessment key.
    pub fn is_assessment(&self) -> bool {
        matches!(self, Self::Exam | Self::Quiz)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A day of the week, serialized with its two-letter iCalendar code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
    #[serde(rename = "SU")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Returns the iCalendar BYDAY code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }

    /// Parses a BYDAY code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    /// Days since Monday (Monday = 0).
    pub fn num_days_from_monday(&self) -> i64 {
        *self as i64
    }

    /// Converts from chrono's weekday.
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A weekly recurrence on one or more weekdays, optionally bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeeklyRule {
    days: Vec<Weekday>,
    until: Option<NaiveDate>,
}

impl WeeklyRule {
    /// Creates a rule from the given weekdays.
    ///
    /// Days are deduplicated and kept in Monday-first order. Returns `None` when
    /// no weekday is given, since a weekly rule without days cannot be scheduled.
    pub fn new(days: impl IntoIterator<Item = Weekday>, until: Option<NaiveDate>) -> Option<Self> {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort();
        days.dedup();
        if days.is_empty() {
            return None;
        }
        Some(Self { days, until })
    }

    /// The weekdays this rule repeats on, Monday first.
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// The last day (inclusive) of the recurrence, if bounded.
    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    /// Comma-joined BYDAY codes, e.g. `MO,WE`.
    pub fn byday(&self) -> String {
        self.days
            .iter()
            .map(Weekday::code)
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn default_event_type() -> String {
    EventType::Other.as_str().to_string()
}

/// A raw event as produced by the extraction step.
///
/// Every field except `title` is free text. This is also the JSON shape of the
/// records returned to callers, so normalized output can be fed back in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    #[serde(default)]
    pub date: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub byday: Option<Vec<String>>,
    #[serde(default)]
    pub until: Option<String>,
}

impl CandidateEvent {
    /// Creates a candidate with only a title; the type defaults to `other`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            date: None,
            title: title.into(),
            description: None,
            event_type: default_event_type(),
            time: None,
            recurrence: None,
            byday: None,
            until: None,
        }
    }

    /// Builder method to set the date text.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the event type label.
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Builder method to set the time text.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Builder method to set recurrence, weekday codes and end date.
    pub fn with_recurrence(
        mut self,
        recurrence: impl Into<String>,
        byday: &[&str],
        until: Option<&str>,
    ) -> Self {
        self.recurrence = Some(recurrence.into());
        self.byday = Some(byday.iter().map(|d| d.to_string()).collect());
        self.until = until.map(str::to_string);
        self
    }
}

/// An event whose fields are all in canonical form.
///
/// Serializes to the flat [`CandidateEvent`] shape (`YYYY-MM-DD` dates, `HH:MM`
/// times, `WEEKLY` recurrence with BYDAY codes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "CandidateEvent")]
pub struct NormalizedEvent {
    /// The day the event happens, if resolved.
    pub date: Option<NaiveDate>,
    /// The event title, never empty.
    pub title: String,
    /// Free-text context (weights, locations, unresolved week references).
    pub description: Option<String>,
    pub event_type: EventType,
    /// Start time, only when the source stated one.
    pub time: Option<NaiveTime>,
    pub recurrence: Option<WeeklyRule>,
}

impl NormalizedEvent {
    /// Creates an undated, untimed event.
    pub fn new(title: impl Into<String>, event_type: EventType) -> Self {
        Self {
            date: None,
            title: title.into(),
            description: None,
            event_type,
            time: None,
            recurrence: None,
        }
    }

    /// Builder method to set the date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Builder method to set the start time.
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the weekly recurrence.
    pub fn with_recurrence(mut self, rule: WeeklyRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Title and description joined by a space, for keyword matching.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }

    /// Returns true if the event carries a weekly recurrence.
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// An event can be put on a calendar if it has a date or a weekly rule.
    pub fn is_schedulable(&self) -> bool {
        self.date.is_some() || self.is_recurring()
    }
}

impl From<NormalizedEvent> for CandidateEvent {
    fn from(event: NormalizedEvent) -> Self {
        let (recurrence, byday, until) = match event.recurrence {
            Some(rule) => (
                Some(WEEKLY.to_string()),
                Some(rule.days().iter().map(|d| d.code().to_string()).collect()),
                rule.until().map(format_date),
            ),
            None => (None, None, None),
        };
        Self {
            date: event.date.map(format_date),
            title: event.title,
            description: event.description,
            event_type: event.event_type.as_str().to_string(),
            time: event.time.map(format_time),
            recurrence,
            byday,
            until,
        }
    }
}

/// A normalized event after duplicate merging.
///
/// Serializes exactly like the wrapped [`NormalizedEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedEvent {
    pub event: NormalizedEvent,
    /// Number of duplicate records folded into this one.
    #[serde(skip)]
    pub absorbed: usize,
}

impl MergedEvent {
    /// Wraps a single event that has not absorbed anything yet.
    pub fn new(event: NormalizedEvent) -> Self {
        Self { event, absorbed: 0 }
    }

    /// Unwraps the merged event.
    pub fn into_event(self) -> NormalizedEvent {
        self.event
    }
}

impl From<NormalizedEvent> for MergedEvent {
    fn from(event: NormalizedEvent) -> Self {
        Self::new(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod event_type {
        use super::*;

        #[test]
        fn from_label_is_case_and_space_insensitive() {
            assert_eq!(EventType::from_label("  Exam "), EventType::Exam);
            assert_eq!(EventType::from_label("PRESENTATION"), EventType::Presentation);
        }

        #[test]
        fn unknown_labels_become_other() {
            assert_eq!(EventType::from_label("discussion"), EventType::Other);
            assert_eq!(EventType::from_label(""), EventType::Other);
            assert_eq!(EventType::from_label("test"), EventType::Other);
        }

        #[test]
        fn priority_order() {
            let ordered = [
                EventType::Exam,
                EventType::Quiz,
                EventType::Report,
                EventType::Project,
                EventType::Assignment,
                EventType::Lab,
                EventType::Presentation,
                EventType::Demo,
                EventType::Other,
            ];
            for pair in ordered.windows(2) {
                assert!(pair[0].priority() > pair[1].priority(), "{:?}", pair);
            }
        }

        #[test]
        fn serde_uses_snake_case() {
            let json = serde_json::to_string(&EventType::Presentation).unwrap();
            assert_eq!(json, "\"presentation\"");
        }
    }

    mod weekday {
        use super::*;

        #[test]
        fn codes_roundtrip() {
            for day in Weekday::ALL {
                assert_eq!(Weekday::from_code(day.code()), Some(day));
            }
            assert_eq!(Weekday::from_code(" fr "), Some(Weekday::Friday));
            assert_eq!(Weekday::from_code("FRI"), None);
        }

        #[test]
        fn chrono_conversion() {
            assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Sunday);
            assert_eq!(Weekday::Thursday.num_days_from_monday(), 3);
        }
    }

    mod weekly_rule {
        use super::*;

        #[test]
        fn requires_a_day() {
            assert!(WeeklyRule::new(Vec::new(), None).is_none());
        }

        #[test]
        fn sorts_and_dedups_days() {
            let rule = WeeklyRule::new(
                [Weekday::Friday, Weekday::Monday, Weekday::Friday],
                Some(date(2026, 4, 10)),
            )
            .unwrap();
            assert_eq!(rule.days(), &[Weekday::Monday, Weekday::Friday]);
            assert_eq!(rule.byday(), "MO,FR");
            assert_eq!(rule.until(), Some(date(2026, 4, 10)));
        }
    }

    mod wire_shape {
        use super::*;

        #[test]
        fn normalized_serializes_flat() {
            let event = NormalizedEvent::new("Lecture", EventType::Other)
                .with_date(date(2026, 1, 5))
                .with_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
                .with_recurrence(
                    WeeklyRule::new([Weekday::Wednesday, Weekday::Monday], Some(date(2026, 4, 8)))
                        .unwrap(),
                );
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["date"], "2026-01-05");
            assert_eq!(value["time"], "14:30");
            assert_eq!(value["event_type"], "other");
            assert_eq!(value["recurrence"], "WEEKLY");
            assert_eq!(value["byday"], serde_json::json!(["MO", "WE"]));
            assert_eq!(value["until"], "2026-04-08");
            assert!(value["description"].is_null());
        }

        #[test]
        fn all_day_snapshot() {
            let event = NormalizedEvent::new("Assignment 1", EventType::Assignment)
                .with_date(date(2026, 2, 10))
                .with_description("Submit via LMS.");
            insta::assert_snapshot!(serde_json::to_string_pretty(&event).unwrap(), @r#"
            {
              "date": "2026-02-10",
              "title": "Assignment 1",
              "description": "Submit via LMS.",
              "event_type": "assignment",
              "time": null,
              "recurrence": null,
              "byday": null,
              "until": null
            }
            "#);
        }

        #[test]
        fn merged_serializes_like_inner_event() {
            let event = NormalizedEvent::new("Quiz 1", EventType::Quiz).with_date(date(2026, 2, 3));
            let merged = MergedEvent {
                event: event.clone(),
                absorbed: 2,
            };
            assert_eq!(
                serde_json::to_value(&merged).unwrap(),
                serde_json::to_value(&event).unwrap()
            );
        }

        #[test]
        fn candidate_defaults_missing_keys() {
            let candidate: CandidateEvent =
                serde_json::from_str(r#"{"title": "Essay"}"#).unwrap();
            assert_eq!(candidate.event_type, "other");
            assert!(candidate.date.is_none());
            assert!(candidate.byday.is_none());
        }

        #[test]
        fn schedulable_requires_date_or_rule() {
            let undated = NormalizedEvent::new("Reading", EventType::Other);
            assert!(!undated.is_schedulable());
            let weekly = undated
                .clone()
                .with_recurrence(WeeklyRule::new([Weekday::Tuesday], None).unwrap());
            assert!(weekly.is_schedulable());
            assert!(undated.with_date(date(2026, 1, 6)).is_schedulable());
        }
    }
}
