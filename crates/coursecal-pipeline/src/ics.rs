//! iCalendar output.
//!
//! Each dated event becomes a VEVENT whose UID is its identity hash, so
//! re-importing a regenerated feed updates events instead of duplicating them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use coursecal_core::{MergedEvent, NormalizedEvent, PipelineConfig, WeeklyRule};
use icalendar::{Calendar, Component, Event, EventLike, Property};
use tracing::{debug, warn};

use crate::dedup::event_uid;

/// Builds a calendar from merged events.
///
/// Undated events are skipped, recurring ones included: a weekly rule needs a
/// first occurrence.
pub fn build_calendar(events: &[MergedEvent], config: &PipelineConfig) -> Calendar {
    let mut calendar = Calendar::empty();
    calendar.append_property(Property::new("VERSION", "2.0"));
    calendar.append_property(Property::new("PRODID", config.prodid.as_str()));

    let mut written = 0;
    for merged in events {
        let event = &merged.event;
        let Some(date) = event.date else {
            warn!(title = %event.title, "Skipping undated event in calendar output");
            continue;
        };
        calendar.push(to_vevent(event, date, &config.uid_namespace));
        written += 1;
    }

    debug!(events = written, skipped = events.len() - written, "Built calendar");
    calendar
}

/// Serializes merged events as an iCalendar byte stream.
pub fn events_to_ics(events: &[MergedEvent], config: &PipelineConfig) -> Vec<u8> {
    build_calendar(events, config).to_string().into_bytes()
}

fn to_vevent(event: &NormalizedEvent, date: NaiveDate, namespace: &str) -> Event {
    let mut vevent = Event::new();
    vevent
        .uid(&event_uid(event, namespace))
        .summary(&event.title)
        .description(event.description.as_deref().unwrap_or(""));

    match event.time {
        Some(time) => {
            let start = date.and_time(time);
            vevent.starts(start).ends(start + Duration::hours(1));
        }
        None => {
            vevent.starts(date).ends(date + Duration::days(1));
        }
    }

    if let Some(ref rule) = event.recurrence {
        vevent.add_property("RRULE", rrule(rule));
    }

    vevent
}

/// `FREQ=WEEKLY;BYDAY=MO,WE[;UNTIL=YYYYMMDDT235959]`, the end bound covering the whole last day.
fn rrule(rule: &WeeklyRule) -> String {
    let mut value = format!("FREQ=WEEKLY;BYDAY={}", rule.byday());
    if let Some(until) = rule.until() {
        let end_of_day: NaiveDateTime = until.and_hms_opt(23, 59, 59).unwrap_or_default();
        value.push_str(&format!(";UNTIL={}", end_of_day.format("%Y%m%dT%H%M%S")));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use coursecal_core::{EventType, Weekday};
    use icalendar::{CalendarComponent, DatePerhapsTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(2026).with_prodid("-//Test//Syllabus//EN")
    }

    fn merged(event: NormalizedEvent) -> MergedEvent {
        MergedEvent::new(event)
    }

    fn render(events: &[MergedEvent]) -> String {
        String::from_utf8(events_to_ics(events, &config())).unwrap()
    }

    fn parsed_events(ics: &str) -> Vec<Event> {
        let calendar: Calendar = ics.parse().unwrap();
        calendar
            .iter()
            .filter_map(|component| match component {
                CalendarComponent::Event(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    mod header {
        use super::*;

        #[test]
        fn version_and_prodid() {
            let ics = render(&[]);
            assert!(ics.starts_with("BEGIN:VCALENDAR"));
            assert!(ics.contains("VERSION:2.0"));
            assert!(ics.contains("PRODID:-//Test//Syllabus//EN"));
            assert!(parsed_events(&ics).is_empty());
        }
    }

    mod events {
        use super::*;

        #[test]
        fn all_day_event() {
            let event = NormalizedEvent::new("Assignment 1", EventType::Assignment)
                .with_date(date(2026, 2, 10));
            let uid = event_uid(&event, "coursecal");
            let ics = render(&[merged(event)]);

            let events = parsed_events(&ics);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].get_uid(), Some(uid.as_str()));
            assert_eq!(events[0].get_summary(), Some("Assignment 1"));
            assert_eq!(
                events[0].get_start(),
                Some(DatePerhapsTime::Date(date(2026, 2, 10)))
            );
            assert_eq!(
                events[0].get_end(),
                Some(DatePerhapsTime::Date(date(2026, 2, 11)))
            );
            assert!(events[0].property_value("RRULE").is_none());
        }

        #[test]
        fn timed_event_lasts_one_hour() {
            let event = NormalizedEvent::new("Quiz 2", EventType::Quiz)
                .with_date(date(2026, 2, 10))
                .with_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap());
            let ics = render(&[merged(event)]);
            assert!(ics.contains("DTSTART:20260210T143000"));
            assert!(ics.contains("DTEND:20260210T153000"));
        }

        #[test]
        fn weekly_rule_with_until() {
            let event = NormalizedEvent::new("Lecture", EventType::Other)
                .with_date(date(2026, 1, 5))
                .with_recurrence(
                    WeeklyRule::new([Weekday::Monday, Weekday::Wednesday], Some(date(2026, 4, 8)))
                        .unwrap(),
                );
            let ics = render(&[merged(event)]);
            assert!(ics.contains("RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20260408T235959"));
        }

        #[test]
        fn weekly_rule_without_until() {
            let event = NormalizedEvent::new("Tutorial", EventType::Other)
                .with_date(date(2026, 1, 6))
                .with_recurrence(WeeklyRule::new([Weekday::Tuesday], None).unwrap());
            let ics = render(&[merged(event)]);
            let events = parsed_events(&ics);
            assert_eq!(events[0].property_value("RRULE"), Some("FREQ=WEEKLY;BYDAY=TU"));
        }

        #[test]
        fn undated_events_are_skipped() {
            let undated = NormalizedEvent::new("Lecture", EventType::Other)
                .with_recurrence(WeeklyRule::new([Weekday::Monday], None).unwrap());
            let dated =
                NormalizedEvent::new("Quiz 1", EventType::Quiz).with_date(date(2026, 2, 3));
            let ics = render(&[merged(undated), merged(dated)]);
            let events = parsed_events(&ics);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].get_summary(), Some("Quiz 1"));
        }

        #[test]
        fn uids_are_stable_across_runs() {
            let event = NormalizedEvent::new("Midterm 1", EventType::Exam)
                .with_date(date(2026, 3, 2))
                .with_description("In class.");
            let first = parsed_events(&render(&[merged(event.clone())]));
            let second = parsed_events(&render(&[merged(event)]));
            assert_eq!(first[0].get_uid(), second[0].get_uid());
        }
    }
}
