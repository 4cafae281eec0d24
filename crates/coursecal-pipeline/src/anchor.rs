//! Week-relative date resolution.
//!
//! Syllabi often schedule things as "Week 3 Friday" and mention the start of
//! term once. The earliest dated term-start record becomes the anchor, and
//! undated records with a `Week N` reference are placed relative to it.

use chrono::{Datelike, Duration, NaiveDate};
use coursecal_core::{NormalizedEvent, Weekday};
use coursecal_core::text::{is_term_start, week_reference, weekday_mention};
use tracing::debug;

/// Returns the earliest date among dated records that announce the start of term.
pub fn find_term_anchor(events: &[NormalizedEvent]) -> Option<NaiveDate> {
    events
        .iter()
        .filter(|event| is_term_start(&event.combined_text()))
        .filter_map(|event| event.date)
        .min()
}

/// Computes the date of `weekday` in week `week` of a term starting on `anchor`.
///
/// Week `week` starts `(week - 1) * 7` days after the anchor. Without a weekday
/// that start is returned; with one, the date is shifted inside that week by
/// the weekday difference, which can move backwards when the anchor is not a
/// Monday.
pub fn week_date(anchor: NaiveDate, week: u32, weekday: Option<Weekday>) -> NaiveDate {
    let week_start = anchor + Duration::days(i64::from(week.saturating_sub(1)) * 7);
    match weekday {
        Some(day) => {
            let start_day = Weekday::from_chrono(week_start.weekday());
            week_start + Duration::days(day.num_days_from_monday() - start_day.num_days_from_monday())
        }
        None => week_start,
    }
}

/// Fills in dates for undated records that reference a week of term.
///
/// Without an anchor nothing changes and the week reference stays in the text.
pub fn resolve_week_dates(events: Vec<NormalizedEvent>) -> Vec<NormalizedEvent> {
    let Some(anchor) = find_term_anchor(&events) else {
        debug!("No term start found, week references left unresolved");
        return events;
    };
    debug!(anchor = %anchor, "Found term start anchor");

    events
        .into_iter()
        .map(|mut event| {
            if event.date.is_none() {
                let text = event.combined_text();
                if let Some(week) = week_reference(&text) {
                    let date = week_date(anchor, week, weekday_mention(&text));
                    debug!(title = %event.title, week, date = %date, "Resolved week reference");
                    event.date = Some(date);
                }
            }
            event
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecal_core::EventType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn term_start(on: NaiveDate) -> NormalizedEvent {
        NormalizedEvent::new("Classes start", EventType::Other).with_date(on)
    }

    mod anchor {
        use super::*;

        #[test]
        fn earliest_matching_record_wins() {
            let events = vec![
                NormalizedEvent::new("Quiz 1", EventType::Quiz).with_date(date(2025, 12, 1)),
                term_start(date(2026, 1, 12)),
                NormalizedEvent::new("First day of classes", EventType::Other)
                    .with_date(date(2026, 1, 5)),
            ];
            assert_eq!(find_term_anchor(&events), Some(date(2026, 1, 5)));
        }

        #[test]
        fn description_can_announce_term_start() {
            let events = vec![
                NormalizedEvent::new("Orientation", EventType::Other)
                    .with_date(date(2026, 1, 6))
                    .with_description("Term begins with a welcome session."),
            ];
            assert_eq!(find_term_anchor(&events), Some(date(2026, 1, 6)));
        }

        #[test]
        fn undated_announcements_are_ignored() {
            let events = vec![NormalizedEvent::new("Classes start", EventType::Other)];
            assert_eq!(find_term_anchor(&events), None);
        }
    }

    mod week_arithmetic {
        use super::*;

        #[test]
        fn week_start_without_weekday() {
            assert_eq!(week_date(date(2026, 1, 5), 1, None), date(2026, 1, 5));
            assert_eq!(week_date(date(2026, 1, 5), 4, None), date(2026, 1, 26));
        }

        #[test]
        fn weekday_inside_week() {
            assert_eq!(
                week_date(date(2026, 1, 5), 3, Some(Weekday::Friday)),
                date(2026, 1, 23)
            );
        }

        #[test]
        fn midweek_anchor_can_shift_backwards() {
            // 2026-01-07 is a Wednesday.
            assert_eq!(
                week_date(date(2026, 1, 7), 2, Some(Weekday::Monday)),
                date(2026, 1, 12)
            );
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn resolves_undated_week_references() {
            let events = vec![
                term_start(date(2026, 1, 5)),
                NormalizedEvent::new("Week 3 Friday quiz", EventType::Quiz),
                NormalizedEvent::new("Reflection", EventType::Assignment)
                    .with_description("Due in week 2"),
            ];
            let resolved = resolve_week_dates(events);
            assert_eq!(resolved[1].date, Some(date(2026, 1, 23)));
            assert_eq!(resolved[2].date, Some(date(2026, 1, 12)));
        }

        #[test]
        fn dated_records_are_untouched() {
            let events = vec![
                term_start(date(2026, 1, 5)),
                NormalizedEvent::new("Week 3 quiz", EventType::Quiz).with_date(date(2026, 2, 1)),
            ];
            let resolved = resolve_week_dates(events);
            assert_eq!(resolved[1].date, Some(date(2026, 2, 1)));
        }

        #[test]
        fn without_anchor_text_is_preserved() {
            let events = vec![NormalizedEvent::new("Week 3 Friday quiz", EventType::Quiz)];
            let resolved = resolve_week_dates(events);
            assert!(resolved[0].date.is_none());
            assert_eq!(resolved[0].title, "Week 3 Friday quiz");
        }
    }
}
