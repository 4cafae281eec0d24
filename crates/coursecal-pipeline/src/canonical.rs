//! Assessment identity.
//!
//! Exams and quizzes show up under many spellings: `Midterm #1`, `MIDTERM 1`,
//! `First midterm (in class)`. [`canonical_assessment_key`] maps them to a
//! stable family key, and [`canonicalize_midterms`] retitles unnumbered
//! midterms that share a date with a numbered one.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use coursecal_core::{EventType, NormalizedEvent, clean_text};
use regex::Regex;
use tracing::debug;

static FAMILY_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(midterm|quiz|test|exam)\s*(\d{1,2})\b").expect("Invalid family number regex")
});

static MIDTERM_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmidterm\s*(\d{1,2})\b").expect("Invalid midterm number regex"));

/// Ordinal words that number a midterm, checked in order.
const ORDINAL_WORDS: &[(&str, &str)] = &[
    (r"\b(first|one)\b", "1"),
    (r"\b(second|two)\b", "2"),
    (r"\b(third|three)\b", "3"),
];

static ORDINAL_WORD_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ORDINAL_WORDS
        .iter()
        .map(|(pattern, n)| (Regex::new(pattern).expect("Invalid ordinal word regex"), *n))
        .collect()
});

/// Cleaned title and description of an event.
fn cleaned_blob(event: &NormalizedEvent) -> String {
    clean_text(&event.combined_text())
}

/// Returns the family key of an assessment, e.g. `midterm-1`, `final-x`, `quiz-x`.
///
/// Families are tried in order: midterm, final exam, quiz, test, generic exam.
/// The number comes from `<family> N`, or for midterms from an ordinal word.
/// Returns an empty string for anything that is not an assessment.
pub fn canonical_assessment_key(event: &NormalizedEvent) -> String {
    let blob = cleaned_blob(event);
    let typed_exam = event.event_type == EventType::Exam;

    let is_midterm = blob.contains("midterm");
    let is_final_exam = blob.contains("final")
        && !blob.contains("final report")
        && (typed_exam || blob.contains("exam"));
    let is_quiz = blob.contains("quiz");
    let is_test = blob.contains("test") && !is_midterm && !is_quiz;
    let is_exam = typed_exam || blob.contains("exam");

    let mut number = FAMILY_NUMBER_REGEX
        .captures(&blob)
        .map(|caps| caps[2].to_string());
    if is_midterm && number.is_none() {
        number = ORDINAL_WORD_REGEXES
            .iter()
            .find(|(re, _)| re.is_match(&blob))
            .map(|(_, n)| n.to_string());
    }
    let number = number.as_deref().unwrap_or("x");

    if is_midterm {
        format!("midterm-{number}")
    } else if is_final_exam {
        "final-x".to_string()
    } else if is_quiz {
        format!("quiz-{number}")
    } else if is_test {
        format!("test-{number}")
    } else if is_exam {
        format!("exam-{number}")
    } else {
        String::new()
    }
}

/// Returns the midterm number written in the event's cleaned text, if any.
fn midterm_number(blob: &str) -> Option<String> {
    MIDTERM_NUMBER_REGEX
        .captures(blob)
        .map(|caps| caps[1].to_string())
}

/// The date of a dated exam record.
fn midterm_date(event: &NormalizedEvent) -> Option<NaiveDate> {
    if event.event_type != EventType::Exam {
        return None;
    }
    event.date
}

/// Converges midterm records sharing a date onto one `Midterm N` title.
///
/// For each date with a numbered midterm exam (the last one seen wins), other
/// exam records on that date that mention a midterm are retitled:
/// - without a number of their own, the title becomes `Midterm N` and the old
///   title is kept at the front of the description;
/// - already titled `midterm N` after cleaning, only the spelling changes.
pub fn canonicalize_midterms(mut events: Vec<NormalizedEvent>) -> Vec<NormalizedEvent> {
    let mut numbers: HashMap<NaiveDate, String> = HashMap::new();
    for event in &events {
        let Some(date) = midterm_date(event) else {
            continue;
        };
        if let Some(n) = midterm_number(&cleaned_blob(event)) {
            numbers.insert(date, n);
        }
    }
    if numbers.is_empty() {
        return events;
    }

    for event in &mut events {
        let Some(date) = midterm_date(event) else {
            continue;
        };
        let Some(n) = numbers.get(&date) else {
            continue;
        };
        let blob = cleaned_blob(event);
        if !blob.contains("midterm") {
            continue;
        }

        let canonical = format!("Midterm {n}");
        if midterm_number(&blob).is_none() {
            let old = event.title.trim().to_string();
            if !old.is_empty() && !old.eq_ignore_ascii_case(&canonical) {
                let description = format!("{old}. {}", event.description.as_deref().unwrap_or(""));
                event.description = Some(description.trim().to_string());
            }
            debug!(date = %date, from = %old, to = %canonical, "Assigned midterm number from same-day record");
            event.title = canonical;
        } else if clean_text(&event.title) == canonical.to_lowercase() && event.title != canonical {
            debug!(date = %date, from = %event.title, to = %canonical, "Respelled midterm title");
            event.title = canonical;
        }
    }

    events
}
