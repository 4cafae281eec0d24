//! Duplicate merging and event identity.
//!
//! Independent extraction passes (one per page) report the same deliverable
//! several times with slightly different titles, times and descriptions.
//! Records are grouped by a key and merged field by field instead of dropped:
//! - dated one-off events group by date and a normalized title
//! - recurring and undated events group by their identity hash, which is also
//!   the calendar UID

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use coursecal_core::text::{TITLE_SYNONYMS, clean_text, collapse_whitespace};
use coursecal_core::{MergedEvent, NormalizedEvent, WEEKLY, format_date, format_time};
use regex::Regex;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::canonical::canonical_assessment_key;

static DUE_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdue\b").expect("Invalid due regex"));

static SENTENCE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("Invalid sentence break regex"));

/// Normalizes a title for merge keying.
///
/// Cleans the text, drops the word `due` and folds title synonyms so that
/// `Group Contract due` and `Group Contract` collide.
pub fn merge_title_key(title: &str) -> String {
    let cleaned = clean_text(title);
    let mut key = DUE_WORD_REGEX.replace_all(&cleaned, " ").into_owned();
    for (from, to) in TITLE_SYNONYMS {
        key = key.replace(from, to);
    }
    collapse_whitespace(&key)
}

/// SHA-1 hex digest of the fields that identify an event.
///
/// Exams and quizzes use their canonical assessment key in place of the title,
/// so spelling variants of the same assessment hash alike.
pub fn identity_hash(event: &NormalizedEvent) -> String {
    let assessment_key = if event.event_type.is_assessment() {
        canonical_assessment_key(event)
    } else {
        String::new()
    };
    let title_part = if assessment_key.is_empty() {
        event.title.trim().to_lowercase()
    } else {
        assessment_key
    };

    let (recurrence, byday, until) = match &event.recurrence {
        Some(rule) => (
            WEEKLY.to_string(),
            rule.byday(),
            rule.until().map(format_date).unwrap_or_default(),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    let base = [
        title_part,
        event.date.map(format_date).unwrap_or_default(),
        event.time.map(format_time).unwrap_or_default(),
        event.event_type.as_str().to_string(),
        recurrence,
        byday,
        until,
    ]
    .join("|");

    let mut hasher = Sha1::new();
    hasher.update(base.as_bytes());
    hex::encode(hasher.finalize())
}

/// Calendar UID of an event: `<identity hash>@<namespace>`.
pub fn event_uid(event: &NormalizedEvent, namespace: &str) -> String {
    format!("{}@{}", identity_hash(event), namespace)
}

/// Grouping key: date and normalized title for dated one-off events,
/// identity hash otherwise.
pub fn merge_key(event: &NormalizedEvent) -> String {
    match event.date {
        Some(date) if !event.is_recurring() => {
            format!("{}|{}", format_date(date), merge_title_key(&event.title))
        }
        _ => identity_hash(event),
    }
}

/// Splits text after `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK_REGEX.find_iter(text) {
        sentences.push(text[start..m.start() + 1].trim());
        start = m.end();
    }
    sentences.push(text[start..].trim());
    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Comparison form of a sentence: lower-cased, whitespace collapsed, only
/// `[a-z0-9%: ]` kept.
fn sentence_key(sentence: &str) -> String {
    collapse_whitespace(&sentence.to_lowercase())
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '%' | ':' | ' '))
        .collect()
}

/// Joins the unique sentences of both descriptions, first occurrence wins.
///
/// Returns `None` when nothing is left.
pub fn merge_descriptions(first: Option<&str>, second: Option<&str>) -> Option<String> {
    let mut seen = HashSet::new();
    let sentences: Vec<&str> = split_sentences(first.unwrap_or(""))
        .into_iter()
        .chain(split_sentences(second.unwrap_or("")))
        .filter(|sentence| {
            let key = sentence_key(sentence);
            !key.is_empty() && seen.insert(key)
        })
        .collect();

    let merged = sentences.join(" ");
    let merged = merged.trim();
    (!merged.is_empty()).then(|| merged.to_string())
}

/// Folds `other` into `into`.
///
/// Keeps the first known time, the higher-priority type and the strictly
/// longer title, and unions the descriptions sentence by sentence.
pub fn merge_into(into: &mut MergedEvent, other: NormalizedEvent) {
    let event = &mut into.event;

    if event.time.is_none() {
        event.time = other.time;
    }
    if other.event_type.priority() > event.event_type.priority() {
        event.event_type = other.event_type;
    }
    if other.title.chars().count() > event.title.chars().count() {
        event.title = other.title;
    }
    event.description =
        merge_descriptions(event.description.as_deref(), other.description.as_deref());

    into.absorbed += 1;
}

/// Merges duplicates, keeping the order in which each key first appears.
pub fn deduplicate(events: Vec<NormalizedEvent>) -> Vec<MergedEvent> {
    let total = events.len();
    let mut merged: Vec<MergedEvent> = Vec::with_capacity(total);
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        let key = merge_key(&event);
        match index.get(&key) {
            Some(&i) => {
                debug!(key = %key, title = %event.title, "Merging duplicate record");
                merge_into(&mut merged[i], event);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(MergedEvent::new(event));
            }
        }
    }

    debug!(input = total, output = merged.len(), "Deduplicated events");
    merged
}

/// Lower-case hexadecimal encoding.
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes
            .as_ref()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}
