//! Text cleaning and keyword tables.
//!
//! Every heuristic the pipeline applies to free text lives here as data:
//! policy and deadline keyword lists, term-start phrases, weekday names, title
//! synonyms. The matchers are compiled once and never mutated.

use std::sync::LazyLock;

use regex::Regex;

use crate::event::Weekday;

/// Keywords marking policy or administrative text rather than a schedulable event.
pub const POLICY_KEYWORDS: &[&str] = &[
    "academic integrity",
    "integrity",
    "misconduct",
    "plagiarism",
    "use of generative ai",
    "generative ai",
    "ai policy",
    "llm",
    "policy",
    "policies",
    "guidelines",
    "participation",
    "expectations",
    "firing group",
    "fire group",
    "group members",
    "experiential learning",
    "office hours",
    "contact",
    "email",
    "instructor",
    "learning outcomes",
    "outcomes",
    "resources",
    "textbook",
    "reading list",
];

/// Keywords marking institutional deadlines. These override [`POLICY_KEYWORDS`].
pub const DEADLINE_KEYWORDS: &[&str] = &[
    "drop",
    "withdraw",
    "add",
    "last day",
    "reading week",
    "no class",
    "holiday",
    "course evaluation",
    "course eval",
    "exam period",
];

/// Phrases that mark the first week of term.
pub const TERM_START_PATTERNS: &[&str] = &[
    r"\bclasses start\b",
    r"\bclass(es)? begin\b",
    r"\bfirst day of classes\b",
    r"\bterm begins\b",
    r"\bweek\s*1\b.*\bbegins\b",
    r"\bweek\s*1\b.*\bstarts\b",
];

/// Weekday names in lookup order. The first name found in the text wins.
pub const WEEKDAY_NAMES: &[(&str, Weekday)] = &[
    ("monday", Weekday::Monday),
    ("mon", Weekday::Monday),
    ("tuesday", Weekday::Tuesday),
    ("tue", Weekday::Tuesday),
    ("tues", Weekday::Tuesday),
    ("wednesday", Weekday::Wednesday),
    ("wed", Weekday::Wednesday),
    ("thursday", Weekday::Thursday),
    ("thu", Weekday::Thursday),
    ("thur", Weekday::Thursday),
    ("thurs", Weekday::Thursday),
    ("friday", Weekday::Friday),
    ("fri", Weekday::Friday),
    ("saturday", Weekday::Saturday),
    ("sat", Weekday::Saturday),
    ("sunday", Weekday::Sunday),
    ("sun", Weekday::Sunday),
];

/// Title rewrites applied in order before merge keying, so table rows and
/// prose paragraphs naming the same deliverable collide.
pub const TITLE_SYNONYMS: &[(&str, &str)] = &[
    ("final group project", "group final report"),
    ("final project", "final report"),
    ("group project", "project"),
];

static PARENTHETICAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("Invalid parenthetical regex"));

static NUMBER_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bno\.?\s*(\d)").expect("Invalid number prefix regex"));

static NUMBER_SIGN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*(\d+)").expect("Invalid number sign regex"));

static ORDINAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)(?:st|nd|rd|th)\b").expect("Invalid ordinal regex"));

static NON_ALNUM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("Invalid punctuation regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static WEEK_REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bweek\s*(\d{1,2})\b").expect("Invalid week regex"));

static WEEK_TOPIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^week\s*\d+").expect("Invalid week topic regex"));

static TERM_START_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    TERM_START_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("Invalid term start regex"))
        .collect()
});

static WEEKDAY_NAME_REGEXES: LazyLock<Vec<(Regex, Weekday)>> = LazyLock::new(|| {
    WEEKDAY_NAMES
        .iter()
        .map(|(name, day)| {
            let re = Regex::new(&format!(r"\b{name}\b")).expect("Invalid weekday regex");
            (re, *day)
        })
        .collect()
});

/// Normalizes text for comparison.
///
/// Lower-cases, drops parenthetical asides, turns `No. 1`, `#1` and `1st`
/// into `1`, replaces punctuation with spaces and collapses whitespace.
pub fn clean_text(text: &str) -> String {
    let s = text.to_lowercase();
    let s = PARENTHETICAL_REGEX.replace_all(&s, " ");
    let s = NUMBER_PREFIX_REGEX.replace_all(&s, "$1");
    let s = NUMBER_SIGN_REGEX.replace_all(&s, " $1");
    let s = ORDINAL_REGEX.replace_all(&s, " $1");
    let s = NON_ALNUM_REGEX.replace_all(&s, " ");
    let s = WHITESPACE_REGEX.replace_all(&s, " ");
    s.trim().to_string()
}

/// Collapses runs of whitespace into single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Returns true if `haystack` contains any keyword as a substring.
///
/// The haystack is expected to be lower-cased already.
pub fn contains_any<S: AsRef<str>>(haystack: &str, keywords: &[S]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_ref()))
}

/// Extracts the `N` of a `Week N` reference. Week 0 is not a week.
pub fn week_reference(text: &str) -> Option<u32> {
    WEEK_REFERENCE_REGEX
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .filter(|n| *n >= 1)
}

/// Returns the first weekday named in the text, in [`WEEKDAY_NAMES`] order.
pub fn weekday_mention(text: &str) -> Option<Weekday> {
    let text = text.to_lowercase();
    WEEKDAY_NAME_REGEXES
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map(|(_, day)| *day)
}

/// Returns true if the title is a bare weekly topic header such as `Week 3: Sorting`.
pub fn is_week_topic(title: &str) -> bool {
    WEEK_TOPIC_REGEX.is_match(title.trim_start())
}

/// Returns true if the text announces the start of term.
pub fn is_term_start(text: &str) -> bool {
    TERM_START_REGEXES.iter().any(|re| re.is_match(text))
}
