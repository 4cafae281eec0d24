//! Date and time parsing for syllabus text.
//!
//! Syllabi write dates in many shapes ("Feb 10", "2026-02-10", "10 February",
//! "2/10"). [`parse_date`] resolves them against a default year, and
//! [`parse_time`] reduces clock text (including ranges) to a start time.
//!
//! Nothing here guesses: text that does not match a known shape yields `None`.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use regex::Regex;

/// A four digit year in the 1900s or 2000s.
static EXPLICIT_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("Invalid year regex"));

/// `2026-02-10`, `2026/02/10`, `2026.02.10`, `2026-02-10T23:59:00Z`.
static ISO_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:T\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?\b",
    )
    .expect("Invalid ISO date regex")
});

/// `2/10`, `2/10/26`, `02-10-2026` (month first).
static NUMERIC_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})(?:[/-](\d{4}|\d{2}))?\b")
        .expect("Invalid numeric date regex")
});

const MONTH_PATTERN: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?";

/// `Feb 10`, `February 10th`.
static MONTH_DAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH_PATTERN}\s*(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .expect("Invalid month-day regex")
});

/// `10 Feb`, `10th of February`.
static DAY_MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH_PATTERN}"
    ))
    .expect("Invalid day-month regex")
});

/// A bare month name, e.g. `February 2026`.
static MONTH_ONLY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{MONTH_PATTERN}")).expect("Invalid month regex")
});

/// Separator between the endpoints of a time range.
static RANGE_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-–—]\s*").expect("Invalid range regex"));

/// Time zone names accepted after a clock time; the zone itself is ignored.
const ZONE_PATTERN: &str =
    r"(?:utc|gmt|z|[ecmpa][sd]?t|hst|akst|akdt|bst|cet|cest|eet|eest|ist|jst|aest|aedt|nzst|nzdt)";

/// `14:30`, `2:30 PM`, `2pm`, `9.15 a.m.`, `14h30`, `23:59:00`, `11:59 PM EST`.
static CLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(\d{{1,2}})(?:[:.h](\d{{2}}))?(?::(\d{{2}}))?\s*(?:([ap])\.?\s*m?\.?)?(?:\s*{ZONE_PATTERN})?$"
    ))
    .expect("Invalid clock regex")
});

/// Words a date may carry besides the date itself: weekday names, joining
/// words, ordinal suffixes, a clock time and a time zone.
static DATE_FILLER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:mon(?:day)?|tue(?:s(?:day)?)?|wed(?:nesday)?|thu(?:r(?:s(?:day)?)?)?|fri(?:day)?|sat(?:urday)?|sun(?:day)?|of|on|at|and|st|nd|rd|th|[ap]\.?m|noon|midnight|\d{{1,2}}(?::\d{{2}}){{1,2}}(?:[ap]m)?|\d{{1,2}}[ap]m|{ZONE_PATTERN})$"
    ))
    .expect("Invalid date filler regex")
});

/// Separators between words left over around a date.
static FILLER_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;]+").expect("Invalid filler separator regex"));

/// `1430`, `0900`.
static COMPACT_CLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(\d{2})$").expect("Invalid compact clock regex"));

/// Returns true if the text names a year explicitly (a `19xx`/`20xx` token).
pub fn has_explicit_year(text: &str) -> bool {
    EXPLICIT_YEAR_REGEX.is_match(text)
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats a time as 24-hour `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Date components found in text; the year may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts {
    year: Option<i32>,
    month: u32,
    day: u32,
}

/// Parses free-text date, falling back to `default_year` when the text has no year.
///
/// When the text carries no explicit four digit year, the resulting year is
/// forced to `default_year`. If that rewrite is impossible (February 29 in a
/// common year) the parsed date is moved forward by 365 days instead.
///
/// Returns `None` for empty or unrecognised text and for impossible dates.
pub fn parse_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts = scan_date_parts(text)?;
    let date = NaiveDate::from_ymd_opt(parts.year.unwrap_or(default_year), parts.month, parts.day)?;

    if has_explicit_year(text) || date.year() == default_year {
        return Some(date);
    }
    date.with_year(default_year)
        .or_else(|| date.checked_add_signed(Duration::days(365)))
}

fn scan_date_parts(text: &str) -> Option<DateParts> {
    if let Some(caps) = ISO_DATE_REGEX.captures(text) {
        let parts = DateParts {
            year: caps[1].parse().ok(),
            month: caps[2].parse().ok()?,
            day: caps[3].parse().ok()?,
        };
        return only_date_around(text, caps.get(0)?.range()).then_some(parts);
    }

    let year = EXPLICIT_YEAR_REGEX
        .captures(text)
        .and_then(|caps| caps[1].parse().ok());

    if let Some(caps) = MONTH_DAY_REGEX.captures(text) {
        let parts = DateParts {
            year,
            month: month_number(&caps[1])?,
            day: caps[2].parse().ok()?,
        };
        return only_date_around(text, caps.get(0)?.range()).then_some(parts);
    }

    if let Some(caps) = DAY_MONTH_REGEX.captures(text) {
        let parts = DateParts {
            year,
            month: month_number(&caps[2])?,
            day: caps[1].parse().ok()?,
        };
        return only_date_around(text, caps.get(0)?.range()).then_some(parts);
    }

    if let Some(caps) = NUMERIC_DATE_REGEX.captures(text) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        // Month first unless that cannot be a month.
        let (month, day) = if first > 12 && second <= 12 {
            (second, first)
        } else {
            (first, second)
        };
        let year = match caps.get(3) {
            Some(m) if m.as_str().len() == 2 => m.as_str().parse::<i32>().ok().map(|y| 2000 + y),
            Some(m) => m.as_str().parse().ok(),
            None => None,
        };
        let parts = DateParts { year, month, day };
        return only_date_around(text, caps.get(0)?.range()).then_some(parts);
    }

    let caps = MONTH_ONLY_REGEX.captures(text)?;
    let parts = DateParts {
        year,
        month: month_number(&caps[1])?,
        day: 1,
    };
    only_date_around(text, caps.get(0)?.range()).then_some(parts)
}

/// Returns true if everything outside `matched` is date filler or a year.
///
/// `Week 3-4` or `TBA (may change)` contain something date-shaped, but the
/// rest of the text says they are not dates.
fn only_date_around(text: &str, matched: Range<usize>) -> bool {
    let mut rest = format!("{} {}", &text[..matched.start], &text[matched.end..]);
    if let Some(year) = EXPLICIT_YEAR_REGEX.find(&rest) {
        rest.replace_range(year.range(), " ");
    }
    FILLER_SEPARATOR_REGEX
        .split(&rest)
        .map(|word| word.trim_matches('.'))
        .filter(|word| !word.is_empty())
        .all(|word| DATE_FILLER_REGEX.is_match(word))
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clock {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
}

impl Clock {
    fn to_time(self) -> Option<NaiveTime> {
        let hour = match self.meridiem {
            Some(_) if !(1..=12).contains(&self.hour) => return None,
            Some(Meridiem::Am) => self.hour % 12,
            Some(Meridiem::Pm) => self.hour % 12 + 12,
            None => self.hour,
        };
        NaiveTime::from_hms_opt(hour, self.minute, 0)
    }
}

/// Parses clock text into a start time.
///
/// For ranges such as `2:30–3:20 PM` only the start is kept; a start without
/// AM/PM borrows the end's marker when the start is not later than the end on
/// a 12-hour dial (`11:30-12:20 PM` stays 11:30).
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut endpoints = RANGE_SEPARATOR_REGEX.split(text);
    let mut start = parse_clock(endpoints.next()?)?;
    let end = endpoints.next().and_then(parse_clock);

    if start.meridiem.is_none()
        && (1..=12).contains(&start.hour)
        && let Some(end) = end
        && let Some(meridiem) = end.meridiem
        && start.hour % 12 <= end.hour % 12
    {
        start.meridiem = Some(meridiem);
    }

    start.to_time()
}

fn parse_clock(text: &str) -> Option<Clock> {
    let text = text.trim().to_lowercase();
    match text.as_str() {
        "noon" | "12 noon" | "midday" => {
            return Some(Clock {
                hour: 12,
                minute: 0,
                meridiem: None,
            });
        }
        "midnight" => {
            return Some(Clock {
                hour: 0,
                minute: 0,
                meridiem: None,
            });
        }
        _ => {}
    }

    if let Some(caps) = COMPACT_CLOCK_REGEX.captures(&text) {
        return Some(Clock {
            hour: caps[1].parse().ok()?,
            minute: caps[2].parse().ok()?,
            meridiem: None,
        });
    }

    let caps = CLOCK_REGEX.captures(&text)?;
    let meridiem = caps.get(4).map(|m| match m.as_str() {
        "a" => Meridiem::Am,
        _ => Meridiem::Pm,
    });
    Some(Clock {
        hour: caps[1].parse().ok()?,
        minute: caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?,
        meridiem,
    })
}
