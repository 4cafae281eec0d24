//! Core types: syllabus events, date/time parsing, text tables, configuration, tracing

pub mod config;
pub mod event;
pub mod text;
pub mod time;
pub mod tracing;

pub use config::{DEFAULT_PRODID, DEFAULT_UID_NAMESPACE, PipelineConfig};
pub use event::{CandidateEvent, EventType, MergedEvent, NormalizedEvent, WEEKLY, Weekday, WeeklyRule};
pub use text::clean_text;
pub use time::{format_date, format_time, has_explicit_year, parse_date, parse_time};
pub use tracing::{LogConfig, LogFormat, TracingError, init_tracing};
