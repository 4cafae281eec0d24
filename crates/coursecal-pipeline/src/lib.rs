//! Syllabus event pipeline.
//!
//! This crate turns raw extractor output into a calendar:
//!
//! - [`parse_candidates`] - Find and decode the JSON array in extractor text
//! - [`normalize_candidates`] - Constrain every field to its canonical form
//! - [`resolve_week_dates`] - Place `Week N` references relative to the start of term
//! - [`filter_events`] - Drop policy text and unschedulable records
//! - [`canonicalize_midterms`] - Converge midterm spellings sharing a date
//! - [`deduplicate`] - Merge duplicates found across pages
//! - [`events_to_ics`] - Write the iCalendar feed
//!
//! # Architecture
//!
//! ```text
//!   page 1 text     page 2 text     ...
//!        │               │
//!        ▼               ▼
//!  ┌──────────────────────────┐
//!  │      CandidateBatch      │  parse_candidates()
//!  └────────────┬─────────────┘
//!               ▼
//!        CandidateEvent[]
//!               │  normalize → weeks → filter → midterms → dedup
//!               ▼
//!         MergedEvent[]  ──────►  ParseResponse (JSON)
//!               │
//!               ▼ events_to_ics()
//!          text/calendar
//! ```
//!
//! # Example
//!
//! ```ignore
//! use coursecal_core::PipelineConfig;
//! use coursecal_pipeline::{CandidateBatch, Pipeline};
//!
//! let mut batch = CandidateBatch::new();
//! for page in pages {
//!     batch.push_page(&page)?;
//! }
//! let pipeline = Pipeline::new(PipelineConfig::new(2026));
//! let ics = pipeline.calendar(batch.events());
//! ```

pub mod anchor;
pub mod candidate;
pub mod canonical;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod ics;
pub mod normalize;
pub mod pipeline;

pub use anchor::{find_term_anchor, resolve_week_dates, week_date};
pub use candidate::{CandidateBatch, parse_candidates, parse_candidates_value};
pub use canonical::{canonical_assessment_key, canonicalize_midterms};
pub use dedup::{deduplicate, event_uid, identity_hash, merge_descriptions, merge_title_key};
pub use error::{ParseError, ParseResult, RecordError};
pub use filter::{DropReason, FilterRules, filter_events};
pub use ics::{build_calendar, events_to_ics};
pub use normalize::{normalize_candidate, normalize_candidates};
pub use pipeline::{ParseResponse, Pipeline};
