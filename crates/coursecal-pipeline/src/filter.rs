//! Dropping records that do not belong on a calendar.

use std::fmt;

use coursecal_core::text::{DEADLINE_KEYWORDS, POLICY_KEYWORDS, contains_any, is_week_topic};
use coursecal_core::{EventType, NormalizedEvent, PipelineConfig};
use tracing::debug;

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Neither a date nor a weekly rule.
    Unschedulable,
    /// An `other` record that is just a `Week N` topic header.
    WeekTopic,
    /// Policy or administrative text without an institutional deadline.
    Policy,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unschedulable => "unschedulable",
            Self::WeekTopic => "week_topic",
            Self::Policy => "policy",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword lists used to tell schedulable events from policy text.
///
/// Keywords are matched as lower-case substrings of the title and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRules {
    policy_keywords: Vec<String>,
    deadline_keywords: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            policy_keywords: POLICY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            deadline_keywords: DEADLINE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl FilterRules {
    /// Built-in keyword tables only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in tables plus the extra keywords from the configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let rules = config
            .extra_policy_keywords
            .iter()
            .fold(Self::new(), |rules, k| rules.with_policy_keyword(k));
        config
            .extra_deadline_keywords
            .iter()
            .fold(rules, |rules, k| rules.with_deadline_keyword(k))
    }

    /// Builder: add a policy keyword.
    pub fn with_policy_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        push_keyword(&mut self.policy_keywords, keyword.as_ref());
        self
    }

    /// Builder: add an institutional-deadline keyword.
    pub fn with_deadline_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        push_keyword(&mut self.deadline_keywords, keyword.as_ref());
        self
    }

    /// Returns why the event should be dropped, or `None` to keep it.
    pub fn drop_reason(&self, event: &NormalizedEvent) -> Option<DropReason> {
        if !event.is_schedulable() {
            return Some(DropReason::Unschedulable);
        }
        if event.event_type == EventType::Other && is_week_topic(&event.title) {
            return Some(DropReason::WeekTopic);
        }

        let text = format!(
            "{} {}",
            event.title.trim(),
            event.description.as_deref().unwrap_or("").trim()
        )
        .to_lowercase();
        if contains_any(&text, &self.policy_keywords)
            && !contains_any(&text, &self.deadline_keywords)
        {
            return Some(DropReason::Policy);
        }
        None
    }

    /// Returns true if the event should be kept.
    pub fn keep(&self, event: &NormalizedEvent) -> bool {
        self.drop_reason(event).is_none()
    }
}

fn push_keyword(keywords: &mut Vec<String>, keyword: &str) {
    let keyword = keyword.trim().to_lowercase();
    if !keyword.is_empty() && !keywords.contains(&keyword) {
        keywords.push(keyword);
    }
}

/// Keeps only the events the rules accept, preserving order.
pub fn filter_events(events: Vec<NormalizedEvent>, rules: &FilterRules) -> Vec<NormalizedEvent> {
    events
        .into_iter()
        .filter(|event| match rules.drop_reason(event) {
            Some(reason) => {
                debug!(title = %event.title, reason = %reason, "Dropped record");
                false
            }
            None => true,
        })
        .collect()
}
