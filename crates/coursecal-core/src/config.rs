//! Pipeline configuration.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// Namespace appended to every event UID.
pub const DEFAULT_UID_NAMESPACE: &str = "coursecal";

/// PRODID written in the calendar header.
pub const DEFAULT_PRODID: &str = "-//coursecal//Course Outline Calendar//EN";

/// Settings the pipeline reads; everything else is fixed tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Year assumed for dates written without one.
    pub default_year: i32,

    /// Suffix of generated UIDs (`<sha1>@<namespace>`).
    pub uid_namespace: String,

    /// Calendar PRODID.
    pub prodid: String,

    /// Extra policy keywords, on top of the built-in list.
    pub extra_policy_keywords: Vec<String>,

    /// Extra institutional-deadline keywords, on top of the built-in list.
    pub extra_deadline_keywords: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(Local::now().year())
    }
}

impl PipelineConfig {
    /// Creates a configuration with the given default year.
    pub fn new(default_year: i32) -> Self {
        Self {
            default_year,
            uid_namespace: DEFAULT_UID_NAMESPACE.to_string(),
            prodid: DEFAULT_PRODID.to_string(),
            extra_policy_keywords: Vec::new(),
            extra_deadline_keywords: Vec::new(),
        }
    }

    /// Builder: set the default year.
    pub fn with_default_year(mut self, year: i32) -> Self {
        self.default_year = year;
        self
    }

    /// Builder: set the UID namespace.
    pub fn with_uid_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.uid_namespace = namespace.into();
        self
    }

    /// Builder: set the calendar PRODID.
    pub fn with_prodid(mut self, prodid: impl Into<String>) -> Self {
        self.prodid = prodid.into();
        self
    }

    /// Builder: add a policy keyword (lower-cased).
    pub fn with_policy_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.extra_policy_keywords
            .push(keyword.as_ref().to_lowercase());
        self
    }

    /// Builder: add an institutional-deadline keyword (lower-cased).
    pub fn with_deadline_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.extra_deadline_keywords
            .push(keyword.as_ref().to_lowercase());
        self
    }
}
