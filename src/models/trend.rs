//! Trend records extracted from the source page.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which list on the page a trend came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Main ranked list
    Primary,
    /// Most tweeted over the last 24 hours
    MostActive,
    /// Trending for the longest time
    LongestTrending,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Primary => write!(f, "primary"),
            Category::MostActive => write!(f, "most active"),
            Category::LongestTrending => write!(f, "longest trending"),
        }
    }
}

/// A single trend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendRecord {
    /// Trend label (never empty)
    pub name: String,

    /// Absolute link to the trend page, if the row had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Tweet count or duration text, carried through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,

    /// List the record belongs to
    pub category: Category,
}

impl TrendRecord {
    /// Create a record, or `None` when the name is blank.
    ///
    /// Blank links and metrics are stored as `None`.
    pub fn new(
        name: &str,
        link: Option<String>,
        metric: Option<String>,
        category: Category,
    ) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            link: link.filter(|l| !l.trim().is_empty()),
            metric: metric.filter(|m| !m.trim().is_empty()),
            category,
        })
    }
}

/// Publish time of the page in its two display forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTime {
    /// Used in the subject line
    pub short: String,
    /// Used in the document footer
    pub long: String,
}

impl PublishTime {
    pub const UNKNOWN: &'static str = "Unknown time";

    /// Fallback used when the page carries no usable timestamp.
    pub fn unknown() -> Self {
        Self {
            short: Self::UNKNOWN.to_string(),
            long: Self::UNKNOWN.to_string(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.short != Self::UNKNOWN
    }
}

impl Default for PublishTime {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Everything extracted from one successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPage {
    pub primary: Vec<TrendRecord>,
    pub most_active: Vec<TrendRecord>,
    pub longest_trending: Vec<TrendRecord>,
    pub published: PublishTime,
}

impl TrendPage {
    /// Names of the primary trends, as a set.
    pub fn primary_names(&self) -> HashSet<String> {
        self.primary.iter().map(|t| t.name.clone()).collect()
    }

    pub fn total_count(&self) -> usize {
        self.primary.len() + self.most_active.len() + self.longest_trending.len()
    }
}
