// src/models/selectors.rs

//! CSS selectors for scraping the trends page.

use serde::{Deserialize, Serialize};

/// Selectors for one list of trends (one row per trend).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSelectors {
    /// Selector for each row/item in the list
    pub row_selector: String,

    /// Selector for the anchor holding the trend name, within a row
    pub name_selector: String,

    /// Selector for the metric text (tweet count or duration), within a row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_selector: Option<String>,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_attr_name")]
    pub attr_name: String,
}

fn default_attr_name() -> String {
    "href".to_string()
}

impl ListSelectors {
    /// Create list selectors from row, name and metric selectors.
    pub fn new(
        row: impl Into<String>,
        name: impl Into<String>,
        metric: Option<&str>,
    ) -> Self {
        Self {
            row_selector: row.into(),
            name_selector: name.into(),
            metric_selector: metric.map(str::to_string),
            attr_name: default_attr_name(),
        }
    }
}

/// All selectors needed to pull trend records out of the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendSelectors {
    /// Anchor of the primary list; its absence means the markup changed
    #[serde(default = "defaults::container")]
    pub container_selector: String,

    /// Primary trend rows, selected within the container
    #[serde(default = "defaults::primary")]
    pub primary: ListSelectors,

    /// "See more" rows appended to the primary list, selected from the document
    #[serde(default = "defaults::more")]
    pub more: Option<ListSelectors>,

    /// Most-active (24h) sidebar rows
    #[serde(default = "defaults::most_active")]
    pub most_active: Option<ListSelectors>,

    /// Longest-trending sidebar rows
    #[serde(default = "defaults::longest_trending")]
    pub longest_trending: Option<ListSelectors>,

    /// Element carrying the publish time as an epoch value
    #[serde(default = "defaults::published")]
    pub published_selector: Option<String>,

    /// Attribute holding the epoch value; element text is used when absent
    #[serde(default = "defaults::published_attr")]
    pub published_attr: Option<String>,
}

impl Default for TrendSelectors {
    fn default() -> Self {
        Self {
            container_selector: defaults::container(),
            primary: defaults::primary(),
            more: defaults::more(),
            most_active: defaults::most_active(),
            longest_trending: defaults::longest_trending(),
            published_selector: defaults::published(),
            published_attr: defaults::published_attr(),
        }
    }
}

mod defaults {
    use super::ListSelectors;

    const SIDEBAR: &str = "body > main > div > div > div.col-12.col-lg-4.mb-2.mb-sm-4.text-center > section > div";

    pub fn container() -> String {
        "#trends".into()
    }

    pub fn primary() -> ListSelectors {
        ListSelectors::new(
            "table.ranking.trends > tbody > tr",
            "td.main > a",
            Some("td.main > div"),
        )
    }

    pub fn more() -> Option<ListSelectors> {
        Some(ListSelectors::new(
            "#moreTrends > tbody > tr",
            "td.main > a",
            Some("td.main > div > span"),
        ))
    }

    pub fn most_active() -> Option<ListSelectors> {
        Some(ListSelectors::new(
            format!("{SIDEBAR} > div.inset.mb-3 > table > tbody > tr"),
            "td.main > a",
            Some("td.details.small.text-muted.text-right"),
        ))
    }

    pub fn longest_trending() -> Option<ListSelectors> {
        Some(ListSelectors::new(
            format!("{SIDEBAR} > div:nth-child(3) > table > tbody > tr"),
            "td.main > a",
            Some("td.details.small.text-muted.text-right"),
        ))
    }

    pub fn published() -> Option<String> {
        Some("[data-timestamp]".into())
    }

    pub fn published_attr() -> Option<String> {
        Some("data-timestamp".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let selectors: TrendSelectors = toml::from_str(
            r##"
            container_selector = "#list"

            [primary]
            row_selector = "li"
            name_selector = "a"
            "##,
        )
        .unwrap();

        assert_eq!(selectors.container_selector, "#list");
        assert_eq!(selectors.primary.attr_name, "href");
        assert!(selectors.primary.metric_selector.is_none());
        assert_eq!(selectors.more, TrendSelectors::default().more);
    }
}
