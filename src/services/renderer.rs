// src/services/renderer.rs

//! HTML summary renderer.
//!
//! The stylesheet is read once and cached; when it cannot be read the
//! document is rendered unstyled. Every scraped string is escaped before
//! it is interpolated.

use std::sync::OnceLock;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{RenderConfig, TrendPage, TrendRecord};
use crate::utils::{is_web_link, search_link};

/// Renders trend lists into a self-contained HTML document.
pub struct Renderer {
    config: RenderConfig,
    style: OnceLock<String>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            style: OnceLock::new(),
        }
    }

    /// Stylesheet contents, loaded on first use.
    fn style(&self) -> &str {
        self.style.get_or_init(|| {
            match std::fs::read_to_string(&self.config.style_path) {
                Ok(css) => css,
                Err(e) => {
                    log::warn!(
                        "Failed to load stylesheet {}: {}. Rendering without styles.",
                        self.config.style_path.display(),
                        e
                    );
                    String::new()
                }
            }
        })
    }

    /// Render a whole page, using its long publish time in the footer.
    pub fn render_page(&self, page: &TrendPage, most_active: &[TrendRecord]) -> String {
        self.render(
            &page.primary,
            most_active,
            &page.longest_trending,
            &page.published.long,
        )
    }

    /// Render the summary document.
    pub fn render(
        &self,
        primary: &[TrendRecord],
        most_active: &[TrendRecord],
        longest_trending: &[TrendRecord],
        timestamp: &str,
    ) -> String {
        let mut html = String::new();

        html.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
        html.push_str(self.style());
        html.push_str("\n</style>\n</head>\n<body>\n");

        html.push_str(&self.primary_section(primary));
        if !most_active.is_empty() {
            html.push_str(&self.side_section("📊 Most Tweeted (24h)", most_active, "with"));
        }
        if !longest_trending.is_empty() {
            html.push_str(&self.side_section("⏳ Longest Trending", longest_trending, "for"));
        }

        html.push_str(&format!(
            "<div class=\"timestamp\"><strong>Timestamp:</strong> {}</div>\n",
            encode_text(timestamp)
        ));
        html.push_str(
            "<div class=\"footer\">\n\
             <p><em>This is an automated notification from your trend tracking system.</em></p>\n\
             <p><small>Click on any trend to see where it is trending</small></p>\n\
             </div>\n",
        );
        html.push_str("</body>\n</html>\n");
        html
    }

    fn primary_section(&self, trends: &[TrendRecord]) -> String {
        let items: String = trends
            .iter()
            .enumerate()
            .map(|(i, trend)| {
                let count = trend
                    .metric
                    .as_deref()
                    .map(|m| format!(" <span class=\"tweet-count\">({})</span>", encode_text(m)))
                    .unwrap_or_default();
                format!(
                    "<div class=\"trend-item\">{}. {}{}</div>\n",
                    i + 1,
                    self.trend_anchor(trend),
                    count
                )
            })
            .collect();

        format!(
            "<div class=\"trends-container\">\n\
             <div class=\"trends-header\">\
             <span class=\"header-text\">🔥 All Trending Topics</span> \
             <a href=\"{}\" target=\"_blank\" class=\"x-icon-link\">𝕏</a>\
             </div>\n\
             <div class=\"trends-content\">\n{}</div>\n\
             </div>\n",
            encode_double_quoted_attribute(&self.config.explore_url),
            items
        )
    }

    fn side_section(&self, title: &str, trends: &[TrendRecord], preposition: &str) -> String {
        let items: String = trends
            .iter()
            .map(|trend| {
                let detail = trend
                    .metric
                    .as_deref()
                    .map(|m| {
                        format!(
                            " <span class=\"tweet-count\">{} {}</span>",
                            preposition,
                            encode_text(m)
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "<div class=\"max-tweets-item\">{}{}</div>\n",
                    self.trend_anchor(trend),
                    detail
                )
            })
            .collect();

        format!(
            "<div class=\"max-tweets-container\">\n\
             <div class=\"max-tweets-header\">{}</div>\n\
             <div class=\"max-tweets-content\">\n{}</div>\n\
             </div>\n",
            title, items
        )
    }

    /// Anchor for a trend: its own web link, else a search link, else plain text.
    fn trend_anchor(&self, trend: &TrendRecord) -> String {
        let name = encode_text(&trend.name);
        let href = trend
            .link
            .clone()
            .filter(|link| is_web_link(link))
            .or_else(|| search_link(&self.config.search_url, &trend.name));

        match href {
            Some(href) => format!(
                "<a href=\"{}\" target=\"_blank\" class=\"trend-link\">{}</a>",
                encode_double_quoted_attribute(&href),
                name
            ),
            None => format!("<span class=\"trend-link\">{}</span>", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn record(name: &str, link: Option<&str>, metric: Option<&str>, category: Category) -> TrendRecord {
        TrendRecord::new(
            name,
            link.map(str::to_string),
            metric.map(str::to_string),
            category,
        )
        .unwrap()
    }

    fn renderer_without_style() -> Renderer {
        Renderer::new(RenderConfig {
            style_path: PathBuf::from("/nonexistent/email.css"),
            ..RenderConfig::default()
        })
    }

    #[test]
    fn test_primary_enumerated_in_order() {
        let primary = vec![
            record("Storm", Some("https://t.example/storm"), Some("7.9M tweets"), Category::Primary),
            record("Election", None, None, Category::Primary),
        ];
        let html = renderer_without_style().render(&primary, &[], &[], "Tuesday");

        let storm = html.find("1. <a href=\"https://t.example/storm\"").unwrap();
        let election = html.find("2. <a href=\"https://x.com/search?q=Election\"").unwrap();
        assert!(storm < election);
        assert!(html.contains("(7.9M tweets)"));
        assert!(html.contains("<strong>Timestamp:</strong> Tuesday"));
        assert!(html.contains("Click on any trend to see where it is trending"));
    }

    #[test]
    fn test_secondary_sections_only_when_present() {
        let primary = vec![record("A", None, None, Category::Primary)];
        let html = renderer_without_style().render(&primary, &[], &[], "t");
        assert!(!html.contains("Most Tweeted"));
        assert!(!html.contains("Longest Trending"));

        let active = vec![record("B", None, Some("2.2M"), Category::MostActive)];
        let longest = vec![record("C", None, Some("14 hrs"), Category::LongestTrending)];
        let html = renderer_without_style().render(&primary, &active, &longest, "t");
        assert!(html.contains("Most Tweeted"));
        assert!(html.contains("with 2.2M"));
        assert!(html.contains("for 14 hrs"));
    }

    #[test]
    fn test_untrusted_text_is_escaped() {
        let primary = vec![record(
            "<script>alert(1)</script>",
            Some("https://t.example/\"onmouseover=\"x"),
            Some("<b>9</b>"),
            Category::Primary,
        )];
        let html = renderer_without_style().render(&primary, &[], &[], "<i>now</i>");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("\"onmouseover=\""));
        assert!(!html.contains("<b>9</b>"));
        assert!(!html.contains("<i>now</i>"));
    }

    #[test]
    fn test_non_web_links_fall_back_to_search() {
        let primary = vec![
            record("Storm", Some("javascript:alert(document.cookie)"), None, Category::Primary),
            record("Finals", Some("data:text/html,<script>x</script>"), None, Category::Primary),
        ];
        let html = renderer_without_style().render(&primary, &[], &[], "t");

        assert!(!html.contains("href=\"javascript:"));
        assert!(!html.contains("href=\"data:"));
        assert!(html.contains("href=\"https://x.com/search?q=Storm\""));
        assert!(html.contains("href=\"https://x.com/search?q=Finals\""));
    }

    #[test]
    fn test_missing_stylesheet_still_renders() {
        let primary = vec![record("A", None, None, Category::Primary)];
        let html = renderer_without_style().render(&primary, &[], &[], "t");
        assert!(html.contains("<style>\n\n</style>"));
        assert!(html.contains("1. "));
    }

    #[test]
    fn test_stylesheet_cached_after_first_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("email.css");
        std::fs::write(&path, ".trend-item { color: red; }").unwrap();

        let renderer = Renderer::new(RenderConfig {
            style_path: path.clone(),
            ..RenderConfig::default()
        });
        let primary = vec![record("A", None, None, Category::Primary)];

        assert!(renderer.render(&primary, &[], &[], "t").contains("color: red"));
        std::fs::remove_file(&path).unwrap();
        assert!(renderer.render(&primary, &[], &[], "t").contains("color: red"));
    }
}
