// src/services/extractor.rs

//! Trend extractor.
//!
//! Turns raw markup into [`TrendPage`] using the configured CSS selectors.
//! Only the primary container is mandatory; the sidebar lists are
//! enrichment and come back empty when their markup is missing.

use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Category, Config, ListSelectors, TrendPage, TrendRecord, TrendSelectors};
use crate::utils::time::publish_time_from_epoch;
use crate::utils::{normalize_whitespace, resolve_url};

/// Parsed selectors for one list.
#[derive(Debug)]
struct ListMatcher {
    row: Selector,
    name: Selector,
    metric: Option<Selector>,
    attr_name: String,
}

impl ListMatcher {
    fn new(selectors: &ListSelectors) -> Result<Self> {
        Ok(Self {
            row: parse_selector(&selectors.row_selector)?,
            name: parse_selector(&selectors.name_selector)?,
            metric: selectors
                .metric_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            attr_name: selectors.attr_name.clone(),
        })
    }
}

/// Extracts trend records from the trends page.
#[derive(Debug)]
pub struct TrendExtractor {
    container: Selector,
    container_raw: String,
    primary: ListMatcher,
    more: Option<ListMatcher>,
    most_active: Option<ListMatcher>,
    longest_trending: Option<ListMatcher>,
    published: Option<Selector>,
    published_attr: Option<String>,
    base_url: Url,
    tz: Tz,
}

impl TrendExtractor {
    /// Build an extractor, parsing every selector up front.
    pub fn new(selectors: &TrendSelectors, base_url: &str, tz: Tz) -> Result<Self> {
        let optional = |list: &Option<ListSelectors>| list.as_ref().map(ListMatcher::new).transpose();

        Ok(Self {
            container: parse_selector(&selectors.container_selector)?,
            container_raw: selectors.container_selector.clone(),
            primary: ListMatcher::new(&selectors.primary)?,
            more: optional(&selectors.more)?,
            most_active: optional(&selectors.most_active)?,
            longest_trending: optional(&selectors.longest_trending)?,
            published: selectors
                .published_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            published_attr: selectors.published_attr.clone(),
            base_url: Url::parse(base_url)?,
            tz,
        })
    }

    /// Build an extractor from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.selectors,
            &config.source.url,
            config.source.timezone()?,
        )
    }

    /// Extract all trend lists from a page.
    ///
    /// Fails with a structure mismatch when the primary container is missing.
    pub fn extract(&self, html: &str) -> Result<TrendPage> {
        let document = Html::parse_document(html);

        let container = document.select(&self.container).next().ok_or_else(|| {
            AppError::structure(format!(
                "primary container '{}' not found",
                self.container_raw
            ))
        })?;

        let mut primary = self.parse_rows(
            container.select(&self.primary.row),
            &self.primary,
            Category::Primary,
        );
        if let Some(more) = &self.more {
            primary.extend(self.parse_rows(document.select(&more.row), more, Category::Primary));
        }

        let most_active = self.parse_list(&document, self.most_active.as_ref(), Category::MostActive);
        let longest_trending = self.parse_list(
            &document,
            self.longest_trending.as_ref(),
            Category::LongestTrending,
        );

        let raw_published = self.published_raw(&document);
        let published = publish_time_from_epoch(raw_published.as_deref(), self.tz);

        log::debug!(
            "Extracted {} primary, {} most active, {} longest trending (published: {})",
            primary.len(),
            most_active.len(),
            longest_trending.len(),
            published.long
        );

        Ok(TrendPage {
            primary,
            most_active,
            longest_trending,
            published,
        })
    }

    fn parse_list(
        &self,
        document: &Html,
        matcher: Option<&ListMatcher>,
        category: Category,
    ) -> Vec<TrendRecord> {
        match matcher {
            Some(m) => self.parse_rows(document.select(&m.row), m, category),
            None => {
                log::debug!("No {} selectors configured", category);
                Vec::new()
            }
        }
    }

    fn parse_rows<'a>(
        &self,
        rows: impl Iterator<Item = ElementRef<'a>>,
        matcher: &ListMatcher,
        category: Category,
    ) -> Vec<TrendRecord> {
        rows.filter_map(|row| self.parse_row(&row, matcher, category))
            .collect()
    }

    fn parse_row(
        &self,
        row: &ElementRef,
        matcher: &ListMatcher,
        category: Category,
    ) -> Option<TrendRecord> {
        let name_elem = row.select(&matcher.name).next()?;
        let name = normalize_whitespace(&name_elem.text().collect::<String>());

        let link = name_elem
            .value()
            .attr(&matcher.attr_name)
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .and_then(|href| resolve_url(&self.base_url, href));

        let metric = matcher
            .metric
            .as_ref()
            .and_then(|sel| row.select(sel).next())
            .map(|el| normalize_whitespace(&el.text().collect::<String>()));

        TrendRecord::new(&name, link, metric, category)
    }

    fn published_raw(&self, document: &Html) -> Option<String> {
        let element = document.select(self.published.as_ref()?).next()?;
        match &self.published_attr {
            Some(attr) => element.value().attr(attr).map(str::to_string),
            None => Some(element.text().collect()),
        }
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://getdaytrends.com/united-states/";

    const PAGE: &str = r#"
<html><body>
<main><div><div>
  <div class="col-12 col-lg-8">
    <section id="trends" data-timestamp="1700000000">
      <table class="table table-hover text-left clickable ranking trends wider mb-0"><tbody>
        <tr><td class="main"><a href="/united-states/trend/Storm/">Storm</a><div>7.9M tweets</div></td></tr>
        <tr><td class="main"><span>No anchor here</span></td></tr>
        <tr><td class="main"><a href="/united-states/trend/Election/"> Election </a><div>342K tweets</div></td></tr>
        <tr><td class="main"><a href="/united-states/trend/GameNight/">GameNight</a></td></tr>
      </tbody></table>
    </section>
    <table id="moreTrends"><tbody>
      <tr><td class="main"><a href="/united-states/trend/%23Encore/">#Encore</a><div><span>12K tweets</span></div></td></tr>
    </tbody></table>
  </div>
  <div class="col-12 col-lg-4 mb-2 mb-sm-4 text-center">
    <section><div>
      <h3>Most tweeted</h3>
      <div class="inset mb-3"><table><tbody>
        <tr><td class="main"><a href="/united-states/trend/Storm/">Storm</a></td><td class="details small text-muted text-right">9.1M</td></tr>
        <tr><td class="main"><a href="/united-states/trend/Finals/">Finals</a></td><td class="details small text-muted text-right">2.2M</td></tr>
      </tbody></table></div>
      <div class="inset"><table><tbody>
        <tr><td class="main"><a href="/united-states/trend/Monday/">Monday</a></td><td class="details small text-muted text-right">14 hrs</td></tr>
      </tbody></table></div>
    </div></section>
  </div>
</div></div></main>
</body></html>
"#;

    fn extractor() -> TrendExtractor {
        TrendExtractor::new(&TrendSelectors::default(), BASE, chrono_tz::America::New_York)
            .unwrap()
    }

    #[test]
    fn test_primary_in_document_order() {
        let page = extractor().extract(PAGE).unwrap();
        let names: Vec<&str> = page.primary.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["Storm", "Election", "GameNight", "#Encore"]);
        assert!(page.primary.iter().all(|t| t.category == Category::Primary));
    }

    #[test]
    fn test_links_and_metrics() {
        let page = extractor().extract(PAGE).unwrap();

        assert_eq!(
            page.primary[0].link.as_deref(),
            Some("https://getdaytrends.com/united-states/trend/Storm/")
        );
        assert_eq!(page.primary[0].metric.as_deref(), Some("7.9M tweets"));
        assert_eq!(page.primary[2].metric, None);
        assert_eq!(page.primary[3].metric.as_deref(), Some("12K tweets"));
    }

    #[test]
    fn test_secondary_sections() {
        let page = extractor().extract(PAGE).unwrap();

        let active: Vec<&str> = page.most_active.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(active, vec!["Storm", "Finals"]);
        assert_eq!(page.most_active[0].metric.as_deref(), Some("9.1M"));

        assert_eq!(page.longest_trending.len(), 1);
        assert_eq!(page.longest_trending[0].name, "Monday");
        assert_eq!(page.longest_trending[0].metric.as_deref(), Some("14 hrs"));
        assert_eq!(page.longest_trending[0].category, Category::LongestTrending);
    }

    #[test]
    fn test_publish_time() {
        let page = extractor().extract(PAGE).unwrap();
        assert_eq!(page.published.short, "Nov 14, 05:13 PM EST");
    }

    #[test]
    fn test_missing_container_is_structure_mismatch() {
        let html = r#"<html><body><table id="moreTrends"><tbody>
            <tr><td class="main"><a href="/x">Orphan</a></td></tr>
        </tbody></table></body></html>"#;

        let err = extractor().extract(html).unwrap_err();
        assert!(matches!(err, AppError::StructureMismatch(_)));
    }

    #[test]
    fn test_missing_sidebars_are_empty() {
        let html = r#"<html><body><section id="trends">
            <table class="ranking trends"><tbody>
              <tr><td class="main"><a href="/t/A">A</a></td></tr>
            </tbody></table>
        </section></body></html>"#;

        let page = extractor().extract(html).unwrap();
        assert_eq!(page.primary.len(), 1);
        assert!(page.most_active.is_empty());
        assert!(page.longest_trending.is_empty());
        assert!(!page.published.is_known());
    }

    #[test]
    fn test_empty_container_yields_no_trends() {
        let html = r#"<html><body><div id="trends"></div></body></html>"#;
        let page = extractor().extract(html).unwrap();
        assert!(page.primary.is_empty());
    }

    #[test]
    fn test_script_links_are_dropped() {
        let html = r#"<html><body><section id="trends">
            <table class="ranking trends"><tbody>
              <tr><td class="main"><a href="javascript:alert(document.cookie)">Storm</a></td></tr>
              <tr><td class="main"><a href="data:text/html,&lt;script&gt;x&lt;/script&gt;">Finals</a></td></tr>
            </tbody></table>
        </section></body></html>"#;

        let page = extractor().extract(html).unwrap();
        assert_eq!(page.primary.len(), 2);
        assert!(page.primary.iter().all(|t| t.link.is_none()));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let selectors = TrendSelectors {
            container_selector: "[[invalid".to_string(),
            ..TrendSelectors::default()
        };
        let err = TrendExtractor::new(&selectors, BASE, chrono_tz::UTC).unwrap_err();
        assert!(err.is_config());
    }
}
