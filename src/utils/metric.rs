//! Popularity metric parsing.
//!
//! Metrics are scraped as display text ("7.9M tweets", "342K", "58").
//! The parsed value is approximate and only ever used for ranking.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::TrendRecord;

static METRIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*([kmb])?\b").expect("metric pattern is valid")
});

/// Parse suffix notation into an approximate count. Unparsable text is 0.
pub fn parse_metric(text: &str) -> u64 {
    let Some(caps) = METRIC_RE.captures(text) else {
        return 0;
    };

    let Ok(number) = caps[1].replace(',', "").parse::<f64>() else {
        return 0;
    };

    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(s) if s == "k" => 1_000.0,
        Some(s) if s == "m" => 1_000_000.0,
        Some(s) if s == "b" => 1_000_000_000.0,
        _ => 1.0,
    };

    (number * multiplier).round() as u64
}

/// Up to `limit` records, highest metric first. Ties keep page order.
pub fn top_by_metric(records: &[TrendRecord], limit: usize) -> Vec<TrendRecord> {
    let mut ranked: Vec<(u64, &TrendRecord)> = records
        .iter()
        .map(|r| (r.metric.as_deref().map_or(0, parse_metric), r))
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, r)| r.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_metric("7.9M tweets"), 7_900_000);
        assert_eq!(parse_metric("342K"), 342_000);
        assert_eq!(parse_metric("58"), 58);
        assert_eq!(parse_metric("1.2b posts"), 1_200_000_000);
        assert_eq!(parse_metric("12,345 tweets"), 12_345);
    }

    #[test]
    fn test_unparsable_is_zero() {
        assert_eq!(parse_metric(""), 0);
        assert_eq!(parse_metric("Under threshold"), 0);
    }

    #[test]
    fn test_suffix_needs_word_boundary() {
        assert_eq!(parse_metric("58 bananas"), 58);
    }

    #[test]
    fn test_top_by_metric() {
        let records: Vec<TrendRecord> = [
            ("Low", "58"),
            ("High", "7.9M tweets"),
            ("Mid", "342K"),
            ("None", "n/a"),
        ]
        .iter()
        .filter_map(|(name, metric)| {
            TrendRecord::new(name, None, Some(metric.to_string()), Category::MostActive)
        })
        .collect();

        let top: Vec<String> = top_by_metric(&records, 2)
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(top, vec!["High", "Mid"]);
    }

    #[test]
    fn test_top_by_metric_keeps_order_on_ties() {
        let records: Vec<TrendRecord> = ["A", "B", "C"]
            .iter()
            .filter_map(|n| TrendRecord::new(n, None, None, Category::MostActive))
            .collect();

        let top: Vec<String> = top_by_metric(&records, 10)
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(top, vec!["A", "B", "C"]);
    }
}
