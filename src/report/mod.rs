//! Report assembly: raw API rows -> typed, display-ready reports.
//!
//! Each builder is pure. The pipeline fetches rows and hands them here; the
//! CLI and the TUI only ever consume the structs defined below.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::data::row::{RawRow, columns_for};
use crate::decode::{align_all, decode_date_series, decode_numeric_series};
use crate::domain::{
    COLLECTION_HIDDEN_FIELDS, DateSeries, NamedSeries, PageState, QueryParams, ReportKind, TREND_METRICS,
    WALLET_HEADLINE_METRICS, title_case,
};

pub mod format;

pub use format::{format_metric, format_number};

/// One headline value shown above a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetric {
    pub field: String,
    pub label: String,
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    pub query: QueryParams,
    pub headline: Vec<HeadlineMetric>,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionCard {
    pub title: String,
    pub sort_field: String,
    pub sort_value: String,
    /// `(field, formatted value)` for every column except thumbnails.
    pub details: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub query: QueryParams,
    pub page: PageState,
    pub has_next: bool,
    pub cards: Vec<CollectionCard>,
}

/// Latest value of a series and its change against the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub current: Option<f64>,
    pub previous: Option<f64>,
    /// Percent change; `None` when either point is absent or `previous == 0`.
    pub delta_pct: Option<f64>,
}

impl MetricDelta {
    pub fn from_series(values: &[Option<f64>]) -> Self {
        let current = values.last().copied().flatten();
        let previous = if values.len() > 1 {
            values[values.len() - 2]
        } else {
            None
        };
        let delta_pct = match (current, previous) {
            (Some(cur), Some(prev)) if prev != 0.0 => Some((cur - prev) / prev * 100.0),
            _ => None,
        };
        Self {
            current,
            previous,
            delta_pct,
        }
    }

    pub fn value_display(&self) -> String {
        format_number(self.current, false)
    }

    pub fn delta_display(&self) -> Option<String> {
        self.delta_pct.map(|d| format_number(Some(d), true))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendMetric {
    pub label: String,
    #[serde(flatten)]
    pub series: NamedSeries,
    pub latest: MetricDelta,
}

/// One game's trend bundle: a date axis plus aligned metric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendItem {
    pub title: String,
    pub dates: DateSeries,
    pub metrics: Vec<TrendMetric>,
}

impl TrendItem {
    /// Points with both a date and a value, for charting.
    pub fn points(&self, metric: &TrendMetric) -> Vec<(NaiveDateTime, f64)> {
        self.dates
            .iter()
            .zip(&metric.series.values)
            .filter_map(|(d, v)| Some(((*d)?, (*v)?)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub query: QueryParams,
    pub items: Vec<TrendItem>,
}

pub fn build_wallet_report(query: QueryParams, rows: Vec<RawRow>) -> WalletReport {
    let columns = columns_for(ReportKind::Wallet, &rows);
    let headline = WALLET_HEADLINE_METRICS
        .iter()
        .map(|&field| {
            let value = wallet_headline_value(&rows, field);
            HeadlineMetric {
                field: field.to_string(),
                label: title_case(field),
                value,
                display: format_number(value, false),
            }
        })
        .collect();

    WalletReport {
        query,
        headline,
        columns,
        rows,
    }
}

/// Headline value from the first row.
///
/// A field missing from every row stays absent; a first-row value that is
/// null/`"null"`/empty reads as zero.
fn wallet_headline_value(rows: &[RawRow], field: &str) -> Option<f64> {
    let first = rows.first()?;
    if rows.iter().all(|r| r.field(field).is_absent()) {
        return None;
    }
    let f = first.field(field);
    if f.is_nullish() {
        return Some(0.0);
    }
    f.number()
}

pub fn build_collection_report(query: QueryParams, page: PageState, rows: Vec<RawRow>) -> CollectionReport {
    let columns = columns_for(ReportKind::Collection, &rows);
    let sort_field = query.sort_by;
    let percentage = is_percentage_field(sort_field);

    let cards = rows
        .iter()
        .map(|row| CollectionCard {
            title: collection_title(row),
            sort_field: sort_field.to_string(),
            sort_value: format_number(row.field(sort_field).number(), percentage),
            details: columns
                .iter()
                .filter(|c| !COLLECTION_HIDDEN_FIELDS.contains(&c.as_str()))
                .map(|c| (c.clone(), format_metric(row.field(c).raw(), false)))
                .collect(),
        })
        .collect();

    CollectionReport {
        has_next: PageState::has_next(rows.len(), query.limit),
        query,
        page,
        cards,
    }
}

/// Rates and changes are already percentages in the API.
pub fn is_percentage_field(field: &str) -> bool {
    let lower = field.to_lowercase();
    lower.contains("rate") || lower.contains("change")
}

fn collection_title(row: &RawRow) -> String {
    if let Some(game) = row.field("game").str() {
        return game.to_string();
    }
    let contract = row.field("contract_address").str().unwrap_or("Unknown");
    let short: String = contract.chars().take(10).collect();
    format!("Contract: {short}...")
}

pub fn build_trend_item(row: &RawRow) -> TrendItem {
    let title = row.field("game").str().unwrap_or("Unknown Game").to_string();

    let dates = match row.field("maxdate").raw() {
        Some(raw) => decode_date_series(raw),
        None => Vec::new(),
    };

    let decoded: Vec<NamedSeries> = TREND_METRICS
        .iter()
        .filter_map(|&name| {
            let raw = row.field(name).raw()?;
            Some(NamedSeries::new(name, decode_numeric_series(raw)))
        })
        .collect();

    let metrics = align_all(dates.len(), decoded)
        .into_iter()
        .map(|series| TrendMetric {
            label: title_case(&series.name),
            latest: MetricDelta::from_series(&series.values),
            series,
        })
        .collect();

    TrendItem { title, dates, metrics }
}

pub fn build_trend_report(query: QueryParams, rows: Vec<RawRow>) -> TrendReport {
    let items = rows.iter().map(build_trend_item).collect();
    TrendReport { query, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Blockchain, SortOrder, TimeRange};
    use serde_json::{Value, json};

    fn row(v: Value) -> RawRow {
        RawRow::from_value(v).unwrap()
    }

    fn query(sort_by: &'static str, limit: u32) -> QueryParams {
        QueryParams::new(Blockchain::Ethereum, TimeRange::Day, sort_by, SortOrder::Desc, limit).unwrap()
    }

    #[test]
    fn metric_delta_basic() {
        let d = MetricDelta::from_series(&[Some(10.0), Some(20.0), Some(30.0)]);
        assert_eq!(d.current, Some(30.0));
        assert_eq!(d.previous, Some(20.0));
        assert_eq!(d.delta_display().as_deref(), Some("50.00%"));
        assert_eq!(d.value_display(), "30.00");
    }

    #[test]
    fn metric_delta_absent_cases() {
        assert_eq!(MetricDelta::from_series(&[]).delta_pct, None);
        assert_eq!(MetricDelta::from_series(&[Some(1.0)]).delta_pct, None);
        assert_eq!(MetricDelta::from_series(&[Some(0.0), Some(5.0)]).delta_pct, None);
        assert_eq!(MetricDelta::from_series(&[None, Some(5.0)]).delta_pct, None);
        let trailing_gap = MetricDelta::from_series(&[Some(1.0), Some(2.0), None]);
        assert_eq!(trailing_gap.current, None);
        assert_eq!(trailing_gap.value_display(), "N/A");
        assert_eq!(trailing_gap.delta_display(), None);
    }

    #[test]
    fn trend_item_end_to_end() {
        let item = build_trend_item(&row(json!({
            "game": "Pixels",
            "active_users": "['10','20','30']",
            "maxdate": "['2024-01-01 00:00:00','2024-01-02 00:00:00','2024-01-03 00:00:00']",
        })));
        assert_eq!(item.title, "Pixels");
        assert_eq!(item.dates.len(), 3);
        assert_eq!(item.metrics.len(), 1);

        let m = &item.metrics[0];
        assert_eq!(m.series.name, "active_users");
        assert_eq!(m.label, "Active Users");
        assert_eq!(m.series.values.len(), 3);
        assert_eq!(m.latest.current, Some(30.0));
        assert_eq!(m.latest.previous, Some(20.0));
        assert_eq!(m.latest.delta_display().as_deref(), Some("50.00%"));
        assert_eq!(item.points(m).len(), 3);
    }

    #[test]
    fn trend_item_aligns_to_dates_and_skips_missing_metrics() {
        let item = build_trend_item(&row(json!({
            "active_users": "['1','2','3','4']",
            "avg_earnings": "['5.5']",
            "game_activity": "not a list",
            "maxdate": "['2024-01-01 00:00:00','bad']",
        })));
        assert_eq!(item.title, "Unknown Game");
        let names: Vec<&str> = item.metrics.iter().map(|m| m.series.name.as_str()).collect();
        assert_eq!(names, vec!["active_users", "game_activity", "avg_earnings"]);
        for m in &item.metrics {
            assert_eq!(m.series.values.len(), 2);
        }
        assert_eq!(item.metrics[0].series.values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(item.metrics[1].series.values, vec![None, None]);
        assert_eq!(item.metrics[2].series.values, vec![Some(5.5), None]);
        // Undated positions are not charted.
        assert_eq!(item.points(&item.metrics[0]).len(), 1);
    }

    #[test]
    fn trend_item_without_maxdate_has_empty_axis() {
        let item = build_trend_item(&row(json!({"game": "G", "active_users": "['1','2']"})));
        assert!(item.dates.is_empty());
        assert!(item.metrics[0].series.values.is_empty());
        assert_eq!(item.metrics[0].latest.value_display(), "N/A");
    }

    #[test]
    fn wallet_headline_from_first_row() {
        let report = build_wallet_report(
            query("volume", 30),
            vec![
                row(json!({"total_users": "1500000", "active_users": "null", "volume": null})),
                row(json!({"total_users": "1", "active_users": "2", "volume": "3"})),
            ],
        );
        let display: Vec<&str> = report.headline.iter().map(|h| h.display.as_str()).collect();
        // transactions never appears in the response -> N/A; null-ish -> 0.
        assert_eq!(display, vec!["1.50M", "0.00", "0.00", "N/A"]);
        assert_eq!(report.headline[0].label, "Total Users");
        assert_eq!(report.columns, vec!["total_users", "active_users", "volume"]);
    }

    #[test]
    fn wallet_headline_absent_from_first_row_only() {
        let report = build_wallet_report(
            query("volume", 30),
            vec![row(json!({"total_users": 5})), row(json!({"volume": "9", "transactions": ""}))],
        );
        let display: Vec<&str> = report.headline.iter().map(|h| h.display.as_str()).collect();
        assert_eq!(display, vec!["5.00", "N/A", "N/A", "N/A"]);
    }

    #[test]
    fn wallet_headline_empty_response() {
        let report = build_wallet_report(query("volume", 30), vec![]);
        assert!(report.headline.iter().all(|h| h.display == "N/A"));
        assert!(report.columns.is_empty());
    }

    #[test]
    fn collection_cards_titles_and_percentages() {
        let report = build_collection_report(
            query("retention_rate", 2),
            PageState::new(1),
            vec![
                row(json!({"game": "Axie", "retention_rate": "42.5", "thumbnail_url": "http://x"})),
                row(json!({"contract_address": "0x1234567890abcdef", "retention_rate": null})),
            ],
        );
        assert!(report.has_next);
        assert_eq!(report.page.display_number(), 2);
        assert_eq!(report.cards[0].title, "Axie");
        assert_eq!(report.cards[0].sort_value, "42.50%");
        assert_eq!(report.cards[1].title, "Contract: 0x12345678...");
        assert_eq!(report.cards[1].sort_value, "N/A");

        let fields: Vec<&str> = report.cards[0].details.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(fields, vec!["game", "contract_address", "retention_rate"]);
        assert!(report.cards[0].details.contains(&("contract_address".to_string(), "N/A".to_string())));
    }

    #[test]
    fn collection_without_identity_is_unknown() {
        let report = build_collection_report(query("total_users", 9), PageState::default(), vec![row(json!({"total_users": 2500}))]);
        assert!(!report.has_next);
        assert_eq!(report.cards[0].title, "Contract: Unknown...");
        assert_eq!(report.cards[0].sort_value, "2.50K");
    }

    #[test]
    fn percentage_fields() {
        assert!(is_percentage_field("retention_rate"));
        assert!(is_percentage_field("total_users_change"));
        assert!(is_percentage_field("interaction_rate_change"));
        assert!(!is_percentage_field("total_users"));
    }
}
