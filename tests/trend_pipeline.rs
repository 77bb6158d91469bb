use std::cell::Cell;

use nftg::app::pipeline::{Report, fetch_report};
use nftg::data::{MetricsSource, RawRow};
use nftg::domain::{Blockchain, PageState, QueryParams, ReportKind, SortOrder, TimeRange};
use nftg::error::AppError;
use nftg::report::format::{format_collection_report, format_trend_report, format_wallet_report};
use nftg::report::format_metric;
use serde_json::{Value, json};

/// Answers every query with the same canned response body.
struct CannedSource {
    body: Value,
    calls: Cell<usize>,
}

impl CannedSource {
    fn new(body: Value) -> Self {
        Self { body, calls: Cell::new(0) }
    }
}

impl MetricsSource for CannedSource {
    fn fetch_rows(&self, _kind: ReportKind, _params: &QueryParams) -> Result<Vec<RawRow>, AppError> {
        self.calls.set(self.calls.get() + 1);
        Ok(nftg::data::client::rows_from_body(self.body.clone()))
    }
}

fn query(sort_by: &'static str, limit: u32) -> QueryParams {
    QueryParams::new(Blockchain::Ethereum, TimeRange::Day, sort_by, SortOrder::Desc, limit).expect("query")
}

#[test]
fn trend_item_decodes_aligns_and_computes_delta() {
    let source = CannedSource::new(json!({"data": [{
        "game": "Pixels",
        "active_users": "['10', '20', '30']",
        "avg_earnings": "['1.5', None, '2', '9', '9']",
        "game_interactions": "[]",
        "maxdate": "['2024-01-01 00:00:00', '2024-01-02 00:00:00', '2024-01-03 00:00:00']",
    }]}));

    let report = fetch_report(&source, ReportKind::Trend, query("active_users", 30), PageState::default())
        .expect("report");
    assert_eq!(source.calls.get(), 1);
    let Report::Trend(trend) = report else {
        panic!("expected trend report");
    };

    let item = &trend.items[0];
    assert_eq!(item.title, "Pixels");
    assert_eq!(item.dates.len(), 3);
    assert!(item.dates.iter().all(Option::is_some));

    for metric in &item.metrics {
        assert_eq!(metric.series.values.len(), item.dates.len(), "{}", metric.label);
    }

    let active = &item.metrics[0];
    assert_eq!(active.label, "Active Users");
    assert_eq!(active.latest.current, Some(30.0));
    assert_eq!(active.latest.previous, Some(20.0));
    assert_eq!(active.latest.delta_display().as_deref(), Some("50.00%"));

    // Empty list pads to the axis with absent values.
    let interactions = &item.metrics[1];
    assert_eq!(interactions.series.values, vec![None, None, None]);
    assert_eq!(interactions.latest.value_display(), "N/A");

    // Longer list is truncated; the gap before the last point blocks a delta.
    let earnings = &item.metrics[2];
    assert_eq!(earnings.series.values, vec![Some(1.5), None, Some(2.0)]);
    assert_eq!(earnings.latest.delta_pct, None);

    let text = format_trend_report(&trend);
    assert!(text.contains("Pixels"));
    assert!(text.contains("50.00%"));
}

#[test]
fn collection_paging_follows_row_count() {
    let rows: Vec<Value> = (0..9).map(|i| json!({"game": format!("Game {i}"), "total_users": i * 1000})).collect();
    let source = CannedSource::new(json!({ "data": rows }));

    let first = fetch_report(&source, ReportKind::Collection, query("total_users", 9), PageState::default())
        .expect("report");
    let Report::Collection(first) = first else {
        panic!("expected collection report");
    };
    assert!(first.has_next);
    let next = first.page.next(first.cards.len(), first.query.limit);
    assert_eq!(next.offset(), 9);
    assert_eq!(first.cards[2].sort_value, "2.00K");

    let text = format_collection_report(&first);
    assert!(text.contains("Page 1"));
    assert!(text.contains("Game 8"));
}

#[test]
fn wallet_report_with_empty_data() {
    let source = CannedSource::new(json!({"data": []}));
    let report = fetch_report(&source, ReportKind::Wallet, query("volume", 30), PageState::default()).expect("report");
    assert!(report.is_empty());
    let Report::Wallet(wallet) = report else {
        panic!("expected wallet report");
    };
    assert!(wallet.headline.iter().all(|h| h.display == "N/A"));
    assert!(!format_wallet_report(&wallet).is_empty());
}

#[test]
fn metric_formatting_examples() {
    assert_eq!(format_metric(Some(&json!(1_500_000)), false), "1.50M");
    assert_eq!(format_metric(Some(&json!("2500")), false), "2.50K");
    assert_eq!(format_metric(Some(&json!(42.5)), true), "42.50%");
    assert_eq!(format_metric(Some(&json!("n/a")), false), "N/A");
    assert_eq!(format_metric(Some(&Value::Null), false), "N/A");
    assert_eq!(format_metric(None, false), "N/A");
}
