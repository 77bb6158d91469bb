//! Value coercion and plain-text report rendering.
//!
//! We keep formatting code in one place so:
//! - the CLI and TUI show identical numbers
//! - display rules (`N/A`, `K`/`M` suffixes, `%`) are tested once

use serde_json::Value;

use crate::data::row::coerce_f64;
use crate::report::{CollectionReport, TrendItem, TrendReport, WalletReport};

/// Format a raw API value for display.
///
/// Absent, `null`, and non-numeric values render as `N/A`; this never fails.
pub fn format_metric(value: Option<&Value>, percentage: bool) -> String {
    format_number(value.and_then(coerce_f64), percentage)
}

/// Format an already-coerced number for display.
///
/// - `percentage`: two decimals plus `%`
/// - otherwise `M` above a million, `K` above a thousand, else two decimals
pub fn format_number(value: Option<f64>, percentage: bool) -> String {
    let Some(num) = value.filter(|v| v.is_finite()) else {
        return "N/A".to_string();
    };
    if percentage {
        return format!("{num:.2}%");
    }
    let abs = num.abs();
    if abs >= 1_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.2}K", num / 1_000.0)
    } else {
        format!("{num:.2}")
    }
}

pub fn format_wallet_report(report: &WalletReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Wallet Gaming Metrics ({}) ===\n", query_line(&report.query)));

    let cards: Vec<String> = report
        .headline
        .iter()
        .map(|h| format!("{}: {}", h.label, h.display))
        .collect();
    out.push_str(&cards.join(" | "));
    out.push_str("\n\n");

    if report.rows.is_empty() {
        out.push_str("No rows returned.\n");
        return out;
    }

    let cells: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| report.columns.iter().map(|c| row.field(c).text()).collect())
        .collect();
    out.push_str(&format_table(&report.columns, &cells));
    out
}

pub fn format_collection_report(report: &CollectionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Collection Metrics ({} | offset={}) ===\n",
        query_line(&report.query),
        report.page.offset()
    ));

    if report.cards.is_empty() {
        out.push_str("No collections returned.\n");
    }

    for card in &report.cards {
        out.push('\n');
        out.push_str(&format!("{}\n", card.title));
        out.push_str(&format!("  {}: {}\n", card.sort_field, card.sort_value));
        for (field, value) in &card.details {
            out.push_str(&format!("    {field:<34} {value}\n"));
        }
    }

    out.push_str(&format!(
        "\nPage {}{}\n",
        report.page.display_number(),
        if report.has_next { " (more available: --page +1)" } else { "" }
    ));
    out
}

pub fn format_trend_report(report: &TrendReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Trend Analysis ({}) ===\n", query_line(&report.query)));

    if report.items.is_empty() {
        out.push_str("No trend items returned.\n");
    }
    for item in &report.items {
        out.push('\n');
        out.push_str(&format_trend_item(item));
    }
    out
}

pub fn format_trend_item(item: &TrendItem) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", item.title));

    for m in &item.metrics {
        let delta = m.latest.delta_display().map(|d| format!(" ({d})")).unwrap_or_default();
        out.push_str(&format!("  {:<20} {}{delta}\n", m.label, m.latest.value_display()));
    }

    if item.dates.is_empty() {
        out.push_str("  (no dated points)\n");
        return out;
    }

    let mut headers = vec!["date".to_string()];
    headers.extend(item.metrics.iter().map(|m| m.series.name.clone()));
    let cells: Vec<Vec<String>> = item
        .dates
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let mut row = vec![
                d.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ];
            row.extend(
                item.metrics
                    .iter()
                    .map(|m| format_number(m.series.values.get(i).copied().flatten(), false)),
            );
            row
        })
        .collect();

    for line in format_table(&headers, &cells).lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn query_line(q: &crate::domain::QueryParams) -> String {
    format!(
        "{} | {} | sort={} {} | limit={}",
        q.blockchain, q.time_range, q.sort_by, q.sort_order, q.limit
    )
}

/// Left-aligned text table sized to its content.
fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    const MAX_WIDTH: usize = 28;

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let cell_max = rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0);
            h.chars().count().max(cell_max).min(MAX_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let render = |cells: &[String]| -> String {
        let parts: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<w$}", truncate(text, *w), w = *w)
            })
            .collect();
        parts.join(" ").trim_end().to_string()
    };

    out.push_str(&render(headers));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join(" "));
    out.push('\n');
    for row in rows {
        out.push_str(&render(row.as_slice()));
        out.push('\n');
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
