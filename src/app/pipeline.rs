//! Shared fetch-and-assemble logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! API fetch -> row access -> decode/align -> typed report
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use serde::Serialize;

use crate::data::MetricsSource;
use crate::domain::{PageState, QueryParams, ReportKind};
use crate::error::AppError;
use crate::report::{
    CollectionReport, TrendReport, WalletReport, build_collection_report, build_trend_report, build_wallet_report,
};

/// Output of one fetch action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Report {
    Wallet(WalletReport),
    Collection(CollectionReport),
    Trend(TrendReport),
}

impl Report {
    /// Number of rows/cards/items the report holds.
    pub fn len(&self) -> usize {
        match self {
            Report::Wallet(r) => r.rows.len(),
            Report::Collection(r) => r.cards.len(),
            Report::Trend(r) => r.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn wallet_report<S: MetricsSource + ?Sized>(source: &S, query: QueryParams) -> Result<WalletReport, AppError> {
    let rows = source.fetch_rows(ReportKind::Wallet, &query)?;
    Ok(build_wallet_report(query, rows))
}

/// Fetch one page of collection metrics.
///
/// The page goes in and comes back inside the report; callers move it with
/// `PageState::next` / `prev` using the returned row count.
pub fn collection_report<S: MetricsSource + ?Sized>(
    source: &S,
    query: QueryParams,
    page: PageState,
) -> Result<CollectionReport, AppError> {
    let query = query.with_page(page);
    let rows = source.fetch_rows(ReportKind::Collection, &query)?;
    Ok(build_collection_report(query, page, rows))
}

pub fn trend_report<S: MetricsSource + ?Sized>(source: &S, query: QueryParams) -> Result<TrendReport, AppError> {
    let rows = source.fetch_rows(ReportKind::Trend, &query)?;
    Ok(build_trend_report(query, rows))
}

/// Dispatch on report kind; `page` is ignored except for collections.
pub fn fetch_report<S: MetricsSource + ?Sized>(
    source: &S,
    kind: ReportKind,
    query: QueryParams,
    page: PageState,
) -> Result<Report, AppError> {
    let report = match kind {
        ReportKind::Wallet => Report::Wallet(wallet_report(source, query)?),
        ReportKind::Collection => Report::Collection(collection_report(source, query, page)?),
        ReportKind::Trend => Report::Trend(trend_report(source, query)?),
    };
    tracing::info!(kind = ?kind, items = report.len(), "report assembled");
    Ok(report)
}
