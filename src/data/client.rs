//! UnleashNFTs gaming API integration.
//!
//! One blocking GET per user action; no retries. Transport failures (network,
//! non-2xx status, non-JSON body) are errors. A well-formed body with an odd
//! shape is not: a missing `data` array yields zero rows and a warning.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::config::Settings;
use crate::data::row::RawRow;
use crate::domain::{QueryParams, ReportKind};
use crate::error::AppError;

const API_KEY_HEADER: &str = "x-api-key";

/// Anything that can answer a report query with raw rows.
///
/// The pipeline is written against this trait so it can run on canned rows.
pub trait MetricsSource {
    fn fetch_rows(&self, kind: ReportKind, params: &QueryParams) -> Result<Vec<RawRow>, AppError>;
}

pub struct UnleashClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl UnleashClient {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_wallet_metrics(&self, params: &QueryParams) -> Result<Vec<RawRow>, AppError> {
        self.get(ReportKind::Wallet, params)
    }

    pub fn fetch_collection_metrics(&self, params: &QueryParams) -> Result<Vec<RawRow>, AppError> {
        self.get(ReportKind::Collection, params)
    }

    pub fn fetch_trends(&self, params: &QueryParams) -> Result<Vec<RawRow>, AppError> {
        self.get(ReportKind::Trend, params)
    }

    fn get(&self, kind: ReportKind, params: &QueryParams) -> Result<Vec<RawRow>, AppError> {
        let url = format!("{}{}", self.base_url, kind.path());
        tracing::info!(endpoint = %url, sort_by = params.sort_by, limit = params.limit, offset = ?params.offset, "fetching report");

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .query(&params.to_pairs())
            .send()
            .map_err(|e| AppError::runtime(format!("Error fetching data: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %url, %status, "request rejected");
            return Err(AppError::runtime(format!(
                "Error fetching data: {} returned status {status}.",
                kind.display_name()
            )));
        }

        let body: Value = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse API response: {e}")))?;

        let rows = rows_from_body(body);
        tracing::debug!(endpoint = %url, rows = rows.len(), "report fetched");
        Ok(rows)
    }
}

impl MetricsSource for UnleashClient {
    fn fetch_rows(&self, kind: ReportKind, params: &QueryParams) -> Result<Vec<RawRow>, AppError> {
        self.get(kind, params)
    }
}

/// Extract the `data` array from a response body.
pub fn rows_from_body(body: Value) -> Vec<RawRow> {
    let data = match body {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    };

    let Some(Value::Array(items)) = data else {
        tracing::warn!("response has no `data` array; treating as empty");
        return Vec::new();
    };

    let total = items.len();
    let rows: Vec<RawRow> = items.into_iter().filter_map(RawRow::from_value).collect();
    if rows.len() != total {
        tracing::warn!(skipped = total - rows.len(), "skipped non-object rows in `data`");
    }
    rows
}
