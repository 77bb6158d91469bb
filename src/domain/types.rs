//! Shared domain types.
//!
//! The API speaks in lowercase string tokens (`"ethereum"`, `"24h"`, `"desc"`).
//! We model every enumerated query parameter as a Rust enum so that:
//!
//! - the CLI can validate flags with clap (`ValueEnum`)
//! - the TUI can cycle through choices (`next` / `prev`)
//! - the HTTP layer only ever sends tokens the API documents

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Page size used for collection-metrics offsets (`offset = page * ITEMS_PER_PAGE`).
pub const ITEMS_PER_PAGE: u32 = 9;

/// Inclusive bounds accepted by the API for `limit`.
pub const LIMIT_MIN: u32 = 1;
pub const LIMIT_MAX: u32 = 100;

/// Trend metrics that get decoded, aligned and charted (when present on an item).
pub const TREND_METRICS: [&str; 4] = ["active_users", "game_interactions", "game_activity", "avg_earnings"];

/// Wallet metrics shown as headline values above the wallet table.
pub const WALLET_HEADLINE_METRICS: [&str; 4] = ["total_users", "active_users", "volume", "transactions"];

/// Columns hidden from collection detail listings.
pub const COLLECTION_HIDDEN_FIELDS: [&str; 2] = ["thumbnail_url", "thumbnail_palette"];

/// Declares a string-backed API enum with clap/serde names, an `ALL` list,
/// `as_str`, and cyclic `next` / `prev` helpers for selectors.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                #[value(name = $token)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const NAMES: &'static [&'static str] = &[$($token),+];

            /// Wire token sent to the API.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }

            fn position(self) -> usize {
                Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
            }

            pub fn next(self) -> Self {
                Self::ALL[(self.position() + 1) % Self::ALL.len()]
            }

            pub fn prev(self) -> Self {
                let n = Self::ALL.len();
                Self::ALL[(self.position() + n - 1) % n]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

api_enum! {
    /// Chains supported by the gaming endpoints.
    Blockchain {
        Ethereum => "ethereum",
        Polygon => "polygon",
        Avalanche => "avalanche",
        Binance => "binance",
        Ordinals => "ordinals",
        Linea => "linea",
        Solana => "solana",
    }
}

api_enum! {
    /// Aggregation window.
    TimeRange {
        Day => "24h",
        Week => "7d",
        Month => "30d",
        Quarter => "90d",
        All => "all",
    }
}

api_enum! {
    SortOrder {
        Desc => "desc",
        Asc => "asc",
    }
}

api_enum! {
    /// Sort fields accepted by the wallet metrics endpoint.
    WalletSortField {
        TotalUsers => "total_users",
        Volume => "volume",
        Transactions => "transactions",
        ActiveUsers => "active_users",
    }
}

api_enum! {
    /// Sort fields accepted by the collection metrics endpoint.
    CollectionSortField {
        TotalUsers => "total_users",
        TotalUsersChange => "total_users_change",
        TotalInteractionsVolume => "total_interactions_volume",
        TotalInteractionsVolumeChange => "total_interactions_volume_change",
        TotalMarketcap => "total_marketcap",
        TotalMarketcapChange => "total_marketcap_change",
        ActiveUsers => "active_users",
        ActiveUsersChange => "active_users_change",
        RetentionRate => "retention_rate",
        RetentionRateChange => "retention_rate_change",
        GameInteractions => "game_interactions",
        GameInteractionsChange => "game_interactions_change",
        TotalInteraction => "total_interaction",
        TotalInteractionChange => "total_interaction_change",
        InteractionRate => "interaction_rate",
        InteractionRateChange => "interaction_rate_change",
        BotCount => "bot_count",
        BotNativePrice => "bot_native_price",
        BotVolume => "bot_volume",
        UniqueWallets => "unique_wallets",
        UniqueWalletsChange => "unique_wallets_change",
        AvgEarnings => "avg_earnings",
        GameRevenue => "game_revenue",
        AvgGameAction => "avg_game_action",
        NftCount => "nft_count",
    }
}

api_enum! {
    /// Sort fields accepted by the collection trend endpoint.
    TrendSortField {
        ActiveUsers => "active_users",
        ActiveUsersChange => "active_users_change",
        GameInteractions => "game_interactions",
        GameInteractionsChange => "game_interactions_change",
        AvgEarnings => "avg_earnings",
        GameRevenue => "game_revenue",
        GameActivity => "game_activity",
        AvgGameAction => "avg_game_action",
        Maxdate => "maxdate",
    }
}

/// The three report types (one per endpoint / TUI tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Wallet,
    Collection,
    Trend,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Wallet, ReportKind::Collection, ReportKind::Trend];

    /// Endpoint path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            ReportKind::Wallet => "/metrics",
            ReportKind::Collection => "/collection/metrics",
            ReportKind::Trend => "/collection/trend",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ReportKind::Wallet => "Wallet Gaming Metrics",
            ReportKind::Collection => "Collection Metrics",
            ReportKind::Trend => "Trend Analysis",
        }
    }

    /// Result count preselected in the UI.
    pub fn default_limit(self) -> u32 {
        match self {
            ReportKind::Wallet => 30,
            ReportKind::Collection => ITEMS_PER_PAGE,
            ReportKind::Trend => 30,
        }
    }

    pub fn sort_fields(self) -> &'static [&'static str] {
        match self {
            ReportKind::Wallet => WalletSortField::NAMES,
            ReportKind::Collection => CollectionSortField::NAMES,
            ReportKind::Trend => TrendSortField::NAMES,
        }
    }

    /// Columns we know each endpoint returns, in display order.
    ///
    /// Rows may omit any of these and may carry extra columns; see `columns_for`.
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            ReportKind::Wallet => &[
                "blockchain",
                "total_users",
                "active_users",
                "volume",
                "transactions",
            ],
            ReportKind::Collection => &[
                "game",
                "contract_address",
                "blockchain",
                "total_users",
                "total_users_change",
                "total_interactions_volume",
                "total_interactions_volume_change",
                "total_marketcap",
                "total_marketcap_change",
                "active_users",
                "active_users_change",
                "retention_rate",
                "retention_rate_change",
                "game_interactions",
                "game_interactions_change",
                "total_interaction",
                "total_interaction_change",
                "interaction_rate",
                "interaction_rate_change",
                "bot_count",
                "bot_native_price",
                "bot_volume",
                "unique_wallets",
                "unique_wallets_change",
                "avg_earnings",
                "game_revenue",
                "avg_game_action",
                "nft_count",
                "thumbnail_url",
                "thumbnail_palette",
            ],
            ReportKind::Trend => &[
                "game",
                "contract_address",
                "blockchain",
                "maxdate",
                "active_users",
                "active_users_change",
                "game_interactions",
                "game_interactions_change",
                "avg_earnings",
                "game_revenue",
                "game_activity",
                "avg_game_action",
            ],
        }
    }
}

/// Query string parameters shared by all three endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    pub blockchain: Blockchain,
    pub time_range: TimeRange,
    pub sort_by: &'static str,
    pub sort_order: SortOrder,
    pub limit: u32,
    /// Only sent to the collection metrics endpoint.
    pub offset: Option<u32>,
}

impl QueryParams {
    pub fn new(
        blockchain: Blockchain,
        time_range: TimeRange,
        sort_by: &'static str,
        sort_order: SortOrder,
        limit: u32,
    ) -> Result<Self, AppError> {
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&limit) {
            return Err(AppError::usage(format!(
                "limit must be between {LIMIT_MIN} and {LIMIT_MAX} (got {limit})."
            )));
        }
        Ok(Self {
            blockchain,
            time_range,
            sort_by,
            sort_order,
            limit,
            offset: None,
        })
    }

    pub fn with_page(mut self, page: PageState) -> Self {
        self.offset = Some(page.offset());
        self
    }

    /// Encode as `(name, value)` pairs for `reqwest::RequestBuilder::query`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("blockchain", self.blockchain.as_str().to_string()),
            ("time_range", self.time_range.as_str().to_string()),
            ("sort_by", self.sort_by.to_string()),
            ("sort_order", self.sort_order.as_str().to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// Zero-based page counter for collection metrics.
///
/// Passed into a fetch and returned with its report; only `next` / `prev` move it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page: u32,
}

impl PageState {
    pub fn new(page: u32) -> Self {
        Self { page }
    }

    pub fn offset(self) -> u32 {
        self.page.saturating_mul(ITEMS_PER_PAGE)
    }

    /// 1-based page number for display.
    pub fn display_number(self) -> u32 {
        self.page.saturating_add(1)
    }

    /// A full page (as many rows as requested) means there may be more.
    pub fn has_next(rows_fetched: usize, limit: u32) -> bool {
        rows_fetched > 0 && rows_fetched == limit as usize
    }

    pub fn next(self, rows_fetched: usize, limit: u32) -> Self {
        if Self::has_next(rows_fetched, limit) {
            Self { page: self.page.saturating_add(1) }
        } else {
            self
        }
    }

    pub fn prev(self) -> Self {
        Self { page: self.page.saturating_sub(1) }
    }
}

/// Decoded numeric series: one slot per source element, `None` = absent.
pub type NumericSeries = Vec<Option<f64>>;

/// Decoded date axis: one slot per source token, `None` = unparseable.
pub type DateSeries = Vec<Option<NaiveDateTime>>;

/// A metric series tagged with its API field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: NumericSeries,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, values: NumericSeries) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// `"game_interactions"` -> `"Game Interactions"`.
pub fn title_case(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
