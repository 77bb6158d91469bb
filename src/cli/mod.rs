//! Command-line parsing for the NFT-gaming dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! fetching and rendering. Every enumerated API parameter is a typed
//! `ValueEnum`, so invalid tokens are rejected before any request is made.

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    Blockchain, CollectionSortField, LIMIT_MAX, LIMIT_MIN, ReportKind, SortOrder, TimeRange, TrendSortField,
    WalletSortField,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nftg", version, about = "NFT gaming analytics dashboard (UnleashNFTs API)")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct GlobalArgs {
    /// Override the API base URL (default: UNLEASH_BASE_URL or the public API).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP timeout in seconds (default: UNLEASH_TIMEOUT_SECS or 30).
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Verbose logging (stderr for commands, NFTG_LOG_FILE for the TUI).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch wallet gaming metrics and print headline values plus the table.
    Wallet(WalletArgs),
    /// Fetch one page of collection metrics.
    Collections(CollectionArgs),
    /// Fetch collection trends and print latest values, deltas, and series.
    Trends(TrendArgs),
    /// Launch the interactive TUI (the default when no subcommand is given).
    Tui,
}

/// Filters common to all three endpoints.
#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    #[arg(short = 'b', long, value_enum, default_value_t = Blockchain::Ethereum)]
    pub blockchain: Blockchain,

    #[arg(short = 't', long, value_enum, default_value_t = TimeRange::Day)]
    pub time_range: TimeRange,

    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub sort_order: SortOrder,

    /// Print the assembled report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct WalletArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(short = 's', long, value_enum, default_value_t = WalletSortField::TotalUsers)]
    pub sort_by: WalletSortField,

    /// Number of results (1-100).
    #[arg(short = 'n', long, default_value_t = ReportKind::Wallet.default_limit(), value_parser = limit_parser())]
    pub limit: u32,
}

#[derive(Debug, Args, Clone)]
pub struct CollectionArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(short = 's', long, value_enum, default_value_t = CollectionSortField::TotalUsers)]
    pub sort_by: CollectionSortField,

    /// Number of results (1-100).
    #[arg(short = 'n', long, default_value_t = ReportKind::Collection.default_limit(), value_parser = limit_parser())]
    pub limit: u32,

    /// Zero-based page; the request offset is `page * 9`.
    #[arg(short = 'p', long, default_value_t = 0)]
    pub page: u32,
}

#[derive(Debug, Args, Clone)]
pub struct TrendArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(short = 's', long, value_enum, default_value_t = TrendSortField::ActiveUsers)]
    pub sort_by: TrendSortField,

    /// Number of results (1-100).
    #[arg(short = 'n', long, default_value_t = ReportKind::Trend.default_limit(), value_parser = limit_parser())]
    pub limit: u32,
}

fn limit_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(i64::from(LIMIT_MIN)..=i64::from(LIMIT_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_collections_with_page_and_enums() {
        let cli = Cli::try_parse_from([
            "nftg",
            "collections",
            "-b",
            "polygon",
            "-t",
            "7d",
            "--sort-by",
            "retention_rate_change",
            "--sort-order",
            "asc",
            "-n",
            "20",
            "--page",
            "3",
            "--json",
        ])
        .unwrap();
        let Command::Collections(args) = cli.command else {
            panic!("expected collections");
        };
        assert_eq!(args.filters.blockchain, Blockchain::Polygon);
        assert_eq!(args.filters.time_range, TimeRange::Week);
        assert_eq!(args.sort_by, CollectionSortField::RetentionRateChange);
        assert_eq!(args.filters.sort_order, SortOrder::Asc);
        assert_eq!(args.limit, 20);
        assert_eq!(args.page, 3);
        assert!(args.filters.json);
    }

    #[test]
    fn defaults_match_report_kinds() {
        let cli = Cli::try_parse_from(["nftg", "collections"]).unwrap();
        let Command::Collections(args) = cli.command else {
            panic!("expected collections");
        };
        assert_eq!(args.limit, 9);
        assert_eq!(args.page, 0);

        let cli = Cli::try_parse_from(["nftg", "trends"]).unwrap();
        let Command::Trends(args) = cli.command else {
            panic!("expected trends");
        };
        assert_eq!(args.limit, 30);
        assert_eq!(args.filters.time_range, TimeRange::Day);
    }

    #[test]
    fn rejects_out_of_range_limit_and_unknown_tokens() {
        assert!(Cli::try_parse_from(["nftg", "wallet", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["nftg", "wallet", "-n", "101"]).is_err());
        assert!(Cli::try_parse_from(["nftg", "wallet", "-b", "bitcoin"]).is_err());
        assert!(Cli::try_parse_from(["nftg", "wallet", "--sort-by", "nft_count"]).is_err());
        assert!(Cli::try_parse_from(["nftg", "trends", "--sort-by", "maxdate"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nftg", "wallet", "--base-url", "http://localhost:1", "--timeout-secs", "3", "-v"])
            .unwrap();
        assert_eq!(cli.global.base_url.as_deref(), Some("http://localhost:1"));
        assert_eq!(cli.global.timeout_secs, Some(3));
        assert!(cli.global.verbose);
    }
}
