//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads settings and initializes logging
//! - runs one report command, or hands off to the TUI

use clap::Parser;
use serde::Serialize;

use crate::cli::{CollectionArgs, Command, FilterArgs, GlobalArgs, TrendArgs, WalletArgs};
use crate::config::Settings;
use crate::data::UnleashClient;
use crate::domain::{PageState, QueryParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `nftg` binary.
pub fn run() -> Result<(), AppError> {
    // We want `nftg` and `nftg --timeout-secs 5` to behave like `nftg tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let settings = Settings::from_env()?
        .with_overrides(cli.global.base_url.as_deref(), cli.global.timeout_secs)?;

    match cli.command {
        Command::Tui => handle_tui(settings, &cli.global),
        command => {
            crate::logging::init_stderr(cli.global.verbose);
            tracing::debug!(?settings, "settings loaded");
            let client = UnleashClient::new(&settings)?;
            handle_command(&client, command)
        }
    }
}

fn handle_tui(settings: Settings, global: &GlobalArgs) -> Result<(), AppError> {
    if let Some(path) = &settings.log_file {
        crate::logging::init_file(path, global.verbose)?;
    }
    tracing::info!(base_url = %settings.base_url, "starting tui");
    crate::tui::run(&settings)
}

fn handle_command(client: &UnleashClient, command: Command) -> Result<(), AppError> {
    match command {
        Command::Wallet(args) => handle_wallet(client, args),
        Command::Collections(args) => handle_collections(client, args),
        Command::Trends(args) => handle_trends(client, args),
        Command::Tui => Err(AppError::usage("The TUI cannot be started from here.")),
    }
}

fn handle_wallet(client: &UnleashClient, args: WalletArgs) -> Result<(), AppError> {
    let query = query_from_filters(&args.filters, args.sort_by.as_str(), args.limit)?;
    let report = pipeline::wallet_report(client, query)?;
    emit(&args.filters, &report, || crate::report::format::format_wallet_report(&report))
}

fn handle_collections(client: &UnleashClient, args: CollectionArgs) -> Result<(), AppError> {
    let query = query_from_filters(&args.filters, args.sort_by.as_str(), args.limit)?;
    let report = pipeline::collection_report(client, query, PageState::new(args.page))?;
    emit(&args.filters, &report, || crate::report::format::format_collection_report(&report))
}

fn handle_trends(client: &UnleashClient, args: TrendArgs) -> Result<(), AppError> {
    let query = query_from_filters(&args.filters, args.sort_by.as_str(), args.limit)?;
    let report = pipeline::trend_report(client, query)?;
    emit(&args.filters, &report, || crate::report::format::format_trend_report(&report))
}

pub fn query_from_filters(filters: &FilterArgs, sort_by: &'static str, limit: u32) -> Result<QueryParams, AppError> {
    QueryParams::new(filters.blockchain, filters.time_range, sort_by, filters.sort_order, limit)
}

/// Print a report as JSON (`--json`) or text.
fn emit<T: Serialize>(filters: &FilterArgs, report: &T, text: impl FnOnce() -> String) -> Result<(), AppError> {
    if filters.json {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| AppError::runtime(format!("Failed to serialize report: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Rewrite argv so `nftg` defaults to `nftg tui`.
///
/// Rules:
/// - `nftg`                         -> `nftg tui`
/// - `nftg --timeout-secs 5 ...`    -> `nftg tui --timeout-secs 5 ...`
/// - `nftg --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "wallet" | "collections" | "trends" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
