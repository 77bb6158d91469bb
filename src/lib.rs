//! `nftg` library crate.
//!
//! The binary (`nftg`) is a thin wrapper around this library so that:
//!
//! - decoding and report assembly are testable without a network or terminal
//! - the CLI and the TUI share one fetch pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod decode;
pub mod domain;
pub mod error;
pub mod logging;
pub mod report;
pub mod tui;
