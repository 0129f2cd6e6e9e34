#![deny(missing_docs)]
//! Link Swap Bot library.
//!
//! Echoes chat messages back with every link replaced by one canonical link.

/// Telegram adapter.
pub mod bot;
/// Configuration management.
pub mod config;
/// Link detection and substitution.
pub mod links;
/// Transport-agnostic relay and media group aggregation.
pub mod relay;
/// Bot startup and dispatcher wiring.
pub mod runner;
