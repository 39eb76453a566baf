//! algoscan: technical-analysis market scanner.
//!
//! A configurable ensemble of strategies is evaluated over every symbol of a
//! universe; the votes are aggregated into scores that are filtered, ranked
//! and reported once or on a timer.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod services;
pub mod signals;
pub mod strategies;
