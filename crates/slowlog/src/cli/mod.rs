//! Command-line interface for slowlog

pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod source;
pub mod tui;
