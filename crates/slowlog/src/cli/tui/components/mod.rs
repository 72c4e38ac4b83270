//! Reusable widgets for the dashboard.

pub mod help_bar;
pub mod modal;
