//! HTTP Route Handlers

pub mod diagnose;
pub mod history;
