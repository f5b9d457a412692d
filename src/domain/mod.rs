//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod portfolio;
pub mod position;
pub mod record;
pub mod report;
pub mod runner;
pub mod signal;
pub mod strategy;
