#![forbid(unsafe_code)]

//! Core domain model and adherence analytics for MedLog.
//!
//! This crate provides:
//! - Domain types (patients, medications, intake logs)
//! - Adherence aggregation per patient and per medication
//! - Weekly trend bucketing
//! - CSV export
//! - Snapshot loading and configuration

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod adherence;
pub mod performance;
pub mod trends;
pub mod dashboard;
pub mod export;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, ReportConfig, WeekOrderingKind};
pub use adherence::{overall_stats, patient_adherence, percentage};
pub use performance::medication_performance;
pub use trends::{
    trend_directions, weekly_trends, ChronologicalOrdering, LexicalOrdering, WeekKey,
    WeekOrdering,
};
pub use dashboard::{daily_summary, recent_logs, upcoming_medications};
pub use export::{export_logs, parse_csv, to_csv, write_export, Tabular};
pub use report::{DayView, Report};
