// src/models/mod.rs

//! Domain models for the trend tracker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod selectors;
mod snapshot;
mod trend;

// Re-export all public types
pub use config::{
    Config, EmailConfig, RenderConfig, SourceConfig, StoreBackend, StoreConfig,
};
pub use selectors::{ListSelectors, TrendSelectors};
pub use snapshot::Snapshot;
pub use trend::{Category, PublishTime, TrendPage, TrendRecord};
