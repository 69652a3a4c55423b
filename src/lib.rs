// src/lib.rs

//! Trend Tracker Library
//!
//! Polls a public trends page, and emails an HTML summary whenever the set
//! of primary trends differs from the last one delivered.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
