//! # Quake Rankings
//!
//! Ranking engine for competitive Quake tournament results.
//!
//! ## Architecture
//!
//! - **models**: Tournament rows, scoring configuration and computed outputs
//! - **calculate**: Filtering, scoring, aggregate rankings and player detail
//! - **engine**: Fetch-then-compute orchestration over a record source
//! - **source**: Record sources (local JSONL, REST table, in-memory)
//! - **storage**: Filesystem data lake operations (JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod engine;
pub mod models;
pub mod source;
pub mod storage;

pub use models::*;
