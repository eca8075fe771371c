//! # AGS Rust Engine
//!
//! Guide star asterism search and ranking engine.
//!
//! Given a telescope pointing and an instrument's guide probe requirements,
//! this crate searches astrometric catalogs for candidate stars, assembles
//! them into valid multi-star asterisms (one star per required guide probe
//! group) across several candidate telescope orientations, scores each
//! asterism with an injected quality estimator, ranks the results and
//! applies the chosen asterism back to the observation.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Observation snapshot, candidates, orientations and asterisms
//! - [`catalog`]: Search criteria, cone queries and the catalog backend trait
//! - [`services`]: Pipeline stages (validation, analysis, filtering) and the
//!   search coordinator
//! - [`config`]: Engine tuning loaded from environment variables or TOML
//! - [`error`]: Closed failure taxonomy matched exhaustively by callers
//!
//! ## Pipeline
//!
//! A search runs on a single background worker per invocation:
//!
//! 1. Build the candidate orientation set (current angle + cardinals)
//! 2. One catalog cone query per required guide probe group, under a deadline
//! 3. Fail fast if any required group produced no candidates
//! 4. Enumerate, validate and score every orientation/candidate combination
//! 5. Rank by score and keep the asterisms at the best orientation
//!
//! Cancellation is cooperative: a [`services::CancelToken`] is polled before
//! each catalog query, at a fixed interval during combination enumeration,
//! and before commit.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{Result, SearchError};
