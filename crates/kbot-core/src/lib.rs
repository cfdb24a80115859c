//! Core domain + application logic for the KnightBot repository report.
//!
//! This crate is intentionally framework-agnostic. The chat transport lives
//! behind the messaging port (trait) implemented in adapter crates.

pub mod channel;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod github;
pub mod logging;
pub mod messaging;

pub use errors::{Error, Result};
