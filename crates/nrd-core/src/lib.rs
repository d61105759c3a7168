//! Core domain + application logic for the news-radar digest tool.
//!
//! This crate is intentionally transport-agnostic. The WeCom webhook client
//! lives in an adapter crate; everything here is a pure function of the
//! snapshot and the run configuration.

pub mod config;
pub mod digest;
pub mod errors;
pub mod logging;
pub mod snapshot;
pub mod timefmt;

pub use errors::{Error, Result};
