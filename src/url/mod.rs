//! URL handling module for Sumi-Scout
//!
//! This module provides hostname extraction, host-boundary matching, and the
//! crawl scope that decides which discovered URLs may be traversed.

mod domain;
mod matcher;
mod scope;

// Re-export main functions
pub use domain::{extract_hostname, parse_seed};
pub use matcher::{host_within, strip_port};
pub use scope::Scope;
