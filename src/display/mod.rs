//! Output formats for load balancer trees
//!
//! Each format is a [`TreeSink`](crate::tree::TreeSink) writing into any
//! `std::io::Write`:
//!
//! - [`RichSink`]: coloured box-drawing tree with spinners and progress bars
//! - [`PlainSink`]: indented text, `[STATUS]` lines on stderr
//! - [`JsonSink`]: nested resource objects, one pretty document per tree

pub mod activity;
pub mod json;
pub mod plain;
pub mod rich;
mod text_tree;
pub mod utils;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use activity::Activity;
pub use json::JsonSink;
pub use plain::PlainSink;
pub use rich::RichSink;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Coloured tree for terminals
    #[default]
    Rich,
    /// Uncoloured indented text
    Plain,
    /// Structured JSON
    Json,
}

/// How a resource status should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Positive,
    Neutral,
    Negative,
}

impl StatusStyle {
    /// `ACTIVE`/`ONLINE` are positive, any `PENDING*` state is neutral,
    /// everything else is negative
    pub fn of(status: &str) -> Self {
        match status {
            "ACTIVE" | "ONLINE" => StatusStyle::Positive,
            s if s.starts_with("PENDING") => StatusStyle::Neutral,
            _ => StatusStyle::Negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_styles() {
        assert_eq!(StatusStyle::of("ACTIVE"), StatusStyle::Positive);
        assert_eq!(StatusStyle::of("ONLINE"), StatusStyle::Positive);
        assert_eq!(StatusStyle::of("PENDING"), StatusStyle::Neutral);
        assert_eq!(StatusStyle::of("PENDING_UPDATE"), StatusStyle::Neutral);
        assert_eq!(StatusStyle::of("ERROR"), StatusStyle::Negative);
        assert_eq!(StatusStyle::of("DEGRADED"), StatusStyle::Negative);
        assert_eq!(StatusStyle::of("active"), StatusStyle::Negative);
    }
}
