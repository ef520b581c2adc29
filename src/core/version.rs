//! Format version encoding and pipeline variant selection.
//!
//! Versions are encoded as `major * 1_000_000 + minor * 1_000 + patch`, so
//! `1001000` is v1.1.0 and `3000000` is v3.0.0.

use crate::core::error::{ErrorKind, Result};
use regex::Regex;

pub const V2_0: i64 = 2_000_000;
pub const V3_0: i64 = 3_000_000;
const V1_0: i64 = 1_000_000;

/// An encoded format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FormatVersion(pub i64);

/// The three schema generations, selected purely by version thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineVariant {
    /// Legacy monolithic RNA-only layout.
    V1,
    /// Multi-modal RNA+ADT layout.
    V2,
    /// Multi-modal RNA+ADT+CRISPR layout with per-modality stage names.
    V3,
}

impl FormatVersion {
    /// Validates the raw encoding; anything below 1.0.0 is rejected.
    pub fn from_encoded(version: i64) -> Result<Self> {
        if version < V1_0 {
            return Err(ErrorKind::OutOfRange {
                field: "version".to_string(),
                reason: format!("{} is below the minimum supported version 1.0.0", version),
            }
            .into());
        }
        Ok(FormatVersion(version))
    }

    /// Parses a dotted version string such as `"3.0.0"`.
    pub fn parse(text: &str) -> Result<Self> {
        let re = Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").unwrap();
        let caps = re.captures(text.trim()).ok_or_else(|| ErrorKind::InvalidEnum {
            field: "version".to_string(),
            value: text.to_string(),
        })?;
        let part = |i: usize| -> i64 { caps[i].parse().unwrap_or(0) };
        let (major, minor, patch) = (part(1), part(2), part(3));
        if minor >= 1000 || patch >= 1000 {
            return Err(ErrorKind::OutOfRange {
                field: "version".to_string(),
                reason: format!("'{}' has out-of-range components", text),
            }
            .into());
        }
        FormatVersion::from_encoded(major * 1_000_000 + minor * 1_000 + patch)
    }

    pub fn encoded(&self) -> i64 {
        self.0
    }

    pub fn variant(&self) -> PipelineVariant {
        if self.0 < V2_0 {
            PipelineVariant::V1
        } else if self.0 < V3_0 {
            PipelineVariant::V2
        } else {
            PipelineVariant::V3
        }
    }
}
