// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration for a memfs instance

use serde::{Deserialize, Serialize};

/// Resource limits
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsLimits {
    /// Largest content length a single file may grow to. `None` leaves growth
    /// bounded only by available memory.
    pub max_file_bytes: Option<u64>,
}

/// Kernel-side cache TTLs returned with attribute and entry replies
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachePolicy {
    pub attr_ttl_ms: u32,
    pub entry_ttl_ms: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            attr_ttl_ms: 1000,
            entry_ttl_ms: 1000,
        }
    }
}

/// Read/write worker pool sizing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoPolicy {
    /// Worker thread count; `None` means one per available CPU.
    pub worker_threads: Option<usize>,
}

/// Top-level memfs configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemFsConfig {
    pub limits: FsLimits,
    pub cache: CachePolicy,
    pub io: IoPolicy,
    /// Permission bits of the root directory
    pub root_mode: u32,
}

impl Default for MemFsConfig {
    fn default() -> Self {
        Self {
            limits: FsLimits::default(),
            cache: CachePolicy::default(),
            io: IoPolicy::default(),
            root_mode: 0o700,
        }
    }
}

impl MemFsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_growth_unbounded() {
        let config = MemFsConfig::default();
        assert_eq!(config.limits.max_file_bytes, None);
        assert_eq!(config.cache.attr_ttl_ms, 1000);
        assert_eq!(config.root_mode, 0o700);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config =
            MemFsConfig::from_json_str(r#"{ "limits": { "max_file_bytes": 4096 } }"#).unwrap();
        assert_eq!(config.limits.max_file_bytes, Some(4096));
        assert_eq!(config.cache, CachePolicy::default());
        assert_eq!(config.io.worker_threads, None);
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(MemFsConfig::from_json_str(r#"{ "limits": 12 }"#).is_err());
    }
}
