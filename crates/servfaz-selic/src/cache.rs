//! The durable month → rate cache
//!
//! Persisted as a flat JSON object (`{"2025-02": 0.99, ...}`), compatible
//! with the `selic_cache.json` files the system has always written. Rates
//! for closed historical months never change, so merging new series data
//! never overwrites an existing entry.

use crate::error::{RateError, Result};
use crate::month::MonthKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// In-memory month → monthly-rate (percentage) mapping with JSON
/// persistence.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateCache {
    rates: BTreeMap<MonthKey, f64>,
}

impl RateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache from disk.
    ///
    /// A missing or unreadable file yields an empty cache rather than an
    /// error: the cache is an optimization, and the next successful fetch
    /// rebuilds it.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(cache) => cache,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "rate cache unreadable, starting empty");
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    /// Persist the cache, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RateError::CacheIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| RateError::CacheIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The cached rate for a month, if present (percentage, e.g. 0.99)
    pub fn get(&self, month: MonthKey) -> Option<f64> {
        self.rates.get(&month).copied()
    }

    /// Merge a fetched series into the cache.
    ///
    /// Existing months are left untouched; returns how many new months
    /// were added.
    pub fn merge<I>(&mut self, series: I) -> usize
    where
        I: IntoIterator<Item = (MonthKey, f64)>,
    {
        let mut added = 0;
        for (month, rate) in series {
            self.rates.entry(month).or_insert_with(|| {
                added += 1;
                rate
            });
        }
        added
    }

    /// Number of cached months
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the cache holds no months
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
