//! The rate lookup collaborator
//!
//! [`RateLookup`] is the seam between the correction engine and the rate
//! plumbing: `get` is cache-only and never performs I/O, `ensure` may hit
//! the network once to merge the full remote series before answering.

use crate::cache::RateCache;
use crate::client::{RateSource, SgsClient};
use crate::dates::parse_flex_date;
use crate::error::Result;
use crate::month::MonthKey;
use std::path::{Path, PathBuf};
use tracing::info;

/// Month → rate resolution, with a durable cache behind it.
pub trait RateLookup {
    /// Cache-only lookup; never performs I/O
    fn get(&self, month: MonthKey) -> Option<f64>;

    /// Resolve the month of `date` (any accepted format), fetching and
    /// persisting the full remote series if the month is not yet cached.
    /// Returns the month's rate, or `None` if it is still absent after the
    /// fetch (e.g. a month the series has not published yet).
    fn ensure(&mut self, date: &str) -> Result<Option<f64>>;
}

/// Production [`RateLookup`]: JSON file cache plus the Banco Central
/// series.
pub struct SelicLookup {
    cache: RateCache,
    cache_path: PathBuf,
    source: Box<dyn RateSource>,
}

impl SelicLookup {
    /// Open a lookup over the cache file at `path`, fetching from the
    /// production SGS endpoint when needed.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_source(path, Box::new(SgsClient::new()))
    }

    /// Open a lookup with a custom rate source (tests, mirrors)
    pub fn with_source<P: Into<PathBuf>>(path: P, source: Box<dyn RateSource>) -> Self {
        let cache_path = path.into();
        let cache = RateCache::load(&cache_path);
        Self {
            cache,
            cache_path,
            source,
        }
    }

    /// The cache file backing this lookup
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Number of months currently cached
    pub fn cached_months(&self) -> usize {
        self.cache.len()
    }
}

impl RateLookup for SelicLookup {
    fn get(&self, month: MonthKey) -> Option<f64> {
        self.cache.get(month)
    }

    fn ensure(&mut self, date: &str) -> Result<Option<f64>> {
        let month = MonthKey::from_date(parse_flex_date(date)?);

        if let Some(rate) = self.cache.get(month) {
            return Ok(Some(rate));
        }

        info!(%month, "month not cached, fetching rate series");
        let series = self.source.fetch()?;
        let added = self.cache.merge(series);
        self.cache.save(&self.cache_path)?;
        info!(added, total = self.cache.len(), "rate cache updated");

        Ok(self.cache.get(month))
    }
}
