//! Banco Central SGS series client
//!
//! The SGS endpoint returns the complete monthly SELIC series as JSON
//! observations of the form `{"data": "01/02/2025", "valor": "0.99"}`.
//! One fetch is enough to fill the cache for every month at once.

use crate::error::Result;
use crate::month::MonthKey;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// SGS series 4390: monthly SELIC, as a percentage
pub const SGS_SELIC_URL: &str =
    "https://api.bcb.gov.br/dados/serie/bcdata.sgs.4390/dados?formato=json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can produce the full month → rate series.
///
/// [`SgsClient`] is the production implementation; tests substitute fixed
/// or failing sources.
pub trait RateSource {
    /// Fetch the complete series
    fn fetch(&self) -> Result<Vec<(MonthKey, f64)>>;
}

/// One observation of the SGS JSON payload
#[derive(Debug, Deserialize)]
struct SgsObservation {
    data: String,
    valor: String,
}

/// Blocking HTTP client for the SGS series.
pub struct SgsClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl SgsClient {
    /// Client against the production SELIC series
    pub fn new() -> Self {
        Self::with_url(SGS_SELIC_URL)
    }

    /// Client against an alternate endpoint (tests, mirrors)
    pub fn with_url<S: Into<String>>(url: S) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for SgsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RateSource for SgsClient {
    fn fetch(&self) -> Result<Vec<(MonthKey, f64)>> {
        let observations: Vec<SgsObservation> = self
            .http
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()?
            .error_for_status()?
            .json()?;

        let mut series = Vec::with_capacity(observations.len());
        let mut skipped = 0usize;

        for obs in observations {
            // Observation dates are always the first of the month
            let parsed = NaiveDate::parse_from_str(&obs.data, "%d/%m/%Y")
                .ok()
                .zip(obs.valor.parse::<f64>().ok());
            match parsed {
                Some((date, rate)) => series.push((MonthKey::from_date(date), rate)),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped malformed rate observations");
        }
        debug!(months = series.len(), "fetched rate series");

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_shape() {
        let obs: Vec<SgsObservation> = serde_json::from_str(
            r#"[{"data": "01/02/2025", "valor": "0.99"}, {"data": "01/03/2025", "valor": "0.96"}]"#,
        )
        .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].data, "01/02/2025");
        assert_eq!(obs[1].valor, "0.96");
    }
}
