//! # servfaz-selic
//!
//! SELIC index-rate plumbing and the monetary correction engine.
//!
//! The spreadsheet's native output is priced at a fixed baseline date.
//! When the caller asks for a later target date, the correction engine
//! re-prices selected columns by compounding the monthly SELIC rate across
//! the months between baseline and target. Rates come from a [`RateLookup`]
//! backed by a durable local cache and the Banco Central SGS series.
//!
//! - [`MonthKey`] - `YYYY-MM` calendar-month keys and window derivation
//! - [`RateCache`] - the persisted month → rate mapping
//! - [`SgsClient`] - Banco Central series fetch
//! - [`SelicLookup`] - cache + on-demand fetch behind the [`RateLookup`] trait
//! - [`Corrector`] - the compounding pass over parsed blocks

pub mod cache;
pub mod client;
pub mod correct;
pub mod dates;
pub mod error;
pub mod lookup;
pub mod month;

pub use cache::RateCache;
pub use client::{RateSource, SgsClient, SGS_SELIC_URL};
pub use correct::{Correction, Corrector};
pub use dates::parse_flex_date;
pub use error::{RateError, Result};
pub use lookup::{RateLookup, SelicLookup};
pub use month::{month_window, MonthKey};
