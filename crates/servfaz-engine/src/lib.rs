//! # servfaz-engine
//!
//! Orchestration of one calculation round trip: write the caller's input
//! fields into the grid, have the external spreadsheet engine recompute,
//! parse the result band into blocks, and apply the SELIC correction when
//! the target date calls for it.
//!
//! - [`InputField`] / [`CalculationInput`] - the ten logical input fields
//!   and their fixed cell mapping
//! - [`EngineSession`] - the acquired handle over the calculation engine,
//!   with [`InMemoryEngine`] as the in-process implementation
//! - [`run_calculation`] - the pipeline
//! - [`OutcomeStore`] - the persistence boundary (identifiers and
//!   timestamps are minted by the store, never by this crate)

pub mod error;
pub mod fields;
pub mod pipeline;
pub mod session;
pub mod store;

pub use error::{EngineError, Result};
pub use fields::{write_inputs, CalculationInput, FieldKind, InputField};
pub use pipeline::{run_calculation, CalculationOutcome};
pub use session::{EngineSession, InMemoryEngine};
pub use store::{MemoryStore, OutcomeStore, SavedRecord};
