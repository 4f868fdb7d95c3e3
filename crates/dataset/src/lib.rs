//! # Meridian Dataset Loader
//!
//! This crate owns the one-time ingestion of the transactions CSV file. It is
//! the only place in the system that touches the filesystem.
//!
//! ## Architectural Principles
//!
//! - **Fail fast:** a missing column, an unparseable numeric, or a bad date is
//!   a fatal `DatasetError` with a descriptive message. There is no partial
//!   dashboard over a partial dataset.
//! - **Load-time sanitation:** rows with non-positive sales or units are not
//!   order lines and are dropped before the engine sees them.

// Declare the modules that make up this crate.
pub mod error;
pub mod loader;

// Re-export the core types to provide a clean public API.
pub use error::DatasetError;
pub use loader::{load_transactions, load_transactions_file};
