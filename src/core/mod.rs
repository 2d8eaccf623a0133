//! Core types and functionality for Docflow.
//!
//! This module contains the fundamental pieces used throughout the
//! application: documents and their workflow stages, the store, the
//! document file, statistics, export and configuration.

mod config;
mod document;
mod error;
mod export;
mod persist;
mod stats;
mod store;

pub use config::{Config, DisplayConfig, ExportConfig, StorageConfig, LOCAL_CONFIG_FILE};
pub use document::{Document, Stage, DEFAULT_TIMESTAMP_FORMAT};
pub use error::{DocError, DocResult, PersistenceError};
pub use export::{default_export_name, export_documents, export_path, render_export};
pub use persist::{DocumentFile, DEFAULT_DATA_FILE};
pub use stats::Statistics;
pub use store::DocumentStore;
