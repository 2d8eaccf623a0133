//! # Docflow
//!
//! Document lifecycle tracker for your terminal.
//!
//! Docflow keeps a small collection of documents (title, content, author)
//! in a JSON file and walks each of them through a fixed workflow:
//! Draft → Under Review → Approved → Rejected.
//!
//! ## Features
//!
//! - **Workflow**: advance or revert a document one stage at a time
//! - **Queries**: filter by stage or author, search titles and content
//! - **Statistics**: counts per stage and per author
//! - **Export**: plain-text report of every document
//! - **Interactive shell**: numbered menu for day-to-day use
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the interactive menu
//! docflow
//!
//! # Or script it
//! docflow add --title "Q3 Proposal" --author Ana --content "Draft numbers"
//! docflow advance 1
//! docflow stats
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod core;
pub mod shell;

// Re-export commonly used types
pub use app::{App, Persisted};
pub use crate::core::{
    Config, DocError, DocResult, Document, DocumentFile, DocumentStore, PersistenceError, Stage,
    Statistics,
};
pub use shell::Shell;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "docflow";
