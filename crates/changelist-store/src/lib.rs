//! # Changelist Store
//!
//! Durable, ordered staging of pending metadata changes.
//!
//! ## Overview
//!
//! A changelist collects [`Change`](changelist_core::Change) records as a
//! client decides on them, hands them back in creation order when a publish
//! batch is built, and is cleared once the batch is committed upstream.
//! Every backend implements the [`Changelist`] trait.
//!
//! ## Key Types
//!
//! - [`Changelist`] - The add / list / clear / close contract
//! - [`FileChangelist`] - One file per record; the directory is the index
//! - [`MemoryChangelist`] - In-memory changelist for tests and dry runs
//! - [`SqliteChangelist`] - SQLite-backed changelist
//! - [`Diagnostics`] - Sink for non-fatal warnings
//! - [`ChangelistConfig`] - Extension, clear policy, write durability
//!
//! ## Usage
//!
//! ```rust,no_run
//! use changelist_core::{ChangeAction, TufChange};
//! use changelist_store::{Changelist, FileChangelist};
//!
//! let changelist = FileChangelist::<TufChange>::open("/tmp/staged").unwrap();
//! changelist
//!     .add(&TufChange::new(ChangeAction::Create, "targets", "target", "app.tgz", b"{}".to_vec()))
//!     .unwrap();
//!
//! for change in changelist.list() {
//!     // bundle into a publish batch
//!     let _ = change;
//! }
//!
//! changelist.clear(None).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Filename as index**: entries are named `<key>.change`, where the key
//!   sorts in creation order. There is no manifest to corrupt.
//! - **Lock-free adds**: each add writes its own file, so independent
//!   writers never coordinate.
//! - **Resilient bulk reads**: a corrupt entry is reported and skipped, it
//!   never fails the whole listing.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use config::{ChangelistConfig, ClearPolicy, DEFAULT_EXTENSION};
pub use diagnostics::{Diagnostics, TracingDiagnostics, Warning};
pub use error::{ChangelistError, Result};
pub use file::FileChangelist;
pub use memory::MemoryChangelist;
pub use sqlite::SqliteChangelist;
pub use traits::Changelist;
