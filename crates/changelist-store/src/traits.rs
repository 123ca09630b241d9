//! Changelist trait: the interface consumed by the staging workflow.
//!
//! The workflow only needs three verbs plus `close`. Backends decide how
//! records are persisted.

use crate::error::Result;

/// An ordered collection of pending changes.
///
/// All methods block. Implementations must tolerate concurrent `add` calls
/// without external locking.
///
/// # Design Notes
///
/// - **Creation order**: `list` returns records in the order `add` created
///   them, to the resolution of the backend's clock.
/// - **Partial failure**: `list` skips records it cannot decode and reports
///   them through the backend's [`Diagnostics`](crate::Diagnostics). It never
///   fails as a whole; an unreadable backend lists as empty.
/// - **Archive hint**: `clear` accepts an archive hint for interface
///   compatibility. No backend archives anything; records are gone after
///   `clear` returns.
pub trait Changelist: Send + Sync {
    /// The record type stored by this changelist.
    type Change;

    /// Append a change.
    fn add(&self, change: &Self::Change) -> Result<()>;

    /// All changes in creation order.
    fn list(&self) -> Vec<Self::Change>;

    /// Remove every change.
    fn clear(&self, archive: Option<&str>) -> Result<()>;

    /// Release resources held by the changelist.
    fn close(&self) -> Result<()>;
}
