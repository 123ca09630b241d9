//! Configuration for changelist backends.

use serde::{Deserialize, Serialize};

/// Extension given to stored entries.
pub const DEFAULT_EXTENSION: &str = "change";

/// What `clear` does when an entry cannot be removed.
///
/// A directory that cannot be read at all is an error under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearPolicy {
    /// Report the failure as a warning and keep going. `clear` succeeds.
    #[default]
    Lenient,
    /// Keep going, then return the first failure.
    Strict,
}

/// Configuration for a changelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelistConfig {
    /// Extension of entry files, without the leading dot.
    pub extension: String,
    /// How removal failures during `clear` are handled.
    pub clear_policy: ClearPolicy,
    /// Whether each entry is fsynced before it becomes visible.
    pub sync_writes: bool,
}

impl Default for ChangelistConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            clear_policy: ClearPolicy::Lenient,
            sync_writes: true,
        }
    }
}

impl ChangelistConfig {
    /// Use the given clear policy.
    pub fn clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    /// Use the given entry extension.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable fsync on write.
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}
