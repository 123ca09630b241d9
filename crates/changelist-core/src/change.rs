//! Change records: one pending edit to trust metadata.
//!
//! The store never interprets a change beyond encoding it. Anything that
//! implements [`Change`] and round-trips through serde can be staged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Capability set every staged record exposes.
///
/// The vocabulary of `action` is owned by the implementing type, not the
/// store. `content` is carried verbatim.
pub trait Change {
    /// What the change does (e.g. `create`).
    fn action(&self) -> &str;

    /// The target the change applies to, typically a role name.
    fn scope(&self) -> &str;

    /// Free-form classifier.
    fn change_type(&self) -> &str;

    /// Path of the affected resource.
    fn path(&self) -> &str;

    /// Opaque payload.
    fn content(&self) -> &[u8];
}

/// What a [`TufChange`] does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl ChangeAction {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(CoreError::Decoding(format!("unknown change action: {other}"))),
        }
    }
}

/// A change staged against trust metadata.
///
/// Encoded as a JSON object with the fields `action`, `scope`,
/// `changeType`, `path` and `data`. `data` is written as a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TufChange {
    pub action: ChangeAction,
    pub scope: String,
    pub change_type: String,
    pub path: String,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

impl TufChange {
    /// Create a new change.
    pub fn new(
        action: ChangeAction,
        scope: impl Into<String>,
        change_type: impl Into<String>,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            action,
            scope: scope.into(),
            change_type: change_type.into(),
            path: path.into(),
            data: data.into(),
        }
    }
}

impl Change for TufChange {
    fn action(&self) -> &str {
        self.action.as_str()
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    fn change_type(&self) -> &str {
        &self.change_type
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn content(&self) -> &[u8] {
        &self.data
    }
}
