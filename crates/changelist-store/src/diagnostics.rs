//! Non-fatal warnings raised by bulk operations.
//!
//! `list` and `clear` absorb per-entry failures so one bad record does not
//! block the rest. Those failures are handed to a [`Diagnostics`] sink
//! injected into the backend. The default sink forwards to `tracing`.

use std::fmt;

use tracing::warn;

/// A per-entry failure that did not abort the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An entry could not be read or decoded during `list` and was skipped.
    Decode { entry: String, reason: String },
    /// An entry could not be removed during `clear`.
    Removal { entry: String, reason: String },
}

impl Warning {
    /// The entry the warning is about.
    pub fn entry(&self) -> &str {
        match self {
            Self::Decode { entry, .. } | Self::Removal { entry, .. } => entry,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Decode { reason, .. } | Self::Removal { reason, .. } => reason,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { entry, reason } => write!(f, "skipped {entry}: {reason}"),
            Self::Removal { entry, reason } => write!(f, "could not remove {entry}: {reason}"),
        }
    }
}

/// Receives warnings from changelist backends.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, warning: &Warning);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, warning: &Warning) {
        match warning {
            Warning::Decode { entry, reason } => {
                warn!(%entry, %reason, "skipping unreadable changelist entry");
            }
            Warning::Removal { entry, reason } => {
                warn!(%entry, %reason, "failed to remove changelist entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_accessors() {
        let w = Warning::Decode {
            entry: "a.change".into(),
            reason: "eof".into(),
        };
        assert_eq!(w.entry(), "a.change");
        assert_eq!(w.reason(), "eof");
        assert_eq!(w.to_string(), "skipped a.change: eof");

        let w = Warning::Removal {
            entry: "b.change".into(),
            reason: "denied".into(),
        };
        assert_eq!(w.to_string(), "could not remove b.change: denied");
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        TracingDiagnostics.warn(&Warning::Decode {
            entry: "x".into(),
            reason: "y".into(),
        });
    }
}
