//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use changelist_core::{ChangeAction, Clock, TufChange};
use changelist_store::{ChangelistConfig, Diagnostics, FileChangelist, Warning};

/// A clock that never moves.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_nanos(&self) -> u64 {
        self.0
    }
}

/// A clock that advances by `step` nanoseconds on every reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicU64,
    step: u64,
}

impl SteppingClock {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now_nanos(&self) -> u64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// Collects warnings instead of logging them.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<Warning>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All warnings received so far.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().unwrap().clone()
    }

    /// Warnings raised while listing.
    pub fn decode_warnings(&self) -> Vec<Warning> {
        self.warnings()
            .into_iter()
            .filter(|w| matches!(w, Warning::Decode { .. }))
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, warning: &Warning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }
}

/// A scratch directory with a changelist rooted inside it.
///
/// The changelist uses a [`SteppingClock`], so entries added one after
/// another are strictly ordered, and reports to a [`RecordingDiagnostics`].
pub struct TestFixture {
    pub dir: TempDir,
    pub changelist: FileChangelist<TufChange>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ChangelistConfig::default())
    }

    /// Create a fixture with the given configuration.
    pub fn with_config(config: ChangelistConfig) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let changelist = FileChangelist::open_with(dir.path().join("changelist"), config)
            .expect("failed to open changelist")
            .with_clock(Arc::new(SteppingClock::new(1_700_000_000_000_000_000, 1_000)))
            .with_diagnostics(diagnostics.clone());

        Self {
            dir,
            changelist,
            diagnostics,
        }
    }

    /// A target update for `path` whose payload is the path itself.
    pub fn make_change(&self, path: &str) -> TufChange {
        TufChange::new(
            ChangeAction::Create,
            "targets",
            "target",
            path,
            path.as_bytes().to_vec(),
        )
    }

    /// Write raw bytes as an entry named `name`, bypassing the changelist.
    pub fn write_raw_entry(&self, name: &str, bytes: &[u8]) {
        std::fs::write(self.changelist.dir().join(name), bytes).expect("failed to write entry");
    }

    /// Names of every file in the changelist directory, sorted.
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.changelist.dir())
            .expect("failed to read changelist dir")
            .map(|e| e.expect("bad dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
