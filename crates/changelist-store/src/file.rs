//! Directory-backed changelist.
//!
//! Stores one file per change:
//! `{dir}/{timestamp}_{suffix}.{extension}`.
//!
//! The directory listing is the index. Names sort in creation order, so
//! `list` only has to sort and decode. There is no manifest that a crash
//! could leave half-written.

use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use changelist_core::{
    decode_change, encode_change, Change, Clock, KeyGenerator, OrderingKey, TufChange,
};

use crate::config::{ChangelistConfig, ClearPolicy};
use crate::diagnostics::{Diagnostics, TracingDiagnostics, Warning};
use crate::error::{ChangelistError, Result};
use crate::traits::Changelist;

/// Changelist stored as files in a single directory.
///
/// Writes are atomic: each entry is written to a hidden temporary file and
/// renamed into place, so a concurrent `list` never sees a partial entry.
pub struct FileChangelist<C = TufChange> {
    dir: PathBuf,
    config: ChangelistConfig,
    keys: KeyGenerator,
    diagnostics: Arc<dyn Diagnostics>,
    remove: fn(&Path) -> io::Result<()>,
    _change: PhantomData<fn() -> C>,
}

impl<C> FileChangelist<C> {
    /// Open a changelist rooted at `dir` with the default configuration.
    ///
    /// The directory and any missing parents are created with owner-only
    /// permissions.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(dir, ChangelistConfig::default())
    }

    /// Open a changelist rooted at `dir`.
    pub fn open_with(dir: impl AsRef<Path>, config: ChangelistConfig) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        debug!(dir = %dir.display(), "opening changelist");

        create_dir(&dir).map_err(|source| ChangelistError::StorageUnavailable {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            config,
            keys: KeyGenerator::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            remove: remove_entry,
            _change: PhantomData,
        })
    }

    /// Send warnings to `diagnostics` instead of `tracing`.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Generate ordering keys from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.keys = KeyGenerator::new(clock);
        self
    }

    /// The directory this changelist owns.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &ChangelistConfig {
        &self.config
    }

    #[cfg(test)]
    fn with_remover(mut self, remove: fn(&Path) -> io::Result<()>) -> Self {
        self.remove = remove;
        self
    }

    /// Names of visible entries, sorted byte-wise.
    ///
    /// Directories and hidden files (in-flight writes) are excluded.
    fn entry_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            // Key-derived names are always UTF-8; anything else is foreign.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort_unstable();
        Ok(names)
    }

    /// Write `bytes` to `tmp`, then move it to `path`.
    fn write_entry(&self, tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = entry_options().open(tmp)?;
        file.write_all(bytes)?;
        if self.config.sync_writes {
            file.sync_all()?;
        }
        drop(file);
        fs::rename(tmp, path)
    }
}

impl<C> FileChangelist<C>
where
    C: DeserializeOwned,
{
    /// Read and decode a single entry, reporting failures.
    fn read_entry(&self, name: &str) -> Option<C> {
        if OrderingKey::from_file_name(name, &self.config.extension).is_err() {
            debug!(entry = name, "entry name is not an ordering key");
        }

        let path = self.dir.join(name);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Removed by a concurrent clear.
                debug!(entry = name, "entry vanished during listing");
                return None;
            }
            Err(e) => {
                self.diagnostics.warn(&Warning::Decode {
                    entry: name.to_string(),
                    reason: e.to_string(),
                });
                return None;
            }
        };

        match decode_change(&raw) {
            Ok(change) => Some(change),
            Err(e) => {
                self.diagnostics.warn(&Warning::Decode {
                    entry: name.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}

impl<C> Changelist for FileChangelist<C>
where
    C: Change + Serialize + DeserializeOwned,
{
    type Change = C;

    fn add(&self, change: &C) -> Result<()> {
        let bytes = encode_change(change)?;

        let key = self.keys.next_key();
        let name = key.file_name(&self.config.extension);
        let path = self.dir.join(&name);
        let tmp = self.dir.join(format!(".{name}.tmp"));

        if let Err(source) = self.write_entry(&tmp, &path, &bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(ChangelistError::StorageWrite { path, source });
        }

        debug!(%key, action = change.action(), scope = change.scope(), size = bytes.len(), "staged change");
        Ok(())
    }

    fn list(&self) -> Vec<C> {
        let names = match self.entry_names() {
            Ok(names) => names,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "changelist unreadable, listing as empty");
                return Vec::new();
            }
        };

        names
            .iter()
            .filter_map(|name| self.read_entry(name))
            .collect()
    }

    fn clear(&self, archive: Option<&str>) -> Result<()> {
        if let Some(archive) = archive {
            debug!(archive, "archive hint ignored");
        }

        // The policy only governs per-entry failures. A missing or
        // unreadable directory is always an error.
        let entries =
            fs::read_dir(&self.dir).map_err(|source| ChangelistError::StorageUnavailable {
                path: self.dir.clone(),
                source,
            })?;

        let mut removed = 0usize;
        let mut first_failure = None;

        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            match (self.remove)(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    self.diagnostics.warn(&Warning::Removal {
                        entry: entry.file_name().to_string_lossy().into_owned(),
                        reason: source.to_string(),
                    });
                    if first_failure.is_none() {
                        first_failure = Some(ChangelistError::Removal { path, source });
                    }
                }
            }
        }

        debug!(dir = %self.dir.display(), removed, "cleared changelist");

        match (self.config.clear_policy, first_failure) {
            (ClearPolicy::Strict, Some(err)) => Err(err),
            _ => Ok(()),
        }
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl<C> std::fmt::Debug for FileChangelist<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileChangelist")
            .field("dir", &self.dir)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn remove_entry(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).create(dir)
}

#[cfg(unix)]
fn entry_options() -> fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true).mode(0o644);
    options
}

#[cfg(not(unix))]
fn entry_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    options
}
