//! In-memory implementation of the Changelist trait.
//!
//! This is primarily for testing and dry runs. It orders changes with the
//! same keys as the persistent backends but keeps everything in memory.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use changelist_core::{Change, Clock, KeyGenerator, OrderingKey, TufChange};

use crate::error::Result;
use crate::traits::Changelist;

/// In-memory changelist.
///
/// All data is lost when the changelist is dropped. Thread-safe via RwLock.
pub struct MemoryChangelist<C = TufChange> {
    changes: RwLock<BTreeMap<OrderingKey, C>>,
    keys: KeyGenerator,
}

impl<C> MemoryChangelist<C> {
    /// Create a new empty changelist.
    pub fn new() -> Self {
        Self {
            changes: RwLock::new(BTreeMap::new()),
            keys: KeyGenerator::default(),
        }
    }

    /// Generate ordering keys from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.keys = KeyGenerator::new(clock);
        self
    }

    /// Number of staged changes.
    pub fn len(&self) -> usize {
        self.changes.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for MemoryChangelist<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Changelist for MemoryChangelist<C>
where
    C: Change + Clone + Send + Sync,
{
    type Change = C;

    fn add(&self, change: &C) -> Result<()> {
        let key = self.keys.next_key();
        self.changes.write().unwrap().insert(key, change.clone());
        Ok(())
    }

    fn list(&self) -> Vec<C> {
        self.changes.read().unwrap().values().cloned().collect()
    }

    fn clear(&self, _archive: Option<&str>) -> Result<()> {
        self.changes.write().unwrap().clear();
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use changelist_core::ChangeAction;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Stepping(AtomicU64);

    impl Clock for Stepping {
        fn now_nanos(&self) -> u64 {
            self.0.fetch_add(10, Ordering::SeqCst)
        }
    }

    #[test]
    fn test_memory_changelist_order() {
        let cl = MemoryChangelist::<TufChange>::new().with_clock(Arc::new(Stepping(AtomicU64::new(1))));

        for path in ["first", "second", "third"] {
            cl.add(&TufChange::new(ChangeAction::Update, "targets", "target", path, vec![]))
                .unwrap();
        }

        let paths: Vec<_> = cl.list().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, ["first", "second", "third"]);
    }

    #[test]
    fn test_memory_changelist_clear() {
        let cl = MemoryChangelist::<TufChange>::new();
        cl.add(&TufChange::new(ChangeAction::Delete, "root", "key", "k", vec![1]))
            .unwrap();
        assert_eq!(cl.len(), 1);

        cl.clear(None).unwrap();
        assert!(cl.is_empty());
        assert!(cl.list().is_empty());
        cl.close().unwrap();
    }
}
