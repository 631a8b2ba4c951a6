#![forbid(unsafe_code)]

//! Undo/redo history manager with batched mutations.
//!
//! [`HistoryManager`] owns the live [`Document`] and the snapshots undo and
//! redo move between. Every committed mutation records the document as it
//! was before the change:
//!
//! - Outside a batch, each mutation is its own undo step.
//! - Inside a batch ([`start_batch`](HistoryManager::start_batch) ..
//!   [`end_batch`](HistoryManager::end_batch)), mutations apply to the live
//!   document only. Ending the batch records the baseline captured when it
//!   started, so a whole drag gesture undoes in one step.
//!
//! ```text
//! add(a)          past: [[]]                current: [a]
//! start_batch     baseline = [a]
//! update(a) x N   past: [[]]                current: [a']
//! end_batch       past: [[], [a]]           current: [a']
//! undo            past: [[]]   future: [[a']]  current: [a]
//! ```
//!
//! # Policies
//!
//! - `remove`, `update`, and the z-order operations fail with
//!   [`HistoryError::NotFound`] for an unknown id.
//! - `undo`, `redo`, and `load` fail with [`HistoryError::BatchInProgress`]
//!   while a batch is open.
//! - `load` rejects malformed input with [`HistoryError::Parse`].
//! - `add`, `update`, and `load` refuse items that would not survive a
//!   serialize/load round trip (non-finite geometry, an `id` key inside a
//!   [`RawItem`](crate::RawItem)'s fields) with [`HistoryError::InvalidItem`],
//!   so `serialize` always produces loadable output.
//! - Failed operations change nothing.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::config::HistoryConfig;
use crate::document::Document;
use crate::error::{ConfigError, HistoryError, Result};
use crate::gesture::Gesture;
use crate::item::HistoryItem;
use crate::snapshot_store::SnapshotStore;

const TARGET: &str = "sitewise.history";

/// Linear undo/redo over a document of `T`.
pub struct HistoryManager<T> {
    current: Document<T>,
    store: SnapshotStore<Document<T>>,
    /// Snapshot taken when the active batch started; `None` outside a batch.
    baseline: Option<Document<T>>,
    last_affected_id: Option<String>,
    config: HistoryConfig,
}

impl<T> fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("store", &self.store)
            .field("batch_active", &self.baseline.is_some())
            .field("last_affected_id", &self.last_affected_id)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: HistoryItem> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<T: HistoryItem> HistoryManager<T> {
    /// Create a manager with an empty document.
    ///
    /// The config is taken as given; a `max_depth` of 0 keeps no undo
    /// history at all. Use [`try_new`](Self::try_new) for configs that have
    /// not been through [`HistoryConfig::validate`].
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            current: Document::new(),
            store: SnapshotStore::new(config.max_depth),
            baseline: None,
            last_affected_id: None,
            config,
        }
    }

    /// Create a manager after validating `config`.
    pub fn try_new(config: HistoryConfig) -> std::result::Result<Self, ConfigError> {
        let errors = config.validate();
        if errors.is_empty() {
            Ok(Self::new(config))
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append `item` on top of the z-order.
    pub fn add(&mut self, item: T) -> Result<()> {
        if self.current.contains(item.id()) {
            return Err(HistoryError::DuplicateId {
                id: item.id().to_string(),
            });
        }
        check_storable(&item)?;
        let id = item.id().to_string();
        self.commit("add", &id, |doc| doc.push(item));
        self.last_affected_id = Some(id);
        Ok(())
    }

    /// Delete the item with `id` and return it.
    pub fn remove(&mut self, id: &str) -> Result<T> {
        let index = self.index_of(id)?;
        let removed = self.commit("remove", id, |doc| doc.remove_at(index));
        self.last_affected_id = None;
        Ok(removed)
    }

    /// Replace the item with `id` by `mutator(copy)`.
    ///
    /// The mutator gets an owned copy, so it cannot observe or disturb the
    /// stored item or any snapshot. It must keep the id.
    pub fn update<F>(&mut self, id: &str, mutator: F) -> Result<()>
    where
        F: FnOnce(T) -> T,
    {
        let index = self.index_of(id)?;
        let replacement = mutator(self.current.items()[index].clone());
        if replacement.id() != id {
            return Err(HistoryError::IdentityMismatch {
                expected: id.to_string(),
                actual: replacement.id().to_string(),
            });
        }
        check_storable(&replacement)?;
        self.commit("update", id, |doc| doc.replace_at(index, replacement));
        self.last_affected_id = Some(id.to_string());
        Ok(())
    }

    /// Move the item with `id` to the top of the z-order.
    pub fn bring_to_front(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.commit("bring_to_front", id, |doc| doc.raise_to_top(index));
        self.last_affected_id = Some(id.to_string());
        Ok(())
    }

    /// Move the item with `id` to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.commit("send_to_back", id, |doc| doc.lower_to_bottom(index));
        self.last_affected_id = Some(id.to_string());
        Ok(())
    }

    /// Remove every item as one undo step.
    ///
    /// Returns `false` without recording anything when the document is
    /// already empty.
    pub fn clear(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        self.commit("clear", "*", Document::clear);
        self.last_affected_id = None;
        true
    }

    // ========================================================================
    // Batches
    // ========================================================================

    /// Open a batch. Idempotent: an already open batch keeps its baseline.
    pub fn start_batch(&mut self) {
        if self.baseline.is_some() {
            return;
        }
        self.baseline = Some(self.current.clone());
        debug!(target: TARGET, op = "start_batch", items = self.current.len(), "batch started");
    }

    /// Close the open batch, recording its baseline as one undo step.
    ///
    /// No-op when no batch is open.
    pub fn end_batch(&mut self) {
        let Some(baseline) = self.baseline.take() else {
            return;
        };
        if self.config.skip_unchanged_batches && baseline == self.current {
            debug!(target: TARGET, op = "end_batch", "unchanged batch skipped");
            return;
        }
        self.store.commit(baseline);
        debug!(
            target: TARGET,
            op = "end_batch",
            undo_depth = self.store.undo_depth(),
            items = self.current.len(),
            "batch committed"
        );
    }

    /// Abandon the open batch, restoring the document to its baseline.
    ///
    /// History is left untouched. Returns whether a batch was open.
    pub fn cancel_batch(&mut self) -> bool {
        let Some(baseline) = self.baseline.take() else {
            return false;
        };
        self.current = baseline;
        self.drop_stale_selection();
        debug!(target: TARGET, op = "cancel_batch", items = self.current.len(), "batch cancelled");
        true
    }

    #[must_use]
    pub fn is_batch_active(&self) -> bool {
        self.baseline.is_some()
    }

    /// Run `f` inside a batch.
    ///
    /// On `Ok` the batch is committed as one step; on `Err` it is cancelled
    /// and the document is restored. When a batch is already open, `f` joins
    /// it and the outer owner decides how it ends.
    pub fn batch<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        if self.is_batch_active() {
            return f(self);
        }
        self.start_batch();
        match f(self) {
            Ok(value) => {
                self.end_batch();
                Ok(value)
            }
            Err(e) => {
                self.cancel_batch();
                Err(e)
            }
        }
    }

    /// Open a batch scoped to the returned guard. Dropping the guard ends
    /// the batch.
    pub fn gesture(&mut self) -> Gesture<'_, T> {
        Gesture::begin(self)
    }

    // ========================================================================
    // Undo / Redo
    // ========================================================================

    /// Restore the state before the most recent undo step.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_no_batch()?;
        let current = std::mem::take(&mut self.current);
        let (restored, done) = match self.store.undo(current) {
            Ok(previous) => (previous, true),
            Err(unchanged) => (unchanged, false),
        };
        self.current = restored;
        if done {
            self.drop_stale_selection();
            debug!(
                target: TARGET,
                op = "undo",
                undo_depth = self.store.undo_depth(),
                redo_depth = self.store.redo_depth(),
                "undo applied"
            );
        }
        Ok(done)
    }

    /// Reapply the most recently undone step.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_no_batch()?;
        let current = std::mem::take(&mut self.current);
        let (restored, done) = match self.store.redo(current) {
            Ok(next) => (next, true),
            Err(unchanged) => (unchanged, false),
        };
        self.current = restored;
        if done {
            self.drop_stale_selection();
            debug!(
                target: TARGET,
                op = "redo",
                undo_depth = self.store.undo_depth(),
                redo_depth = self.store.redo_depth(),
                "redo applied"
            );
        }
        Ok(done)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.is_batch_active() && self.store.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.is_batch_active() && self.store.can_redo()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Encode the current document as a JSON array. History is not included.
    ///
    /// Output is deterministic: items appear in z-order and each item's
    /// fields in a fixed order.
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(&self.current).map_err(HistoryError::Serialize)
    }

    /// Replace the document with the decoded `serialized` and drop all
    /// history.
    pub fn load(&mut self, serialized: &str) -> Result<()> {
        self.ensure_no_batch()?;
        let document: Document<T> = serde_json::from_str(serialized).map_err(|e| {
            warn!(target: TARGET, op = "load", error = %e, "rejected malformed document");
            HistoryError::Parse(e)
        })?;
        if let Some(id) = document.first_duplicate_id() {
            warn!(target: TARGET, op = "load", id, "rejected document with duplicate id");
            return Err(HistoryError::DuplicateId { id: id.to_string() });
        }
        if let Some(item) = document.items().iter().find(|i| i.invalid_reason().is_some()) {
            warn!(target: TARGET, op = "load", id = item.id(), "rejected unstorable item");
            check_storable(item)?;
        }
        self.current = document;
        self.store.clear();
        self.last_affected_id = None;
        debug!(target: TARGET, op = "load", items = self.current.len(), "document loaded");
        Ok(())
    }

    /// Drop all history and any open batch, keeping the current document.
    pub fn reset(&mut self) {
        self.store.clear();
        self.baseline = None;
        debug!(target: TARGET, op = "reset", "history cleared");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The live document.
    #[must_use]
    pub fn current(&self) -> &Document<T> {
        &self.current
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.current.get(id)
    }

    /// Undo snapshots, oldest first.
    pub fn past(&self) -> impl DoubleEndedIterator<Item = &Document<T>> + ExactSizeIterator {
        self.store.past()
    }

    /// Redo snapshots, next redo first.
    pub fn future(&self) -> impl DoubleEndedIterator<Item = &Document<T>> + ExactSizeIterator {
        self.store.future()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.store.undo_depth()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.store.redo_depth()
    }

    /// Id of the item most recently added or changed; cleared by removal.
    #[must_use]
    pub fn last_affected_id(&self) -> Option<&str> {
        self.last_affected_id.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn index_of(&self, id: &str) -> Result<usize> {
        self.current
            .position(id)
            .ok_or_else(|| HistoryError::not_found(id))
    }

    fn ensure_no_batch(&self) -> Result<()> {
        if self.is_batch_active() {
            Err(HistoryError::BatchInProgress)
        } else {
            Ok(())
        }
    }

    /// Apply an already-validated mutation. Outside a batch the pre-change
    /// document becomes a new undo step.
    fn commit<R>(
        &mut self,
        op: &'static str,
        id: &str,
        mutate: impl FnOnce(&mut Document<T>) -> R,
    ) -> R {
        if self.baseline.is_some() {
            let out = mutate(&mut self.current);
            trace!(target: TARGET, op, id, "batched mutation");
            return out;
        }
        let before = self.current.clone();
        let out = mutate(&mut self.current);
        self.store.commit(before);
        debug!(
            target: TARGET,
            op,
            id,
            undo_depth = self.store.undo_depth(),
            items = self.current.len(),
            "mutation committed"
        );
        out
    }

    fn drop_stale_selection(&mut self) {
        if self
            .last_affected_id
            .as_deref()
            .is_some_and(|id| !self.current.contains(id))
        {
            self.last_affected_id = None;
        }
    }
}

/// Refuse items whose encoding `load` would reject.
fn check_storable<T: HistoryItem>(item: &T) -> Result<()> {
    match item.invalid_reason() {
        Some(reason) => Err(HistoryError::InvalidItem {
            id: item.id().to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
