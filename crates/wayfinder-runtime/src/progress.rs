#![forbid(unsafe_code)]

//! Persisted tour progress.
//!
//! [`ProgressStore`] owns the read-modify-write cycle for
//! [`TourProgress`] records, one per tour id, stored under
//! `<key_prefix><id>` in a [`StorageBackend`].
//!
//! # Failure policy
//!
//! Reads fail soft: a missing, unreadable, or corrupt record is reported as
//! an [`Absent`] reason and every mutating operation treats it as "no prior
//! state". Write failures are logged and swallowed by the tour-facing
//! operations; [`ProgressStore::save`] and [`ProgressStore::reset`] return
//! them to hosts that care.
//!
//! # Invariants
//!
//! 1. A persisted record is always a well-typed JSON object.
//! 2. [`ProgressStore::advance`] never persists a step past the last index.
//! 3. Unknown fields of an existing record survive every mutation.

use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};
use wayfinder_core::TourProgress;

use crate::storage::{StorageBackend, StorageResult};

/// Key prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "tour-";

/// Why [`ProgressStore::load`] found no usable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Absent {
    #[error("no progress recorded")]
    Missing,
    #[error("stored progress is not a valid record")]
    Corrupt,
    #[error("storage could not be read")]
    Unavailable,
}

/// Read/write access to persisted tour progress.
///
/// Cloning shares the backend.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Rc<dyn StorageBackend>,
    key_prefix: String,
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Store records with the default `tour-` key prefix.
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self::with_prefix(backend, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(backend: Rc<dyn StorageBackend>, key_prefix: impl Into<String>) -> Self {
        Self {
            backend,
            key_prefix: key_prefix.into(),
        }
    }

    /// Storage key for tour `id`.
    #[must_use]
    pub fn key(&self, id: &str) -> String {
        format!("{}{id}", self.key_prefix)
    }

    /// Read the record for `id`.
    pub fn load(&self, id: &str) -> Result<TourProgress, Absent> {
        let raw = match self.backend.get(&self.key(id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(Absent::Missing),
            Err(err) => {
                warn!(tour_id = id, error = %err, "tour progress unreadable");
                return Err(Absent::Unavailable);
            }
        };
        TourProgress::from_json(&raw).map_err(|err| {
            warn!(tour_id = id, error = %err, "discarding corrupt tour progress");
            Absent::Corrupt
        })
    }

    /// Load the record for `id`, writing and returning a fresh one if none
    /// is usable.
    pub fn init(&self, id: &str) -> TourProgress {
        match self.load(id) {
            Ok(progress) => progress,
            Err(reason) => {
                debug!(tour_id = id, %reason, "starting fresh tour progress");
                let progress = TourProgress::default();
                self.write(id, &progress);
                progress
            }
        }
    }

    /// Move forward from `current_step` in a tour of `step_count` steps.
    ///
    /// Advancing from the last step marks the tour done and keeps the step
    /// on the last index. Returns the persisted step.
    pub fn advance(&self, id: &str, current_step: usize, step_count: usize) -> usize {
        let Some(last) = step_count.checked_sub(1) else {
            return 0;
        };
        let next = current_step.saturating_add(1).min(last);
        let finishing = current_step >= last;
        self.merge(
            id,
            || TourProgress::at_step(current_step),
            |progress| {
                progress.step = next;
                if finishing {
                    progress.done_tour = true;
                }
            },
        );
        next
    }

    /// Move back from `current_step`, stopping at 0. Returns the persisted
    /// step.
    pub fn retreat(&self, id: &str, current_step: usize) -> usize {
        let prev = current_step.saturating_sub(1);
        self.merge(
            id,
            || TourProgress::at_step(current_step),
            |progress| progress.step = prev,
        );
        prev
    }

    /// Persist `step` as the active step (clamped to `step_count - 1`).
    pub fn jump(&self, id: &str, step: usize, step_count: usize) -> usize {
        let target = step.min(step_count.saturating_sub(1));
        self.merge(id, TourProgress::default, |progress| progress.step = target);
        target
    }

    /// Mark the tour done.
    pub fn finish(&self, id: &str) {
        self.merge(id, TourProgress::default, |progress| {
            progress.done_tour = true;
        });
    }

    /// Remember `path` as the page the tour last navigated to.
    pub fn record_route(&self, id: &str, path: &str) {
        self.merge(id, TourProgress::default, |progress| {
            progress.route = Some(path.to_owned());
        });
    }

    /// Overwrite the record for `id`.
    pub fn save(&self, id: &str, progress: &TourProgress) -> StorageResult<()> {
        let json = progress.to_json()?;
        self.backend.set(&self.key(id), &json)?;
        debug!(
            tour_id = id,
            step = progress.step,
            done_tour = progress.done_tour,
            route = progress.route.as_deref(),
            "tour progress persisted"
        );
        Ok(())
    }

    /// Delete the record for `id`.
    pub fn reset(&self, id: &str) -> StorageResult<()> {
        self.backend.remove(&self.key(id))?;
        debug!(tour_id = id, "tour progress reset");
        Ok(())
    }

    fn merge(
        &self,
        id: &str,
        fallback: impl FnOnce() -> TourProgress,
        apply: impl FnOnce(&mut TourProgress),
    ) -> TourProgress {
        let mut progress = self.load(id).unwrap_or_else(|_| fallback());
        apply(&mut progress);
        self.write(id, &progress);
        progress
    }

    fn write(&self, id: &str, progress: &TourProgress) {
        if let Err(err) = self.save(id, progress) {
            warn!(tour_id = id, error = %err, "tour progress not persisted");
        }
    }
}
