//! Model Store - per-identity registry with the writer-excludes-readers
//! discipline
//!
//! The numeric core holds no locks; this is the collaborator-boundary
//! helper that serializes access per identity. Each identity gets its own
//! entry mutex: a completing trainer overwrites the model wholesale under
//! that mutex, so a concurrent authenticator for the *same* identity either
//! sees the old model or the new one, never a torn state. Distinct
//! identities share nothing and proceed fully in parallel.
//!
//! Persistence to disk (or anywhere else) stays a collaborator concern; the
//! store is in-memory and works with the serialized contract via
//! `Model::to_json` / `Model::from_json`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::EngineError;
use crate::features::vector::TrainingSample;
use crate::model::types::Model;

#[derive(Debug, Clone)]
struct StoreEntry {
    model: Model,
    /// Enrollment samples kept only when privacy mode is disabled
    retained_samples: Option<Vec<TrainingSample>>,
}

/// In-memory model registry keyed by identity.
#[derive(Default)]
pub struct ModelStore {
    entries: RwLock<HashMap<String, Arc<Mutex<Option<StoreEntry>>>>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, identity: &str) -> Arc<Mutex<Option<StoreEntry>>> {
        if let Some(slot) = self.entries.read().get(identity) {
            return slot.clone();
        }
        self.entries
            .write()
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Replace an identity's model wholesale (retraining semantics).
    pub fn put(
        &self,
        identity: &str,
        model: Model,
        retained_samples: Option<Vec<TrainingSample>>,
    ) {
        let slot = self.slot(identity);
        let mut guard = slot.lock();
        if guard.is_some() {
            log::info!("overwriting enrolled model for identity '{}'", identity);
        }
        *guard = Some(StoreEntry {
            model,
            retained_samples,
        });
    }

    /// Snapshot an identity's model for authentication.
    pub fn get(&self, identity: &str) -> Result<Model, EngineError> {
        let slot = self.slot(identity);
        let guard = slot.lock();
        guard
            .as_ref()
            .map(|e| e.model.clone())
            .ok_or_else(|| EngineError::ModelNotFound(identity.to_string()))
    }

    /// Raw enrollment samples, present only for identities trained with
    /// privacy mode disabled.
    pub fn retained_samples(&self, identity: &str) -> Option<Vec<TrainingSample>> {
        let slot = self.slot(identity);
        let guard = slot.lock();
        guard.as_ref().and_then(|e| e.retained_samples.clone())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries
            .read()
            .get(identity)
            .map(|slot| slot.lock().is_some())
            .unwrap_or(false)
    }

    /// Forget an identity entirely. Returns whether a model existed.
    pub fn remove(&self, identity: &str) -> bool {
        if let Some(slot) = self.entries.write().remove(identity) {
            slot.lock().is_some()
        } else {
            false
        }
    }

    pub fn identities(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .filter(|(_, slot)| slot.lock().is_some())
            .map(|(k, _)| k.clone())
            .collect()
    }
}
