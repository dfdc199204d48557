use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{load_model, ChampionModel};
use crate::error::Result;

/// Load-once holder for the process-wide model.
///
/// The first `get_or_load` deserializes the artifact; later calls share the
/// same instance. A failed load leaves the slot empty so the next call retries.
pub struct ModelCache {
    path: PathBuf,
    slot: RwLock<Option<Arc<dyn ChampionModel>>>,
}

impl ModelCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            slot: RwLock::new(None),
        }
    }

    /// Cache pre-seeded with `model`. Nothing is read from disk.
    pub fn with_model(path: PathBuf, model: Arc<dyn ChampionModel>) -> Self {
        Self {
            path,
            slot: RwLock::new(Some(model)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Return the cached model, loading it on first use.
    pub fn get_or_load(&self) -> Result<Arc<dyn ChampionModel>> {
        if let Some(model) = self.slot.read().as_ref() {
            return Ok(Arc::clone(model));
        }

        let mut slot = self.slot.write();
        // Another caller may have loaded it while we waited for the lock
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = load_model(&self.path)?;
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Replace the cached model.
    pub fn install(&self, model: Arc<dyn ChampionModel>) {
        debug!(model = model.name(), "installing model");
        *self.slot.write() = Some(model);
    }

    /// Drop the cached model. The next `get_or_load` reads from disk again.
    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}
