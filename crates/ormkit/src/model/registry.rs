use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Model, TableDescriptor};
use crate::error::{OrmError, OrmResult};

type Erased = Arc<dyn Any + Send + Sync>;

/// Cache of table descriptors keyed by model type.
///
/// Owned by a [`Db`](crate::Db) handle and shared by every statement built through it.
/// Lookups take a read lock; a miss re-checks under the write lock before introspecting,
/// so each model is introspected and stored at most once even when several callers race
/// on its first use.
#[derive(Default)]
pub struct Registry {
    models: RwLock<HashMap<TypeId, Erased>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the descriptor for `M`, registering it on first use.
    pub fn get<M: Model>(&self) -> OrmResult<Arc<TableDescriptor<M>>> {
        if let Some(found) = self.lookup::<M>() {
            return Ok(found);
        }
        self.register::<M>()
    }

    /// Get the descriptor for the type of `record`; an absent record fails with `NilInput`.
    pub fn describe<M: Model>(&self, record: Option<&M>) -> OrmResult<Arc<TableDescriptor<M>>> {
        match record {
            Some(_) => self.get::<M>(),
            None => Err(OrmError::NilInput),
        }
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<M: Model>(&self) -> Option<Arc<TableDescriptor<M>>> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        let erased = models.get(&TypeId::of::<M>())?;
        Arc::clone(erased).downcast::<TableDescriptor<M>>().ok()
    }

    fn register<M: Model>(&self) -> OrmResult<Arc<TableDescriptor<M>>> {
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have registered `M` while we waited for the lock.
        if let Some(existing) = models.get(&TypeId::of::<M>()) {
            if let Ok(found) = Arc::clone(existing).downcast::<TableDescriptor<M>>() {
                return Ok(found);
            }
        }

        let descriptor = Arc::new(TableDescriptor::<M>::from_model()?);
        tracing::debug!(
            target: "ormkit.registry",
            model = M::type_name(),
            table = descriptor.table_name(),
            fields = descriptor.len(),
            "registered model"
        );
        models.insert(TypeId::of::<M>(), Arc::clone(&descriptor) as Erased);
        Ok(descriptor)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("models", &self.len()).finish()
    }
}
