//! Per-type cache of inferred record schemas.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::config::EncoderConfig;
use crate::record::{Record, RecordSchema};
use crate::types::Result;

/// Inferred schemas keyed by record type.
///
/// A cache must only be used with one [`EncoderConfig`]; schemas depend on
/// it and entries are never invalidated.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<TypeId, Arc<RecordSchema>>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema of `R`, inferring and storing it on first use.
    ///
    /// Failed inferences are not cached.
    ///
    /// # Errors
    ///
    /// See [`RecordSchema::infer_with`].
    pub fn get_or_infer<R: Record + 'static>(
        &self,
        config: &EncoderConfig,
    ) -> Result<Arc<RecordSchema>> {
        let key = TypeId::of::<R>();
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            trace!(record = R::TYPE_NAME, "schema cache hit");
            return Ok(Arc::clone(schema));
        }

        debug!(record = R::TYPE_NAME, "schema cache miss");
        let schema = Arc::new(RecordSchema::infer_with::<R>(config)?);
        let mut schemas = self
            .schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(schemas.entry(key).or_insert(schema)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
