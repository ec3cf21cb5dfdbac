//! Per-type cache of record schemas.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use super::record_schema::RecordSchema;
use super::Patchable;
use crate::error::{ChangesetError, Result};

static GLOBAL_REGISTRY: OnceLock<Arc<SchemaRegistry>> = OnceLock::new();

#[derive(Debug)]
struct RegisteredSchema {
    record: &'static str,
    schema: Arc<dyn Any + Send + Sync>,
}

/// Registry for record schemas.
///
/// Builds each record type's schema on first use and caches it by type.
/// Provides thread-safe registration and retrieval.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<TypeId, RegisteredSchema>>,
}

impl SchemaRegistry {
    /// Creates a new empty schema registry.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> Arc<SchemaRegistry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(SchemaRegistry::new())))
    }

    /// Retrieves the cached schema for `R`.
    ///
    /// # Returns
    /// `Some(schema)` if `R` has been resolved before, `None` otherwise.
    pub fn get<R: Patchable>(&self) -> Option<Arc<RecordSchema<R>>> {
        let schemas = self.schemas.read().ok()?;
        let entry = schemas.get(&TypeId::of::<R>())?;
        Arc::clone(&entry.schema).downcast::<RecordSchema<R>>().ok()
    }

    /// Returns the schema for `R`, building and caching it on first use.
    ///
    /// # Returns
    /// `Ok(schema)` on success, `Err(ChangesetError::Setup)` if the schema is
    /// invalid or the registry lock is poisoned.
    pub fn resolve<R: Patchable>(&self) -> Result<Arc<RecordSchema<R>>> {
        if let Some(schema) = self.get::<R>() {
            return Ok(schema);
        }

        let schema = Arc::new(R::describe().build()?);

        let mut schemas = self.schemas.write().map_err(|_| ChangesetError::Setup {
            record: R::RECORD_NAME.to_string(),
            message: "failed to acquire write lock".to_string(),
        })?;

        // Another thread may have registered R while the lock was released
        if let Some(existing) = schemas
            .get(&TypeId::of::<R>())
            .and_then(|entry| Arc::clone(&entry.schema).downcast::<RecordSchema<R>>().ok())
        {
            return Ok(existing);
        }

        tracing::info!(
            "Registered schema for record {} with {} fields",
            R::RECORD_NAME,
            schema.len()
        );
        schemas.insert(
            TypeId::of::<R>(),
            RegisteredSchema {
                record: R::RECORD_NAME,
                schema: Arc::clone(&schema) as Arc<dyn Any + Send + Sync>,
            },
        );

        Ok(schema)
    }

    /// Checks if a schema for `R` is cached.
    pub fn contains<R: Patchable>(&self) -> bool {
        let schemas = match self.schemas.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        schemas.contains_key(&TypeId::of::<R>())
    }

    /// Returns the number of cached schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().map(|schemas| schemas.len()).unwrap_or(0)
    }

    /// Returns `true` if no schema has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the names of all cached record types, sorted.
    pub fn record_names(&self) -> Vec<&'static str> {
        let schemas = match self.schemas.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut names: Vec<&'static str> = schemas.values().map(|entry| entry.record).collect();
        names.sort_unstable();
        names
    }
}
