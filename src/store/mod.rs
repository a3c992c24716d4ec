//! In-memory resource stores served by the user and product services

pub mod payload;
pub mod product;
pub mod routes;
pub mod user;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};

pub use product::{Product, ProductPatch};
pub use user::User;

/// A record type held by a [`ResourceStore`]
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    /// Collection name as it appears in paths and list bodies, e.g. "users"
    const COLLECTION: &'static str;
    /// Name used in messages, e.g. "User"
    const DISPLAY_NAME: &'static str;
    /// Name reported by the service health endpoint, e.g. "user-service"
    const SERVICE_NAME: &'static str;

    fn id(&self) -> &str;

    /// Build a new record from a create payload, assigning id and timestamp
    fn from_payload(payload: Option<&Value>) -> Result<Self>;
}

/// Insertion-ordered collection of records, keyed by id.
///
/// All access goes through the methods below; the lock is never held
/// across an await.
pub struct ResourceStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(seed: Vec<R>) -> Self {
        Self {
            records: RwLock::new(seed),
        }
    }

    pub fn list(&self) -> Vec<R> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Append a record. Ids are unique within the store.
    pub fn insert(&self, record: R) -> Result<R> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::Internal(format!(
                "{} id '{}' already exists",
                R::DISPLAY_NAME,
                record.id()
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    /// Apply `update` to the record with `id`, returning the new value
    pub fn update<F>(&self, id: &str, update: F) -> Option<R>
    where
        F: FnOnce(&mut R),
    {
        let mut records = self.records.write();
        let record = records.iter_mut().find(|r| r.id() == id)?;
        update(record);
        Some(record.clone())
    }

    pub fn remove(&self, id: &str) -> Option<R> {
        let mut records = self.records.write();
        let index = records.iter().position(|r| r.id() == id)?;
        Some(records.remove(index))
    }
}

impl<R: Resource> Default for ResourceStore<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Fresh record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current UTC time as a naive ISO-8601 timestamp with microseconds
pub fn timestamp_now() -> String {
    chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
