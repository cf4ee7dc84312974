use crate::entity::Entity;
use crate::error::DataError;
use std::future::Future;

/// Generic async repository trait for CRUD operations over one entity type.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
///
/// Every call is self-contained: it acquires its own session, and the
/// mutating calls run inside their own transaction that is committed before
/// the call returns or rolled back on error.
pub trait Repository<T: Entity>: Send + Sync {
    /// All rows of the entity's table, ordered by id.
    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// The row with the given key, read from the store. `DataError::NotFound` if absent.
    fn find(&self, id: &T::Id) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Insert a new entity and return it carrying its assigned key.
    fn create(&self, entity: &T) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Merge the entity by identity (insert when it has no key or its key is
    /// unknown, update otherwise) and return the stored row.
    fn update(&self, entity: &T) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Remove the entity by identity. `DataError::NotFound` if it is not stored.
    fn delete(&self, entity: &T) -> impl Future<Output = Result<(), DataError>> + Send;
}
