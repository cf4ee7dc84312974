//! Transaction wrapper with explicit commit / rollback on the outcome of the work.

use calltrack_data::DataError;
use sqlx::{Connection, Database, Transaction};
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use crate::error::SqlxErrorExt;

/// A wrapper around SQLx [`Transaction`] scoped to one repository call.
///
/// - [`Tx::begin`] starts a transaction on a session's connection
/// - [`Tx::finish`] commits if the work succeeded, rolls back otherwise
/// - dropping an unfinished `Tx` rolls back
///
/// # Example
///
/// ```ignore
/// let mut tx = Tx::begin(&mut *session).await?;
/// let result = sqlx::query_as::<_, LeadSource>(&sql)
///     .fetch_one(tx.as_mut())
///     .await
///     .map_err(SqlxErrorExt::into_data_error);
/// tx.finish(result).await
/// ```
pub struct Tx<'c, DB: Database>(Transaction<'c, DB>);

impl<'c, DB: Database> Deref for Tx<'c, DB> {
    type Target = Transaction<'c, DB>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'c, DB: Database> DerefMut for Tx<'c, DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'c, DB: Database> Tx<'c, DB> {
    /// Begin a transaction on the given connection.
    pub async fn begin(conn: &'c mut DB::Connection) -> Result<Self, DataError> {
        let tx = conn.begin().await.map_err(SqlxErrorExt::into_data_error)?;
        Ok(Tx(tx))
    }

    /// Returns a mutable reference to the underlying connection.
    pub fn as_mut(&mut self) -> &mut DB::Connection {
        &mut *self.0
    }

    /// Commit when `result` is `Ok`, roll back when it is `Err`.
    ///
    /// A failed commit is returned as the error. A failed rollback is logged
    /// and the original error is returned.
    pub async fn finish<R>(self, result: Result<R, DataError>) -> Result<R, DataError> {
        match result {
            Ok(value) => {
                self.0
                    .commit()
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                match self.0.rollback().await {
                    Ok(()) => debug!(error = %err, "transaction rolled back"),
                    Err(rollback) => {
                        warn!(error = %err, rollback_error = %rollback, "transaction rollback failed")
                    }
                }
                Err(err)
            }
        }
    }
}
