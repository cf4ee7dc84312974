use sqlx::pool::PoolConnection;
use sqlx::Database;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// One unit-of-work connection taken from the pool.
///
/// The connection goes back to the pool when the session is dropped, on
/// success and error paths alike.
pub struct Session<DB: Database> {
    conn: PoolConnection<DB>,
    table: &'static str,
}

impl<DB: Database> Session<DB> {
    pub(crate) fn new(conn: PoolConnection<DB>, table: &'static str) -> Self {
        debug!(table, "session opened");
        Self { conn, table }
    }
}

impl<DB: Database> Deref for Session<DB> {
    type Target = DB::Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl<DB: Database> DerefMut for Session<DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl<DB: Database> Drop for Session<DB> {
    fn drop(&mut self) {
        debug!(table = self.table, "session released");
    }
}
