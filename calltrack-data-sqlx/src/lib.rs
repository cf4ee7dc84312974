//! # calltrack-data-sqlx — SQLx backend for the calltrack data layer
//!
//! Implements [`calltrack_data::Repository`] for any entity over an
//! `sqlx::Pool`, with one session per call and one transaction per mutating
//! call.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxRepository`] | Generic CRUD repository holding an `sqlx::Pool<DB>` |
//! | [`SqlxEntity`] | Per-database binding of an entity's column values |
//! | [`DataSourceProperties`] | Connection URL, credentials and pool settings read from config |
//! | [`Session`] | One pooled connection, released when dropped |
//! | [`Tx`] | Transaction wrapper: commit on success, rollback on error |
//! | [`SqlxErrorExt`] | Converts `sqlx::Error` into `DataError` (`.into_data_error()`) |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite` (default) | SQLite via `sqlx/sqlite` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//!
//! # Quick start
//!
//! ```ignore
//! use calltrack_core::CalltrackConfig;
//! use calltrack_data::Repository;
//! use calltrack_data_sqlx::SqlxRepository;
//! use sqlx::Postgres;
//!
//! let config = CalltrackConfig::load("dev")?;
//! let repo = SqlxRepository::<LeadSource, Postgres>::from_config(&config)?;
//!
//! let created = repo.create(&LeadSource::new("billboard")).await?;
//! let found = repo.find(created.id.as_ref().unwrap()).await?;
//! ```

pub mod datasource;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod repository;
pub mod session;
pub mod tx;

pub use datasource::DataSourceProperties;
pub use dialect::SqlDialect;
pub use entity::SqlxEntity;
pub use error::{SqlxErrorExt, SqlxResult};
pub use repository::SqlxRepository;
pub use session::Session;
pub use tx::Tx;

/// Re-exports of the most commonly used types from both `calltrack-data` and this crate.
pub mod prelude {
    pub use crate::{DataSourceProperties, SqlxEntity, SqlxErrorExt, SqlxRepository};
    pub use calltrack_data::prelude::*;
}
