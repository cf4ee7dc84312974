use calltrack_core::CalltrackConfig;
use calltrack_data::{DataError, Entity, QueryBuilder, Repository};
use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};
use std::marker::PhantomData;
use tracing::debug;

use crate::datasource::DataSourceProperties;
use crate::dialect::SqlDialect;
use crate::entity::SqlxEntity;
use crate::error::SqlxErrorExt;
use crate::session::Session;
use crate::tx::Tx;

/// A generic SQL-based repository for one entity type.
///
/// Wraps an `sqlx::Pool<DB>`. Each operation takes one session from the pool
/// for its whole duration; `create`, `update` and `delete` also run in their
/// own transaction.
///
/// # Example
///
/// ```ignore
/// let repo = SqlxRepository::<LeadSource, Sqlite>::new(pool.clone());
/// let sources = repo.find_all().await?;
/// ```
pub struct SqlxRepository<T, DB: Database> {
    pool: Pool<DB>,
    _marker: PhantomData<T>,
}

impl<T, DB: Database> SqlxRepository<T, DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Build the repository from explicit datasource properties.
    pub fn with_properties(properties: &DataSourceProperties) -> Result<Self, DataError> {
        Ok(Self::new(properties.build_pool()?))
    }

    /// Read the `datasource.*` section and build the repository from it.
    ///
    /// Fails only when the configuration is unusable; the store is not
    /// contacted until the first operation.
    pub fn from_config(config: &CalltrackConfig) -> Result<Self, DataError> {
        Self::with_properties(&config.section::<DataSourceProperties>()?)
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T: Entity, DB: SqlDialect> SqlxRepository<T, DB> {
    /// A `QueryBuilder` pre-configured for this entity's table and database dialect.
    pub fn statements(&self) -> QueryBuilder {
        QueryBuilder::new(T::table_name()).dialect(DB::DIALECT)
    }

    async fn open_session(&self) -> Result<Session<DB>, DataError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(Session::new(conn, T::table_name()))
    }
}

impl<T, DB: Database> Clone for SqlxRepository<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, DB> Repository<T> for SqlxRepository<T, DB>
where
    DB: SqlDialect,
    T: SqlxEntity<DB> + for<'r> FromRow<'r, DB::Row>,
    T::Id: for<'q> Encode<'q, DB> + Type<DB>,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> <DB as Database>::Arguments<'q>: IntoArguments<'q, DB>,
{
    async fn find_all(&self) -> Result<Vec<T>, DataError> {
        let sql = self
            .statements()
            .order_by(T::id_column(), true)
            .build_select(T::columns())?;

        let mut session = self.open_session().await?;
        let rows = sqlx::query_as::<DB, T>(&sql)
            .fetch_all(&mut *session)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;

        debug!(table = T::table_name(), count = rows.len(), "find_all");
        Ok(rows)
    }

    async fn find(&self, id: &T::Id) -> Result<T, DataError> {
        let sql = self
            .statements()
            .where_eq(T::id_column())
            .build_select(T::columns())?;

        let mut session = self.open_session().await?;
        sqlx::query_as::<DB, T>(&sql)
            .bind(id.clone())
            .fetch_optional(&mut *session)
            .await
            .map_err(SqlxErrorExt::into_data_error)?
            .ok_or_else(|| DataError::not_found(T::table_name(), id))
    }

    async fn create(&self, entity: &T) -> Result<T, DataError> {
        let sql = self
            .statements()
            .build_insert(&T::value_columns(), T::columns())?;

        let mut session = self.open_session().await?;
        let mut tx = Tx::<DB>::begin(&mut *session).await?;
        let result = entity
            .bind_values(sqlx::query_as::<DB, T>(&sql))
            .fetch_one(tx.as_mut())
            .await
            .map_err(SqlxErrorExt::into_data_error);
        tx.finish(result).await
    }

    async fn update(&self, entity: &T) -> Result<T, DataError> {
        let builder = self.statements();
        let columns = T::value_columns();
        let (sql, sequence_sync) = match entity.id() {
            Some(_) => (
                builder.build_upsert(T::id_column(), &columns, T::columns())?,
                builder.build_sequence_sync(T::id_column())?,
            ),
            None => (builder.build_insert(&columns, T::columns())?, None),
        };

        let mut query = sqlx::query_as::<DB, T>(&sql);
        if let Some(id) = entity.id() {
            query = query.bind(id.clone());
        }

        let mut session = self.open_session().await?;
        let mut tx = Tx::<DB>::begin(&mut *session).await?;
        let mut result = entity
            .bind_values(query)
            .fetch_one(tx.as_mut())
            .await
            .map_err(SqlxErrorExt::into_data_error);

        // A caller-chosen key must not be handed out again by `create`.
        if let (true, Some(sync)) = (result.is_ok(), sequence_sync.as_deref()) {
            if let Err(err) = sqlx::query::<DB>(sync).execute(tx.as_mut()).await {
                result = Err(err.into_data_error());
            }
        }
        tx.finish(result).await
    }

    async fn delete(&self, entity: &T) -> Result<(), DataError> {
        let id = entity.id().ok_or_else(|| {
            DataError::NotFound(format!("{} entity has no id", T::table_name()))
        })?;
        let sql = self
            .statements()
            .where_eq(T::id_column())
            .build_delete(T::columns())?;

        let mut session = self.open_session().await?;
        let mut tx = Tx::<DB>::begin(&mut *session).await?;
        let result = match sqlx::query_as::<DB, T>(&sql)
            .bind(id.clone())
            .fetch_optional(tx.as_mut())
            .await
        {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(DataError::not_found(T::table_name(), id)),
            Err(err) => Err(err.into_data_error()),
        };
        tx.finish(result).await
    }
}
