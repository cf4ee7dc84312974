use calltrack_data::Dialect;
use sqlx::Database;

/// Ties an sqlx driver to the statement dialect the repository generates for it.
pub trait SqlDialect: Database {
    const DIALECT: Dialect;
}

#[cfg(feature = "sqlite")]
impl SqlDialect for sqlx::Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}

#[cfg(feature = "postgres")]
impl SqlDialect for sqlx::Postgres {
    const DIALECT: Dialect = Dialect::Postgres;
}
