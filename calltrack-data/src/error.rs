use calltrack_core::ConfigError;

use crate::query::QueryError;

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// The requested key does not exist in the store.
    NotFound(String),
    /// The backing store rejected a session, statement or commit.
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// Connection parameters are missing or unusable.
    Configuration(String),
    /// An entity declared an identifier the statement builder refuses.
    Query(QueryError),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `calltrack-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn not_found(table: &str, id: &impl ToString) -> Self {
        DataError::NotFound(format!("{table} with id {} not found", id.to_string()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            DataError::Query(err) => write!(f, "Query error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            DataError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for DataError {
    fn from(err: ConfigError) -> Self {
        DataError::Configuration(err.to_string())
    }
}

impl From<QueryError> for DataError {
    fn from(err: QueryError) -> Self {
        DataError::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn kind(err: &DataError) -> &'static str {
        match err {
            DataError::NotFound(_) => "not-found",
            DataError::Database(_) => "database",
            DataError::Configuration(_) => "configuration",
            DataError::Query(_) => "query",
        }
    }

    #[test]
    fn display_and_source() {
        let not_found = DataError::not_found("lead_sources", &7);
        assert_eq!(kind(&not_found), "not-found");
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "Not found: lead_sources with id 7 not found");

        let config: DataError = ConfigError::NotFound("datasource.url".into()).into();
        assert_eq!(kind(&config), "configuration");
        assert_eq!(
            config.to_string(),
            "Configuration error: Config key not found: datasource.url"
        );
        assert!(config.source().is_none());

        let query: DataError = QueryError::InvalidIdentifier {
            kind: "table",
            ident: "calls;drop".into(),
        }
        .into();
        assert_eq!(kind(&query), "query");
        assert!(query.source().is_some());

        let database = DataError::database(std::io::Error::other("connection reset"));
        assert_eq!(kind(&database), "database");
        assert_eq!(database.to_string(), "Database error: connection reset");
        assert!(database.source().is_some());
    }
}
