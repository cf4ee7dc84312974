//! Per-table SQL statement builder.
//!
//! The builder only lays out SQL text and placeholders; the caller binds the
//! values in placeholder order.
//!
//! ```ignore
//! let sql = QueryBuilder::new("lead_sources")
//!     .dialect(Dialect::Postgres)
//!     .where_eq("id")
//!     .build_select(&["id", "name"])?;
//! assert_eq!(sql, r#"SELECT "id", "name" FROM "lead_sources" WHERE "id" = $1"#);
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Validate identifiers against a conservative pattern.
    Validate,
    /// Validate and quote identifiers with `"`.
    Quote,
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    conditions: Vec<String>,
    order: Vec<(String, bool)>,
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: Vec::new(),
            order: Vec::new(),
            dialect: Dialect::Generic,
            identifier_policy: IdentifierPolicy::Quote,
        }
    }

    /// Set the SQL dialect (affects placeholder style).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    /// Add a `column = <placeholder>` condition, joined with `AND`.
    pub fn where_eq(mut self, column: &str) -> Self {
        self.conditions.push(column.to_string());
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    /// `SELECT <columns> FROM <table> [WHERE ..] [ORDER BY ..]`
    pub fn build_select(&self, columns: &[&str]) -> Result<String, QueryError> {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.column_list(columns)?,
            self.ident(&self.table, "table")?
        );
        let mut next = Placeholders::new(self.dialect);
        self.append_where(&mut sql, &mut next)?;
        self.append_order(&mut sql)?;
        Ok(sql)
    }

    /// `INSERT INTO <table> (<columns>) VALUES (..) RETURNING <returning>`
    ///
    /// With no columns the row is inserted with `DEFAULT VALUES`.
    pub fn build_insert(&self, columns: &[&str], returning: &[&str]) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let mut sql = if columns.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES")
        } else {
            let mut next = Placeholders::new(self.dialect);
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                self.column_list(columns)?,
                next.take(columns.len()).join(", ")
            )
        };
        self.append_returning(&mut sql, returning)?;
        Ok(sql)
    }

    /// Insert-or-update keyed by `id_column`.
    ///
    /// Placeholders: the id first, then `columns` in order.
    pub fn build_upsert(
        &self,
        id_column: &str,
        columns: &[&str],
        returning: &[&str],
    ) -> Result<String, QueryError> {
        let table = self.ident(&self.table, "table")?;
        let id = self.ident(id_column, "column")?;
        let mut all = Vec::with_capacity(columns.len() + 1);
        all.push(id_column);
        all.extend_from_slice(columns);

        let mut next = Placeholders::new(self.dialect);
        let mut sql = format!(
            "INSERT INTO {table} ({}) VALUES ({}) ON CONFLICT ({id}) DO UPDATE SET ",
            self.column_list(&all)?,
            next.take(all.len()).join(", ")
        );
        // An entity with only an id still needs an assignment for RETURNING to yield the row.
        let assigned = if columns.is_empty() { &all[..1] } else { columns };
        let mut sets = Vec::with_capacity(assigned.len());
        for col in assigned {
            let col = self.ident(col, "column")?;
            sets.push(format!("{col} = excluded.{col}"));
        }
        sql.push_str(&sets.join(", "));
        self.append_returning(&mut sql, returning)?;
        Ok(sql)
    }

    /// Statement that moves the table's serial sequence past the largest
    /// stored `id_column`, needed after a row was written with an explicit key.
    ///
    /// Only Postgres keeps such a sequence apart from the table; other
    /// dialects return `None`. The sequence never moves backwards, and
    /// tables without a serial sequence are left alone.
    pub fn build_sequence_sync(&self, id_column: &str) -> Result<Option<String>, QueryError> {
        if self.dialect != Dialect::Postgres {
            return Ok(None);
        }
        let table = self.ident(&self.table, "table")?;
        let id = self.ident(id_column, "column")?;
        // pg_get_serial_sequence parses its first argument as a (possibly quoted)
        // name and takes the column name verbatim.
        if id_column.contains('.') {
            return Err(QueryError::InvalidIdentifier {
                kind: "column",
                ident: id_column.to_string(),
            });
        }
        let sequence = format!("pg_get_serial_sequence('{table}', '{id_column}')");
        Ok(Some(format!(
            "SELECT setval({sequence}, GREATEST((SELECT MAX({id}) FROM {table}), nextval({sequence}) - 1))"
        )))
    }

    /// `DELETE FROM <table> [WHERE ..] [RETURNING ..]`
    pub fn build_delete(&self, returning: &[&str]) -> Result<String, QueryError> {
        let mut sql = format!("DELETE FROM {}", self.ident(&self.table, "table")?);
        let mut next = Placeholders::new(self.dialect);
        self.append_where(&mut sql, &mut next)?;
        self.append_returning(&mut sql, returning)?;
        Ok(sql)
    }

    fn append_where(&self, sql: &mut String, next: &mut Placeholders) -> Result<(), QueryError> {
        if self.conditions.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.conditions.len());
        for col in &self.conditions {
            clauses.push(format!("{} = {}", self.ident(col, "column")?, next.next()));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        Ok(())
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.order.len());
        for (col, asc) in &self.order {
            let col = self.ident(col, "column")?;
            clauses.push(format!("{col} {}", if *asc { "ASC" } else { "DESC" }));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn append_returning(&self, sql: &mut String, returning: &[&str]) -> Result<(), QueryError> {
        if !returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.column_list(returning)?);
        }
        Ok(())
    }

    fn column_list(&self, columns: &[&str]) -> Result<String, QueryError> {
        let mut out = Vec::with_capacity(columns.len());
        for col in columns {
            out.push(self.ident(col, "column")?);
        }
        Ok(out.join(", "))
    }

    fn ident(&self, ident: &str, kind: &'static str) -> Result<String, QueryError> {
        if !is_valid_identifier(ident) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        Ok(match self.identifier_policy {
            IdentifierPolicy::Quote => ident
                .split('.')
                .map(|part| format!("\"{part}\""))
                .collect::<Vec<_>>()
                .join("."),
            IdentifierPolicy::Validate => ident.to_string(),
        })
    }
}

struct Placeholders {
    dialect: Dialect,
    index: usize,
}

impl Placeholders {
    fn new(dialect: Dialect) -> Self {
        Self { dialect, index: 1 }
    }

    fn next(&mut self) -> String {
        let placeholder = self.dialect.placeholder(self.index);
        self.index += 1;
        placeholder
    }

    fn take(&mut self, n: usize) -> Vec<String> {
        (0..n).map(|_| self.next()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

fn is_valid_identifier(ident: &str) -> bool {
    !ident.is_empty() && ident.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLS: &[&str] = &["id", "name", "incoming_number"];

    #[test]
    fn test_select_all_ordered() {
        let sql = QueryBuilder::new("lead_sources")
            .order_by("id", true)
            .build_select(COLS)
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "name", "incoming_number" FROM "lead_sources" ORDER BY "id" ASC"#
        );
    }

    #[test]
    fn test_select_by_id_postgres() {
        let sql = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Postgres)
            .where_eq("id")
            .build_select(&["id", "name"])
            .unwrap();
        assert_eq!(sql, r#"SELECT "id", "name" FROM "lead_sources" WHERE "id" = $1"#);
    }

    #[test]
    fn test_validate_policy_leaves_identifiers_bare() {
        let sql = QueryBuilder::new("calls")
            .identifier_policy(IdentifierPolicy::Validate)
            .dialect(Dialect::Sqlite)
            .where_eq("lead_source_id")
            .where_eq("caller_number")
            .order_by("id", false)
            .build_select(&["id"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM calls WHERE lead_source_id = ? AND caller_number = ? ORDER BY id DESC"
        );
    }

    #[test]
    fn test_insert_returning() {
        let sql = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Postgres)
            .build_insert(&["name", "incoming_number"], COLS)
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "lead_sources" ("name", "incoming_number") VALUES ($1, $2) RETURNING "id", "name", "incoming_number""#
        );
    }

    #[test]
    fn test_insert_without_columns_uses_defaults() {
        let sql = QueryBuilder::new("ticks").build_insert(&[], &["id"]).unwrap();
        assert_eq!(sql, r#"INSERT INTO "ticks" DEFAULT VALUES RETURNING "id""#);
    }

    #[test]
    fn test_upsert_binds_id_first() {
        let sql = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Postgres)
            .build_upsert("id", &["name", "incoming_number"], COLS)
            .unwrap();
        assert_eq!(
            sql,
            concat!(
                r#"INSERT INTO "lead_sources" ("id", "name", "incoming_number") VALUES ($1, $2, $3) "#,
                r#"ON CONFLICT ("id") DO UPDATE SET "name" = excluded."name", "incoming_number" = excluded."incoming_number" "#,
                r#"RETURNING "id", "name", "incoming_number""#
            )
        );
    }

    #[test]
    fn test_upsert_id_only_entity() {
        let sql = QueryBuilder::new("ticks")
            .dialect(Dialect::Sqlite)
            .build_upsert("id", &[], &["id"])
            .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "ticks" ("id") VALUES (?) ON CONFLICT ("id") DO UPDATE SET "id" = excluded."id" RETURNING "id""#
        );
    }

    #[test]
    fn test_sequence_sync_postgres_only() {
        let sql = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Postgres)
            .build_sequence_sync("id")
            .unwrap();
        assert_eq!(
            sql.as_deref(),
            Some(concat!(
                r#"SELECT setval(pg_get_serial_sequence('"lead_sources"', 'id'), "#,
                r#"GREATEST((SELECT MAX("id") FROM "lead_sources"), "#,
                r#"nextval(pg_get_serial_sequence('"lead_sources"', 'id')) - 1))"#
            ))
        );

        let sqlite = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Sqlite)
            .build_sequence_sync("id")
            .unwrap();
        assert!(sqlite.is_none());

        let err = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Postgres)
            .build_sequence_sync("id'); DROP TABLE calls; --")
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { kind: "column", .. }));
    }

    #[test]
    fn test_delete_returning() {
        let sql = QueryBuilder::new("lead_sources")
            .dialect(Dialect::Postgres)
            .where_eq("id")
            .build_delete(&["id"])
            .unwrap();
        assert_eq!(sql, r#"DELETE FROM "lead_sources" WHERE "id" = $1 RETURNING "id""#);
    }

    #[test]
    fn test_schema_qualified_table() {
        let sql = QueryBuilder::new("calltrack.calls").build_select(&["id"]).unwrap();
        assert_eq!(sql, r#"SELECT "id" FROM "calltrack"."calls""#);
    }

    #[test]
    fn test_invalid_identifiers() {
        let err = QueryBuilder::new("calls;drop").build_select(&["id"]).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidIdentifier {
                kind: "table",
                ident: "calls;drop".into()
            }
        );

        let err = QueryBuilder::new("calls")
            .build_insert(&["1name"], &[])
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { kind: "column", .. }));

        assert!(QueryBuilder::new("calls").build_select(&["*"]).is_err());
    }
}
