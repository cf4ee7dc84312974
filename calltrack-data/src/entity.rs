/// Trait representing a database entity with a table name, id column, and column list.
///
/// The key is framework-assigned: `id()` is `None` until the entity has been
/// persisted, and the repository hands back a fresh value carrying the key.
///
/// # Example
///
/// ```ignore
/// impl Entity for LeadSource {
///     type Id = i64;
///     fn table_name() -> &'static str { "lead_sources" }
///     fn id_column() -> &'static str { "id" }
///     fn columns() -> &'static [&'static str] { &["id", "name", "incoming_number"] }
///     fn id(&self) -> Option<&i64> { self.id.as_ref() }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    type Id: Clone + Send + Sync + ToString + 'static;

    fn table_name() -> &'static str;
    fn id_column() -> &'static str;

    /// Every persisted column, id included, in select order.
    fn columns() -> &'static [&'static str];

    fn id(&self) -> Option<&Self::Id>;

    /// Columns written on insert and update: [`columns`](Entity::columns)
    /// without the id column, in the same order.
    fn value_columns() -> Vec<&'static str> {
        Self::columns()
            .iter()
            .copied()
            .filter(|c| *c != Self::id_column())
            .collect()
    }
}
