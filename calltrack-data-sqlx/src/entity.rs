use calltrack_data::Entity;
use sqlx::query::QueryAs;
use sqlx::{Database, FromRow};

/// Binds an entity's column values for one database.
///
/// `bind_values` must bind exactly [`Entity::value_columns`], in that order.
/// The id is bound by the repository when a statement needs it.
///
/// ```ignore
/// impl SqlxEntity<Sqlite> for LeadSource {
///     fn bind_values<'q>(
///         &'q self,
///         query: QueryAs<'q, Sqlite, Self, <Sqlite as Database>::Arguments<'q>>,
///     ) -> QueryAs<'q, Sqlite, Self, <Sqlite as Database>::Arguments<'q>> {
///         query.bind(self.name.as_str()).bind(self.incoming_number.as_deref())
///     }
/// }
/// ```
pub trait SqlxEntity<DB: Database>: Entity + Sized + for<'r> FromRow<'r, DB::Row> {
    fn bind_values<'q>(
        &'q self,
        query: QueryAs<'q, DB, Self, <DB as Database>::Arguments<'q>>,
    ) -> QueryAs<'q, DB, Self, <DB as Database>::Arguments<'q>>;
}
