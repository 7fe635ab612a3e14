//! # Repository Module
//!
//! One generic repository drives every id-keyed table. Entity-specific
//! queries are added as inherent impls on `Repository<Entity>`, and the two
//! link tables with composite keys get their own small repositories.
//!
//! ## Generic Repository
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Repository<R: Record>                                  │
//! │                                                                         │
//! │  Record (per entity)               Repository<R> (written once)         │
//! │  ├── ENTITY  "Client"              ├── get_all(limit)                   │
//! │  ├── TABLE   "t_client"            ├── get_by_id(id)                    │
//! │  ├── COLUMNS "id, lastname, ..."   ├── create(&R::Create)               │
//! │  ├── type Create: Changeset ───────┼─► INSERT ... RETURNING             │
//! │  └── type Patch:  Changeset ───────┼─► UPDATE ... SET <present cols>    │
//! │                                    └── delete(id)                       │
//! │                                                                         │
//! │  impl Repository<Client>    { get_by_email, newsletter_subscribers }   │
//! │  impl Repository<Commune>   { get_by_postal_code, search_by_name, ... }│
//! │  impl Repository<Product>   { list_by_category, low_stock }            │
//! │  ...                                                                    │
//! │                                                                         │
//! │  OrderItemRepository  (order_id, product_id)                           │
//! │  UserRoleRepository   (user_id, role_id)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Changesets
//! A changeset lists `(column, value)` pairs. Create schemas list every
//! column they carry; patch schemas list only the fields that are `Some`,
//! so `PATCH {"newsletter": true}` becomes `UPDATE t_client SET newsletter = ?`.
//!
//! Column and table names come from `&'static str` constants, never from
//! request data. All values go through bind parameters.

pub mod account;
pub mod client;
pub mod locality;
pub mod order;
pub mod order_item;
pub mod product;
pub mod shipping;
pub mod user_role;

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, Utc};
use digicheese_core::OrderStatus;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

pub use order_item::OrderItemRepository;
pub use user_role::UserRoleRepository;

// =============================================================================
// Field Values
// =============================================================================

/// A column value waiting to be bound.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Boolean(Option<bool>),
    Date(Option<NaiveDate>),
    Timestamp(Option<DateTime<Utc>>),
}

impl FieldValue {
    fn push_bind(self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            FieldValue::Text(v) => builder.push_bind(v),
            FieldValue::Integer(v) => builder.push_bind(v),
            FieldValue::Boolean(v) => builder.push_bind(v),
            FieldValue::Date(v) => builder.push_bind(v),
            FieldValue::Timestamp(v) => builder.push_bind(v),
        };
    }
}

macro_rules! field_value_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for FieldValue {
            fn from(value: $ty) -> Self {
                FieldValue::$variant(Some(value))
            }
        }

        impl From<Option<$ty>> for FieldValue {
            fn from(value: Option<$ty>) -> Self {
                FieldValue::$variant(value)
            }
        }
    };
}

field_value_from!(Text, String);
field_value_from!(Integer, i64);
field_value_from!(Boolean, bool);
field_value_from!(Date, NaiveDate);
field_value_from!(Timestamp, DateTime<Utc>);

impl From<OrderStatus> for FieldValue {
    fn from(status: OrderStatus) -> Self {
        FieldValue::Text(Some(status.as_str().to_string()))
    }
}

// =============================================================================
// Changesets
// =============================================================================

/// Ordered `(column, value)` pairs for an INSERT or UPDATE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments(Vec<(&'static str, FieldValue)>);

impl Assignments {
    pub fn new() -> Self {
        Assignments(Vec::new())
    }

    /// Adds a column unconditionally (a `None` value writes NULL).
    pub fn set(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    /// Adds a column only when the value is present.
    pub fn set_if_present<T: Into<FieldValue>>(mut self, column: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.0.push((column, value.into()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(column, _)| *column)
    }
}

impl IntoIterator for Assignments {
    type Item = (&'static str, FieldValue);
    type IntoIter = std::vec::IntoIter<(&'static str, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Something that can be written to a table.
pub trait Changeset {
    fn assignments(&self) -> Assignments;
}

// =============================================================================
// Record
// =============================================================================

/// A row type of an `id`-keyed table.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    /// Name used in logs and error messages.
    const ENTITY: &'static str;

    const TABLE: &'static str;

    /// Comma-separated select list, `id` first.
    const COLUMNS: &'static str;

    type Create: Changeset + Send + Sync;
    type Patch: Changeset + Send + Sync;
}

// =============================================================================
// Repository
// =============================================================================

/// Generic CRUD repository over one table.
///
/// ## Usage
/// ```rust,ignore
/// let clients: Repository<Client> = db.clients();
///
/// let first_ten = clients.get_all(10).await?;
/// let created = clients.create(&ClientCreate::new("Jean", "DUPONT")).await?;
/// let removed = clients.delete(created.id).await?;
/// ```
pub struct Repository<R> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Repository {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for Repository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository").field("table", &R::TABLE).finish()
    }
}

impl<R: Record> Repository<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Repository {
            pool,
            _record: PhantomData,
        }
    }

    /// Returns the connection pool, for entity-specific queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Lists records ordered by id, at most `limit` of them.
    pub async fn get_all(&self, limit: u32) -> DbResult<Vec<R>> {
        debug!(entity = R::ENTITY, limit, "Listing records");

        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT ?1",
            R::COLUMNS,
            R::TABLE
        );
        let records = sqlx::query_as::<_, R>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<R>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", R::COLUMNS, R::TABLE);
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Inserts a record and returns it as stored (defaults filled in).
    pub async fn create(&self, data: &R::Create) -> DbResult<R> {
        let assignments = data.assignments();
        debug!(entity = R::ENTITY, columns = assignments.len(), "Creating record");

        let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} ", R::TABLE));

        if assignments.is_empty() {
            builder.push("DEFAULT VALUES");
        } else {
            builder.push("(");
            builder.push(assignments.columns().collect::<Vec<_>>().join(", "));
            builder.push(") VALUES (");
            for (i, (_, value)) in assignments.into_iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                value.push_bind(&mut builder);
            }
            builder.push(")");
        }

        builder.push(" RETURNING ");
        builder.push(R::COLUMNS);

        let record = builder.build_query_as::<R>().fetch_one(&self.pool).await?;
        Ok(record)
    }

    /// Updates the columns present in `changes`.
    ///
    /// Returns `None` when no record has this id. An empty patch writes
    /// nothing and returns the current record.
    pub async fn patch(&self, id: i64, changes: &R::Patch) -> DbResult<Option<R>> {
        let assignments = changes.assignments();
        if assignments.is_empty() {
            return self.get_by_id(id).await;
        }

        debug!(entity = R::ENTITY, id, columns = assignments.len(), "Patching record");

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", R::TABLE));
        for (i, (column, value)) in assignments.into_iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(column);
            builder.push(" = ");
            value.push_bind(&mut builder);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(R::COLUMNS);

        let record = builder
            .build_query_as::<R>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Deletes a record. Returns `false` when nothing had this id.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(entity = R::ENTITY, id, "Deleting record");

        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts rows (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

// =============================================================================
// Test Support
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use digicheese_core::{Role, RoleCreate, RolePatch};

    use crate::error::DbError;
    use testing::test_db;

    fn role(name: &str) -> RoleCreate {
        RoleCreate {
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_set_if_present_skips_none() {
        let assignments = Assignments::new()
            .set_if_present("name", Some("admin".to_string()))
            .set_if_present::<String>("description", None)
            .set("notes", None::<String>);

        assert_eq!(assignments.columns().collect::<Vec<_>>(), vec!["name", "notes"]);
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let db = test_db().await;
        let roles = db.roles();

        let created = roles.create(&role("admin")).await.unwrap();
        assert!(created.id >= 1);
        assert_eq!(created.name, "admin");

        let fetched = roles.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(roles.get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_orders_by_id_and_limits() {
        let db = test_db().await;
        let roles = db.roles();

        for name in ["admin", "vendeur", "preparateur"] {
            roles.create(&role(name)).await.unwrap();
        }

        let all = roles.get_all(10).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "vendeur", "preparateur"]);

        assert_eq!(roles.get_all(2).await.unwrap().len(), 2);
        assert_eq!(roles.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_patch_changes_present_fields_only() {
        let db = test_db().await;
        let roles = db.roles();
        let created = roles
            .create(&RoleCreate {
                name: "vendeur".to_string(),
                description: Some("Comptoir".to_string()),
            })
            .await
            .unwrap();

        let patched = roles
            .patch(
                created.id,
                &RolePatch {
                    name: Some("vendeuse".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.name, "vendeuse");
        assert_eq!(patched.description.as_deref(), Some("Comptoir"));
    }

    #[tokio::test]
    async fn test_empty_patch_returns_current() {
        let db = test_db().await;
        let roles = db.roles();
        let created = roles.create(&role("admin")).await.unwrap();

        let same = roles.patch(created.id, &RolePatch::default()).await.unwrap();
        assert_eq!(same, Some(created));

        let missing = roles.patch(42, &RolePatch::default()).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_patch_missing_record_returns_none() {
        let db = test_db().await;
        let patch = RolePatch {
            name: Some("ghost".to_string()),
            description: None,
        };
        assert_eq!(db.roles().patch(7, &patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let roles = db.roles();
        let created: Role = roles.create(&role("admin")).await.unwrap();

        assert!(roles.delete(created.id).await.unwrap());
        assert!(!roles.delete(created.id).await.unwrap());
        assert_eq!(roles.get_by_id(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unique_violation_is_reported() {
        let db = test_db().await;
        let roles = db.roles();
        roles.create(&role("admin")).await.unwrap();

        let err = roles.create(&role("admin")).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field } => assert_eq!(field, "roles.name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
