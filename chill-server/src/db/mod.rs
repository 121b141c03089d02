//! Database access layer (PostgreSQL via sqlx)
//!
//! One module per resource. Functions take a `PgPool` for single statements
//! or a `&mut PgConnection` when they run inside a caller's transaction.
//!
//! Timestamp columns are `timestamp without time zone` holding UTC. Reads
//! convert with `AT TIME ZONE 'UTC'` so rows decode as `DateTime<Utc>`;
//! writes bind `NaiveDateTime` from `shared::util::to_db_time`.

pub mod addresses;
pub mod cart_items;
pub mod carts;
pub mod events;
pub mod menu_categories;
pub mod menu_items;
pub mod orders;
pub mod reservations;
pub mod roles;
pub mod tables;
pub mod users;

use sqlx::PgExecutor;

use crate::error::ServiceResult;

/// Tables that can be checked with [`row_exists`]
#[derive(Debug, Clone, Copy)]
pub enum Entity {
    User,
    Role,
    MenuCategory,
    MenuItem,
}

impl Entity {
    fn table(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Role => "roles",
            Self::MenuCategory => "menu_categories",
            Self::MenuItem => "menu_items",
        }
    }
}

/// Whether a row with `id` exists in the entity's table
pub async fn row_exists<'e, E>(executor: E, entity: Entity, id: i32) -> ServiceResult<bool>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        entity.table()
    );
    let (exists,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(executor).await?;
    Ok(exists)
}

/// Outcome of deleting a row that must have no dependents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedDelete {
    Deleted,
    Missing,
    /// Number of dependent rows that blocked the delete
    InUse(i64),
}
