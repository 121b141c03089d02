//! Cart item database operations
//!
//! A cart holds at most one row per menu item. Adding an item that is
//! already present sums the quantities; the cart row is locked for the
//! duration so concurrent adds serialise.

use shared::models::CartItem;
use shared::validation::merge_quantity;
use sqlx::{PgConnection, PgPool};

use super::carts::CART_ITEM_SELECT;
use crate::error::ServiceResult;

pub async fn list(pool: &PgPool, cart_id: Option<i32>) -> ServiceResult<Vec<CartItem>> {
    let sql = format!("{CART_ITEM_SELECT} WHERE ($1::INT IS NULL OR ci.cart_id = $1) ORDER BY ci.id");
    let rows: Vec<CartItem> = sqlx::query_as(&sql).bind(cart_id).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<CartItem>> {
    let sql = format!("{CART_ITEM_SELECT} WHERE ci.id = $1");
    let row: Option<CartItem> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

async fn touch_cart(conn: &mut PgConnection, cart_id: i32) -> ServiceResult<()> {
    sqlx::query("UPDATE carts SET updated_at = (NOW() AT TIME ZONE 'UTC') WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Outcome of adding an item to a cart
#[derive(Debug)]
pub enum AddOutcome {
    /// New line inserted
    Created(CartItem),
    /// Quantity added to an existing line
    Merged(CartItem),
    CartMissing,
    MenuItemMissing,
}

pub async fn add(
    pool: &PgPool,
    cart_id: i32,
    menu_item_id: i32,
    quantity: i32,
) -> ServiceResult<AddOutcome> {
    let mut tx = pool.begin().await?;

    let cart: Option<(i32,)> = sqlx::query_as("SELECT id FROM carts WHERE id = $1 FOR UPDATE")
        .bind(cart_id)
        .fetch_optional(&mut *tx)
        .await?;
    if cart.is_none() {
        return Ok(AddOutcome::CartMissing);
    }
    if !super::row_exists(&mut *tx, super::Entity::MenuItem, menu_item_id).await? {
        return Ok(AddOutcome::MenuItemMissing);
    }

    let existing: Option<(i32, i32)> = sqlx::query_as(
        "SELECT id, quantity FROM cart_items WHERE cart_id = $1 AND menu_item_id = $2",
    )
    .bind(cart_id)
    .bind(menu_item_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (item_id, merged) = match existing {
        Some((id, current)) => {
            let total = merge_quantity(current, quantity).map_err(|e| {
                e.with_detail("cart_id", cart_id)
                    .with_detail("menu_item_id", menu_item_id)
            })?;
            sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2")
                .bind(total)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            (id, true)
        }
        None => {
            let (id,): (i32,) = sqlx::query_as(
                "INSERT INTO cart_items (cart_id, menu_item_id, quantity) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(cart_id)
            .bind(menu_item_id)
            .bind(quantity)
            .fetch_one(&mut *tx)
            .await?;
            (id, false)
        }
    };
    touch_cart(&mut tx, cart_id).await?;

    let sql = format!("{CART_ITEM_SELECT} WHERE ci.id = $1");
    let item: CartItem = sqlx::query_as(&sql).bind(item_id).fetch_one(&mut *tx).await?;

    tx.commit().await?;
    Ok(if merged {
        AddOutcome::Merged(item)
    } else {
        AddOutcome::Created(item)
    })
}

/// Outcome of a quantity change
#[derive(Debug, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated,
    Removed,
    Missing,
}

/// Set the quantity; zero or less removes the line. Callers bound the
/// upper end with `validate_quantity`.
pub async fn set_quantity(pool: &PgPool, id: i32, quantity: i32) -> ServiceResult<QuantityOutcome> {
    let mut tx = pool.begin().await?;

    let outcome = if quantity <= 0 {
        let row: Option<(i32,)> =
            sqlx::query_as("DELETE FROM cart_items WHERE id = $1 RETURNING cart_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        row.map(|(cart_id,)| (cart_id, QuantityOutcome::Removed))
    } else {
        let row: Option<(i32,)> =
            sqlx::query_as("UPDATE cart_items SET quantity = $1 WHERE id = $2 RETURNING cart_id")
                .bind(quantity)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        row.map(|(cart_id,)| (cart_id, QuantityOutcome::Updated))
    };

    let Some((cart_id, outcome)) = outcome else {
        return Ok(QuantityOutcome::Missing);
    };
    touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(outcome)
}

pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let mut tx = pool.begin().await?;
    let row: Option<(i32,)> = sqlx::query_as("DELETE FROM cart_items WHERE id = $1 RETURNING cart_id")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((cart_id,)) = row else {
        return Ok(false);
    };
    touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(true)
}
