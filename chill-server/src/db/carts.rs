//! Cart database operations

use shared::models::{Cart, CartItem};
use sqlx::PgPool;

use crate::error::ServiceResult;

const CART_COLUMNS: &str = r#"
    id, user_id,
    created_at AT TIME ZONE 'UTC' AS created_at,
    updated_at AT TIME ZONE 'UTC' AS updated_at
"#;

/// Cart item row joined with its menu item
pub(crate) const CART_ITEM_SELECT: &str = r#"
    SELECT ci.id, ci.cart_id, ci.menu_item_id, m.name AS menu_item_name,
           m.price AS menu_item_price, ci.quantity,
           ci.created_at AT TIME ZONE 'UTC' AS created_at
    FROM cart_items ci
    JOIN menu_items m ON m.id = ci.menu_item_id
"#;

/// Fill `items` of each cart with one query
async fn attach_items(pool: &PgPool, carts: &mut [Cart]) -> ServiceResult<()> {
    if carts.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = carts.iter().map(|c| c.id).collect();
    let sql = format!("{CART_ITEM_SELECT} WHERE ci.cart_id = ANY($1) ORDER BY ci.id");
    let items: Vec<CartItem> = sqlx::query_as(&sql).bind(&ids).fetch_all(pool).await?;

    for item in items {
        if let Some(cart) = carts.iter_mut().find(|c| c.id == item.cart_id) {
            cart.items.push(item);
        }
    }
    Ok(())
}

pub async fn list(pool: &PgPool, user_id: Option<i32>) -> ServiceResult<Vec<Cart>> {
    let sql = format!(
        "SELECT {CART_COLUMNS} FROM carts WHERE ($1::INT IS NULL OR user_id = $1) ORDER BY id"
    );
    let mut carts: Vec<Cart> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    attach_items(pool, &mut carts).await?;
    Ok(carts)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<Cart>> {
    let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE id = $1");
    let row: Option<Cart> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    let Some(cart) = row else {
        return Ok(None);
    };
    let mut carts = [cart];
    attach_items(pool, &mut carts).await?;
    let [cart] = carts;
    Ok(Some(cart))
}

pub async fn create(pool: &PgPool, user_id: i32) -> ServiceResult<Cart> {
    let sql = format!("INSERT INTO carts (user_id) VALUES ($1) RETURNING {CART_COLUMNS}");
    let cart: Cart = sqlx::query_as(&sql).bind(user_id).fetch_one(pool).await?;
    Ok(cart)
}

/// Reassign a cart; `false` when it does not exist
pub async fn update(pool: &PgPool, id: i32, user_id: i32) -> ServiceResult<bool> {
    let result = sqlx::query(
        "UPDATE carts SET user_id = $1, updated_at = (NOW() AT TIME ZONE 'UTC') WHERE id = $2",
    )
    .bind(user_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM carts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
