//! Order database operations
//!
//! Orders are written in one transaction: reference checks, price snapshot,
//! header insert and line inserts either all land or none do.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus};
use shared::rules::order::{MAX_MONEY, order_total};
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::{Entity, addresses, row_exists};
use crate::error::ServiceResult;

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.user_id, u.full_name AS user_full_name,
           o.address_id, a.address_text,
           o.total_price, o.status,
           o.created_at AT TIME ZONE 'UTC' AS created_at,
           o.updated_at AT TIME ZONE 'UTC' AS updated_at
    FROM orders o
    LEFT JOIN users u ON u.id = o.user_id
    LEFT JOIN addresses a ON a.id = o.address_id
"#;

const ORDER_ITEM_SELECT: &str = r#"
    SELECT oi.id, oi.order_id, oi.menu_item_id, m.name AS menu_item_name,
           oi.quantity, oi.price_at_order
    FROM order_items oi
    LEFT JOIN menu_items m ON m.id = oi.menu_item_id
"#;

async fn attach_items<'e, E>(executor: E, orders: &mut [Order]) -> ServiceResult<()>
where
    E: PgExecutor<'e>,
{
    if orders.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let sql = format!("{ORDER_ITEM_SELECT} WHERE oi.order_id = ANY($1) ORDER BY oi.id");
    let items: Vec<OrderItem> = sqlx::query_as(&sql).bind(&ids).fetch_all(executor).await?;

    for item in items {
        if let Some(order) = orders.iter_mut().find(|o| o.id == item.order_id) {
            order.items.push(item);
        }
    }
    Ok(())
}

/// Newest first, optionally filtered by user and status
pub async fn list(
    pool: &PgPool,
    user_id: Option<i32>,
    status: Option<OrderStatus>,
) -> ServiceResult<Vec<Order>> {
    let sql = format!(
        r#"
        {ORDER_SELECT}
        WHERE ($1::INT IS NULL OR o.user_id = $1)
          AND ($2::TEXT IS NULL OR o.status = $2)
        ORDER BY o.created_at DESC, o.id DESC
        "#
    );
    let mut orders: Vec<Order> = sqlx::query_as(&sql)
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;
    attach_items(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> ServiceResult<Option<Order>> {
    fetch_one(pool, id).await
}

async fn fetch_one(pool: &PgPool, id: i32) -> ServiceResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.id = $1");
    let row: Option<Order> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    let Some(order) = row else {
        return Ok(None);
    };
    let mut orders = [order];
    attach_items(pool, &mut orders).await?;
    let [order] = orders;
    Ok(Some(order))
}

/// Current price of every referenced menu item, shared-locked until commit
async fn snapshot_prices(
    conn: &mut PgConnection,
    menu_item_ids: &[i32],
) -> ServiceResult<HashMap<i32, Decimal>> {
    let rows: Vec<(i32, Decimal)> =
        sqlx::query_as("SELECT id, price FROM menu_items WHERE id = ANY($1) FOR SHARE")
            .bind(menu_item_ids)
            .fetch_all(&mut *conn)
            .await?;
    Ok(rows.into_iter().collect())
}

/// Place an order. Status starts at `pending`; prices and total come from
/// the menu, not from the payload.
pub async fn create(pool: &PgPool, data: &OrderCreate) -> ServiceResult<Order> {
    let mut tx = pool.begin().await?;

    if !row_exists(&mut *tx, Entity::User, data.user_id).await? {
        return Err(AppError::reference_not_found("user_id", data.user_id).into());
    }
    match addresses::owner(&mut tx, data.address_id).await? {
        None => {
            return Err(AppError::reference_not_found("address_id", data.address_id).into());
        }
        Some(owner) if owner != data.user_id => {
            return Err(AppError::new(ErrorCode::OrderAddressMismatch)
                .with_field("address_id")
                .with_detail("address_id", data.address_id)
                .with_detail("user_id", data.user_id)
                .into());
        }
        Some(_) => {}
    }

    let ids: Vec<i32> = data.items.iter().map(|i| i.menu_item_id).collect();
    let prices = snapshot_prices(&mut tx, &ids).await?;

    let mut lines = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let Some(&price) = prices.get(&item.menu_item_id) else {
            return Err(AppError::reference_not_found("menu_item_id", item.menu_item_id).into());
        };
        if let Some(sent) = item.price_at_order
            && sent != price
        {
            tracing::debug!(
                menu_item_id = item.menu_item_id,
                sent = %sent,
                stored = %price,
                "Ignoring client price"
            );
        }
        lines.push((item.menu_item_id, item.quantity, price));
    }

    let total = order_total(lines.iter().map(|&(_, qty, price)| (qty, price)));
    if let Some(sent) = data.total_price
        && sent != total
    {
        tracing::debug!(sent = %sent, computed = %total, "Ignoring client total");
    }
    if total > MAX_MONEY {
        return Err(AppError::new(ErrorCode::ValueOutOfRange)
            .with_field("total_price")
            .with_detail("total_price", total.to_string())
            .into());
    }

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO orders (user_id, address_id, total_price, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(data.user_id)
    .bind(data.address_id)
    .bind(total)
    .bind(OrderStatus::Pending.as_str())
    .fetch_one(&mut *tx)
    .await?;

    for (menu_item_id, quantity, price) in &lines {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, menu_item_id, quantity, price_at_order)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(order_id = id, user_id = data.user_id, total = %total, lines = lines.len(), "Order placed");

    fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("order vanished after insert").into())
}

/// Move an order along its lifecycle. Returns the status it had before.
pub async fn update_status(pool: &PgPool, id: i32, next: OrderStatus) -> ServiceResult<String> {
    let mut tx = pool.begin().await?;

    let current: Option<(String,)> =
        sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((current,)) = current else {
        return Err(AppError::new(ErrorCode::OrderNotFound)
            .with_detail("id", id)
            .into());
    };

    let allowed = current
        .parse::<OrderStatus>()
        .is_ok_and(|from| from.can_transition_to(next));
    if !allowed {
        return Err(AppError::new(ErrorCode::OrderStatusTransition)
            .with_field("status")
            .with_detail("from", current.as_str())
            .with_detail("to", next.as_str())
            .into());
    }

    if current.parse::<OrderStatus>().ok() != Some(next) {
        sqlx::query(
            "UPDATE orders SET status = $1, updated_at = (NOW() AT TIME ZONE 'UTC') WHERE id = $2",
        )
        .bind(next.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(current)
}

/// Order lines cascade
pub async fn delete(pool: &PgPool, id: i32) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
