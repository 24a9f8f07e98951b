use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::cart::CartView,
    error::{AppError, AppResult, is_foreign_key_violation},
    middleware::auth::AuthUser,
    models::{CartItem, CartLine, cart_total},
    state::AppState,
};

pub async fn cart_lines(state: &AppState, user: &AuthUser) -> AppResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT ci.id, ci.quantity,
               p.id AS product_id, p.name, p.price, p.image
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at ASC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(lines)
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<CartView> {
    let lines = cart_lines(state, user).await?;
    let total = cart_total(&lines)?;
    Ok(CartView { lines, total })
}

/// Adds one unit: bumps an existing line or starts a new one at quantity 1.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<CartItem> {
    let cart_item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + 1
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(product_id)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        if is_foreign_key_violation(&err) {
            AppError::NotFound
        } else {
            err.into()
        }
    })?;

    tracing::debug!(
        user_id = %user.user_id,
        product_id = %product_id,
        quantity = cart_item.quantity,
        "cart line updated"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::CartAdd,
        serde_json::json!({ "product_id": product_id, "quantity": cart_item.quantity }),
    )
    .await;

    Ok(cart_item)
}

/// Removes one of the user's own cart lines by its id.
pub async fn remove_from_cart(state: &AppState, user: &AuthUser, line_id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(line_id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::CartRemove,
        serde_json::json!({ "cart_item_id": line_id }),
    )
    .await;

    Ok(())
}
