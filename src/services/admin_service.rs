use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::{
        admin::{AdminDashboard, UpdateOrderStatusRequest},
        orders::OrderWithItems,
        products::UpdateProductRequest,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{ActiveModel as ProductActive, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus, Product},
    money::{MAX_PRICE, format_price},
    response::{Meta, Paged},
    routes::params::{OrderListQuery, SortOrder},
    services::{order_service, product_service},
    state::AppState,
};

/// All products and all orders, newest orders first.
pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<AdminDashboard> {
    ensure_admin(user)?;
    let products = product_service::all_products(state).await?;
    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(AdminDashboard { products, orders })
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: &OrderListQuery,
) -> AppResult<Paged<Order>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Paged {
        items,
        meta: Meta::new(page, limit, total),
    })
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<OrderWithItems> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = order_service::order_items(state, order.id).await?;

    Ok(OrderWithItems {
        order: Order::try_from(order)?,
        items,
    })
}

pub async fn get_product_admin(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Product> {
    ensure_admin(user)?;
    product_service::get_product(state, id).await
}

fn validate_product_update(payload: &UpdateProductRequest) -> AppResult<()> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Product name is required".into()));
        }
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("Price cannot be negative".into()));
        }
        if price > MAX_PRICE {
            return Err(AppError::BadRequest(format!(
                "Price cannot exceed {}",
                format_price(MAX_PRICE)
            )));
        }
    }
    Ok(())
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    ensure_admin(user)?;
    validate_product_update(&payload)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let old_price = existing.price;

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(image) = payload.image {
        let image = image.trim();
        active.image = Set((!image.is_empty()).then(|| image.to_string()));
    }

    let product = active.update(&state.orm).await.map_err(|err| {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            AppError::Conflict("A product with that name already exists".into())
        } else {
            err.into()
        }
    })?;

    tracing::info!(product_id = %product.id, old_price, new_price = product.price, "product updated");
    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductUpdate,
        serde_json::json!({ "product_id": product.id, "price": product.price }),
    )
    .await;

    Ok(Product::from(product))
}

pub async fn delete_product(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = %id, "product deleted");
    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductDelete,
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(())
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    ensure_admin(user)?;
    let status: OrderStatus = payload.status.parse()?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::OrderStatusUpdate,
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Order::try_from(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_update_rejects_blank_name_and_negative_price() {
        let blank = UpdateProductRequest {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(validate_product_update(&blank).is_err());

        let negative = UpdateProductRequest {
            price: Some(-1),
            ..Default::default()
        };
        assert!(validate_product_update(&negative).is_err());

        let too_expensive = UpdateProductRequest {
            price: Some(MAX_PRICE + 1),
            ..Default::default()
        };
        assert!(validate_product_update(&too_expensive).is_err());

        let ok = UpdateProductRequest {
            name: Some("Engine Oil".into()),
            price: Some(MAX_PRICE),
            image: None,
        };
        assert!(validate_product_update(&ok).is_ok());
    }
}
