use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::{cart::CartView, orders::OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus, TOTAL_TOO_LARGE},
    money,
    response::{Meta, Paged},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service,
    state::AppState,
};

/// Order summary shown before payment: the cart lines and their total.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<CartView> {
    cart_service::view_cart(state, user).await
}

/// Turns the user's cart into a paid order in one transaction.
///
/// The cart rows are locked, each becomes an order item carrying the product's
/// current name and price, and exactly those rows are deleted before commit.
pub async fn confirm_payment(state: &AppState, user: &AuthUser) -> AppResult<OrderWithItems> {
    let txn = state.orm.begin().await?;

    let lines = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock_exclusive()
        .all(&txn)
        .await?;

    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let product_ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<Uuid, _> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut priced = Vec::with_capacity(lines.len());
    for line in &lines {
        let product = products.get(&line.product_id).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "cart line {} refers to missing product {}",
                line.id,
                line.product_id
            ))
        })?;
        priced.push((line, product));
    }

    let total = priced
        .iter()
        .try_fold(0i64, |total, (line, product)| {
            total.checked_add(money::line_total(product.price, line.quantity)?)
        })
        .ok_or_else(|| AppError::BadRequest(TOTAL_TOO_LARGE.into()))?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        total: Set(total),
        status: Set(OrderStatus::Paid.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(priced.len());
    for (line, product) in &priced {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(Some(product.id)),
            product_name: Set(product.name.clone()),
            quantity: Set(line.quantity),
            price: Set(product.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));
    }

    let line_ids: Vec<Uuid> = lines.iter().map(|line| line.id).collect();
    CartItems::delete_many()
        .filter(CartCol::Id.is_in(line_ids))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        total = order.total,
        items = items.len(),
        "order placed"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::OrderPlaced,
        serde_json::json!({ "order_id": order.id, "total": order.total }),
    )
    .await;

    Ok(OrderWithItems {
        order: Order::try_from(order)?,
        items,
    })
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: &OrderListQuery,
) -> AppResult<Paged<Order>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
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

/// One of the user's own orders with its items; other users' orders are NotFound.
pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<OrderWithItems> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = order_items(state, order.id).await?;

    Ok(OrderWithItems {
        order: Order::try_from(order)?,
        items,
    })
}

pub async fn order_items(state: &AppState, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::ProductName)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    Ok(items)
}
