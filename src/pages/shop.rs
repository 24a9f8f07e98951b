use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use uuid::Uuid;

use crate::{
    error::PageResult,
    middleware::auth::CurrentUser,
    routes::params::{OrderListQuery, ProductQuery},
    services::{cart_service, order_service, product_service},
    state::AppState,
    views,
};

pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ProductQuery>,
) -> PageResult<Html<String>> {
    let products = product_service::list_products(&state, &query).await?;
    Ok(Html(views::home(user.as_ref(), &products, &query)))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> PageResult<Redirect> {
    let user = current.require()?;
    cart_service::add_to_cart(&state, &user, product_id).await?;
    Ok(Redirect::to("/"))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(line_id): Path<Uuid>,
) -> PageResult<Redirect> {
    let user = current.require()?;
    cart_service::remove_from_cart(&state, &user, line_id).await?;
    Ok(Redirect::to("/cart"))
}

pub async fn cart(
    State(state): State<AppState>,
    current: CurrentUser,
) -> PageResult<Html<String>> {
    let user = current.require()?;
    let view = cart_service::view_cart(&state, &user).await?;
    Ok(Html(views::cart(&user, &view)))
}

pub async fn checkout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> PageResult<Html<String>> {
    let user = current.require()?;
    let view = order_service::checkout(&state, &user).await?;
    Ok(Html(views::checkout(&user, &view)))
}

pub async fn payment_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> PageResult<Html<String>> {
    let user = current.require()?;
    let view = order_service::checkout(&state, &user).await?;
    Ok(Html(views::payment(&user, view.total)))
}

/// Simulated payment: always succeeds and places the order.
pub async fn pay(
    State(state): State<AppState>,
    current: CurrentUser,
) -> PageResult<Redirect> {
    let user = current.require()?;
    order_service::confirm_payment(&state, &user).await?;
    Ok(Redirect::to("/orders"))
}

pub async fn orders(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> PageResult<Html<String>> {
    let user = current.require()?;
    let orders = order_service::list_orders(&state, &user, &query).await?;
    Ok(Html(views::orders(&user, &orders)))
}

pub async fn order_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> PageResult<Html<String>> {
    let user = current.require()?;
    let detail = order_service::get_order(&state, &user, id).await?;
    Ok(Html(views::order_detail(&user, &detail)))
}
