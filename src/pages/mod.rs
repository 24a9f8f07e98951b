//! Browser-facing routes: form posts in, HTML or redirects out.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod account;
pub mod admin;
pub mod shop;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::home))
        .route("/register", get(account::register_page).post(account::register))
        .route("/login", get(account::login_page).post(account::login))
        .route("/logout", get(account::logout).post(account::logout))
        .route("/cart", get(shop::cart))
        .route("/cart/add/{product_id}", post(shop::add_to_cart))
        .route("/cart/remove/{line_id}", post(shop::remove_from_cart))
        .route("/checkout", get(shop::checkout))
        .route("/payment", get(shop::payment_page).post(shop::pay))
        .route("/orders", get(shop::orders))
        .route("/orders/{id}", get(shop::order_detail))
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/products/{id}/edit",
            get(admin::edit_product_page).post(admin::edit_product),
        )
        .route("/admin/products/{id}/delete", post(admin::delete_product))
        .route("/admin/orders/{id}/status", post(admin::update_order_status))
}
