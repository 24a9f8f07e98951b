use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    dto::{admin::UpdateOrderStatusRequest, products::UpdateProductRequest},
    error::{AppError, PageResult},
    middleware::auth::CurrentUser,
    money::parse_price,
    services::admin_service,
    state::AppState,
    views,
};

/// Edit form fields arrive as text; the price is parsed from a decimal string.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub image: String,
}

impl TryFrom<ProductForm> for UpdateProductRequest {
    type Error = AppError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        let price = parse_price(&form.price)
            .ok_or_else(|| AppError::BadRequest("Price must be a number like 12.50".into()))?;
        Ok(UpdateProductRequest {
            name: Some(form.name),
            price: Some(price),
            image: Some(form.image),
        })
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> PageResult<Html<String>> {
    let user = current.require_admin()?;
    let dashboard = admin_service::dashboard(&state, &user).await?;
    Ok(Html(views::admin(&user, &dashboard)))
}

pub async fn edit_product_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> PageResult<Html<String>> {
    let user = current.require_admin()?;
    let product = admin_service::get_product_admin(&state, &user, id).await?;
    Ok(Html(views::edit_product(&user, &product)))
}

pub async fn edit_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Form(form): Form<ProductForm>,
) -> PageResult<Redirect> {
    let user = current.require_admin()?;
    let payload = UpdateProductRequest::try_from(form)?;
    admin_service::update_product(&state, &user, id, payload).await?;
    Ok(Redirect::to("/admin"))
}

pub async fn delete_product(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> PageResult<Redirect> {
    let user = current.require_admin()?;
    admin_service::delete_product(&state, &user, id).await?;
    Ok(Redirect::to("/admin"))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Form(form): Form<UpdateOrderStatusRequest>,
) -> PageResult<Redirect> {
    let user = current.require_admin()?;
    admin_service::update_order_status(&state, &user, id, form).await?;
    Ok(Redirect::to("/admin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_form_parses_decimal_price() {
        let form = ProductForm {
            name: "Engine Oil".into(),
            price: "9.99".into(),
            image: "oil.jpg".into(),
        };
        let payload = UpdateProductRequest::try_from(form).unwrap();
        assert_eq!(payload.price, Some(999));
        assert_eq!(payload.name.as_deref(), Some("Engine Oil"));
    }

    #[test]
    fn product_form_rejects_bad_price() {
        let form = ProductForm {
            name: "Engine Oil".into(),
            price: "free".into(),
            image: String::new(),
        };
        assert!(matches!(
            UpdateProductRequest::try_from(form),
            Err(AppError::BadRequest(_))
        ));
    }
}
