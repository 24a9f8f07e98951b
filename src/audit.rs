use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    CartAdd,
    CartRemove,
    OrderPlaced,
    OrderStatusUpdate,
    ProductUpdate,
    ProductDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::CartAdd => "cart_add",
            AuditAction::CartRemove => "cart_remove",
            AuditAction::OrderPlaced => "order_placed",
            AuditAction::OrderStatusUpdate => "order_status_update",
            AuditAction::ProductUpdate => "product_update",
            AuditAction::ProductDelete => "product_delete",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            AuditAction::UserRegister | AuditAction::UserLogin => "users",
            AuditAction::CartAdd | AuditAction::CartRemove => "cart_items",
            AuditAction::OrderPlaced | AuditAction::OrderStatusUpdate => "orders",
            AuditAction::ProductUpdate | AuditAction::ProductDelete => "products",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Audit failures are logged and swallowed; they never fail the request.
pub async fn record(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    if let Err(err) = log_audit(pool, user_id, action, Some(metadata)).await {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
