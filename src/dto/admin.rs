use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
}
