//! Order Model
//!
//! An order is the checkout snapshot of a cart: customer details, the line
//! items as they were at submission time, and the derived total.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::cart::CartLineItem;

/// Order ID type
pub type OrderId = RecordId;

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Delivery contact details captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Order model matching the `order` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    pub customer_details: CustomerDetails,
    pub items: Vec<CartLineItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Create order payload (checkout form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<CartLineItem>,
    pub total_amount: Decimal,
}
