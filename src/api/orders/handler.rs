//! 外带订单 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::db::repository::order::OrderRepository;
use crate::realtime::ChangeAction;
use crate::utils::validation::{FieldReport, MAX_ADDRESS_LEN, is_plausible_email};
use crate::utils::{AppResult, SubmitResult};

const RESOURCE: &str = "order";

/// 结账请求：客户信息 + 购物车 ID，菜品明细由服务端从购物车取
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub cart_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

fn validate(payload: &CheckoutRequest) -> Result<(), Vec<crate::utils::FieldError>> {
    let mut report = FieldReport::new();

    report.require("name", &payload.name, "Name is required", 200);
    report.require("phone", &payload.phone, "Phone is required", 100);
    report.require(
        "address",
        &payload.address,
        "Delivery address is required",
        MAX_ADDRESS_LEN,
    );

    if !is_plausible_email(&payload.email) {
        report.push("email", "A valid email is required");
    }

    report.finish()
}

/// POST /api/orders - 结账
///
/// 从购物车读取明细，写入订单后清空购物车。空购物车直接拒绝。
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<SubmitResult>> {
    if let Err(errors) = validate(&payload) {
        return Ok(Json(SubmitResult::invalid(errors)));
    }

    let snapshot = state.carts.view(&payload.cart_id)?;
    if snapshot.items.is_empty() {
        return Ok(Json(SubmitResult::error("Your cart is empty")));
    }

    let total_amount: Decimal = snapshot
        .items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();

    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .create(OrderCreate {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            items: snapshot.items,
            total_amount,
        })
        .await?;

    let id = order.id.as_ref().map(|i| i.to_string()).unwrap_or_default();

    // 下单成功后购物车清空
    state.carts.mutate(&payload.cart_id, |cart| cart.clear())?;

    state.broadcast_change(RESOURCE, ChangeAction::Created, &id, Some(&order));

    tracing::info!(order = %id, total = %order.total_amount, "Order placed");

    Ok(Json(SubmitResult::success(id)))
}

/// GET /admin/api/orders - 全部订单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// PUT /admin/api/orders/{id}/status - 推进订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_status(&id, payload.status).await?;

    state.broadcast_change(RESOURCE, ChangeAction::Updated, &id, Some(&order));

    Ok(Json(order))
}
