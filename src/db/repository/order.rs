//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{CustomerDetails, Order, OrderCreate, OrderStatus};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            // `order` needs escaping, it collides with the ORDER keyword
            .query("SELECT * FROM `order` ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Create an order from a checkout submission; always starts pending
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation("Cart is empty".to_string()));
        }

        let order = Order {
            id: None,
            customer_details: CustomerDetails {
                name: data.name,
                email: data.email,
                phone: data.phone,
                address: data.address,
            },
            items: data.items,
            total_amount: data.total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update order status (admin)
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let rid = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $rid MERGE { status: $status }")
            .bind(("rid", rid))
            .bind(("status", status))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLineItem;
    use crate::db::connect_memory;
    use rust_decimal::Decimal;

    fn line(id: i64, price: i64, qty: u32) -> CartLineItem {
        CartLineItem {
            id,
            name: format!("Item {}", id),
            unit_price: Decimal::new(price, 2),
            image: None,
            quantity: qty,
        }
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let db = connect_memory().await.unwrap();
        let repo = OrderRepository::new(db);

        let err = repo
            .create(OrderCreate {
                name: "A".into(),
                email: "a@example.com".into(),
                phone: "0600000000".into(),
                address: "1 rue de la Paix".into(),
                items: vec![],
                total_amount: Decimal::ZERO,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn checkout_creates_pending_order_with_items() {
        let db = connect_memory().await.unwrap();
        let repo = OrderRepository::new(db);

        let created = repo
            .create(OrderCreate {
                name: "A".into(),
                email: "a@example.com".into(),
                phone: "0600000000".into(),
                address: "1 rue de la Paix".into(),
                items: vec![line(1, 1250, 2), line(2, 800, 1)],
                total_amount: Decimal::new(3300, 2),
            })
            .await
            .unwrap();

        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(created.items.len(), 2);

        let id = created.id.unwrap().to_string();
        let confirmed = repo.update_status(&id, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
    }
}
