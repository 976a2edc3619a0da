//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

/// How many featured items the landing page shows
const FEATURED_LIMIT: usize = 3;

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items (admin listing, includes unavailable)
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY category, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find available items for the public menu
    pub async fn find_available(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE is_available = true ORDER BY category, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Featured items for the landing page
    pub async fn find_featured(&self) -> RepoResult<Vec<MenuItem>> {
        let featured_limit = FEATURED_LIMIT;
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE is_featured = true AND is_available = true ORDER BY name LIMIT $limit")
            .bind(("limit", featured_limit))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let rid = parse_record_id(TABLE, id)?;
        let item: Option<MenuItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// Find menu item by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<MenuItem>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                data.name
            )));
        }
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation("Price must not be negative".into()));
        }

        let item = MenuItem {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            image: data.image,
            is_available: data.is_available.unwrap_or(true),
            is_featured: data.is_featured.unwrap_or(false),
            created_at: Utc::now(),
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                new_name
            )));
        }
        if let Some(price) = data.price
            && price < Decimal::ZERO
        {
            return Err(RepoError::Validation("Price must not be negative".into()));
        }

        #[derive(Serialize)]
        struct MenuItemUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<Decimal>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_available: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_featured: Option<bool>,
        }

        let update_data = MenuItemUpdateDb {
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            image: data.image,
            is_available: data.is_available,
            is_featured: data.is_featured,
        };

        let rid = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $rid MERGE $data")
            .bind(("rid", rid.clone()))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
