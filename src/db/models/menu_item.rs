//! Menu Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item ID type
pub type MenuItemId = RecordId;

/// Menu item model matching the `menu_item` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Menu section: starters, mains, desserts, drinks
    pub category: String,
    /// Image path under the image store (e.g. "a1b2c3.jpg")
    #[serde(default)]
    pub image: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    /// Shown in the landing page featured section
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Update menu item payload (partial)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}
