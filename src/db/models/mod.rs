//! Database Models

// Serde helpers
pub mod serde_helpers;

// Back-office
pub mod admin_user;

// Storefront
pub mod booking;
pub mod menu_item;
pub mod order;
pub mod review;

// Re-exports
pub use admin_user::{AdminUser, AdminUserCreate, AdminUserId};
pub use booking::{Booking, BookingCreate, BookingId, BookingStatus};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
pub use order::{CustomerDetails, Order, OrderCreate, OrderId, OrderStatus};
pub use review::{Review, ReviewCreate, ReviewId, ReviewStatus};
