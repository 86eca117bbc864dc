//! # Domain Types
//!
//! Core domain types for the storefront state container.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Product     │   │   CartItem    │   │     Order     │         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  id           │   │  product      │   │  id           │         │
//! │  │  price_cents  │   │  (frozen)     │   │  user_id      │         │
//! │  │  category     │   │  quantity     │   │  items        │         │
//! │  │  stock        │   │               │   │  total_cents  │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Category    │   │     User      │   │  OrderStatus  │         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  Men          │   │  id           │   │  Pending      │         │
//! │  │  Women        │   │  email        │   │  Processing   │         │
//! │  │  Kids         │   │  is_admin     │   │  Shipped      │         │
//! │  └───────────────┘   └───────────────┘   │  Delivered    │         │
//! │                                          └───────────────┘         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartItem` carries a frozen **copy** of the product, not a live link.
//! Later catalog edits never retroactively alter a cart line or a placed
//! order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category. Fixed, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Kids,
}

/// A category filter for catalog queries.
///
/// `All` is a pseudo-category: it is valid in queries but no product is
/// ever stored with it, which is why it is a separate type rather than a
/// fourth [`Category`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// Match every product.
    All,
    /// Match only products in one category.
    Only(Category),
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Owned by the catalog; immutable from the cart's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in cents (smallest currency unit, non-negative).
    pub price_cents: i64,

    /// Image reference for the presentation layer.
    pub image_url: String,

    /// Product category.
    pub category: Category,

    /// Free-text description.
    pub description: String,

    /// Current stock level (non-negative).
    pub stock_quantity: i64,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether this product matches a category filter.
    pub fn matches(&self, filter: CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => self.category == category,
        }
    }
}

/// A product as submitted by the admin surface, before an id is assigned.
///
/// The id is synthesized by the catalog action; admins never choose ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub image_url: String,
    pub category: Category,
    pub description: String,
    pub stock_quantity: i64,
}

impl NewProduct {
    /// Assigns an id, producing a full [`Product`].
    pub fn with_id(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            price_cents: self.price_cents,
            image_url: self.image_url,
            category: self.category,
            description: self.description,
            stock_quantity: self.stock_quantity,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// An authenticated user. At most one per session; `None` means anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity assigned by the identity provider.
    pub id: String,

    /// Display name from the profile record.
    pub name: String,

    /// Email from the provider session.
    pub email: String,

    /// Whether this user may reach the admin surface.
    pub is_admin: bool,
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the shopping cart.
///
/// ## Invariants (enforced by the reducer)
/// - No two lines share a product id (merge-by-identity)
/// - `quantity >= 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Frozen copy of the product at the time it was added.
    pub product: Product,

    /// Quantity in cart.
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart line, freezing a copy of the product.
    pub fn new(product: Product, quantity: i64) -> Self {
        CartItem { product, quantity }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price() * self.quantity
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The fulfilment status of an order.
///
/// Progression is linear: Pending → Processing → Shipped → Delivered.
/// No backward transition is modeled here; advancement is an administrative
/// collaborator capability, not something this core performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, not yet picked up by fulfilment.
    Pending,
    /// Being prepared.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl OrderStatus {
    /// Returns the next status in the linear progression, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
///
/// Immutable once created except for `status`, which only an administrative
/// path may advance. Items are a snapshot copy of the cart at creation time
/// and the total is computed once and frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Generated at creation (UUID v4).
    pub id: String,

    /// Owning user. Orders never exist without an authenticated owner.
    pub user_id: String,

    /// Snapshot of the cart lines at creation time.
    pub items: Vec<CartItem>,

    /// Sum of price × quantity over items, frozen at creation.
    pub total_cents: i64,

    /// Fulfilment status.
    pub status: OrderStatus,

    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the frozen total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: Category) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents: 1099,
            image_url: String::new(),
            category,
            description: String::new(),
            stock_quantity: 10,
        }
    }

    #[test]
    fn test_category_filter_all_matches_everything() {
        assert!(product("1", Category::Men).matches(CategoryFilter::All));
        assert!(product("2", Category::Kids).matches(CategoryFilter::All));
    }

    #[test]
    fn test_category_filter_only_matches_one_category() {
        let p = product("1", Category::Women);
        assert!(p.matches(CategoryFilter::Only(Category::Women)));
        assert!(!p.matches(CategoryFilter::Only(Category::Men)));
    }

    #[test]
    fn test_cart_item_line_total() {
        let item = CartItem::new(product("1", Category::Men), 3);
        assert_eq!(item.line_total().cents(), 3297);
    }

    #[test]
    fn test_order_status_linear_progression() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Processing));
        assert_eq!(OrderStatus::Processing.next(), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::Shipped.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn test_order_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Men).unwrap();
        assert_eq!(json, "\"men\"");
    }
}
