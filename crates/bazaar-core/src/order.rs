//! # Order Construction
//!
//! Builds an [`Order`] from the current cart and its owner.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Order Creation                                 │
//! │                                                                     │
//! │  Cart (non-empty) + authenticated owner                             │
//! │                    │                                                │
//! │                    ▼                                                │
//! │  build_order(cart, user_id, now)                                    │
//! │    • snapshot copy of every cart line                               │
//! │    • total = Σ price_cents × quantity, in cart order, frozen        │
//! │    • id = UUID v4, status = Pending, created_at stamped             │
//! │                    │                                                │
//! │                    ▼                                                │
//! │  StoreEvent::CreateOrder(order)                                     │
//! │    reducer appends the order AND clears the cart in one transition  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The preconditions (cart non-empty, owner authenticated) belong to the
//! caller: the store facade checks them and turns a violation into a silent
//! no-op, so this builder always receives valid input.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::money::Money;
use crate::types::{CartItem, Order, OrderStatus};

/// Builds an order from a cart snapshot and its owner.
///
/// The total is an exact integer-cents sum accumulated in cart order, so
/// the same cart always produces the same total. The items are a copy; the
/// live cart is cleared separately by the `CreateOrder` transition.
pub fn build_order(cart: &[CartItem], user_id: &str, now: DateTime<Utc>) -> Order {
    let total: Money = cart.iter().map(CartItem::line_total).sum();

    Order {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        items: cart.to_vec(),
        total_cents: total.cents(),
        status: OrderStatus::Pending,
        created_at: now,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Product};

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            image_url: String::new(),
            category: Category::Men,
            description: String::new(),
            stock_quantity: 50,
        }
    }

    #[test]
    fn test_build_order_total_is_sum_of_line_totals() {
        // (A, $10.00, qty 2) + (B, $5.00, qty 1) = $25.00
        let cart = vec![
            CartItem::new(product("a", 1000), 2),
            CartItem::new(product("b", 500), 1),
        ];

        let order = build_order(&cart, "u1", Utc::now());

        assert_eq!(order.total_cents, 2500);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, "u1");
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_build_order_snapshots_cart_lines() {
        let cart = vec![CartItem::new(product("a", 1000), 2)];
        let order = build_order(&cart, "u1", Utc::now());

        // The order owns copies, not references into the live cart
        assert_eq!(order.items[0].product.id, "a");
        assert_eq!(order.items[0].quantity, 2);
    }

    #[test]
    fn test_build_order_ids_are_unique() {
        let cart = vec![CartItem::new(product("a", 1000), 1)];
        let now = Utc::now();
        let first = build_order(&cart, "u1", now);
        let second = build_order(&cart, "u1", now);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_build_order_total_is_deterministic() {
        let cart = vec![
            CartItem::new(product("a", 333), 3),
            CartItem::new(product("b", 199), 7),
        ];
        let now = Utc::now();

        let first = build_order(&cart, "u1", now);
        let second = build_order(&cart, "u1", now);

        assert_eq!(first.total_cents, second.total_cents);
        assert_eq!(first.total_cents, 333 * 3 + 199 * 7);
    }
}
