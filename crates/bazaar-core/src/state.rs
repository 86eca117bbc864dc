//! # State Snapshot and Reducer
//!
//! The single authoritative representation of the storefront session, and
//! the pure transition function that computes the next snapshot from a
//! snapshot and an event.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      State Transitions                              │
//! │                                                                     │
//! │  UI action / session notification / rehydration                    │
//! │                    │                                                │
//! │                    ▼                                                │
//! │             StoreEvent (closed enum)                                │
//! │                    │                                                │
//! │                    ▼                                                │
//! │   reduce(&snapshot, event) ──► snapshot'  (wholesale replacement)   │
//! │                    │                                                │
//! │                    ▼                                                │
//! │   persistence bridge + subscribers observe snapshot'                │
//! │                                                                     │
//! │  The reducer is synchronous and side-effect-free. Interleaved       │
//! │  async completions are safe: each event only replaces specific      │
//! │  top-level fields, so last-write-wins per field.                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No two cart lines share a product id (merge-by-identity)
//! - `CreateOrder` appends the order AND clears the cart in one transition;
//!   no observer ever sees an intermediate snapshot
//! - The reducer never fails: every arm of the match produces a snapshot

use serde::{Deserialize, Serialize};

use crate::types::{CartItem, CategoryFilter, Order, Product, User};

// =============================================================================
// State Snapshot
// =============================================================================

/// The complete immutable state value at one point in time.
///
/// Exactly one live snapshot exists at a time; every transition replaces it
/// wholesale. Nothing mutates a snapshot in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// The authenticated user, or `None` for anonymous sessions.
    pub current_user: Option<User>,

    /// The product catalog (populated once at startup, replaced wholesale
    /// by administrative edits).
    pub products: Vec<Product>,

    /// The shopping cart. Ordered; unique by product id.
    pub cart: Vec<CartItem>,

    /// Orders placed during this session.
    pub orders: Vec<Order>,

    /// Whether an async action (login/register) is in flight.
    pub loading: bool,

    /// The last action error, as data. `None` when the last action succeeded.
    pub error: Option<String>,
}

impl StoreState {
    /// Creates the initial snapshot: empty collections, anonymous, idle.
    pub fn new() -> Self {
        StoreState::default()
    }

    /// Returns every product matching the filter.
    ///
    /// `CategoryFilter::All` returns the whole catalog; a category with no
    /// products returns an empty sequence.
    pub fn products_by_category(&self, filter: CategoryFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.matches(filter))
            .cloned()
            .collect()
    }

    /// Looks up a product by id. `None` if absent.
    pub fn product_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a cart line by product id. `None` if absent.
    pub fn cart_line(&self, product_id: &str) -> Option<&CartItem> {
        self.cart.iter().find(|i| i.product.id == product_id)
    }
}

// =============================================================================
// Events
// =============================================================================

/// The closed set of state transitions.
///
/// Every component of the system interacts with state exclusively by
/// emitting these events; none of them mutates a snapshot directly. The
/// reducer's match is exhaustive, so a new event kind is a compile-time
/// checked addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum StoreEvent {
    /// Replace the current user (login, logout, passive session change).
    SetUser(Option<User>),

    /// Wholesale catalog replacement (initial load and admin edits).
    SetProducts(Vec<Product>),

    /// Merge a product into the cart (new line or quantity increment).
    AddToCart { product: Product, quantity: i64 },

    /// Replace the quantity of a cart line. No-op if the line is absent.
    /// Does not clamp against stock; callers request only valid quantities.
    UpdateCartItem { product_id: String, quantity: i64 },

    /// Drop a cart line. No-op if absent.
    RemoveFromCart(String),

    /// Empty the cart.
    ClearCart,

    /// Append an order and clear the cart, atomically.
    CreateOrder(Order),

    /// Replace the loading flag.
    SetLoading(bool),

    /// Replace the last error (`None` clears it).
    SetError(Option<String>),
}

// =============================================================================
// Reducer
// =============================================================================

/// Computes the next snapshot from the current one and an event.
///
/// Pure function: no I/O, no side effects, never fails. Each event replaces
/// specific top-level fields, leaving the rest untouched.
pub fn reduce(state: &StoreState, event: StoreEvent) -> StoreState {
    match event {
        StoreEvent::SetUser(user) => StoreState {
            current_user: user,
            ..state.clone()
        },

        StoreEvent::SetProducts(products) => StoreState {
            products,
            ..state.clone()
        },

        StoreEvent::AddToCart { product, quantity } => {
            let mut cart = state.cart.clone();
            match cart.iter_mut().find(|i| i.product.id == product.id) {
                // Merge-by-identity: same product id sums quantities
                Some(line) => line.quantity += quantity,
                // New products append at the end (insertion order preserved
                // for display)
                None => cart.push(CartItem::new(product, quantity)),
            }
            StoreState {
                cart,
                ..state.clone()
            }
        }

        StoreEvent::UpdateCartItem {
            product_id,
            quantity,
        } => {
            let mut cart = state.cart.clone();
            if let Some(line) = cart.iter_mut().find(|i| i.product.id == product_id) {
                line.quantity = quantity;
            }
            StoreState {
                cart,
                ..state.clone()
            }
        }

        StoreEvent::RemoveFromCart(product_id) => {
            let mut cart = state.cart.clone();
            cart.retain(|i| i.product.id != product_id);
            StoreState {
                cart,
                ..state.clone()
            }
        }

        StoreEvent::ClearCart => StoreState {
            cart: Vec::new(),
            ..state.clone()
        },

        StoreEvent::CreateOrder(order) => {
            let mut orders = state.orders.clone();
            orders.push(order);
            // Order append and cart clear happen in the same transition:
            // no observer ever sees one without the other.
            StoreState {
                orders,
                cart: Vec::new(),
                ..state.clone()
            }
        }

        StoreEvent::SetLoading(loading) => StoreState {
            loading,
            ..state.clone()
        },

        StoreEvent::SetError(error) => StoreState {
            error,
            ..state.clone()
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::Utc;

    fn product(id: &str, price_cents: i64, category: Category) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            image_url: String::new(),
            category,
            description: String::new(),
            stock_quantity: 100,
        }
    }

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn test_add_to_cart_merges_by_product_id() {
        let state = StoreState::new();
        let p = product("1", 999, Category::Men);

        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p.clone(),
                quantity: 2,
            },
        );
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p,
                quantity: 3,
            },
        );

        // One line, quantity 5 - never two lines for the same product
        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart[0].quantity, 5);
    }

    #[test]
    fn test_add_to_cart_preserves_insertion_order() {
        let state = StoreState::new();
        let a = product("a", 100, Category::Men);
        let b = product("b", 200, Category::Women);

        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: a.clone(),
                quantity: 1,
            },
        );
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: b,
                quantity: 1,
            },
        );
        // Merging into "a" must not move it to the end
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: a,
                quantity: 1,
            },
        );

        assert_eq!(state.cart[0].product.id, "a");
        assert_eq!(state.cart[0].quantity, 2);
        assert_eq!(state.cart[1].product.id, "b");
    }

    #[test]
    fn test_update_cart_item_replaces_quantity() {
        let state = StoreState::new();
        let p = product("1", 999, Category::Men);

        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p,
                quantity: 2,
            },
        );
        let state = reduce(
            &state,
            StoreEvent::UpdateCartItem {
                product_id: "1".to_string(),
                quantity: 7,
            },
        );

        assert_eq!(state.cart[0].quantity, 7);
    }

    #[test]
    fn test_update_cart_item_missing_line_is_noop() {
        let state = StoreState::new();
        let p = product("1", 999, Category::Men);
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p,
                quantity: 2,
            },
        );

        let next = reduce(
            &state,
            StoreEvent::UpdateCartItem {
                product_id: "missing".to_string(),
                quantity: 9,
            },
        );

        assert_eq!(next, state);
    }

    #[test]
    fn test_remove_from_cart_missing_id_is_noop() {
        let state = StoreState::new();
        let p = product("1", 999, Category::Men);
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p,
                quantity: 2,
            },
        );

        let next = reduce(&state, StoreEvent::RemoveFromCart("missing".to_string()));

        // Deeply unchanged snapshot
        assert_eq!(next, state);
    }

    #[test]
    fn test_remove_from_cart_drops_matching_line() {
        let state = StoreState::new();
        let a = product("a", 100, Category::Men);
        let b = product("b", 200, Category::Women);
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: a,
                quantity: 1,
            },
        );
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: b,
                quantity: 1,
            },
        );

        let state = reduce(&state, StoreEvent::RemoveFromCart("a".to_string()));

        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart[0].product.id, "b");
    }

    #[test]
    fn test_clear_cart() {
        let state = StoreState::new();
        let p = product("1", 999, Category::Men);
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p,
                quantity: 2,
            },
        );

        let state = reduce(&state, StoreEvent::ClearCart);

        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_create_order_appends_and_clears_cart_atomically() {
        let state = StoreState::new();
        let p = product("1", 1000, Category::Men);
        let state = reduce(
            &state,
            StoreEvent::SetUser(Some(user("u1"))),
        );
        let state = reduce(
            &state,
            StoreEvent::AddToCart {
                product: p,
                quantity: 2,
            },
        );

        let order = crate::order::build_order(&state.cart, "u1", Utc::now());
        let state = reduce(&state, StoreEvent::CreateOrder(order));

        // Both effects visible in the same snapshot
        assert_eq!(state.orders.len(), 1);
        assert!(state.cart.is_empty());
        // Unrelated fields untouched
        assert!(state.current_user.is_some());
    }

    #[test]
    fn test_set_products_is_wholesale_replacement() {
        let state = StoreState::new();
        let state = reduce(
            &state,
            StoreEvent::SetProducts(vec![product("1", 100, Category::Men)]),
        );
        let state = reduce(
            &state,
            StoreEvent::SetProducts(vec![
                product("2", 200, Category::Women),
                product("3", 300, Category::Kids),
            ]),
        );

        assert_eq!(state.products.len(), 2);
        assert!(state.product_by_id("1").is_none());
    }

    #[test]
    fn test_set_user_last_write_wins() {
        // A SIGNED_OUT notification landing after a login's SetUser must
        // leave the session anonymous: each event replaces the whole field.
        let state = StoreState::new();
        let state = reduce(&state, StoreEvent::SetUser(Some(user("u1"))));
        let state = reduce(&state, StoreEvent::SetUser(None));

        assert!(state.current_user.is_none());
    }

    #[test]
    fn test_loading_and_error_fields() {
        let state = StoreState::new();
        let state = reduce(&state, StoreEvent::SetLoading(true));
        assert!(state.loading);

        let state = reduce(
            &state,
            StoreEvent::SetError(Some("Invalid email or password".to_string())),
        );
        assert_eq!(state.error.as_deref(), Some("Invalid email or password"));

        let state = reduce(&state, StoreEvent::SetError(None));
        assert!(state.error.is_none());
        // Error transitions never touch loading
        assert!(state.loading);
    }

    #[test]
    fn test_products_by_category() {
        let state = StoreState::new();
        let state = reduce(
            &state,
            StoreEvent::SetProducts(vec![
                product("1", 100, Category::Men),
                product("2", 200, Category::Women),
                product("3", 300, Category::Men),
            ]),
        );

        assert_eq!(state.products_by_category(CategoryFilter::All).len(), 3);
        assert_eq!(
            state
                .products_by_category(CategoryFilter::Only(Category::Men))
                .len(),
            2
        );
        assert!(state
            .products_by_category(CategoryFilter::Only(Category::Kids))
            .is_empty());
    }

    #[test]
    fn test_product_by_id_missing_returns_none() {
        let state = StoreState::new();
        assert!(state.product_by_id("nope").is_none());
    }
}
