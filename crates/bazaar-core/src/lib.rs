//! # bazaar-core: Pure Business Logic for the Bazaar Storefront
//!
//! This crate is the **heart** of the storefront state container. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Bazaar Architecture                            │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation Layer (UI)                    │   │
//! │  │   Catalog grid ──► Cart page ──► Checkout ──► Orders        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │ actions + change notifications    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               bazaar-store (Store facade)                   │   │
//! │  │   login, add_to_cart, create_order, queries, persistence    │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │ StoreEvent                        │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │             ★ bazaar-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐  │   │
//! │  │   │  types   │  │  money   │  │  state   │  │   order   │  │   │
//! │  │   │ Product  │  │  Money   │  │ reducer  │  │  totals   │  │   │
//! │  │   │ CartItem │  │  cents   │  │ snapshot │  │  builder  │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └───────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, CartItem, Order)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`state`] - The state snapshot, the event set, and the reducer
//! - [`order`] - Order construction from a cart and an owner
//! - [`error`] - Validation error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **One live snapshot**: every transition replaces the snapshot wholesale,
//!    nothing mutates it in place. Consumers can read concurrently without
//!    locks on the value itself.
//! 2. **Closed event set**: the reducer matches exhaustively over
//!    [`state::StoreEvent`]; adding an event is a compile-time-checked change.
//! 3. **Integer Money**: all monetary values are in cents (i64) so order
//!    totals are exact and reproducible.
//! 4. **Explicit Errors**: validation failures are typed, never strings or
//!    panics. The reducer itself never fails.

pub mod error;
pub mod money;
pub mod order;
pub mod state;
pub mod types;
pub mod validation;

// Re-export the most commonly used types at crate root
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use order::build_order;
pub use state::{reduce, StoreEvent, StoreState};
pub use types::{
    CartItem, Category, CategoryFilter, NewProduct, Order, OrderStatus, Product, User,
};
