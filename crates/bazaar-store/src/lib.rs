//! # bazaar-store: The Store Facade
//!
//! The single externally-visible object of the storefront state container.
//! It holds the current snapshot, dispatches events through the pure reducer
//! in `bazaar-core`, mirrors the cart to durable local storage, keeps the
//! session consistent with an external identity provider, and notifies
//! subscribers on every change.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Store Facade Flow                            │
//! │                                                                     │
//! │  UI action (login, add_to_cart, create_order, ...)                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  async work (identity provider, profile store, catalog)             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreEvent ──► reduce ──► new snapshot (watch::Sender)             │
//! │       │                                                             │
//! │       ├──► cart changed? ──► CartCache (best-effort)                │
//! │       │                                                             │
//! │       └──► watch::Receiver subscribers re-render                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The [`Store`] facade and its builder
//! - [`session`] - Session synchronizer (login/register/logout + passive
//!   session-change subscription)
//! - [`provider`] - Collaborator traits: identity provider, profile store,
//!   catalog source
//! - [`cache`] - Persistence bridge: the cart cache trait and the JSON file
//!   implementation
//! - [`memory`] - In-memory collaborator implementations for tests and demos
//! - [`error`] - Error taxonomy for session and facade actions

pub mod cache;
pub mod error;
pub mod memory;
pub mod provider;
pub mod session;
pub mod store;

pub use cache::{CartCache, JsonFileCartCache};
pub use error::{AuthError, CacheError, CatalogError, StoreError};
pub use provider::{
    CatalogSource, IdentityProvider, ProfileRecord, ProfileStore, ProviderSession, SessionChange,
    SessionListener, SubscriptionGuard,
};
pub use store::{Store, StoreBuilder};
