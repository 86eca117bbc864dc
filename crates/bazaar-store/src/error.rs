//! # Store Error Types
//!
//! Error types for session and facade actions.
//!
//! ## Error Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Handling Policy                          │
//! │                                                                     │
//! │  Session actions (login/register/logout)                            │
//! │  ├── AuthError is captured into state.error as data                 │
//! │  ├── loading is always reset to false in a final step               │
//! │  └── no error crosses the facade boundary                           │
//! │                                                                     │
//! │  Cart/admin actions (add_to_cart, add_product, ...)                 │
//! │  └── StoreError is returned to the caller BEFORE any event is       │
//! │      dispatched (malformed input never reaches the reducer)         │
//! │                                                                     │
//! │  Persistence bridge                                                 │
//! │  └── CacheError is logged and swallowed - best-effort only          │
//! │                                                                     │
//! │  The reducer itself never fails.                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bazaar_core::ValidationError;

// =============================================================================
// Auth Error
// =============================================================================

/// Session action failures.
///
/// ## Design Principles
/// - Each variant maps to a distinct user-facing situation: a missing
///   profile is surfaced differently from a bad password so the UI can
///   offer re-registration
/// - Provider transport messages pass through verbatim
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No identity provider was configured. All auth actions short-circuit
    /// with this before attempting any network call.
    #[error("Identity provider is not configured")]
    NotConfigured,

    /// The provider rejected the credentials.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authenticated, but no profile record exists for the user.
    /// Distinct from a credential failure so the UI can offer
    /// re-registration.
    #[error("No profile found for user {0}")]
    ProfileMissing(String),

    /// Network or provider failure. The message is passed through verbatim.
    #[error("{0}")]
    Transport(String),
}

// =============================================================================
// Catalog / Cache Errors
// =============================================================================

/// The catalog collaborator could not deliver the product collection.
#[derive(Debug, Clone, Error)]
#[error("Catalog load failed: {0}")]
pub struct CatalogError(pub String);

/// The cart cache could not be read or written.
///
/// Always swallowed by the persistence bridge; surfaces only in logs.
#[derive(Debug, Clone, Error)]
#[error("Cart cache unavailable: {0}")]
pub struct CacheError(pub String);

// =============================================================================
// Store Error
// =============================================================================

/// Facade-level failures returned to the caller of cart and admin actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Input validation failure (handled before dispatch).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
