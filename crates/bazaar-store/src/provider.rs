//! # Collaborator Traits
//!
//! The external interfaces the store consumes but does not implement: the
//! identity provider, the profile store, and the catalog source.
//!
//! ## Contract Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    External Collaborators                           │
//! │                                                                     │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐   │
//! │  │ IdentityProvider │  │   ProfileStore   │  │  CatalogSource   │   │
//! │  │                  │  │                  │  │                  │   │
//! │  │ verify_creds     │  │ fetch_profile    │  │ load_products    │   │
//! │  │ create_account   │  │ create_profile   │  │ (once, startup)  │   │
//! │  │ end_session      │  │                  │  │                  │   │
//! │  │ subscribe ───────┼──┼── SessionListener│  │                  │   │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘   │
//! │                                                                     │
//! │  SESSION CHANGES:                                                   │
//! │  The provider pushes SignedIn/SignedOut notifications over an       │
//! │  mpsc channel for the lifetime of the subscription. The paired      │
//! │  SubscriptionGuard cancels exactly once - explicitly or on Drop.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use bazaar_core::Product;

use crate::error::{AuthError, CatalogError};

// =============================================================================
// Provider Session
// =============================================================================

/// The basic identity the provider returns on successful verification or
/// signup. Merged with a profile record to form a full `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSession {
    /// Identity assigned by the provider.
    pub user_id: String,

    /// Email the session was established with.
    pub email: String,
}

// =============================================================================
// Profile Record
// =============================================================================

/// A profile record keyed by provider identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Provider identity this profile belongs to.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email at registration time.
    pub email: String,

    /// Whether this user may reach the admin surface.
    pub is_admin: bool,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Session Changes
// =============================================================================

/// An asynchronous session-change notification from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// A session was established (sign in, token refresh on another tab).
    SignedIn(ProviderSession),

    /// The session ended.
    SignedOut,
}

/// A live session-change subscription.
///
/// Notifications arrive on `changes` for as long as the subscription is
/// held; dropping or cancelling `guard` releases it on the provider side.
pub struct SessionListener {
    /// Channel of session changes, in arrival order.
    pub changes: mpsc::Receiver<SessionChange>,

    /// Releases the provider-side subscription. Cancellation runs exactly
    /// once, whether invoked explicitly or by Drop.
    pub guard: SubscriptionGuard,
}

/// Cancellation handle for a session-change subscription.
///
/// The store keeps this for the lifetime of the application and guarantees
/// its cancellation runs once at teardown, even if no event ever fired.
pub struct SubscriptionGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    /// Wraps a provider-supplied cancellation closure.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        SubscriptionGuard {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A guard with nothing to release (for providers without server-side
    /// subscription state).
    pub fn noop() -> Self {
        SubscriptionGuard { cancel: None }
    }

    /// Cancels the subscription. Subsequent calls (and Drop) are no-ops.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("cancelled", &self.cancel.is_none())
            .finish()
    }
}

// =============================================================================
// Identity Provider
// =============================================================================

/// The external identity provider.
///
/// Consumed, never implemented here: only its observable contract matters.
/// All calls may fail with transport errors; there is no per-call timeout
/// in this design.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies credentials, establishing a session on success.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError>;

    /// Creates a new account, establishing a session on success.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError>;

    /// Ends the current session on the provider side.
    async fn end_session(&self) -> Result<(), AuthError>;

    /// Subscribes to session-change notifications for the lifetime of the
    /// returned listener.
    fn subscribe_to_session_changes(&self) -> SessionListener;
}

// =============================================================================
// Profile Store
// =============================================================================

/// The profile backend keyed by provider identity.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches a profile record. `Ok(None)` means authenticated-but-no-profile,
    /// which callers surface distinctly from credential failures.
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, AuthError>;

    /// Creates a profile record for a freshly signed-up identity.
    async fn create_profile(&self, record: ProfileRecord) -> Result<(), AuthError>;
}

// =============================================================================
// Catalog Source
// =============================================================================

/// Provides the initial product collection, consumed once at startup.
///
/// Administrative add/update/delete are expressed purely as "recompute the
/// full collection and set it" - there is no diff/patch protocol.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads the full product collection.
    async fn load_products(&self) -> Result<Vec<Product>, CatalogError>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscription_guard_cancels_exactly_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let mut guard = SubscriptionGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        guard.cancel();
        guard.cancel();
        drop(guard);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_guard_cancels_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        {
            let _guard = SubscriptionGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            // never cancelled explicitly, never fired an event
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_guard_is_inert() {
        let mut guard = SubscriptionGuard::noop();
        guard.cancel();
    }
}
