//! # In-Memory Collaborators
//!
//! In-memory implementations of the collaborator traits, used by the
//! integration tests and handy for wiring up demos. They model the
//! observable contract only; none of this is production auth.
//!
//! ## Test Levers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  In-Memory Collaborators                            │
//! │                                                                     │
//! │  InMemoryIdentityProvider                                           │
//! │  ├── with_account(email, password, user_id)   seed credentials      │
//! │  ├── push_session_change(change)              drive the passive     │
//! │  │                                            channel from a test   │
//! │  ├── cancel_count()                           assert exactly-once   │
//! │  └── fail_end_session()                       simulate sign-out     │
//! │                                               transport failure     │
//! │                                                                     │
//! │  InMemoryProfileStore                                               │
//! │  ├── with_profile(record)                     seed profiles         │
//! │  └── fail_creates()                           simulate the          │
//! │                                               signed-up-no-profile  │
//! │                                               consistency gap       │
//! │                                                                     │
//! │  StaticCatalog / InMemoryCartCache            plain value holders   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

use bazaar_core::{CartItem, Product};

use crate::cache::CartCache;
use crate::error::{AuthError, CacheError, CatalogError};
use crate::provider::{
    CatalogSource, IdentityProvider, ProfileRecord, ProfileStore, ProviderSession, SessionChange,
    SessionListener, SubscriptionGuard,
};

// =============================================================================
// Identity Provider
// =============================================================================

struct Account {
    password: String,
    user_id: String,
}

/// In-memory identity provider with test levers for the passive channel.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    listeners: Mutex<Vec<mpsc::Sender<SessionChange>>>,
    cancel_count: Arc<AtomicUsize>,
    fail_end_session: AtomicBool,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account.
    pub fn with_account(self, email: &str, password: &str, user_id: &str) -> Self {
        self.accounts.lock().expect("accounts mutex poisoned").insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user_id: user_id.to_string(),
            },
        );
        self
    }

    /// Makes `end_session` fail with a transport error.
    pub fn fail_end_session(self) -> Self {
        self.fail_end_session.store(true, Ordering::SeqCst);
        self
    }

    /// Pushes a session change to every live subscription.
    pub async fn push_session_change(&self, change: SessionChange) {
        let senders: Vec<_> = self
            .listeners
            .lock()
            .expect("listeners mutex poisoned")
            .clone();
        for tx in senders {
            let _ = tx.send(change.clone()).await;
        }
    }

    /// How many times a subscription was cancelled.
    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError> {
        let accounts = self.accounts.lock().expect("accounts mutex poisoned");
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(ProviderSession {
                user_id: account.user_id.clone(),
                email: email.to_string(),
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError> {
        let mut accounts = self.accounts.lock().expect("accounts mutex poisoned");
        if accounts.contains_key(email) {
            // Provider rejection message passes through verbatim
            return Err(AuthError::Transport("Email already in use".to_string()));
        }

        let user_id = uuid::Uuid::new_v4().to_string();
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user_id: user_id.clone(),
            },
        );
        Ok(ProviderSession {
            user_id,
            email: email.to_string(),
        })
    }

    async fn end_session(&self) -> Result<(), AuthError> {
        if self.fail_end_session.load(Ordering::SeqCst) {
            return Err(AuthError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    fn subscribe_to_session_changes(&self) -> SessionListener {
        let (tx, rx) = mpsc::channel(16);
        self.listeners
            .lock()
            .expect("listeners mutex poisoned")
            .push(tx);

        let cancel_count = self.cancel_count.clone();
        SessionListener {
            changes: rx,
            guard: SubscriptionGuard::new(move || {
                cancel_count.fetch_add(1, Ordering::SeqCst);
            }),
        }
    }
}

// =============================================================================
// Profile Store
// =============================================================================

/// In-memory profile store.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, ProfileRecord>>,
    fail_creates: AtomicBool,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile record.
    pub fn with_profile(self, user_id: &str, name: &str, email: &str, is_admin: bool) -> Self {
        self.profiles.lock().expect("profiles mutex poisoned").insert(
            user_id.to_string(),
            ProfileRecord {
                id: user_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                is_admin,
                created_at: Utc::now(),
            },
        );
        self
    }

    /// Makes `create_profile` fail, simulating the signed-up-but-no-profile
    /// consistency gap.
    pub fn fail_creates(self) -> Self {
        self.fail_creates.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, AuthError> {
        let profiles = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(profiles.get(user_id).cloned())
    }

    async fn create_profile(&self, record: ProfileRecord) -> Result<(), AuthError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AuthError::Transport("profile store unavailable".to_string()));
        }
        self.profiles
            .lock()
            .expect("profiles mutex poisoned")
            .insert(record.id.clone(), record);
        Ok(())
    }
}

// =============================================================================
// Catalog Source
// =============================================================================

/// Catalog source serving a fixed product collection.
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        StaticCatalog { products }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

// =============================================================================
// Cart Cache
// =============================================================================

/// Cart cache holding the serialized cart in memory.
#[derive(Default)]
pub struct InMemoryCartCache {
    cart: Mutex<Option<Vec<CartItem>>>,
}

impl InMemoryCartCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a previously "persisted" cart.
    pub fn with_cart(self, cart: Vec<CartItem>) -> Self {
        *self.cart.lock().expect("cart mutex poisoned") = Some(cart);
        self
    }

    /// Reads the stored value synchronously (test assertions).
    pub fn stored(&self) -> Option<Vec<CartItem>> {
        self.cart.lock().expect("cart mutex poisoned").clone()
    }
}

#[async_trait]
impl CartCache for InMemoryCartCache {
    async fn load(&self) -> Result<Option<Vec<CartItem>>, CacheError> {
        Ok(self.cart.lock().expect("cart mutex poisoned").clone())
    }

    async fn store(&self, cart: &[CartItem]) -> Result<(), CacheError> {
        *self.cart.lock().expect("cart mutex poisoned") = Some(cart.to_vec());
        Ok(())
    }
}

/// Cart cache that always fails, for exercising the best-effort policy.
#[derive(Default)]
pub struct FailingCartCache;

#[async_trait]
impl CartCache for FailingCartCache {
    async fn load(&self) -> Result<Option<Vec<CartItem>>, CacheError> {
        Err(CacheError("disk on fire".to_string()))
    }

    async fn store(&self, _cart: &[CartItem]) -> Result<(), CacheError> {
        Err(CacheError("disk on fire".to_string()))
    }
}
