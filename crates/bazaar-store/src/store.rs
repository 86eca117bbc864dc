//! # Store Facade
//!
//! The single externally-visible object: holds the current snapshot,
//! dispatches events through the reducer, exposes read accessors and action
//! methods, and notifies subscribers on every change.
//!
//! ## Snapshot Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Ownership                             │
//! │                                                                     │
//! │  ┌────────────────────────────────────────────────────────────┐     │
//! │  │              watch::Sender<StoreState>                     │     │
//! │  │                                                            │     │
//! │  │  dispatch(event):                                          │     │
//! │  │    send_modify(|s| *s = reduce(s, event))                  │     │
//! │  │    - one atomic wholesale replacement per event            │     │
//! │  │    - every receiver is notified per replacement            │     │
//! │  └───────────────┬───────────────────────┬────────────────────┘     │
//! │                  │                       │                          │
//! │                  ▼                       ▼                          │
//! │     watch::Receiver (UI)        cart changed? ──► CartCache         │
//! │     re-renders on change        (best-effort, errors swallowed)     │
//! │                                                                     │
//! │  WRITERS: UI actions are sequential (one user action at a time);    │
//! │  async completions (login, passive session changes) each emit       │
//! │  exactly one terminal event. send_modify serializes them all.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bazaar_core::{
    build_order, reduce, validation, CategoryFilter, NewProduct, Order, Product, StoreEvent,
    StoreState,
};

use crate::cache::CartCache;
use crate::error::{CatalogError, StoreError};
use crate::provider::{CatalogSource, IdentityProvider, ProfileStore, SessionListener};
use crate::session::SessionSynchronizer;

// =============================================================================
// Dispatcher
// =============================================================================

/// Shared event sink: applies the reducer and runs the persistence bridge.
///
/// Cloned into the session synchronizer so both it and the facade feed the
/// same snapshot.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    state_tx: Arc<watch::Sender<StoreState>>,
    cache: Arc<dyn CartCache>,
}

impl Dispatcher {
    fn new(state_tx: Arc<watch::Sender<StoreState>>, cache: Arc<dyn CartCache>) -> Self {
        Dispatcher { state_tx, cache }
    }

    /// Applies one event: computes the next snapshot via the pure reducer,
    /// replaces the live snapshot atomically, and mirrors the cart to the
    /// cache when it changed.
    pub(crate) async fn dispatch(&self, event: StoreEvent) {
        let mut cart_changed = false;
        self.state_tx.send_modify(|state| {
            let next = reduce(state, event);
            cart_changed = next.cart != state.cart;
            *state = next;
        });

        if cart_changed {
            let cart = self.state_tx.borrow().cart.clone();
            // Best-effort: a failed write never blocks or fails the
            // in-memory operation.
            if let Err(err) = self.cache.store(&cart).await {
                warn!(error = %err, "cart persistence failed");
            }
        }
    }
}

// =============================================================================
// Store Builder
// =============================================================================

/// Builds a [`Store`] from its collaborators.
///
/// The catalog source, profile store, and cart cache are required at
/// construction - what used to be a runtime "must be used within a provider"
/// lookup failure is a constructor precondition here. The identity provider
/// alone is optional: its absence is the unconfigured state, and auth
/// actions short-circuit with a configuration error.
pub struct StoreBuilder {
    catalog: Arc<dyn CatalogSource>,
    profiles: Arc<dyn ProfileStore>,
    cache: Arc<dyn CartCache>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl StoreBuilder {
    /// Starts a builder with the required collaborators.
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn CartCache>,
    ) -> Self {
        StoreBuilder {
            catalog,
            profiles,
            cache,
            identity: None,
        }
    }

    /// Attaches the identity provider.
    pub fn identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Builds the store with an empty initial snapshot.
    pub fn build(self) -> Store {
        let (state_tx, _) = watch::channel(StoreState::new());
        let state_tx = Arc::new(state_tx);
        let dispatcher = Dispatcher::new(state_tx.clone(), self.cache.clone());

        let session = Arc::new(SessionSynchronizer::new(
            self.identity.clone(),
            self.profiles,
            dispatcher.clone(),
        ));

        Store {
            state_tx,
            dispatcher,
            session,
            catalog: self.catalog,
            cache: self.cache,
            identity: self.identity,
            subscription: Mutex::new(None),
            listener: Mutex::new(None),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// The storefront state container.
///
/// One instance owns one snapshot. Constructed explicitly and injected into
/// the presentation layer; never reached via ambient lookup.
pub struct Store {
    state_tx: Arc<watch::Sender<StoreState>>,
    dispatcher: Dispatcher,
    session: Arc<SessionSynchronizer>,
    catalog: Arc<dyn CatalogSource>,
    cache: Arc<dyn CartCache>,
    identity: Option<Arc<dyn IdentityProvider>>,

    /// Cancellation handle for the session-change subscription.
    /// Taken exactly once at teardown.
    subscription: Mutex<Option<crate::provider::SubscriptionGuard>>,

    /// The spawned session-listener task.
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Store {
    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Starts the store: loads the catalog, rehydrates the cart, and
    /// subscribes to session changes for the lifetime of the application.
    pub async fn start(&self) -> Result<(), CatalogError> {
        // Populate the catalog once from the collaborator
        let products = self.catalog.load_products().await?;
        info!(count = products.len(), "catalog loaded");
        self.dispatcher
            .dispatch(StoreEvent::SetProducts(products))
            .await;

        // Rehydrate the cart by REPLAYING AddToCart events, so the
        // merge-by-identity invariant applies to stored data too.
        match self.cache.load().await {
            Ok(Some(items)) => {
                info!(lines = items.len(), "rehydrating cart");
                for item in items {
                    self.dispatcher
                        .dispatch(StoreEvent::AddToCart {
                            product: item.product,
                            quantity: item.quantity,
                        })
                        .await;
                }
            }
            Ok(None) => {}
            // Best-effort: a corrupt or unreadable cache never fails startup
            Err(err) => warn!(error = %err, "cart rehydration failed"),
        }

        // Hold the passive session subscription for the process lifetime
        if let Some(identity) = self.identity.as_ref() {
            let SessionListener { mut changes, guard } = identity.subscribe_to_session_changes();

            *self.subscription.lock().expect("subscription mutex poisoned") = Some(guard);

            let session = self.session.clone();
            let handle = tokio::spawn(async move {
                while let Some(change) = changes.recv().await {
                    session.handle_session_change(change).await;
                }
                debug!("session-change channel closed");
            });
            *self.listener.lock().expect("listener mutex poisoned") = Some(handle);
        }

        Ok(())
    }

    /// Tears the store down: cancels the session subscription (exactly once,
    /// even if no event ever fired) and stops the listener task.
    ///
    /// Dropping the store without calling this still cancels the
    /// subscription through the guard's Drop.
    pub fn shutdown(&self) {
        if let Some(mut guard) = self
            .subscription
            .lock()
            .expect("subscription mutex poisoned")
            .take()
        {
            guard.cancel();
        }

        if let Some(handle) = self.listener.lock().expect("listener mutex poisoned").take() {
            handle.abort();
        }

        info!("store shut down");
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns a clone of the current snapshot.
    pub fn snapshot(&self) -> StoreState {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to snapshot changes. The receiver is notified after each
    /// wholesale replacement and always observes the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state_tx.subscribe()
    }

    /// Every product matching the filter (`All` returns the whole catalog;
    /// an unmatched category returns an empty sequence).
    pub fn products_by_category(&self, filter: CategoryFilter) -> Vec<Product> {
        self.state_tx.borrow().products_by_category(filter)
    }

    /// Looks up a product by id. `None` if absent.
    pub fn product_by_id(&self, id: &str) -> Option<Product> {
        self.state_tx.borrow().product_by_id(id).cloned()
    }

    // -------------------------------------------------------------------------
    // Session Actions
    // -------------------------------------------------------------------------

    /// Logs in. Malformed input is rejected here, before dispatch; provider
    /// failures become `state.error` data and never cross this boundary.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), StoreError> {
        validation::validate_required("email", email)?;
        validation::validate_required("password", password)?;

        self.session.login(email, password).await;
        Ok(())
    }

    /// Registers a new account and profile.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), StoreError> {
        validation::validate_required("name", name)?;
        validation::validate_required("email", email)?;
        validation::validate_required("password", password)?;

        self.session.register(name, email, password).await;
        Ok(())
    }

    /// Logs out. The local session is cleared regardless of the provider
    /// call's outcome.
    pub async fn logout(&self) {
        self.session.logout().await;
    }

    // -------------------------------------------------------------------------
    // Cart Actions
    // -------------------------------------------------------------------------

    /// Adds a product to the cart, merging by product id.
    ///
    /// Validates the quantity and the stock level (counting what is already
    /// in the cart) before dispatching; the reducer itself never clamps.
    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> Result<(), StoreError> {
        debug!(product_id = %product_id, quantity = %quantity, "add_to_cart");
        validation::validate_quantity(quantity)?;

        let (product, already_in_cart) = {
            let state = self.state_tx.borrow();
            let product = state
                .product_by_id(product_id)
                .cloned()
                .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;
            let in_cart = state.cart_line(product_id).map_or(0, |line| line.quantity);
            (product, in_cart)
        };

        validation::validate_stock(&product, already_in_cart, quantity)?;

        self.dispatcher
            .dispatch(StoreEvent::AddToCart { product, quantity })
            .await;
        Ok(())
    }

    /// Replaces the quantity of a cart line. A missing line is a no-op.
    ///
    /// Deliberately does not clamp against stock - callers request only
    /// valid quantities.
    pub async fn update_cart_item(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), StoreError> {
        debug!(product_id = %product_id, quantity = %quantity, "update_cart_item");
        validation::validate_quantity(quantity)?;

        self.dispatcher
            .dispatch(StoreEvent::UpdateCartItem {
                product_id: product_id.to_string(),
                quantity,
            })
            .await;
        Ok(())
    }

    /// Removes a cart line. A missing line is a no-op.
    pub async fn remove_from_cart(&self, product_id: &str) {
        debug!(product_id = %product_id, "remove_from_cart");
        self.dispatcher
            .dispatch(StoreEvent::RemoveFromCart(product_id.to_string()))
            .await;
    }

    /// Empties the cart.
    pub async fn clear_cart(&self) {
        debug!("clear_cart");
        self.dispatcher.dispatch(StoreEvent::ClearCart).await;
    }

    // -------------------------------------------------------------------------
    // Order Actions
    // -------------------------------------------------------------------------

    /// Creates an order from the current cart and session owner.
    ///
    /// Preconditions: non-empty cart AND an authenticated user. When either
    /// fails the call is a silent no-op (`None`) - no error is raised and no
    /// event is emitted; callers check the snapshot first if they need
    /// feedback. On success the order append and the cart clear are one
    /// atomic transition.
    pub async fn create_order(&self) -> Option<Order> {
        let (cart, user_id) = {
            let state = self.state_tx.borrow();
            let user = match state.current_user.as_ref() {
                Some(user) => user,
                None => {
                    debug!("create_order skipped: no authenticated user");
                    return None;
                }
            };
            if state.cart.is_empty() {
                debug!("create_order skipped: empty cart");
                return None;
            }
            (state.cart.clone(), user.id.clone())
        };

        let order = build_order(&cart, &user_id, Utc::now());
        info!(order_id = %order.id, total = %order.total(), "order created");

        self.dispatcher
            .dispatch(StoreEvent::CreateOrder(order.clone()))
            .await;
        Some(order)
    }

    // -------------------------------------------------------------------------
    // Admin Catalog Actions
    // -------------------------------------------------------------------------
    // Each expressed as "recompute the full product collection and set it" -
    // there is no diff/patch protocol against the catalog.

    /// Adds a product, synthesizing its id.
    pub async fn add_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        validation::validate_product_fields(&new.name, new.price_cents, new.stock_quantity)?;

        let product = new.with_id(Uuid::new_v4().to_string());
        debug!(product_id = %product.id, "add_product");

        let mut products = self.state_tx.borrow().products.clone();
        products.push(product.clone());
        self.dispatcher
            .dispatch(StoreEvent::SetProducts(products))
            .await;
        Ok(product)
    }

    /// Replaces a product in place. An unknown id leaves the catalog
    /// unchanged.
    pub async fn update_product(&self, product: Product) -> Result<(), StoreError> {
        validation::validate_product_fields(
            &product.name,
            product.price_cents,
            product.stock_quantity,
        )?;
        debug!(product_id = %product.id, "update_product");

        let products = self
            .state_tx
            .borrow()
            .products
            .iter()
            .map(|p| {
                if p.id == product.id {
                    product.clone()
                } else {
                    p.clone()
                }
            })
            .collect();
        self.dispatcher
            .dispatch(StoreEvent::SetProducts(products))
            .await;
        Ok(())
    }

    /// Deletes a product. An unknown id is a no-op.
    pub async fn delete_product(&self, product_id: &str) {
        debug!(product_id = %product_id, "delete_product");

        let products = self
            .state_tx
            .borrow()
            .products
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();
        self.dispatcher
            .dispatch(StoreEvent::SetProducts(products))
            .await;
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        // Subscription guard cancellation is handled by its own Drop; the
        // listener task must not outlive the store.
        if let Ok(mut listener) = self.listener.lock() {
            if let Some(handle) = listener.take() {
                handle.abort();
            }
        }
    }
}
