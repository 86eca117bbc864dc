//! # Persistence Bridge
//!
//! Mirrors the cart sub-state to durable local storage and rehydrates it at
//! startup.
//!
//! ## Best-Effort Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Persistence Bridge                               │
//! │                                                                     │
//! │  Every transition where cart != previously persisted value          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CartCache::store(cart)                                             │
//! │       │                                                             │
//! │       ├── Ok  → nothing to do                                       │
//! │       └── Err → tracing::warn!, swallowed                           │
//! │                                                                     │
//! │  Startup:                                                           │
//! │  CartCache::load() ──► replay each line as an AddToCart event,      │
//! │  so merge-by-identity holds for rehydrated data too.                │
//! │                                                                     │
//! │  Persistence NEVER blocks or fails the in-memory operation.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use bazaar_core::CartItem;

use crate::error::CacheError;

// =============================================================================
// Cart Cache Trait
// =============================================================================

/// Durable local cache for the cart sub-state.
///
/// Best-effort only: the store logs and swallows every failure, so
/// implementations never block or fail an in-memory operation.
#[async_trait]
pub trait CartCache: Send + Sync {
    /// Reads the previously stored cart. `Ok(None)` when nothing was stored.
    async fn load(&self) -> Result<Option<Vec<CartItem>>, CacheError>;

    /// Replaces the stored cart wholesale.
    async fn store(&self, cart: &[CartItem]) -> Result<(), CacheError>;
}

// =============================================================================
// JSON File Implementation
// =============================================================================

/// Cart cache backed by a single JSON file.
///
/// The file holds the serialized CartItem sequence; an absent file simply
/// means no cart was stored. Writes replace the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileCartCache {
    path: PathBuf,
}

impl JsonFileCartCache {
    /// Creates a cache at the given file path (e.g. `<data-dir>/cart.json`).
    /// The file is created lazily on first store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileCartCache { path: path.into() }
    }
}

#[async_trait]
impl CartCache for JsonFileCartCache {
    async fn load(&self) -> Result<Option<Vec<CartItem>>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| CacheError(e.to_string()))?;
        let cart: Vec<CartItem> =
            serde_json::from_str(&raw).map_err(|e| CacheError(e.to_string()))?;

        debug!(path = %self.path.display(), lines = cart.len(), "loaded cached cart");
        Ok(Some(cart))
    }

    async fn store(&self, cart: &[CartItem]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError(e.to_string()))?;
        }

        let raw = serde_json::to_string(cart).map_err(|e| CacheError(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| CacheError(e.to_string()))?;

        debug!(path = %self.path.display(), lines = cart.len(), "stored cart");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::{Category, Product};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents: 1099,
            image_url: String::new(),
            category: Category::Men,
            description: String::new(),
            stock_quantity: 10,
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCartCache::new(dir.path().join("cart.json"));

        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCartCache::new(dir.path().join("cart.json"));

        let cart = vec![CartItem::new(product("a"), 2), CartItem::new(product("b"), 1)];
        cache.store(&cart).await.unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded, cart);
    }

    #[tokio::test]
    async fn test_store_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCartCache::new(dir.path().join("cart.json"));

        cache.store(&[CartItem::new(product("a"), 2)]).await.unwrap();
        cache.store(&[]).await.unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "not json").unwrap();

        let cache = JsonFileCartCache::new(path);
        assert!(cache.load().await.is_err());
    }
}
