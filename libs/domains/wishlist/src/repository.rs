use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{WishlistError, WishlistResult};
use crate::models::{WishlistFilter, WishlistItem};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Fails with `Duplicate` when the product is already saved
    async fn add(&self, user_id: i64, product_id: i64) -> WishlistResult<WishlistItem>;

    async fn get(&self, user_id: i64, product_id: i64) -> WishlistResult<Option<WishlistItem>>;

    /// Ordered by id
    async fn list(&self, filter: WishlistFilter) -> WishlistResult<Vec<WishlistItem>>;

    async fn remove(&self, user_id: i64, product_id: i64) -> WishlistResult<bool>;

    /// Returns how many entries were removed.
    async fn clear(&self, user_id: i64) -> WishlistResult<u64>;
}

#[derive(Debug, Default)]
struct WishlistState {
    items: BTreeMap<i64, WishlistItem>,
    last_id: i64,
}

impl WishlistState {
    fn find(&self, user_id: i64, product_id: i64) -> Option<&WishlistItem> {
        self.items
            .values()
            .find(|item| item.user_id == user_id && item.product_id == product_id)
    }
}

/// In-memory wishlist store. Users and products are not checked here.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWishlistRepository {
    state: Arc<RwLock<WishlistState>>,
}

impl InMemoryWishlistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WishlistRepository for InMemoryWishlistRepository {
    async fn add(&self, user_id: i64, product_id: i64) -> WishlistResult<WishlistItem> {
        let mut state = self.state.write().await;
        if state.find(user_id, product_id).is_some() {
            return Err(WishlistError::Duplicate {
                user_id,
                product_id,
            });
        }

        state.last_id += 1;
        let item = WishlistItem {
            id: state.last_id,
            user_id,
            product_id,
            created_at: Utc::now(),
        };
        state.items.insert(item.id, item.clone());

        tracing::info!(user_id, product_id, "Added wishlist entry");
        Ok(item)
    }

    async fn get(&self, user_id: i64, product_id: i64) -> WishlistResult<Option<WishlistItem>> {
        Ok(self.state.read().await.find(user_id, product_id).cloned())
    }

    async fn list(&self, filter: WishlistFilter) -> WishlistResult<Vec<WishlistItem>> {
        let state = self.state.read().await;
        let items = state
            .items
            .values()
            .filter(|item| filter.user_id.is_none_or(|id| item.user_id == id))
            .skip(filter.offset.unwrap_or(0) as usize)
            .cloned();
        Ok(match filter.limit {
            Some(limit) => items.take(limit as usize).collect(),
            None => items.collect(),
        })
    }

    async fn remove(&self, user_id: i64, product_id: i64) -> WishlistResult<bool> {
        let mut state = self.state.write().await;
        let Some(id) = state.find(user_id, product_id).map(|item| item.id) else {
            return Ok(false);
        };
        state.items.remove(&id);

        tracing::info!(user_id, product_id, "Removed wishlist entry");
        Ok(true)
    }

    async fn clear(&self, user_id: i64) -> WishlistResult<u64> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|_, item| item.user_id != user_id);
        let removed = (before - state.items.len()) as u64;

        tracing::info!(user_id, removed, "Cleared wishlist");
        Ok(removed)
    }
}
