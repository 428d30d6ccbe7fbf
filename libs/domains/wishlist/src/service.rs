use std::sync::Arc;
use validator::Validate;

use crate::error::{WishlistError, WishlistResult};
use crate::models::{AddToWishlist, WishlistFilter, WishlistItem};
use crate::repository::WishlistRepository;

#[derive(Clone)]
pub struct WishlistService<R: WishlistRepository> {
    repository: Arc<R>,
}

impl<R: WishlistRepository> WishlistService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn add(&self, input: AddToWishlist) -> WishlistResult<WishlistItem> {
        input
            .validate()
            .map_err(|e| WishlistError::Validation(e.to_string()))?;
        self.repository.add(input.user_id, input.product_id).await
    }

    pub async fn get(&self, user_id: i64, product_id: i64) -> WishlistResult<WishlistItem> {
        self.repository
            .get(user_id, product_id)
            .await?
            .ok_or(WishlistError::NotFound {
                user_id,
                product_id,
            })
    }

    pub async fn list(&self, filter: WishlistFilter) -> WishlistResult<Vec<WishlistItem>> {
        self.repository.list(filter).await
    }

    pub async fn list_for_user(&self, user_id: i64) -> WishlistResult<Vec<WishlistItem>> {
        self.repository.list(WishlistFilter::for_user(user_id)).await
    }

    pub async fn remove(&self, user_id: i64, product_id: i64) -> WishlistResult<()> {
        if !self.repository.remove(user_id, product_id).await? {
            return Err(WishlistError::NotFound {
                user_id,
                product_id,
            });
        }
        Ok(())
    }

    /// Clearing an empty list is not an error.
    pub async fn clear(&self, user_id: i64) -> WishlistResult<u64> {
        self.repository.clear(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockWishlistRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_add_rejects_non_positive_ids() {
        let mut mock_repo = MockWishlistRepository::new();
        mock_repo.expect_add().never();

        let service = WishlistService::new(mock_repo);
        let result = service
            .add(AddToWishlist {
                user_id: 0,
                product_id: 3,
            })
            .await;
        assert!(matches!(result, Err(WishlistError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_filters_by_user() {
        let mut mock_repo = MockWishlistRepository::new();
        mock_repo
            .expect_list()
            .with(eq(WishlistFilter::for_user(4)))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = WishlistService::new(mock_repo);
        assert!(service.list_for_user(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let mut mock_repo = MockWishlistRepository::new();
        mock_repo.expect_get().returning(|_, _| Ok(None));
        mock_repo.expect_remove().returning(|_, _| Ok(false));

        let service = WishlistService::new(mock_repo);
        assert!(matches!(
            service.get(1, 2).await,
            Err(WishlistError::NotFound {
                user_id: 1,
                product_id: 2
            })
        ));
        assert!(matches!(
            service.remove(1, 2).await,
            Err(WishlistError::NotFound { .. })
        ));
    }
}
