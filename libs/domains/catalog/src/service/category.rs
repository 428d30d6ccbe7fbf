use std::sync::Arc;

use super::validate;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CategoryFilter, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        validate(&input)?;
        self.repository
            .create_category(input.name.trim().to_string())
            .await
    }

    pub async fn get_category(&self, id: i64) -> CatalogResult<Category> {
        self.repository
            .get_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub async fn list_categories(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>> {
        self.repository.list_categories(filter).await
    }

    /// An update without a name is a no-op that still reports the category.
    pub async fn update_category(&self, id: i64, input: UpdateCategory) -> CatalogResult<Category> {
        validate(&input)?;
        match input.name {
            Some(name) => {
                self.repository
                    .rename_category(id, name.trim().to_string())
                    .await
            }
            None => self.get_category(id).await,
        }
    }

    pub async fn delete_category(&self, id: i64) -> CatalogResult<()> {
        if !self.repository.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_create_category()
            .with(eq("Chairs".to_string()))
            .times(1)
            .returning(|name| Ok(category(1, &name)));

        let service = CategoryService::new(mock_repo);
        let created = service
            .create_category(CreateCategory {
                name: "  Chairs ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Chairs");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_before_touching_store() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_create_category().never();

        let service = CategoryService::new(mock_repo);
        let result = service
            .create_category(CreateCategory {
                name: "   ".to_string(),
            })
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_category() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_get_category().returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        let result = service.get_category(9).await;
        assert!(matches!(result, Err(CatalogError::CategoryNotFound(9))));
    }

    #[tokio::test]
    async fn test_update_without_name_returns_current() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_rename_category().never();
        mock_repo
            .expect_get_category()
            .with(eq(4))
            .returning(|id| Ok(Some(category(id, "Sofas"))));

        let service = CategoryService::new(mock_repo);
        let current = service
            .update_category(4, UpdateCategory::default())
            .await
            .unwrap();
        assert_eq!(current.name, "Sofas");
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_delete_category().returning(|_| Ok(false));

        let service = CategoryService::new(mock_repo);
        assert!(matches!(
            service.delete_category(3).await,
            Err(CatalogError::CategoryNotFound(3))
        ));
    }

    #[tokio::test]
    async fn test_delete_in_use_propagates() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_delete_category()
            .returning(|id| Err(CatalogError::CategoryInUse(id)));

        let service = CategoryService::new(mock_repo);
        assert!(matches!(
            service.delete_category(3).await,
            Err(CatalogError::CategoryInUse(3))
        ));
    }
}
