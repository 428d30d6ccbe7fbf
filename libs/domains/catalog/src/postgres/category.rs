use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::{PgCatalogRepository, categories, constraint_error, escape_like};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CategoryFilter};
use crate::repository::CategoryRepository;

#[async_trait]
impl CategoryRepository for PgCatalogRepository {
    async fn create_category(&self, name: String) -> CatalogResult<Category> {
        let now = chrono::Utc::now();
        let active_model = categories::ActiveModel {
            id: NotSet,
            name: Set(name.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = self.categories.insert(active_model).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::DuplicateCategory(name.clone()),
                || CatalogError::Internal("unexpected foreign key on categories".into()),
            )
        })?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn get_category(&self, id: i64) -> CatalogResult<Option<Category>> {
        Ok(self.categories.find_by_id(id).await?.map(Into::into))
    }

    async fn find_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = categories::Entity::find()
            .filter(Expr::col(categories::Column::Name).ilike(escape_like(name)))
            .one(self.db())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_categories(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn rename_category(&self, id: i64, name: String) -> CatalogResult<Category> {
        let model = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut active_model: categories::ActiveModel = model.into();
        active_model.name = Set(name.clone());
        active_model.updated_at = Set(chrono::Utc::now().into());

        let model = self.categories.update(active_model).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::DuplicateCategory(name.clone()),
                || CatalogError::Internal("unexpected foreign key on categories".into()),
            )
        })?;

        tracing::info!(category_id = id, "Updated category");
        Ok(model.into())
    }

    async fn delete_category(&self, id: i64) -> CatalogResult<bool> {
        let deleted = self.categories.delete_by_id(id).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::Internal("unexpected unique violation on delete".into()),
                || CatalogError::CategoryInUse(id),
            )
        })?;

        if deleted {
            tracing::info!(category_id = id, "Deleted category");
        }
        Ok(deleted)
    }
}
