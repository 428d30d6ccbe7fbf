use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::{PgCatalogRepository, constraint_error, images};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{ImageFilter, ProductImage};
use crate::repository::ImageRepository;

#[async_trait]
impl ImageRepository for PgCatalogRepository {
    async fn create_image(&self, product_id: i64, image: String) -> CatalogResult<ProductImage> {
        let active_model = images::ActiveModel {
            id: NotSet,
            product_id: Set(product_id),
            image: Set(image),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = self.images.insert(active_model).await.map_err(|e| {
            constraint_error(
                e,
                || CatalogError::Internal("unexpected unique violation on product_images".into()),
                || CatalogError::ProductNotFound(product_id),
            )
        })?;

        tracing::info!(image_id = model.id, product_id, "Created product image");
        Ok(model.into())
    }

    async fn get_image(&self, id: i64) -> CatalogResult<Option<ProductImage>> {
        Ok(self.images.find_by_id(id).await?.map(Into::into))
    }

    async fn list_images(&self, filter: ImageFilter) -> CatalogResult<Vec<ProductImage>> {
        let mut query = images::Entity::find();

        if let Some(product_id) = filter.product_id {
            query = query.filter(images::Column::ProductId.eq(product_id));
        }

        let models = query
            .order_by_asc(images::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn replace_image(
        &self,
        id: i64,
        image: String,
    ) -> CatalogResult<(ProductImage, String)> {
        let model = self
            .images
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ImageNotFound(id))?;
        let previous = model.image.clone();

        let mut active_model: images::ActiveModel = model.into();
        active_model.image = Set(image);
        let model = self.images.update(active_model).await?;

        tracing::info!(image_id = id, "Replaced product image");
        Ok((model.into(), previous))
    }

    async fn delete_image(&self, id: i64) -> CatalogResult<Option<ProductImage>> {
        let Some(model) = self.images.find_by_id(id).await? else {
            return Ok(None);
        };

        if !self.images.delete_by_id(id).await? {
            return Ok(None);
        }

        tracing::info!(image_id = id, "Deleted product image");
        Ok(Some(model.into()))
    }
}
