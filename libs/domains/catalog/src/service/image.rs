use axum_helpers::UploadedFile;
use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{ImageFilter, ProductImage};
use crate::repository::ImageRepository;
use crate::storage::MediaStorage;

/// Product gallery images. Each row owns one stored file; the file is
/// written before the row and removed after it.
#[derive(Clone)]
pub struct ImageService<R: ImageRepository> {
    repository: Arc<R>,
    storage: MediaStorage,
}

impl<R: ImageRepository> ImageService<R> {
    pub fn new(repository: R, storage: MediaStorage) -> Self {
        Self {
            repository: Arc::new(repository),
            storage,
        }
    }

    fn with_url(&self, mut image: ProductImage) -> ProductImage {
        image.url = self.storage.public_url(&image.image);
        image
    }

    pub async fn list_images(&self, filter: ImageFilter) -> CatalogResult<Vec<ProductImage>> {
        let images = self.repository.list_images(filter).await?;
        Ok(images.into_iter().map(|i| self.with_url(i)).collect())
    }

    pub async fn get_image(&self, id: i64) -> CatalogResult<ProductImage> {
        self.repository
            .get_image(id)
            .await?
            .map(|i| self.with_url(i))
            .ok_or(CatalogError::ImageNotFound(id))
    }

    pub async fn upload_image(
        &self,
        product_id: i64,
        file: UploadedFile,
    ) -> CatalogResult<ProductImage> {
        let name = self.storage.store(&file).await?;

        match self.repository.create_image(product_id, name.clone()).await {
            Ok(image) => Ok(self.with_url(image)),
            Err(e) => {
                self.storage.remove(&name).await;
                Err(e)
            }
        }
    }

    pub async fn replace_image(&self, id: i64, file: UploadedFile) -> CatalogResult<ProductImage> {
        // Fail fast on unknown ids before writing anything to disk.
        self.get_image(id).await?;
        let name = self.storage.store(&file).await?;

        match self.repository.replace_image(id, name.clone()).await {
            Ok((image, previous)) => {
                self.storage.remove(&previous).await;
                Ok(self.with_url(image))
            }
            Err(e) => {
                self.storage.remove(&name).await;
                Err(e)
            }
        }
    }

    pub async fn delete_image(&self, id: i64) -> CatalogResult<()> {
        let image = self
            .repository
            .delete_image(id)
            .await?
            .ok_or(CatalogError::ImageNotFound(id))?;
        self.storage.remove(&image.image).await;
        Ok(())
    }
}
