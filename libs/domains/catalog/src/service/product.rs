use axum_helpers::UploadedFile;
use std::sync::Arc;

use super::validate;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, MainImage, NewProduct, Product, ProductFilter, ProductSlug, RenameSlug,
    SearchCriteria, SearchQuery, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::slug;
use crate::storage::MediaStorage;

/// Upper bound on `-N` suffixes tried when deriving a slug.
const MAX_SLUG_ATTEMPTS: u32 = 100;

/// Products, their slugs, search, and the main image.
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    storage: MediaStorage,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, storage: MediaStorage) -> Self {
        Self {
            repository: Arc::new(repository),
            storage,
        }
    }

    pub fn storage(&self) -> &MediaStorage {
        &self.storage
    }

    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        validate(&input)?;

        let slug = match &input.slug {
            Some(requested) => {
                if self.repository.slug_exists(requested).await? {
                    return Err(CatalogError::DuplicateSlug(requested.clone()));
                }
                requested.clone()
            }
            None => self.unique_slug(&input.name).await?,
        };

        self.repository
            .create_product(NewProduct::new(input, slug))
            .await
    }

    /// First free candidate among `base`, `base-2`, `base-3`, ...
    async fn unique_slug(&self, name: &str) -> CatalogResult<String> {
        let base = slug::slugify(name);
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = slug::candidate(&base, attempt);
            if !self.repository.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(CatalogError::DuplicateSlug(base))
    }

    pub async fn get_product(&self, id: i64) -> CatalogResult<Product> {
        self.repository
            .get_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        self.repository.list_products(filter).await
    }

    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        validate(&input)?;
        self.repository.update_product(id, input).await
    }

    /// Deletes the product and then its image files.
    pub async fn delete_product(&self, id: i64) -> CatalogResult<()> {
        let files = self
            .repository
            .delete_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        for file in &files {
            self.storage.remove(file).await;
        }
        Ok(())
    }

    /// Blank query and no filters returns every product.
    pub async fn search(&self, query: SearchQuery) -> CatalogResult<Vec<Product>> {
        let criteria = SearchCriteria::try_from(query)?;
        self.repository.search_products(criteria).await
    }

    pub async fn list_slugs(&self) -> CatalogResult<Vec<ProductSlug>> {
        self.repository.list_slugs().await
    }

    pub async fn resolve_slug(&self, slug: &str) -> CatalogResult<Product> {
        self.repository
            .get_product_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::SlugNotFound(slug.to_string()))
    }

    pub async fn rename_slug(&self, slug: &str, input: RenameSlug) -> CatalogResult<Product> {
        validate(&input)?;
        let product = self.resolve_slug(slug).await?;
        if product.slug == input.slug {
            return Ok(product);
        }
        if self.repository.slug_exists(&input.slug).await? {
            return Err(CatalogError::DuplicateSlug(input.slug));
        }

        self.repository
            .update_product(
                product.id,
                UpdateProduct {
                    slug: Some(input.slug),
                    ..Default::default()
                },
            )
            .await
    }

    pub fn main_image_of(&self, product: &Product) -> Option<MainImage> {
        product.main_image.as_ref().map(|image| MainImage {
            product_id: product.id,
            image: image.clone(),
            url: self.storage.public_url(image),
        })
    }

    pub async fn get_main_image(&self, product_id: i64) -> CatalogResult<MainImage> {
        let product = self.get_product(product_id).await?;
        self.main_image_of(&product)
            .ok_or(CatalogError::MainImageNotSet(product_id))
    }

    /// Stores `file` as the main image, replacing any previous one.
    pub async fn set_main_image(
        &self,
        product_id: i64,
        file: UploadedFile,
    ) -> CatalogResult<MainImage> {
        self.get_product(product_id).await?;
        self.store_main_image(product_id, file).await
    }

    /// Like [`set_main_image`](Self::set_main_image) but the product must
    /// already have a main image.
    pub async fn replace_main_image(
        &self,
        product_id: i64,
        file: UploadedFile,
    ) -> CatalogResult<MainImage> {
        self.get_main_image(product_id).await?;
        self.store_main_image(product_id, file).await
    }

    async fn store_main_image(
        &self,
        product_id: i64,
        file: UploadedFile,
    ) -> CatalogResult<MainImage> {
        let name = self.storage.store(&file).await?;

        match self
            .repository
            .set_main_image(product_id, Some(name.clone()))
            .await
        {
            Ok(previous) => {
                if let Some(previous) = previous {
                    self.storage.remove(&previous).await;
                }
                Ok(MainImage {
                    product_id,
                    url: self.storage.public_url(&name),
                    image: name,
                })
            }
            Err(e) => {
                self.storage.remove(&name).await;
                Err(e)
            }
        }
    }

    pub async fn clear_main_image(&self, product_id: i64) -> CatalogResult<()> {
        let previous = self
            .repository
            .set_main_image(product_id, None)
            .await?
            .ok_or(CatalogError::MainImageNotSet(product_id))?;
        self.storage.remove(&previous).await;
        Ok(())
    }
}
