//! In-memory catalog store for development and tests.
//!
//! One lock guards categories, products and images together so the
//! cross-table rules (category in use, image cascade, unique slug) are
//! checked atomically with the write they protect.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryFilter, CategoryRef, ImageFilter, NewProduct, Product, ProductFilter,
    ProductImage, ProductSlug, SearchCriteria, UpdateProduct,
};
use crate::repository::{CategoryRepository, ImageRepository, ProductRepository};

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    images: BTreeMap<i64, ProductImage>,
    last_category_id: i64,
    last_product_id: i64,
    last_image_id: i64,
}

impl CatalogState {
    fn category_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        let name = name.to_lowercase();
        self.categories
            .values()
            .any(|c| Some(c.id) != except && c.name.to_lowercase() == name)
    }

    fn slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.products
            .values()
            .any(|p| Some(p.id) != except && p.slug == slug)
    }

    fn check_category(&self, category_id: Option<i64>) -> CatalogResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(CatalogError::InvalidReference(
                format!("Category {} does not exist", id),
            )),
            _ => Ok(()),
        }
    }
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

fn paginate<T>(items: impl Iterator<Item = T>, limit: Option<u64>, offset: Option<u64>) -> Vec<T> {
    let items = items.skip(offset.unwrap_or(0) as usize);
    match limit {
        Some(limit) => items.take(limit as usize).collect(),
        None => items.collect(),
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn create_category(&self, name: String) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if state.category_name_taken(&name, None) {
            return Err(CatalogError::DuplicateCategory(name));
        }

        let now = Utc::now();
        let category = Category {
            id: next_id(&mut state.last_category_id),
            name,
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn get_category(&self, id: i64) -> CatalogResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let name = name.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .find(|c| c.name.to_lowercase() == name)
            .cloned())
    }

    async fn list_categories(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(paginate(
            state.categories.values().cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn rename_category(&self, id: i64, name: String) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&id) {
            return Err(CatalogError::CategoryNotFound(id));
        }
        if state.category_name_taken(&name, Some(id)) {
            return Err(CatalogError::DuplicateCategory(name));
        }

        let category = state
            .categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;
        category.name = name;
        category.updated_at = Utc::now();

        tracing::info!(category_id = id, "Updated category");
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> CatalogResult<bool> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&id) {
            return Ok(false);
        }
        if state.products.values().any(|p| p.category_id == Some(id)) {
            return Err(CatalogError::CategoryInUse(id));
        }

        state.categories.remove(&id);
        tracing::info!(category_id = id, "Deleted category");
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if state.slug_taken(&input.slug, None) {
            return Err(CatalogError::DuplicateSlug(input.slug));
        }
        state.check_category(input.category_id)?;

        let now = Utc::now();
        let product = Product {
            id: next_id(&mut state.last_product_id),
            name: input.name,
            slug: input.slug,
            description: input.description,
            manufacturer: input.manufacturer,
            price: input.price,
            in_stock: input.in_stock,
            category_id: input.category_id,
            main_image: None,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, slug = %product.slug, "Created product");
        Ok(product)
    }

    async fn get_product(&self, id: i64) -> CatalogResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn get_product_by_slug(&self, slug: &str) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().find(|p| p.slug == slug).cloned())
    }

    async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(paginate(
            state
                .products
                .values()
                .filter(|p| filter.matches(p))
                .cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn search_products(&self, criteria: SearchCriteria) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;

        let category_id = match &criteria.category {
            None => None,
            Some(CategoryRef::Id(id)) => Some(*id),
            Some(CategoryRef::Name(name)) => {
                let name = name.to_lowercase();
                match state
                    .categories
                    .values()
                    .find(|c| c.name.to_lowercase() == name)
                {
                    Some(category) => Some(category.id),
                    None => return Ok(Vec::new()),
                }
            }
        };

        Ok(state
            .products
            .values()
            .filter(|p| category_id.is_none() || p.category_id == category_id)
            .filter(|p| criteria.matches_text(p) && criteria.matches_price(p))
            .cloned()
            .collect())
    }

    async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.products.contains_key(&id) {
            return Err(CatalogError::ProductNotFound(id));
        }
        if let Some(slug) = &input.slug {
            if state.slug_taken(slug, Some(id)) {
                return Err(CatalogError::DuplicateSlug(slug.clone()));
            }
        }
        state.check_category(input.category_id)?;

        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.apply_update(input);

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> CatalogResult<Option<Vec<String>>> {
        let mut state = self.state.write().await;

        let Some(product) = state.products.remove(&id) else {
            return Ok(None);
        };

        let mut files: Vec<String> = product.main_image.into_iter().collect();
        state.images.retain(|_, image| {
            if image.product_id == id {
                files.push(image.image.clone());
                false
            } else {
                true
            }
        });

        tracing::info!(product_id = id, files = files.len(), "Deleted product");
        Ok(Some(files))
    }

    async fn slug_exists(&self, slug: &str) -> CatalogResult<bool> {
        Ok(self.state.read().await.slug_taken(slug, None))
    }

    async fn list_slugs(&self) -> CatalogResult<Vec<ProductSlug>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .map(|p| ProductSlug {
                slug: p.slug.clone(),
                product_id: p.id,
            })
            .collect())
    }

    async fn set_main_image(
        &self,
        id: i64,
        image: Option<String>,
    ) -> CatalogResult<Option<String>> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;

        let previous = std::mem::replace(&mut product.main_image, image);
        product.updated_at = Utc::now();

        tracing::info!(product_id = id, "Updated main image");
        Ok(previous)
    }
}

#[async_trait]
impl ImageRepository for InMemoryCatalog {
    async fn create_image(&self, product_id: i64, image: String) -> CatalogResult<ProductImage> {
        let mut state = self.state.write().await;

        if !state.products.contains_key(&product_id) {
            return Err(CatalogError::ProductNotFound(product_id));
        }

        let record = ProductImage {
            id: next_id(&mut state.last_image_id),
            product_id,
            image,
            url: String::new(),
            created_at: Utc::now(),
        };
        state.images.insert(record.id, record.clone());

        tracing::info!(image_id = record.id, product_id, "Created product image");
        Ok(record)
    }

    async fn get_image(&self, id: i64) -> CatalogResult<Option<ProductImage>> {
        Ok(self.state.read().await.images.get(&id).cloned())
    }

    async fn list_images(&self, filter: ImageFilter) -> CatalogResult<Vec<ProductImage>> {
        let state = self.state.read().await;
        Ok(paginate(
            state
                .images
                .values()
                .filter(|i| filter.product_id.is_none_or(|id| i.product_id == id))
                .cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn replace_image(
        &self,
        id: i64,
        image: String,
    ) -> CatalogResult<(ProductImage, String)> {
        let mut state = self.state.write().await;
        let record = state
            .images
            .get_mut(&id)
            .ok_or(CatalogError::ImageNotFound(id))?;

        let previous = std::mem::replace(&mut record.image, image);

        tracing::info!(image_id = id, "Replaced product image");
        Ok((record.clone(), previous))
    }

    async fn delete_image(&self, id: i64) -> CatalogResult<Option<ProductImage>> {
        let removed = self.state.write().await.images.remove(&id);
        if removed.is_some() {
            tracing::info!(image_id = id, "Deleted product image");
        }
        Ok(removed)
    }
}
