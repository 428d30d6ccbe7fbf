use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{
    Category, CategoryFilter, ImageFilter, NewProduct, Product, ProductFilter, ProductImage,
    ProductSlug, SearchCriteria, UpdateProduct,
};

/// Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fails with `DuplicateCategory` when the name is taken (ignoring case)
    async fn create_category(&self, name: String) -> CatalogResult<Category>;

    async fn get_category(&self, id: i64) -> CatalogResult<Option<Category>>;

    /// Case-insensitive exact match
    async fn find_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    /// Ordered by id
    async fn list_categories(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>>;

    async fn rename_category(&self, id: i64, name: String) -> CatalogResult<Category>;

    /// Fails with `CategoryInUse` while products reference the category
    async fn delete_category(&self, id: i64) -> CatalogResult<bool>;
}

/// Product persistence, including the slug and main image columns
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fails with `DuplicateSlug` or, for an unknown category,
    /// `InvalidReference`
    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product>;

    async fn get_product(&self, id: i64) -> CatalogResult<Option<Product>>;

    async fn get_product_by_slug(&self, slug: &str) -> CatalogResult<Option<Product>>;

    /// Ordered by id
    async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>>;

    /// Ordered by id. An unknown category name yields no results.
    async fn search_products(&self, criteria: SearchCriteria) -> CatalogResult<Vec<Product>>;

    async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product>;

    /// Deletes the product with its gallery rows. Returns `None` when the
    /// product doesn't exist, otherwise the stored file names it owned.
    async fn delete_product(&self, id: i64) -> CatalogResult<Option<Vec<String>>>;

    async fn slug_exists(&self, slug: &str) -> CatalogResult<bool>;

    async fn list_slugs(&self) -> CatalogResult<Vec<ProductSlug>>;

    /// Sets or clears the main image and returns the previous one.
    async fn set_main_image(&self, id: i64, image: Option<String>)
    -> CatalogResult<Option<String>>;
}

/// Gallery image persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Fails with `ProductNotFound` for an unknown product
    async fn create_image(&self, product_id: i64, image: String) -> CatalogResult<ProductImage>;

    async fn get_image(&self, id: i64) -> CatalogResult<Option<ProductImage>>;

    /// Ordered by id
    async fn list_images(&self, filter: ImageFilter) -> CatalogResult<Vec<ProductImage>>;

    /// Points the row at a new file and returns the updated row with the
    /// previous file name.
    async fn replace_image(&self, id: i64, image: String)
    -> CatalogResult<(ProductImage, String)>;

    async fn delete_image(&self, id: i64) -> CatalogResult<Option<ProductImage>>;
}
