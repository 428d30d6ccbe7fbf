//! Catalog Domain
//!
//! Categories, products and everything hanging off a product: its slug,
//! its gallery images, its main image. Also owns product search and the
//! server-rendered storefront page.
//!
//! ```text
//! handlers ──► CategoryService / ProductService / ImageService
//!                    │                      │
//!                    ▼                      ▼
//!     Category/Product/ImageRepository   MediaStorage (uploaded files)
//!         ├─ InMemoryCatalog
//!         └─ PgCatalogRepository
//! ```
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers, CategoryService, InMemoryCatalog, MediaStorage, StorageConfig,
//! };
//!
//! let catalog = InMemoryCatalog::new();
//! let storage = MediaStorage::new(StorageConfig::default());
//! let categories = handlers::categories::router(CategoryService::new(catalog.clone()));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod slug;
pub mod storage;

pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalog;
pub use models::{
    Category, CategoryFilter, CategoryRef, CreateCategory, CreateProduct, ImageFilter, MainImage,
    NewProduct, PriceRange, Product, ProductFilter, ProductImage, ProductSlug, RenameSlug,
    SearchCriteria, SearchQuery, UpdateCategory, UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CategoryRepository, ImageRepository, ProductRepository};
pub use service::{CategoryService, ImageService, ProductService};
pub use storage::{MediaStorage, StorageConfig};
