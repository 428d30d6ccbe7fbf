//! Application state management

use domain_catalog::{
    CategoryRepository, CategoryService, ImageRepository, ImageService, MediaStorage,
    PgCatalogRepository, ProductRepository, ProductService,
};
use domain_orders::{OrderRepository, OrderService, PgOrderRepository};
use domain_users::{PgUserRepository, UserRepository, UserService};
use domain_wishlist::{PgWishlistRepository, WishlistRepository, WishlistService};
use sea_orm::DatabaseConnection;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}

impl AppState {
    /// Services backed by PostgreSQL
    pub fn services(
        &self,
    ) -> Services<PgCatalogRepository, PgUserRepository, PgOrderRepository, PgWishlistRepository>
    {
        Services::new(
            PgCatalogRepository::new(self.db.clone()),
            PgUserRepository::new(self.db.clone()),
            PgOrderRepository::new(self.db.clone()),
            PgWishlistRepository::new(self.db.clone()),
            MediaStorage::new(self.config.storage.clone()),
        )
    }
}

/// One service per domain. Generic over the stores so the same routes run on
/// PostgreSQL in production and on the in-memory stores in tests.
#[derive(Clone)]
pub struct Services<C, U, O, W>
where
    C: CategoryRepository + ProductRepository + ImageRepository + Clone,
    U: UserRepository,
    O: OrderRepository,
    W: WishlistRepository,
{
    pub categories: CategoryService<C>,
    pub products: ProductService<C>,
    pub images: ImageService<C>,
    pub users: UserService<U>,
    pub orders: OrderService<O>,
    pub wishlist: WishlistService<W>,
}

impl<C, U, O, W> Services<C, U, O, W>
where
    C: CategoryRepository + ProductRepository + ImageRepository + Clone,
    U: UserRepository,
    O: OrderRepository,
    W: WishlistRepository,
{
    pub fn new(catalog: C, users: U, orders: O, wishlist: W, storage: MediaStorage) -> Self {
        Self {
            categories: CategoryService::new(catalog.clone()),
            products: ProductService::new(catalog.clone(), storage.clone()),
            images: ImageService::new(catalog, storage),
            users: UserService::new(users),
            orders: OrderService::new(orders),
            wishlist: WishlistService::new(wishlist),
        }
    }

    pub fn storage(&self) -> &MediaStorage {
        self.products.storage()
    }
}
