//! Wishlist Domain
//!
//! Products a user has saved for later. An entry is identified by the
//! (user, product) pair; a product is on a user's list at most once.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{WishlistError, WishlistResult};
pub use models::{AddToWishlist, WishlistFilter, WishlistItem};
pub use postgres::PgWishlistRepository;
pub use repository::{InMemoryWishlistRepository, WishlistRepository};
pub use service::WishlistService;
