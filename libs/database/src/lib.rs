//! PostgreSQL connectivity for the storefront services.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connector, health check, [`BaseRepository`]
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`] and
//!   [`RetryConfig`]
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_with_retry(config, &RetryConfig::default()).await?;
//! postgres::run_migrations::<Migrator>(&db, "storefront").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod repository;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

#[cfg(feature = "postgres")]
pub use common::DbErrorKind;

#[cfg(feature = "postgres")]
pub use repository::BaseRepository;
