//! Users Domain
//!
//! User accounts for the storefront: CRUD, lookup by email and a
//! credentials check.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Email normalization, password policy, Argon2
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← In-memory or PostgreSQL
//! └─────────────┘
//! ```
//!
//! Passwords are optional (accounts created at checkout have none) and
//! only ever stored as Argon2 PHC strings. [`UserResponse`] is the only
//! shape that leaves the crate over HTTP and it carries no hash.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{
    CreateUser, LoginRequest, NewUser, UpdateUser, User, UserChanges, UserFilter, UserResponse,
    UserRole,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
