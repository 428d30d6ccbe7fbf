//! Error and retry helpers shared by the connectors.

pub mod error;
pub mod retry;

#[cfg(feature = "postgres")]
pub use error::DbErrorKind;
pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry_with_backoff};
