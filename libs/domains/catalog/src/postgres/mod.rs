//! PostgreSQL catalog store.

mod category;
mod image;
mod product;

use database::{BaseRepository, DbErrorKind};
use sea_orm::{DatabaseConnection, DbErr};

use crate::entity::{category as categories, product as products, product_image as images};
use crate::error::CatalogError;

#[derive(Clone)]
pub struct PgCatalogRepository {
    categories: BaseRepository<categories::Entity>,
    products: BaseRepository<products::Entity>,
    images: BaseRepository<images::Entity>,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: BaseRepository::new(db.clone()),
            products: BaseRepository::new(db.clone()),
            images: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.products.db()
    }
}

/// Turns constraint violations into domain errors; anything else stays a
/// database error.
fn constraint_error(
    err: DbErr,
    on_unique: impl FnOnce() -> CatalogError,
    on_foreign_key: impl FnOnce() -> CatalogError,
) -> CatalogError {
    match DbErrorKind::of(&err) {
        DbErrorKind::UniqueViolation => on_unique(),
        DbErrorKind::ForeignKeyViolation => on_foreign_key(),
        _ => CatalogError::Database(err),
    }
}

/// Escapes LIKE metacharacters; Postgres uses `\` as the default escape.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
