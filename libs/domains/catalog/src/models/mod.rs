mod category;
mod image;
mod product;
mod search;

pub use category::{Category, CategoryFilter, CreateCategory, UpdateCategory};
pub use image::{ImageFilter, ImageReplace, ImageUpload, MainImage, ProductImage};
pub use product::{CreateProduct, NewProduct, Product, ProductFilter, ProductSlug, RenameSlug, UpdateProduct};
pub use search::{CategoryRef, PriceRange, SearchCriteria, SearchQuery};

/// Rejects names made only of whitespace.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank")
            .with_message("Must contain non-whitespace characters".into()));
    }
    Ok(())
}
