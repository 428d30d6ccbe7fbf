mod category;
mod image;
mod product;

pub use category::CategoryService;
pub use image::ImageService;
pub use product::ProductService;

use crate::error::CatalogError;
use validator::Validate;

fn validate<T: Validate>(input: &T) -> Result<(), CatalogError> {
    input
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))
}
