use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Gallery image attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    /// Stored file name
    pub image: String,
    /// Public URL of the file, filled in by the service layer
    #[serde(default)]
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A product's main image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MainImage {
    pub product_id: i64,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageFilter {
    pub product_id: Option<i64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Multipart body for attaching an image to a product.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImageUpload {
    pub product_id: i64,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Multipart body carrying only the replacement file.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImageReplace {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
