use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validate_not_blank;
use crate::slug::validate_slug;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unique URL-safe identifier
    pub slug: String,
    pub description: String,
    pub manufacturer: Option<String>,
    pub price: f64,
    pub in_stock: bool,
    pub category_id: Option<i64>,
    /// Stored file name of the main image
    pub main_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_in_stock() -> bool {
    true
}

/// DTO for creating a product. The slug is derived from the name when
/// omitted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 255))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub category_id: Option<i64>,
}

/// A product ready to insert: slug resolved, name trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub manufacturer: Option<String>,
    pub price: f64,
    pub in_stock: bool,
    pub category_id: Option<i64>,
}

impl NewProduct {
    pub fn new(input: CreateProduct, slug: String) -> Self {
        Self {
            name: input.name.trim().to_string(),
            slug,
            description: input.description,
            manufacturer: input.manufacturer,
            price: input.price,
            in_stock: input.in_stock,
            category_id: input.category_id,
        }
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
    pub category_id: Option<i64>,
}

impl Product {
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(manufacturer) = update.manufacturer {
            self.manufacturer = Some(manufacturer);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(in_stock) = update.in_stock {
            self.in_stock = in_stock;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        self.updated_at = Utc::now();
    }
}

/// Query filters for listing products. Without filters every product is
/// returned, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub in_stock: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if self.category_id.is_some() && product.category_id != self.category_id {
            return false;
        }
        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }
        true
    }
}

/// A product's slug binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSlug {
    pub slug: String,
    pub product_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RenameSlug {
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}
