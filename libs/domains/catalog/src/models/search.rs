use serde::Deserialize;
use std::str::FromStr;
use utoipa::IntoParams;

use super::Product;
use crate::error::CatalogError;

/// `GET /api/search` parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the name or description
    pub query: Option<String>,
    /// Category id, or category name (case-insensitive)
    pub category: Option<String>,
    /// Inclusive `low-high` price bounds, e.g. `10-99.5`
    #[serde(rename = "priceRange")]
    pub price_range: Option<String>,
}

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (low, high) = raw
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Price range '{}' must look like low-high", raw))?;

        let bound = |s: &str| -> Result<f64, String> {
            let value: f64 = s
                .trim()
                .parse()
                .map_err(|_| format!("Invalid price bound '{}' in '{}'", s.trim(), raw))?;
            if !value.is_finite() || value < 0.0 {
                return Err(format!("Price bounds must be non-negative, got '{}'", raw));
            }
            Ok(value)
        };

        let (min, max) = (bound(low)?, bound(high)?);
        if min > max {
            return Err(format!("Price range '{}' has low > high", raw));
        }
        Ok(Self { min, max })
    }
}

/// How a search names its category
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryRef {
    Id(i64),
    Name(String),
}

impl CategoryRef {
    /// Numeric input is an id, anything else a name. Blank input is no filter.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<i64>() {
            Ok(id) => CategoryRef::Id(id),
            Err(_) => CategoryRef::Name(raw.to_string()),
        })
    }
}

/// Parsed, normalized search. An empty criteria matches every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Lowercased needle
    pub text: Option<String>,
    pub category: Option<CategoryRef>,
    pub price: Option<PriceRange>,
}

impl SearchCriteria {
    pub fn matches_text(&self, product: &Product) -> bool {
        match &self.text {
            Some(needle) => {
                product.name.to_lowercase().contains(needle)
                    || product.description.to_lowercase().contains(needle)
            }
            None => true,
        }
    }

    pub fn matches_price(&self, product: &Product) -> bool {
        self.price.is_none_or(|range| range.contains(product.price))
    }
}

impl TryFrom<SearchQuery> for SearchCriteria {
    type Error = CatalogError;

    fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
        let text = query
            .query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let category = query.category.as_deref().and_then(CategoryRef::parse);

        let price = match query.price_range.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PriceRange>().map_err(CatalogError::Validation)?),
        };

        Ok(Self {
            text,
            category,
            price,
        })
    }
}
