//! HTTP surface of the catalog. Each submodule owns one route prefix and
//! its OpenAPI document.

pub mod categories;
pub mod images;
pub mod main_image;
pub mod products;
pub mod search;
pub mod slugs;
pub mod storefront;
