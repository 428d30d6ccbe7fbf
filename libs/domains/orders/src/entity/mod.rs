//! SeaORM entities for the order tables.

pub mod order;
pub mod order_product;
