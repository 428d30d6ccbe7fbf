pub mod order_products;
pub mod orders;
