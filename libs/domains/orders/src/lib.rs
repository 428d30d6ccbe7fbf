//! Orders Domain
//!
//! Orders with their contact and shipping details, plus the order-product
//! line items that say which products an order holds and how many.
//!
//! An order and the items it is created with are stored together: when one
//! item is rejected, no order is left behind.
//!
//! ```rust,no_run
//! use domain_orders::{handlers, InMemoryOrderRepository, OrderService};
//!
//! let service = OrderService::new(InMemoryOrderRepository::new());
//! let orders = handlers::orders::router(service.clone());
//! let items = handlers::order_products::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    CreateOrder, CreateOrderItem, NewOrder, Order, OrderFilter, OrderItem,
    OrderItemFilter, OrderLine, OrderStatus, UpdateOrder, UpdateOrderItem,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
