use std::sync::Arc;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrder, CreateOrderItem, Order, OrderFilter, OrderItem, OrderItemFilter, UpdateOrder,
    UpdateOrderItem,
};
use crate::repository::OrderRepository;

fn validate<T: Validate>(input: &T) -> OrderResult<()> {
    input
        .validate()
        .map_err(|e| OrderError::Validation(e.to_string()))
}

/// Orders and their line items
#[derive(Clone)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_order(&self, input: CreateOrder) -> OrderResult<Order> {
        input
            .check()
            .map_err(|e| OrderError::Validation(e.to_string()))?;
        self.repository.create_order(input.into()).await
    }

    pub async fn get_order(&self, id: i64) -> OrderResult<Order> {
        self.repository
            .get_order(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> OrderResult<Vec<Order>> {
        self.repository.list_orders(filter).await
    }

    /// An empty update reports the order unchanged.
    pub async fn update_order(&self, id: i64, input: UpdateOrder) -> OrderResult<Order> {
        validate(&input)?;
        if input.is_empty() {
            return self.get_order(id).await;
        }
        self.repository.update_order(id, input.normalized()).await
    }

    pub async fn delete_order(&self, id: i64) -> OrderResult<()> {
        if !self.repository.delete_order(id).await? {
            return Err(OrderError::OrderNotFound(id));
        }
        Ok(())
    }

    pub async fn add_item(&self, input: CreateOrderItem) -> OrderResult<OrderItem> {
        validate(&input)?;
        self.repository.create_item(input).await
    }

    pub async fn get_item(&self, id: i64) -> OrderResult<OrderItem> {
        self.repository
            .get_item(id)
            .await?
            .ok_or(OrderError::ItemNotFound(id))
    }

    pub async fn list_items(&self, filter: OrderItemFilter) -> OrderResult<Vec<OrderItem>> {
        self.repository.list_items(filter).await
    }

    pub async fn update_item(&self, id: i64, input: UpdateOrderItem) -> OrderResult<OrderItem> {
        validate(&input)?;
        self.repository.update_item_quantity(id, input.quantity).await
    }

    pub async fn remove_item(&self, id: i64) -> OrderResult<()> {
        if !self.repository.delete_item(id).await? {
            return Err(OrderError::ItemNotFound(id));
        }
        Ok(())
    }
}
