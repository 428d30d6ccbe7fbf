use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrderItem, NewOrder, Order, OrderFilter, OrderItem, OrderItemFilter, UpdateOrder,
};

/// Persistence for orders and their line items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores the order and all of its lines, or nothing at all.
    async fn create_order(&self, input: NewOrder) -> OrderResult<Order>;

    async fn get_order(&self, id: i64) -> OrderResult<Option<Order>>;

    /// Ordered by id, each with its items
    async fn list_orders(&self, filter: OrderFilter) -> OrderResult<Vec<Order>>;

    async fn update_order(&self, id: i64, update: UpdateOrder) -> OrderResult<Order>;

    /// Removes the order together with its items.
    async fn delete_order(&self, id: i64) -> OrderResult<bool>;

    /// Fails with `InvalidReference` for an unknown order and
    /// `DuplicateItem` when the product is already on the order.
    async fn create_item(&self, input: CreateOrderItem) -> OrderResult<OrderItem>;

    async fn get_item(&self, id: i64) -> OrderResult<Option<OrderItem>>;

    /// Ordered by id
    async fn list_items(&self, filter: OrderItemFilter) -> OrderResult<Vec<OrderItem>>;

    async fn update_item_quantity(&self, id: i64, quantity: i32) -> OrderResult<OrderItem>;

    async fn delete_item(&self, id: i64) -> OrderResult<bool>;
}

#[derive(Debug, Default)]
struct OrderState {
    /// Stored with empty `items`; lines live in `items` below.
    orders: BTreeMap<i64, Order>,
    items: BTreeMap<i64, OrderItem>,
    last_order_id: i64,
    last_item_id: i64,
}

impl OrderState {
    fn with_items(&self, order: &Order) -> Order {
        let mut order = order.clone();
        order.items = self
            .items
            .values()
            .filter(|item| item.order_id == order.id)
            .cloned()
            .collect();
        order
    }

    fn has_item(&self, order_id: i64, product_id: i64) -> bool {
        self.items
            .values()
            .any(|item| item.order_id == order_id && item.product_id == product_id)
    }
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

fn paginate<T>(items: impl Iterator<Item = T>, limit: Option<u64>, offset: Option<u64>) -> Vec<T> {
    let items = items.skip(offset.unwrap_or(0) as usize);
    match limit {
        Some(limit) => items.take(limit as usize).collect(),
        None => items.collect(),
    }
}

/// In-memory order store. Product and user references are not checked
/// here; PostgreSQL enforces them with foreign keys.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<OrderState>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, input: NewOrder) -> OrderResult<Order> {
        let mut state = self.state.write().await;

        // Check every line before writing anything.
        for (index, line) in input.items.iter().enumerate() {
            if line.quantity < 1 {
                return Err(OrderError::Validation(format!(
                    "Quantity for product {} must be at least 1",
                    line.product_id
                )));
            }
            if input.items[..index]
                .iter()
                .any(|earlier| earlier.product_id == line.product_id)
            {
                return Err(OrderError::Validation(format!(
                    "Product {} is listed more than once",
                    line.product_id
                )));
            }
        }

        let now = Utc::now();
        let order = Order {
            id: next_id(&mut state.last_order_id),
            user_id: input.user_id,
            name: input.name,
            lastname: input.lastname,
            email: input.email,
            phone: input.phone,
            company: input.company,
            address: input.address,
            apartment: input.apartment,
            postal_code: input.postal_code,
            city: input.city,
            country: input.country,
            notice: input.notice,
            status: input.status,
            total: input.total,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        };
        state.orders.insert(order.id, order.clone());

        for line in input.items {
            let item = OrderItem {
                id: next_id(&mut state.last_item_id),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
            };
            state.items.insert(item.id, item);
        }

        tracing::info!(order_id = order.id, "Created order");
        Ok(state.with_items(&order))
    }

    async fn get_order(&self, id: i64) -> OrderResult<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).map(|order| state.with_items(order)))
    }

    async fn list_orders(&self, filter: OrderFilter) -> OrderResult<Vec<Order>> {
        let state = self.state.read().await;
        Ok(paginate(
            state
                .orders
                .values()
                .filter(|order| filter.matches(order))
                .map(|order| state.with_items(order)),
            filter.limit,
            filter.offset,
        ))
    }

    async fn update_order(&self, id: i64, update: UpdateOrder) -> OrderResult<Order> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(OrderError::OrderNotFound(id))?;
        order.apply(update);
        let order = order.clone();

        tracing::info!(order_id = id, "Updated order");
        Ok(state.with_items(&order))
    }

    async fn delete_order(&self, id: i64) -> OrderResult<bool> {
        let mut state = self.state.write().await;
        if state.orders.remove(&id).is_none() {
            return Ok(false);
        }
        state.items.retain(|_, item| item.order_id != id);

        tracing::info!(order_id = id, "Deleted order");
        Ok(true)
    }

    async fn create_item(&self, input: CreateOrderItem) -> OrderResult<OrderItem> {
        let mut state = self.state.write().await;

        if !state.orders.contains_key(&input.order_id) {
            return Err(OrderError::InvalidReference(format!(
                "Order {} does not exist",
                input.order_id
            )));
        }
        if state.has_item(input.order_id, input.product_id) {
            return Err(OrderError::DuplicateItem {
                order_id: input.order_id,
                product_id: input.product_id,
            });
        }

        let item = OrderItem {
            id: next_id(&mut state.last_item_id),
            order_id: input.order_id,
            product_id: input.product_id,
            quantity: input.quantity,
        };
        state.items.insert(item.id, item.clone());

        tracing::info!(item_id = item.id, order_id = item.order_id, "Created order item");
        Ok(item)
    }

    async fn get_item(&self, id: i64) -> OrderResult<Option<OrderItem>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn list_items(&self, filter: OrderItemFilter) -> OrderResult<Vec<OrderItem>> {
        let state = self.state.read().await;
        Ok(paginate(
            state
                .items
                .values()
                .filter(|item| filter.order_id.is_none_or(|id| item.order_id == id))
                .cloned(),
            filter.limit,
            filter.offset,
        ))
    }

    async fn update_item_quantity(&self, id: i64, quantity: i32) -> OrderResult<OrderItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .get_mut(&id)
            .ok_or(OrderError::ItemNotFound(id))?;
        item.quantity = quantity;

        tracing::info!(item_id = id, quantity, "Updated order item");
        Ok(item.clone())
    }

    async fn delete_item(&self, id: i64) -> OrderResult<bool> {
        let removed = self.state.write().await.items.remove(&id).is_some();
        if removed {
            tracing::info!(item_id = id, "Deleted order item");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderLine, OrderStatus};

    fn new_order(items: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            user_id: Some(1),
            name: "Jane".into(),
            lastname: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555".into(),
            company: None,
            address: "1 Main St".into(),
            apartment: None,
            postal_code: "10001".into(),
            city: "New York".into(),
            country: "US".into(),
            notice: None,
            status: OrderStatus::Pending,
            total: 10.0,
            items,
        }
    }

    fn line(product_id: i64, quantity: i32) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_order_with_items() {
        let repo = InMemoryOrderRepository::new();
        let order = repo
            .create_order(new_order(vec![line(10, 2), line(11, 1)]))
            .await
            .unwrap();

        assert_eq!(order.items.len(), 2);
        assert!(order.items.iter().all(|item| item.order_id == order.id));

        let fetched = repo.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn test_rejected_line_leaves_no_order() {
        let repo = InMemoryOrderRepository::new();
        let result = repo
            .create_order(new_order(vec![line(10, 2), line(10, 1)]))
            .await;
        assert!(matches!(result, Err(OrderError::Validation(_))));

        let result = repo.create_order(new_order(vec![line(10, 0)])).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));

        assert!(repo.list_orders(OrderFilter::default()).await.unwrap().is_empty());
        assert!(repo.list_items(OrderItemFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_rules() {
        let repo = InMemoryOrderRepository::new();
        let order = repo.create_order(new_order(vec![line(10, 1)])).await.unwrap();

        let missing_order = repo
            .create_item(CreateOrderItem {
                order_id: 99,
                product_id: 10,
                quantity: 1,
            })
            .await;
        assert!(matches!(missing_order, Err(OrderError::InvalidReference(_))));

        let duplicate = repo
            .create_item(CreateOrderItem {
                order_id: order.id,
                product_id: 10,
                quantity: 3,
            })
            .await;
        assert!(matches!(duplicate, Err(OrderError::DuplicateItem { .. })));

        let item = repo
            .create_item(CreateOrderItem {
                order_id: order.id,
                product_id: 11,
                quantity: 3,
            })
            .await
            .unwrap();
        let updated = repo.update_item_quantity(item.id, 5).await.unwrap();
        assert_eq!(updated.quantity, 5);
    }

    #[tokio::test]
    async fn test_delete_order_cascades_items() {
        let repo = InMemoryOrderRepository::new();
        let kept = repo.create_order(new_order(vec![line(1, 1)])).await.unwrap();
        let removed = repo
            .create_order(new_order(vec![line(1, 1), line(2, 1)]))
            .await
            .unwrap();

        assert!(repo.delete_order(removed.id).await.unwrap());
        assert!(!repo.delete_order(removed.id).await.unwrap());

        let items = repo.list_items(OrderItemFilter::default()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].order_id, kept.id);
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let repo = InMemoryOrderRepository::new();
        for _ in 0..3 {
            repo.create_order(new_order(vec![])).await.unwrap();
        }
        let mut guest = new_order(vec![]);
        guest.user_id = None;
        guest.status = OrderStatus::Shipped;
        repo.create_order(guest).await.unwrap();

        let mine = repo
            .list_orders(OrderFilter {
                user_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 3);

        let shipped = repo
            .list_orders(OrderFilter {
                status: Some(OrderStatus::Shipped),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(shipped.len(), 1);
        assert_eq!(shipped[0].user_id, None);

        let page = repo
            .list_orders(OrderFilter {
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.iter().map(|o| o.id).collect::<Vec<_>>(), vec![2, 3]);
    }
}
