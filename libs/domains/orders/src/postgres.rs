use async_trait::async_trait;
use database::{BaseRepository, DbErrorKind};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;

use crate::entity::{order as orders, order_product as items};
use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrderItem, NewOrder, Order, OrderFilter, OrderItem, OrderItemFilter, UpdateOrder,
};
use crate::repository::OrderRepository;

#[derive(Clone)]
pub struct PgOrderRepository {
    orders: BaseRepository<orders::Entity>,
    items: BaseRepository<items::Entity>,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            orders: BaseRepository::new(db.clone()),
            items: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.orders.db()
    }

    /// Attaches the items of every order in one query.
    async fn load_items(&self, models: Vec<orders::Model>) -> OrderResult<Vec<Order>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();

        if !ids.is_empty() {
            let rows = items::Entity::find()
                .filter(items::Column::OrderId.is_in(ids))
                .order_by_asc(items::Column::Id)
                .all(self.db())
                .await?;
            for row in rows {
                by_order.entry(row.order_id).or_default().push(row.into());
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let lines = by_order.remove(&model.id).unwrap_or_default();
                model.into_order(lines)
            })
            .collect())
    }
}

/// Maps a failed line insert to the product it was about.
fn line_error(err: DbErr, order_id: i64, product_id: i64) -> OrderError {
    match DbErrorKind::of(&err) {
        DbErrorKind::UniqueViolation => OrderError::DuplicateItem {
            order_id,
            product_id,
        },
        DbErrorKind::ForeignKeyViolation => {
            OrderError::InvalidReference(format!("Product {} does not exist", product_id))
        }
        _ => OrderError::Database(err),
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, input: NewOrder) -> OrderResult<Order> {
        let txn = self.db().begin().await?;

        let order = orders::ActiveModel::from(&input)
            .insert(&txn)
            .await
            .map_err(|e| match DbErrorKind::of(&e) {
                DbErrorKind::ForeignKeyViolation => OrderError::InvalidReference(format!(
                    "User {} does not exist",
                    input.user_id.unwrap_or_default()
                )),
                _ => OrderError::Database(e),
            })?;

        let mut lines = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let row = items::ActiveModel {
                id: NotSet,
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
            }
            .insert(&txn)
            .await
            .map_err(|e| line_error(e, order.id, line.product_id))?;
            lines.push(row.into());
        }

        // Dropping the transaction on an early return rolls it back.
        txn.commit().await?;

        tracing::info!(order_id = order.id, items = lines.len(), "Created order");
        Ok(order.into_order(lines))
    }

    async fn get_order(&self, id: i64) -> OrderResult<Option<Order>> {
        let Some(model) = self.orders.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.load_items(vec![model]).await?.pop())
    }

    async fn list_orders(&self, filter: OrderFilter) -> OrderResult<Vec<Order>> {
        let mut query = orders::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(orders::Column::Status.eq(status));
        }

        let models = query
            .order_by_asc(orders::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db())
            .await?;
        self.load_items(models).await
    }

    async fn update_order(&self, id: i64, update: UpdateOrder) -> OrderResult<Order> {
        let model = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        let mut active_model: orders::ActiveModel = model.into();
        if let Some(v) = update.name {
            active_model.name = Set(v);
        }
        if let Some(v) = update.lastname {
            active_model.lastname = Set(v);
        }
        if let Some(v) = update.email {
            active_model.email = Set(v);
        }
        if let Some(v) = update.phone {
            active_model.phone = Set(v);
        }
        if update.company.is_some() {
            active_model.company = Set(update.company);
        }
        if let Some(v) = update.address {
            active_model.address = Set(v);
        }
        if update.apartment.is_some() {
            active_model.apartment = Set(update.apartment);
        }
        if let Some(v) = update.postal_code {
            active_model.postal_code = Set(v);
        }
        if let Some(v) = update.city {
            active_model.city = Set(v);
        }
        if let Some(v) = update.country {
            active_model.country = Set(v);
        }
        if update.notice.is_some() {
            active_model.notice = Set(update.notice);
        }
        if let Some(v) = update.status {
            active_model.status = Set(v);
        }
        if let Some(v) = update.total {
            active_model.total = Set(v);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let model = self.orders.update(active_model).await?;

        tracing::info!(order_id = id, "Updated order");
        self.load_items(vec![model])
            .await?
            .pop()
            .ok_or(OrderError::OrderNotFound(id))
    }

    async fn delete_order(&self, id: i64) -> OrderResult<bool> {
        let deleted = self.orders.delete_by_id(id).await?;
        if deleted {
            tracing::info!(order_id = id, "Deleted order");
        }
        Ok(deleted)
    }

    async fn create_item(&self, input: CreateOrderItem) -> OrderResult<OrderItem> {
        if self.orders.find_by_id(input.order_id).await?.is_none() {
            return Err(OrderError::InvalidReference(format!(
                "Order {} does not exist",
                input.order_id
            )));
        }

        let model = self
            .items
            .insert(items::ActiveModel {
                id: NotSet,
                order_id: Set(input.order_id),
                product_id: Set(input.product_id),
                quantity: Set(input.quantity),
            })
            .await
            .map_err(|e| line_error(e, input.order_id, input.product_id))?;

        tracing::info!(item_id = model.id, order_id = model.order_id, "Created order item");
        Ok(model.into())
    }

    async fn get_item(&self, id: i64) -> OrderResult<Option<OrderItem>> {
        Ok(self.items.find_by_id(id).await?.map(Into::into))
    }

    async fn list_items(&self, filter: OrderItemFilter) -> OrderResult<Vec<OrderItem>> {
        let mut query = items::Entity::find();
        if let Some(order_id) = filter.order_id {
            query = query.filter(items::Column::OrderId.eq(order_id));
        }

        let models = query
            .order_by_asc(items::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_item_quantity(&self, id: i64, quantity: i32) -> OrderResult<OrderItem> {
        let model = self
            .items
            .find_by_id(id)
            .await?
            .ok_or(OrderError::ItemNotFound(id))?;

        let mut active_model: items::ActiveModel = model.into();
        active_model.quantity = Set(quantity);
        let model = self.items.update(active_model).await?;

        tracing::info!(item_id = id, quantity, "Updated order item");
        Ok(model.into())
    }

    async fn delete_item(&self, id: i64) -> OrderResult<bool> {
        let deleted = self.items.delete_by_id(id).await?;
        if deleted {
            tracing::info!(item_id = id, "Deleted order item");
        }
        Ok(deleted)
    }
}
