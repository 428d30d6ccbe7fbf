use async_trait::async_trait;
use database::{BaseRepository, DbErrorKind};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity;
use crate::error::{WishlistError, WishlistResult};
use crate::models::{WishlistFilter, WishlistItem};
use crate::repository::WishlistRepository;

#[derive(Clone)]
pub struct PgWishlistRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgWishlistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn pair(user_id: i64, product_id: i64) -> sea_orm::Condition {
        sea_orm::Condition::all()
            .add(entity::Column::UserId.eq(user_id))
            .add(entity::Column::ProductId.eq(product_id))
    }
}

#[async_trait]
impl WishlistRepository for PgWishlistRepository {
    async fn add(&self, user_id: i64, product_id: i64) -> WishlistResult<WishlistItem> {
        let model = self
            .base
            .insert(entity::ActiveModel {
                id: NotSet,
                user_id: Set(user_id),
                product_id: Set(product_id),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await
            .map_err(|e| match DbErrorKind::of(&e) {
                DbErrorKind::UniqueViolation => WishlistError::Duplicate {
                    user_id,
                    product_id,
                },
                DbErrorKind::ForeignKeyViolation => WishlistError::InvalidReference(format!(
                    "User {} or product {} does not exist",
                    user_id, product_id
                )),
                _ => WishlistError::Database(e),
            })?;

        tracing::info!(user_id, product_id, "Added wishlist entry");
        Ok(model.into())
    }

    async fn get(&self, user_id: i64, product_id: i64) -> WishlistResult<Option<WishlistItem>> {
        let model = entity::Entity::find()
            .filter(Self::pair(user_id, product_id))
            .one(self.base.db())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: WishlistFilter) -> WishlistResult<Vec<WishlistItem>> {
        let mut query = entity::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(entity::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_asc(entity::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.base.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn remove(&self, user_id: i64, product_id: i64) -> WishlistResult<bool> {
        let result = entity::Entity::delete_many()
            .filter(Self::pair(user_id, product_id))
            .exec(self.base.db())
            .await?;

        let removed = result.rows_affected > 0;
        if removed {
            tracing::info!(user_id, product_id, "Removed wishlist entry");
        }
        Ok(removed)
    }

    async fn clear(&self, user_id: i64) -> WishlistResult<u64> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::UserId.eq(user_id))
            .exec(self.base.db())
            .await?;

        tracing::info!(user_id, removed = result.rows_affected, "Cleared wishlist");
        Ok(result.rows_affected)
    }
}
