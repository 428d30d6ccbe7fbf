use async_trait::async_trait;
use database::{BaseRepository, DbErrorKind};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User, UserChanges, UserFilter},
    repository::UserRepository,
};

#[derive(Clone)]
pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn map_unique(err: DbErr, email: &str) -> UserError {
    match DbErrorKind::of(&err) {
        DbErrorKind::UniqueViolation => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, input: NewUser) -> UserResult<User> {
        let email = input.email.clone();
        let model = self
            .base
            .insert(input.into())
            .await
            .map_err(|e| map_unique(e, &email))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn get_user(&self, id: i64) -> UserResult<Option<User>> {
        Ok(self.base.find_by_id(id).await?.map(Into::into))
    }

    async fn get_user_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mut query = entity::Entity::find();
        if let Some(role) = filter.role {
            query = query.filter(entity::Column::Role.eq(role));
        }

        let models = query
            .order_by_asc(entity::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.base.db())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> UserResult<User> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(email) = changes.email.clone() {
            active_model.email = Set(email);
        }
        if let Some(hash) = changes.password_hash {
            active_model.password_hash = Set(Some(hash));
        }
        if let Some(role) = changes.role {
            active_model.role = Set(role);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let model = self.base.update(active_model).await.map_err(|e| {
            map_unique(e, changes.email.as_deref().unwrap_or_default())
        })?;

        tracing::info!(user_id = id, "Updated user");
        Ok(model.into())
    }

    async fn delete_user(&self, id: i64) -> UserResult<bool> {
        let deleted = self.base.delete_by_id(id).await?;
        if deleted {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(deleted)
    }
}
