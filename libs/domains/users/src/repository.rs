use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserChanges, UserFilter};

/// Repository trait for User persistence. Emails passed in are already
/// normalized.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> UserResult<User>;

    async fn get_user(&self, id: i64) -> UserResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Ordered by id
    async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    async fn update_user(&self, id: i64, changes: UserChanges) -> UserResult<User>;

    /// Returns whether a user was removed.
    async fn delete_user(&self, id: i64) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct UserState {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

impl UserState {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<UserState>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, input: NewUser) -> UserResult<User> {
        let mut state = self.state.write().await;

        if state.email_taken(&input.email, None) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        state.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_id,
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> UserResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let state = self.state.read().await;
        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(state
            .users
            .values()
            .filter(|u| filter.matches(u))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> UserResult<User> {
        let mut state = self.state.write().await;

        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(UserError::DuplicateEmail(email.clone()));
            }
        }

        let user = state.users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.apply(changes);

        tracing::info!(user_id = id, "Updated user");
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> UserResult<bool> {
        let removed = self.state.write().await.users.remove(&id).is_some();
        if removed {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: None,
            role,
        }
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        let jane = repo.create_user(new_user("jane@example.com", UserRole::User)).await.unwrap();
        let john = repo.create_user(new_user("john@example.com", UserRole::User)).await.unwrap();

        assert!(matches!(
            repo.create_user(new_user("jane@example.com", UserRole::User)).await,
            Err(UserError::DuplicateEmail(_))
        ));

        let changes = UserChanges {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update_user(john.id, changes.clone()).await,
            Err(UserError::DuplicateEmail(_))
        ));
        // Re-saving your own email is fine.
        assert!(repo.update_user(jane.id, changes).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = InMemoryUserRepository::new();
        for i in 0..3 {
            repo.create_user(new_user(&format!("u{}@example.com", i), UserRole::User))
                .await
                .unwrap();
        }
        repo.create_user(new_user("boss@example.com", UserRole::Admin)).await.unwrap();

        let admins = repo
            .list_users(UserFilter {
                role: Some(UserRole::Admin),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "boss@example.com");

        let page = repo
            .list_users(UserFilter {
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.update_user(9, UserChanges::default()).await,
            Err(UserError::NotFound(9))
        ));
        assert!(!repo.delete_user(9).await.unwrap());
    }
}
