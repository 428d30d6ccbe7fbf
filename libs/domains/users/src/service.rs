use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, LoginRequest, NewUser, UpdateUser, UserChanges, UserFilter, UserResponse,
    normalize_email,
};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        validate(&input)?;

        let password_hash = input
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let user = self
            .repository
            .create_user(NewUser {
                name: input.name.trim().to_string(),
                email: normalize_email(&input.email),
                password_hash,
                role: input.role.unwrap_or_default(),
            })
            .await?;
        Ok(user.into())
    }

    pub async fn get_user(&self, id: i64) -> UserResult<UserResponse> {
        self.repository
            .get_user(id)
            .await?
            .map(Into::into)
            .ok_or(UserError::NotFound(id))
    }

    /// Case-insensitive lookup
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<UserResponse> {
        let email = normalize_email(email);
        self.repository
            .get_user_by_email(&email)
            .await?
            .map(Into::into)
            .ok_or(UserError::EmailNotFound(email))
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list_users(filter).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn update_user(&self, id: i64, input: UpdateUser) -> UserResult<UserResponse> {
        validate(&input)?;

        let changes = UserChanges {
            name: input.name.map(|name| name.trim().to_string()),
            email: input.email.as_deref().map(normalize_email),
            password_hash: input.password.as_deref().map(hash_password).transpose()?,
            role: input.role,
        };

        if changes.is_empty() {
            return self.get_user(id).await;
        }

        let user = self.repository.update_user(id, changes).await?;
        Ok(user.into())
    }

    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        if !self.repository.delete_user(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Checks an email/password pair. Unknown emails, accounts without a
    /// password and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, input: LoginRequest) -> UserResult<UserResponse> {
        validate(&input)?;

        let user = self
            .repository
            .get_user_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, hash)? {
            tracing::info!(user_id = user.id, "Rejected login");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "User logged in");
        Ok(user.into())
    }
}

fn validate<T: Validate>(input: &T) -> UserResult<()> {
    input
        .validate()
        .map_err(|e| UserError::Validation(e.to_string()))
}

// Password helpers

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
