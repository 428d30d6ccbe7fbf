//! Integration tests for the PostgreSQL users repository
//!
//! Require Docker: `cargo test -p domain_users -- --ignored`

use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_user(email: String, role: UserRole) -> NewUser {
    NewUser {
        name: "Integration".to_string(),
        email,
        password_hash: None,
        role,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_get_and_lookup() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("users_create_get");

    let email = builder.email("jane");
    let created = repo
        .create_user(new_user(email.clone(), UserRole::Admin))
        .await
        .unwrap();
    assert_eq!(created.role, UserRole::Admin);

    let fetched = assert_some(repo.get_user(created.id).await.unwrap(), "user by id");
    assert_eq!(fetched.email, email);

    let by_email = assert_some(repo.get_user_by_email(&email).await.unwrap(), "user by email");
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_email_maps_to_domain_error() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("users_duplicate");

    let email = builder.email("dup");
    let first = repo.create_user(new_user(email.clone(), UserRole::User)).await.unwrap();
    assert!(matches!(
        repo.create_user(new_user(email.clone(), UserRole::User)).await,
        Err(UserError::DuplicateEmail(_))
    ));

    let other = repo
        .create_user(new_user(builder.email("other"), UserRole::User))
        .await
        .unwrap();
    let result = repo
        .update_user(
            other.id,
            UserChanges {
                email: Some(first.email.clone()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_round_trip_with_password() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("users_service");

    let email = builder.email("login");
    let user = service
        .create_user(CreateUser {
            name: "Login Test".to_string(),
            email: email.to_uppercase(),
            password: Some("Secret123".to_string()),
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(user.email, email);

    let logged_in = service
        .login(LoginRequest {
            email: email.clone(),
            password: "Secret123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    service.delete_user(user.id).await.unwrap();
    assert!(matches!(
        service.get_user(user.id).await,
        Err(UserError::NotFound(_))
    ));
}
