//! Integration tests for the PostgreSQL catalog repository
//!
//! These use a real PostgreSQL via testcontainers, so they need Docker:
//! `cargo test -p domain_catalog -- --ignored`

use domain_catalog::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_product(name: &str, slug: &str, price: f64, category_id: Option<i64>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        slug: slug.to_string(),
        description: format!("{} description", name),
        manufacturer: None,
        price,
        in_stock: true,
        category_id,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_product() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("catalog_create_get");

    let category = repo
        .create_category(builder.name("category", "chairs"))
        .await
        .unwrap();
    let created = repo
        .create_product(new_product("Chair", &builder.slug("chair"), 100.5, Some(category.id)))
        .await
        .unwrap();

    let fetched = assert_some(repo.get_product(created.id).await.unwrap(), "product should exist");
    assert_eq!(fetched.name, "Chair");
    assert_price_eq(fetched.price, 100.5, "price");
    assert_eq!(fetched.category_id, Some(category.id));

    let by_slug = repo.get_product_by_slug(&created.slug).await.unwrap();
    assert_eq!(assert_some(by_slug, "slug lookup").id, created.id);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_constraints_map_to_domain_errors() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("catalog_constraints");

    let name = builder.name("category", "dup");
    let category = repo.create_category(name.clone()).await.unwrap();
    assert!(matches!(
        repo.create_category(name.to_uppercase()).await,
        Err(CatalogError::DuplicateCategory(_))
    ));

    let slug = builder.slug("lamp");
    repo.create_product(new_product("Lamp", &slug, 10.0, Some(category.id)))
        .await
        .unwrap();
    assert!(matches!(
        repo.create_product(new_product("Lamp 2", &slug, 10.0, None)).await,
        Err(CatalogError::DuplicateSlug(_))
    ));
    assert!(matches!(
        repo.create_product(new_product("Lamp 3", &builder.slug("lamp3"), 10.0, Some(i64::MAX)))
            .await,
        Err(CatalogError::InvalidReference(_))
    ));
    assert!(matches!(
        repo.delete_category(category.id).await,
        Err(CatalogError::CategoryInUse(_))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_partial_update_keeps_other_fields() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("catalog_update");

    let created = repo
        .create_product(new_product("Desk", &builder.slug("desk"), 200.0, None))
        .await
        .unwrap();
    let updated = repo
        .update_product(
            created.id,
            UpdateProduct {
                price: Some(150.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_price_eq(updated.price, 150.0, "price");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.slug, created.slug);
    assert!(updated.updated_at >= created.updated_at);

    assert!(matches!(
        repo.update_product(i64::MAX, UpdateProduct::default()).await,
        Err(CatalogError::ProductNotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_matches_case_insensitively() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("catalog_search");

    let category = repo
        .create_category(builder.name("category", "Seating"))
        .await
        .unwrap();
    let chair = repo
        .create_product(new_product("Rocking Chair", &builder.slug("rocking"), 120.0, Some(category.id)))
        .await
        .unwrap();
    let stool = repo
        .create_product(new_product("Stool", &builder.slug("stool"), 40.0, None))
        .await
        .unwrap();

    let found = repo
        .search_products(SearchCriteria {
            text: Some("rocking CHAIR".to_lowercase()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![chair.id]);

    let found = repo
        .search_products(SearchCriteria {
            category: Some(CategoryRef::Name(category.name.to_uppercase())),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![chair.id]);

    let found = repo
        .search_products(SearchCriteria {
            price: Some(PriceRange { min: 40.0, max: 40.0 }),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(found.iter().any(|p| p.id == stool.id));
    assert!(found.iter().all(|p| p.price == 40.0));

    // Wildcards in the query are matched literally.
    let found = repo
        .search_products(SearchCriteria {
            text: Some("%".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_product_returns_its_files() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("catalog_delete_files");

    let product = repo
        .create_product(new_product("Vase", &builder.slug("vase"), 5.0, None))
        .await
        .unwrap();
    repo.create_image(product.id, "gallery.png".to_string()).await.unwrap();
    let previous = repo
        .set_main_image(product.id, Some("main.png".to_string()))
        .await
        .unwrap();
    assert_eq!(previous, None);

    let mut files = assert_some(repo.delete_product(product.id).await.unwrap(), "deleted");
    files.sort();
    assert_eq!(files, vec!["gallery.png".to_string(), "main.png".to_string()]);

    let images = repo
        .list_images(ImageFilter {
            product_id: Some(product.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(images.is_empty());
    assert_eq!(repo.delete_product(product.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ordered_product_cannot_be_deleted() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("catalog_ordered");

    let product_id = db
        .create_test_product("Ordered", &builder.slug("ordered"), 9.99)
        .await;
    let order_id = db.create_test_order(&builder.email("buyer")).await;
    db.add_order_item(order_id, product_id, 1).await;

    assert!(matches!(
        repo.delete_product(product_id).await,
        Err(CatalogError::ProductInUse(_))
    ));
}
