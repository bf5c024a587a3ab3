//! Integration tests for the category repository.
//!
//! Exercises `CategoryRepo` against a real database:
//! - Create, list, update and delete
//! - Unique name constraint
//! - Delete protection while products reference the category

use rust_decimal::Decimal;
use sqlx::PgPool;
use stockroom_db::models::category::{CreateCategory, UpdateCategory};
use stockroom_db::models::product::CreateProduct;
use stockroom_db::repositories::{CategoryRepo, ProductRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: None,
    }
}

fn new_product(category_id: i64, name: &str) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        quantity: 5,
        unit_price: Decimal::new(250, 2),
        category_id,
    }
}

fn db_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_category(pool: PgPool) {
    let input = CreateCategory {
        name: "Dough".to_string(),
        description: Some("Raw dough bases".to_string()),
    };
    let created = CategoryRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.name, "Dough");
    assert_eq!(created.description.as_deref(), Some("Raw dough bases"));

    let found = CategoryRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("category should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "Dough");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_categories_ordered_by_name(pool: PgPool) {
    CategoryRepo::create(&pool, &new_category("Sauces")).await.unwrap();
    CategoryRepo::create(&pool, &new_category("Fillings")).await.unwrap();
    CategoryRepo::create(&pool, &new_category("Dough")).await.unwrap();

    let names: Vec<String> = CategoryRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Dough", "Fillings", "Sauces"]);

    let options = CategoryRepo::list_options(&pool).await.unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].name, "Dough");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_category(pool: PgPool) {
    let created = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Old".to_string(),
            description: Some("keep me".to_string()),
        },
    )
    .await
    .unwrap();

    let renamed = CategoryRepo::update(
        &pool,
        created.id,
        &UpdateCategory {
            name: Some("New".to_string()),
            description: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "New");
    assert_eq!(renamed.description.as_deref(), Some("keep me"));

    let cleared = CategoryRepo::update(
        &pool,
        created.id,
        &UpdateCategory {
            name: None,
            description: Some(String::new()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.name, "New");
    assert_eq!(cleared.description, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_category_returns_none(pool: PgPool) {
    let result = CategoryRepo::update(&pool, 999_999, &UpdateCategory::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_category_name_rejected(pool: PgPool) {
    CategoryRepo::create(&pool, &new_category("Dough")).await.unwrap();
    let err = CategoryRepo::create(&pool, &new_category("Dough"))
        .await
        .unwrap_err();
    assert_eq!(db_error_code(&err).as_deref(), Some("23505"));
}

// ---------------------------------------------------------------------------
// Delete protection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_unreferenced_category(pool: PgPool) {
    let created = CategoryRepo::create(&pool, &new_category("Empty")).await.unwrap();

    assert!(CategoryRepo::delete(&pool, created.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, created.id).await.unwrap().is_none());

    // Second delete finds nothing.
    assert!(!CategoryRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_referenced_category_fails_and_changes_nothing(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Fillings")).await.unwrap();
    let product = ProductRepo::create(&pool, &new_product(category.id, "Cheese mix"))
        .await
        .unwrap();
    assert_eq!(CategoryRepo::count_products(&pool, category.id).await.unwrap(), 1);

    let err = CategoryRepo::delete(&pool, category.id).await.unwrap_err();
    assert_eq!(db_error_code(&err).as_deref(), Some("23503"));

    let still_there = CategoryRepo::find_by_id(&pool, category.id).await.unwrap();
    assert!(still_there.is_some());
    let product_after = ProductRepo::find_by_id(&pool, product.id)
        .await
        .unwrap()
        .expect("product should be untouched");
    assert_eq!(product_after.quantity, 5);
    assert_eq!(product_after.category_id, category.id);

    // Once the product is gone the category can be deleted.
    assert!(ProductRepo::delete(&pool, product.id).await.unwrap());
    assert!(CategoryRepo::delete(&pool, category.id).await.unwrap());
}
