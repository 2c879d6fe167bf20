// server/tests/catalog_tests.rs

mod common;

use common::{memory_state, place_order, seed_product, seed_user};
use rust_decimal::Decimal;
use stockroom::models::{NewProduct, NewUser, ProductPatch, UserPatch};
use stockroom::pipelines::{run_create_user, run_update_user};
use stockroom::services::{orders, products, users};
use stockroom::AppError;
use uuid::Uuid;

#[tokio::test]
async fn created_users_get_a_generated_uid() {
  let state = memory_state();
  let user = seed_user(&state, "Ann", "ann@example.com").await;

  assert!(Uuid::parse_str(&user.uid).is_ok());
  let by_uid = users::get_user_by_uid(&state, &user.uid).await.unwrap();
  assert_eq!(by_uid, user);
  assert_eq!(users::list_users(&state).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_email_conflicts_on_create() {
  let state = memory_state();
  seed_user(&state, "Ann", "ann@example.com").await;

  let err = run_create_user(
    &state,
    NewUser {
      name: "Other Ann".to_string(),
      email: "ann@example.com".to_string(),
    },
  )
  .await
  .unwrap_err();
  assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already in use"));
}

#[tokio::test]
async fn email_change_checks_other_users_only() {
  let state = memory_state();
  let ann = seed_user(&state, "Ann", "ann@example.com").await;
  seed_user(&state, "Bob", "bob@example.com").await;

  let err = run_update_user(
    &state,
    ann.id,
    UserPatch {
      name: None,
      email: Some("bob@example.com".to_string()),
    },
  )
  .await
  .unwrap_err();
  assert!(matches!(err, AppError::Conflict(_)));

  let renamed = run_update_user(
    &state,
    ann.id,
    UserPatch {
      name: Some("Annie".to_string()),
      email: Some("ann@example.com".to_string()),
    },
  )
  .await
  .unwrap();
  assert_eq!(renamed.name, "Annie");
  assert_eq!(renamed.email, "ann@example.com");
  assert_eq!(renamed.uid, ann.uid);

  let moved = run_update_user(
    &state,
    ann.id,
    UserPatch {
      name: None,
      email: Some("annie@example.com".to_string()),
    },
  )
  .await
  .unwrap();
  assert_eq!(moved.email, "annie@example.com");
  assert_eq!(moved.name, "Annie");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
  let state = memory_state();
  assert!(matches!(
    run_update_user(&state, 9, UserPatch::default()).await,
    Err(AppError::NotFound(_))
  ));
  assert!(matches!(users::get_user(&state, 9).await, Err(AppError::NotFound(_))));
  assert!(matches!(users::delete_user(&state, 9).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleting_a_user_keeps_their_orders() {
  let state = memory_state();
  let ann = seed_user(&state, "Ann", "ann@example.com").await;
  let product = seed_product(&state, "SKU1", 10).await;
  let order = place_order(&state, &ann.uid, product.id, 2).await.unwrap();

  users::delete_user(&state, ann.id).await.unwrap();

  let kept = orders::get_order(&state, order.id).await.unwrap();
  assert_eq!(kept.order.uid, ann.uid);
  assert_eq!(kept.order.user_id, None);
  assert!(kept.user.is_none());
  assert_eq!(kept.product.as_ref().unwrap().description, "Description of SKU1");
}

#[tokio::test]
async fn code_lookup_is_upper_cased() {
  let state = memory_state();
  let product = seed_product(&state, "ABC1", 3).await;

  let found = products::get_product_by_code(&state, "abc1").await.unwrap();
  assert_eq!(found.id, product.id);
  assert!(matches!(
    products::get_product_by_code(&state, "  ").await,
    Err(AppError::Validation(ref m)) if m == "Code is required"
  ));
  assert!(matches!(
    products::get_product_by_code(&state, "zzz").await,
    Err(AppError::NotFound(_))
  ));
}

#[tokio::test]
async fn product_guards_and_conflicts() {
  let state = memory_state();
  seed_product(&state, "SKU1", 3).await;

  let duplicate = NewProduct {
    code: "SKU1".to_string(),
    name: "Again".to_string(),
    description: "Same code".to_string(),
    price: Decimal::new(100, 2),
    amount: 1,
  };
  assert!(matches!(
    products::create_product(&state, duplicate).await,
    Err(AppError::Conflict(ref m)) if m == "Product code already in use"
  ));

  let negative = NewProduct {
    code: "SKU2".to_string(),
    name: "Negative".to_string(),
    description: "Bad stock".to_string(),
    price: Decimal::new(100, 2),
    amount: -1,
  };
  assert!(matches!(
    products::create_product(&state, negative).await,
    Err(AppError::Validation(_))
  ));
}

#[tokio::test]
async fn partial_product_update_keeps_other_fields() {
  let state = memory_state();
  let product = seed_product(&state, "SKU1", 3).await;

  let updated = products::update_product(
    &state,
    product.id,
    ProductPatch {
      price: Some(Decimal::new(9995, 3)),
      amount: Some(12),
      ..ProductPatch::default()
    },
  )
  .await
  .unwrap();

  assert_eq!(updated.code, "SKU1");
  assert_eq!(updated.name, product.name);
  assert_eq!(updated.amount, 12);
  assert_eq!(updated.price, Decimal::new(1000, 2));

  assert!(matches!(
    products::update_product(&state, 77, ProductPatch::default()).await,
    Err(AppError::NotFound(_))
  ));
}
