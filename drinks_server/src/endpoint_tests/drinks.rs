use actix_web::{http::StatusCode, test::TestRequest};
use drinks_engine::{
    db_types::{Drink, DrinkUpdate, Ingredient, NewDrink},
    DrinkStoreError,
};
use mockall::predicate::eq;
use serde_json::{json, Value};

use super::{
    helpers::{bearer, send_request},
    mocks::MockDrinkManager,
};

fn latte(id: i64) -> Drink {
    Drink {
        id,
        title: "Latte".into(),
        recipe: vec![Ingredient::new("white", "milk", 2), Ingredient::new("brown", "espresso", 1)],
    }
}

fn water(id: i64) -> Drink {
    Drink { id, title: "water".into(), recipe: vec![Ingredient::new("blue", "water", 1)] }
}

fn latte_json() -> Value {
    json!({
        "title": "Latte",
        "recipe": [
            {"color": "white", "name": "milk", "parts": 2},
            {"color": "brown", "name": "espresso", "parts": 1}
        ]
    })
}

#[actix_web::test]
async fn menu_hides_ingredient_names() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().returning(|| Ok(vec![latte(1), water(2)]));
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), db).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("name"), "was: {body}");
    assert_eq!(
        body,
        r#"{"success":true,"drinks":[{"id":1,"title":"Latte","recipe":[{"color":"white","parts":2},{"color":"brown","parts":1}]},{"id":2,"title":"water","recipe":[{"color":"blue","parts":1}]}]}"#
    );
}

#[actix_web::test]
async fn empty_menu_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().returning(|| Ok(vec![]));
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), db).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        r#"{"success":false,"error":404,"message":"Resource not found. There are no drinks on the menu."}"#
    );
}

#[actix_web::test]
async fn menu_read_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().returning(|| Err(DrinkStoreError::DatabaseError("disk I/O error".into())));
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), db).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"success":false,"error":500,"message":"Internal Server Error"}"#);
}

#[actix_web::test]
async fn create_latte() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink()
        .with(eq(NewDrink::new("Latte", latte(0).recipe)))
        .times(1)
        .returning(|drink| Ok(Drink { id: 3, title: drink.title, recipe: drink.recipe }));
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(("Authorization", bearer(&["post:drinks"])))
        .set_json(latte_json());
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"success":true,"drinks":[{"id":3,"title":"Latte","recipe":[{"color":"white","name":"milk","parts":2},{"color":"brown","name":"espresso","parts":1}]}]}"#
    );
}

#[actix_web::test]
async fn create_drink_with_incomplete_recipe() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink().never();
    let body = json!({
        "title": "Mystery",
        "recipe": [{"color": "white", "name": "milk", "parts": 2}, {"color": "brown", "parts": 1}]
    });
    let req =
        TestRequest::post().uri("/drinks").insert_header(("Authorization", bearer(&["post:drinks"]))).set_json(body);
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"success":false,"error":400,"message":"Bad Request. Invalid recipe."#), "was: {body}");
}

#[actix_web::test]
async fn create_drink_without_title() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink().never();
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(("Authorization", bearer(&["post:drinks"])))
        .set_json(json!({"recipe": []}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#""error":400"#), "was: {body}");
}

#[actix_web::test]
async fn create_drink_with_invalid_json() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink().never();
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(("Authorization", bearer(&["post:drinks"])))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"title\": \"Latte\", \"recipe\": [");
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"success":false,"error":400,"message":"Bad Request."#), "was: {body}");
}

#[actix_web::test]
async fn failed_write_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink().returning(|_| Err(DrinkStoreError::DatabaseError("database is locked".into())));
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(("Authorization", bearer(&["post:drinks"])))
        .set_json(latte_json());
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"success":false,"error":400,"message":"Bad Request"}"#);
}

#[actix_web::test]
async fn patch_title_only() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_update_drink()
        .with(eq(1), eq(DrinkUpdate::default().with_title("Flat White")))
        .times(1)
        .returning(|id, update| Ok(Drink { title: update.title.unwrap_or_default(), ..latte(id) }));
    let req = TestRequest::patch()
        .uri("/drinks/1")
        .insert_header(("Authorization", bearer(&["patch:drinks"])))
        .set_json(json!({"title": "Flat White"}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"success":true,"drinks":[{"id":1,"title":"Flat White","recipe":[{"color":"white","name":"milk","parts":2},{"color":"brown","name":"espresso","parts":1}]}]}"#
    );
}

#[actix_web::test]
async fn patch_recipe() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    let recipe = vec![Ingredient::new("black", "espresso", 1)];
    db.expect_update_drink()
        .with(eq(1), eq(DrinkUpdate::default().with_recipe(recipe)))
        .times(1)
        .returning(|id, update| Ok(Drink { recipe: update.recipe.unwrap_or_default(), ..latte(id) }));
    let req = TestRequest::patch()
        .uri("/drinks/1")
        .insert_header(("Authorization", bearer(&["patch:drinks"])))
        .set_json(json!({"recipe": [{"color": "black", "name": "espresso", "parts": 1}]}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""recipe":[{"color":"black","name":"espresso","parts":1}]"#), "was: {body}");
}

#[actix_web::test]
async fn patch_with_invalid_recipe_changes_nothing() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().with(eq(1)).returning(|id| Ok(Some(latte(id))));
    db.expect_update_drink().never();
    let req = TestRequest::patch()
        .uri("/drinks/1")
        .insert_header(("Authorization", bearer(&["patch:drinks"])))
        .set_json(json!({"title": "Broken", "recipe": [{"name": "espresso", "parts": 1}]}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid recipe"), "was: {body}");
}

#[actix_web::test]
async fn patch_missing_drink() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_update_drink().returning(|id, _| Err(DrinkStoreError::DrinkNotFound(id)));
    let req = TestRequest::patch()
        .uri("/drinks/42")
        .insert_header(("Authorization", bearer(&["patch:drinks"])))
        .set_json(json!({"title": "Ghost"}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"success":false,"error":404,"message":"Resource not found. Drink #42 does not exist"}"#);
}

#[actix_web::test]
async fn non_numeric_ids_are_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_update_drink().never();
    let req = TestRequest::patch()
        .uri("/drinks/latte")
        .insert_header(("Authorization", bearer(&["patch:drinks"])))
        .set_json(json!({"title": "Ghost"}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"success":false,"error":404,"message":"Resource not found. /drinks/latte does not exist"}"#);

    let mut db = MockDrinkManager::new();
    db.expect_delete_drink().never();
    let req = TestRequest::delete().uri("/drinks/latte").insert_header(("Authorization", bearer(&["delete:drinks"])));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.starts_with(r#"{"success":false,"error":404,"#), "was: {body}");
}

#[actix_web::test]
async fn blank_title_on_missing_drink_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().with(eq(42)).returning(|_| Ok(None));
    db.expect_update_drink().never();
    let req = TestRequest::patch()
        .uri("/drinks/42")
        .insert_header(("Authorization", bearer(&["patch:drinks"])))
        .set_json(json!({"title": ""}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"success":false,"error":404,"message":"Resource not found. Drink #42 does not exist"}"#);
}

#[actix_web::test]
async fn blank_title_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink().never();
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(("Authorization", bearer(&["post:drinks"])))
        .set_json(json!({"title": "  ", "recipe": []}));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"success":false,"error":400,"message":"Bad Request. A drink needs a title."}"#);
}

#[actix_web::test]
async fn delete_drink() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_delete_drink().with(eq(2)).times(1).returning(Ok);
    let req = TestRequest::delete().uri("/drinks/2").insert_header(("Authorization", bearer(&["delete:drinks"])));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"delete":2}"#);
}

#[actix_web::test]
async fn delete_missing_drink() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDrinkManager::new();
    db.expect_delete_drink().returning(|id| Err(DrinkStoreError::DrinkNotFound(id)));
    let req = TestRequest::delete().uri("/drinks/99").insert_header(("Authorization", bearer(&["delete:drinks"])));
    let (status, body) = send_request(req, db).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"success":false,"error":404,"message":"Resource not found. Drink #99 does not exist"}"#);
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/health"), MockDrinkManager::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#), "was: {body}");
}

#[actix_web::test]
async fn unknown_routes_are_not_found() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/coffee"), MockDrinkManager::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.starts_with(r#"{"success":false,"error":404,"#), "was: {body}");
    let (status, _) = send_request(TestRequest::put().uri("/drinks"), MockDrinkManager::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
