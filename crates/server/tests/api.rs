//! End-to-end API tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The server running (cargo run -p tangelo-server)
//!
//! They are `#[ignore]`d by default; run with:
//! `cargo test -p tangelo-server -- --ignored`
//!
//! Base URL is configurable via `TANGELO_BASE_URL`
//! (default: <http://localhost:5000>).

#![allow(clippy::unwrap_used)]

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("TANGELO_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A unique email per test run, since emails are unique forever.
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{tag}-{nanos}@example.com")
}

/// Sign up a user and log in, returning (token, user id, is_admin).
async fn signup_and_login(client: &Client, email: &str, is_admin: bool) -> (String, Value) {
    let url = base_url();

    let resp = client
        .post(format!("{url}/users/signup"))
        .json(&json!({
            "name": "E2E User",
            "email": email,
            "password": "e2e-password",
            "isAdmin": is_admin,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{url}/users/login"))
        .json(&json!({"email": email, "password": "e2e-password"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (token, body)
}

#[tokio::test]
#[ignore = "requires a running server and PostgreSQL"]
async fn test_product_lifecycle() {
    let client = Client::new();
    let url = base_url();
    let (token, login) = signup_and_login(&client, &unique_email("admin"), true).await;
    assert_eq!(login["isAdmin"], json!(true));

    // Create
    let resp = client
        .post(format!("{url}/api/products"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Lifecycle Widget",
            "price": 100,
            "description": "Goes through the whole lifecycle",
            "stock_quantity": 5,
            "category": "Widgets",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["price"].as_f64().unwrap(), 100.0);

    // Read back
    let resp = client
        .get(format!("{url}/api/products/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["price"].as_f64().unwrap(), 100.0);

    // Partial update: only the price changes
    let resp = client
        .put(format!("{url}/api/products/{id}"))
        .bearer_auth(&token)
        .json(&json!({"price": 150}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["price"].as_f64().unwrap(), 150.0);
    assert_eq!(updated["name"], json!("Lifecycle Widget"));

    // Delete
    let resp = client
        .delete(format!("{url}/api/products/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .get(format!("{url}/api/products/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], json!("Product not found"));
}

#[tokio::test]
#[ignore = "requires a running server and PostgreSQL"]
async fn test_duplicate_email_rejected() {
    let client = Client::new();
    let url = base_url();
    let email = unique_email("dup");

    let signup = |name: &'static str| {
        client.post(format!("{url}/users/signup")).json(&json!({
            "name": name,
            "email": email,
            "password": "some-password",
        }))
    };

    let resp = signup("First").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Same email again, different other fields: always the duplicate error
    let resp = signup("Second").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], json!("Email already in use"));
}

#[tokio::test]
#[ignore = "requires a running server and PostgreSQL"]
async fn test_login_failures_are_indistinguishable() {
    let client = Client::new();
    let url = base_url();
    let email = unique_email("login");
    signup_and_login(&client, &email, false).await;

    // Wrong password
    let resp = client
        .post(format!("{url}/users/login"))
        .json(&json!({"email": email, "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = resp.json().await.unwrap();

    // No such user
    let resp = client
        .post(format!("{url}/users/login"))
        .json(&json!({"email": unique_email("ghost"), "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let no_user: Value = resp.json().await.unwrap();

    assert_eq!(wrong_password["message"], no_user["message"]);
    assert_eq!(wrong_password["message"], json!("Invalid email or password"));
}

#[tokio::test]
#[ignore = "requires a running server and PostgreSQL"]
async fn test_catalog_writes_require_admin() {
    let client = Client::new();
    let url = base_url();
    let product = json!({
        "name": "Forbidden Widget",
        "price": 50,
        "description": "Should never exist",
        "stock_quantity": 1,
        "category": "Widgets",
    });

    // No token: 401
    let resp = client
        .post(format!("{url}/api/products"))
        .json(&product)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], json!("Not authenticated."));

    // Non-admin token: 403
    let (token, _) = signup_and_login(&client, &unique_email("user"), false).await;
    let resp = client
        .post(format!("{url}/api/products"))
        .bearer_auth(&token)
        .json(&product)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], json!("Access denied. Admins only."));
}

#[tokio::test]
#[ignore = "requires a running server and PostgreSQL"]
async fn test_listing_filters_sorting_pagination() {
    let client = Client::new();
    let url = base_url();
    let (token, _) = signup_and_login(&client, &unique_email("lister"), true).await;

    // Seed a recognizable category so other test data can't interfere
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let category = format!("e2e-cat-{nanos}");
    for (name, price, stock) in [
        ("Alpha", 50, 20),
        ("Beta", 100, 15),
        ("Gamma", 150, 10),
        ("Delta", 200, 5),
    ] {
        let resp = client
            .post(format!("{url}/api/products"))
            .bearer_auth(&token)
            .json(&json!({
                "name": name,
                "price": price,
                "description": "listing fixture",
                "stock_quantity": stock,
                "category": category,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // Pagination: 4 items, limit 3 -> 2 pages, no duplicates across pages
    let page1: Value = client
        .get(format!(
            "{url}/api/products?category={category}&limit=3&page=1"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page1["total"], json!(4));
    assert_eq!(page1["totalPages"], json!(2));
    assert_eq!(page1["products"].as_array().unwrap().len(), 3);

    let page2: Value = client
        .get(format!(
            "{url}/api/products?category={category}&limit=3&page=2"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page2["products"].as_array().unwrap().len(), 1);

    // Price range is inclusive on both ends
    let ranged: Value = client
        .get(format!(
            "{url}/api/products?category={category}&minPrice=50&maxPrice=150"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ranged["total"], json!(3));

    // Case-insensitive substring search on name
    let searched: Value = client
        .get(format!("{url}/api/products?category={category}&search=alp"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(searched["total"], json!(1));
    assert_eq!(searched["products"][0]["name"], json!("Alpha"));

    // Descending price sort
    let sorted: Value = client
        .get(format!(
            "{url}/api/products?category={category}&sortBy=price&order=DESC"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let prices: Vec<f64> = sorted["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    let mut expected = prices.clone();
    expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(prices, expected);

    // Invalid query parameters
    for bad in [
        "page=0",
        "limit=abc",
        "sortBy=password",
        "order=sideways",
        "minPrice=cheap",
    ] {
        let resp = client
            .get(format!("{url}/api/products?{bad}"))
            .send()
            .await
            .unwrap();
        assert_eq!(
            resp.status(),
            StatusCode::BAD_REQUEST,
            "query {bad:?} should be rejected"
        );
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], json!("Invalid query parameters"));
    }
}
