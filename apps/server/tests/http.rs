//! Integration tests for the REST API.
//!
//! Each test boots the full stack (router + in-memory database) on an
//! ephemeral port and drives it over real HTTP with reqwest.

use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use kasir_db::{Database, DbConfig};
use kasir_server::{routes, AppState};

/// Boots the server on an ephemeral port and returns its base URL.
async fn spawn_server() -> String {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = routes::router(AppState::new(db));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn create_category(client: &Client, base: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/categories", base))
        .json(&json!({ "name": name, "description": "test category" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

async fn create_product(
    client: &Client,
    base: &str,
    category_id: &str,
    name: &str,
    price: i64,
    stock: i64,
) -> Value {
    let response = client
        .post(format!("{}/products", base))
        .json(&json!({
            "name": name,
            "price": price,
            "stock": stock,
            "category_id": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn welcome_and_health() {
    let base = spawn_server().await;
    let client = Client::new();

    let body = client
        .get(&base)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "welcome");

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], true);
}

#[tokio::test]
async fn category_and_product_crud() {
    let base = spawn_server().await;
    let client = Client::new();

    let category = create_category(&client, &base, "Minuman").await;
    let category_id = category["id"].as_str().unwrap();

    let product = create_product(&client, &base, category_id, "Teh Botol", 5000, 10).await;
    assert_eq!(product["category_name"], "Minuman");
    let product_id = product["id"].as_str().unwrap();

    // Listing with a name filter
    let listed: Value = client
        .get(format!("{}/products?name=teh", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Category listing embeds its products
    let categories: Value = client
        .get(format!("{}/categories", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(categories[0]["product_count"], 1);
    assert_eq!(categories[0]["products"][0]["name"], "Teh Botol");

    // Update
    let response = client
        .put(format!("{}/products/{}", base, product_id))
        .json(&json!({
            "name": "Teh Botol Besar",
            "price": 7000,
            "stock": 10,
            "category_id": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["price"], 7000);

    // Unknown id is a 404 with a typed code
    let response = client
        .get(format!("{}/products/no-such-id", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let err: Value = response.json().await.unwrap();
    assert_eq!(err["code"], "NOT_FOUND");

    // Delete, then the product is gone
    let response = client
        .delete(format!("{}/products/{}", base, product_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let response = client
        .get(format!("{}/products/{}", base, product_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let base = spawn_server().await;
    let client = Client::new();

    // Empty name
    let response = client
        .post(format!("{}/categories", base))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Negative price
    let category = create_category(&client, &base, "Snack").await;
    let response = client
        .post(format!("{}/products", base))
        .json(&json!({
            "name": "Keripik",
            "price": -100,
            "stock": 1,
            "category_id": category["id"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let err: Value = response.json().await.unwrap();
    assert_eq!(err["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn checkout_end_to_end() {
    let base = spawn_server().await;
    let client = Client::new();

    let category = create_category(&client, &base, "Minuman").await;
    let category_id = category["id"].as_str().unwrap();
    let p1 = create_product(&client, &base, category_id, "Kopi Susu", 1000, 5).await;
    let p2 = create_product(&client, &base, category_id, "Teh Botol", 700, 8).await;

    let response = client
        .post(format!("{}/transactions/checkout", base))
        .json(&json!({
            "items": [
                { "product_id": p1["id"], "quantity": 2 },
                { "product_id": p2["id"], "quantity": 3 },
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let transaction: Value = response.json().await.unwrap();

    assert_eq!(transaction["total_amount"], 2 * 1000 + 3 * 700);
    let details = transaction["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["product_name"], "Kopi Susu");
    assert_eq!(details[0]["subtotal"], 2000);
    assert_eq!(details[1]["product_name"], "Teh Botol");
    assert_eq!(details[1]["subtotal"], 2100);

    // Stock was decremented
    let p1_after: Value = client
        .get(format!("{}/products/{}", base, p1["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(p1_after["stock"], 3);

    // The receipt is readable back from the ledger
    let tx_id = transaction["id"].as_str().unwrap();
    let persisted: Value = client
        .get(format!("{}/transactions/{}", base, tx_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(persisted["total_amount"], transaction["total_amount"]);

    // And it shows up in today's report
    let report: Value = client
        .get(format!("{}/report/today", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["total_transactions"], 1);
    assert_eq!(report["total_revenue"], 4100);
    assert_eq!(report["best_selling_products"]["name"], "Teh Botol");
    assert_eq!(report["best_selling_products"]["qty_sold"], 3);
}

#[tokio::test]
async fn checkout_failures_map_to_status_codes() {
    let base = spawn_server().await;
    let client = Client::new();

    let category = create_category(&client, &base, "Minuman").await;
    let category_id = category["id"].as_str().unwrap();
    let p1 = create_product(&client, &base, category_id, "Kopi", 1000, 1).await;

    // Unknown product: 404
    let response = client
        .post(format!("{}/transactions/checkout", base))
        .json(&json!({ "items": [{ "product_id": "ghost", "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let err: Value = response.json().await.unwrap();
    assert_eq!(err["code"], "NOT_FOUND");

    // Insufficient stock: 422, and the stock is untouched
    let response = client
        .post(format!("{}/transactions/checkout", base))
        .json(&json!({ "items": [{ "product_id": p1["id"], "quantity": 5 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let err: Value = response.json().await.unwrap();
    assert_eq!(err["code"], "INSUFFICIENT_STOCK");

    let p1_after: Value = client
        .get(format!("{}/products/{}", base, p1["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(p1_after["stock"], 1);

    // Empty item list: 400
    let response = client
        .post(format!("{}/transactions/checkout", base))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn report_requires_well_formed_dates() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/report?start_date=2026-01-01", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!(
            "{}/report?start_date=01-01-2026&end_date=2026-02-01",
            base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!(
            "{}/report?start_date=2026-01-01&end_date=2026-12-31",
            base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["total_transactions"], 0);
    assert_eq!(report["total_revenue"], 0);
}
