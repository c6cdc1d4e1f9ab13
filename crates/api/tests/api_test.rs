//! HTTP tests for the response envelope, status codes and the ledger flow.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use common::{TestApp, decimal, id, insert_category, spawn_app};

async fn create_account(app: &TestApp, code: &str, kind: &str, parent: Option<&str>, opening: i64) -> String {
    let (status, body) = app
        .post(
            "/api/accounts",
            json!({
                "code": code,
                "name": format!("Account {code}"),
                "arabicName": format!("حساب {code}"),
                "accountType": kind,
                "parentId": parent,
                "openingBalance": opening,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    id(&body["data"])
}

fn account_by_code<'a>(accounts: &'a Value, code: &str) -> &'a Value {
    accounts
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["code"] == code)
        .unwrap()
}

// ============================================================================
// Health and envelope
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_delete_without_id_is_rejected() {
    let app = spawn_app().await;

    for resource in ["accounts", "transactions", "customers", "suppliers", "products"] {
        let (status, body) = app.delete(&format!("/api/{resource}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resource}");
        assert_eq!(body, json!({ "success": false, "error": "id is required" }));
    }
}

#[tokio::test]
async fn test_malformed_body_uses_envelope() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/accounts")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send_request(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_field_validation() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/accounts",
            json!({
                "code": "",
                "name": "Cash",
                "arabicName": "النقدية",
                "accountType": "ASSETS",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("code"));
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_account_crud() {
    let app = spawn_app().await;

    let assets = create_account(&app, "1", "ASSETS", None, 0).await;
    let cash = create_account(&app, "1101", "ASSETS", Some(&assets), 500).await;

    let (status, body) = app
        .post(
            "/api/accounts",
            json!({
                "code": "1101",
                "name": "Duplicate",
                "arabicName": "مكرر",
                "accountType": "ASSETS",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app.get("/api/accounts?includeChildren=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let root = account_by_code(&body["data"], "1");
    assert_eq!(root["isParent"], true);
    assert_eq!(root["children"].as_array().unwrap().len(), 1);
    let leaf = account_by_code(&body["data"], "1101");
    assert_eq!(leaf["level"], 2);
    assert_eq!(decimal(&leaf["currentBalance"]), dec!(500));

    let (status, body) = app
        .put(
            "/api/accounts",
            json!({ "id": cash, "name": "Cash on hand", "openingBalance": "750" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account updated successfully");
    assert_eq!(body["data"]["name"], "Cash on hand");
    assert_eq!(decimal(&body["data"]["currentBalance"]), dec!(750));

    let (status, _) = app.delete(&format!("/api/accounts?id={assets}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.delete(&format!("/api/accounts?id={cash}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.delete(&format!("/api/accounts?id={cash}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_parent_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/accounts",
            json!({
                "code": "1101",
                "name": "Cash",
                "arabicName": "النقدية",
                "accountType": "ASSETS",
                "parentId": uuid::Uuid::new_v4(),
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn test_transaction_lifecycle() {
    let app = spawn_app().await;
    let cash = create_account(&app, "1101", "ASSETS", None, 1000).await;
    let revenue = create_account(&app, "4101", "REVENUE", None, 0).await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "date": "2026-03-01",
                "description": "Cash sale",
                "type": "JOURNAL",
                "entries": [
                    { "debitAccountId": cash, "amount": 250 },
                    { "creditAccountId": revenue, "amount": "250.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let data = &body["data"];
    assert_eq!(data["number"], "1");
    assert_eq!(data["status"], "PENDING");
    assert_eq!(data["entries"].as_array().unwrap().len(), 2);
    assert_eq!(data["entries"][0]["debitAccount"]["code"], "1101");
    assert_eq!(data["entries"][0]["debitAccount"]["arabicName"], "حساب 1101");
    assert!(data["entries"][0]["creditAccount"].is_null());
    assert_eq!(data["entries"][1]["creditAccount"]["id"], revenue.as_str());
    assert_eq!(data["user"]["fullName"], "Administrator");
    assert_eq!(data["user"]["username"], "admin");
    assert_eq!(data["branch"]["name"], "Main Branch");
    let tx = id(data);

    let (_, accounts) = app.get("/api/accounts").await;
    assert_eq!(
        decimal(&account_by_code(&accounts["data"], "1101")["currentBalance"]),
        dec!(1000)
    );

    let (status, body) = app
        .put("/api/transactions", json!({ "id": tx, "action": "post" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "POSTED");
    assert!(body["data"]["postedAt"].is_string());
    assert_eq!(body["data"]["entries"][1]["creditAccount"]["name"], "Account 4101");
    assert_eq!(body["data"]["branch"]["arabicName"], "الفرع الرئيسي");

    let (_, accounts) = app.get("/api/accounts").await;
    assert_eq!(
        decimal(&account_by_code(&accounts["data"], "1101")["currentBalance"]),
        dec!(1250)
    );
    assert_eq!(
        decimal(&account_by_code(&accounts["data"], "4101")["currentBalance"]),
        dec!(-250)
    );

    let (status, body) = app
        .put("/api/transactions", json!({ "id": tx, "action": "post" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Transaction is already posted");

    let (status, _) = app.delete(&format!("/api/transactions?id={tx}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/transactions?status=POSTED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
    assert_eq!(body["data"][0]["entries"][0]["debitAccount"]["code"], "1101");
    assert_eq!(body["data"][0]["user"]["fullName"], "Administrator");
}

#[tokio::test]
async fn test_amounts_beyond_money_column_are_rejected() {
    let app = spawn_app().await;
    let cash = create_account(&app, "1101", "ASSETS", None, 0).await;
    let revenue = create_account(&app, "4101", "REVENUE", None, 0).await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "date": "2026-03-01",
                "description": "Too large",
                "type": "JOURNAL",
                "entries": [
                    { "debitAccountId": cash, "amount": "1000000000000" },
                    { "creditAccountId": revenue, "amount": "1000000000000" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(
        body["error"],
        "Entry 1: amount exceeds the maximum of 999999999999.9999"
    );

    // Sums that would overflow a Decimal never reach the totals.
    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "date": "2026-03-01",
                "description": "Overflow",
                "type": "JOURNAL",
                "entries": [
                    { "debitAccountId": cash, "amount": "79228162514264337593543950335" },
                    { "debitAccountId": cash, "amount": "79228162514264337593543950335" },
                    { "creditAccountId": revenue, "amount": 1 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["success"], false);

    let (status, body) = app
        .post(
            "/api/accounts",
            json!({
                "code": "1102",
                "name": "Vault",
                "arabicName": "الخزنة",
                "accountType": "ASSETS",
                "openingBalance": "1000000000000",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (_, body) = app.get("/api/transactions").await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_unbalanced_transaction_is_rejected() {
    let app = spawn_app().await;
    let cash = create_account(&app, "1101", "ASSETS", None, 0).await;
    let revenue = create_account(&app, "4101", "REVENUE", None, 0).await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "date": "2026-03-01",
                "description": "Broken",
                "type": "JOURNAL",
                "entries": [
                    { "debitAccountId": cash, "amount": 100 },
                    { "creditAccountId": revenue, "amount": 90 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Unbalanced entries"));

    let (_, body) = app.get("/api/transactions").await;
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_two_sided_line_is_rejected() {
    let app = spawn_app().await;
    let cash = create_account(&app, "1101", "ASSETS", None, 0).await;
    let revenue = create_account(&app, "4101", "REVENUE", None, 0).await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "date": "2026-03-01",
                "description": "Both sides",
                "type": "JOURNAL",
                "entries": [
                    { "debitAccountId": cash, "creditAccountId": revenue, "amount": 100 },
                ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Entry 1: specify either a debit account or a credit account, not both"
    );
}

#[tokio::test]
async fn test_transaction_actions() {
    let app = spawn_app().await;

    let missing = uuid::Uuid::new_v4();
    let (status, body) = app
        .put("/api/transactions", json!({ "id": missing, "action": "void" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid action");

    let (status, body) = app
        .put("/api/transactions", json!({ "id": missing, "action": "post" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

// ============================================================================
// Customers, suppliers and products
// ============================================================================

#[tokio::test]
async fn test_customer_endpoints() {
    let app = spawn_app().await;

    for code in ["CUST001", "CUST002", "CUST003"] {
        let (status, body) = app
            .post(
                "/api/customers",
                json!({
                    "code": code,
                    "name": format!("Customer {code}"),
                    "arabicName": format!("عميل {code}"),
                    "type": "COMPANY",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["paymentTerms"], 30);
    }

    let (status, _) = app
        .post(
            "/api/customers",
            json!({ "code": "CUST001", "name": "Again", "arabicName": "مرة أخرى" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/customers?page=2&pageSize=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({ "page": 2, "pageSize": 2, "total": 3, "totalPages": 2 })
    );
    let last = &body["data"][0];
    assert_eq!(last["code"], "CUST003");
    assert_eq!(decimal(&last["balance"]), dec!(0));

    let (status, body) = app
        .put(
            "/api/customers",
            json!({ "id": id(last), "email": "not-an-email" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let (status, _) = app.delete(&format!("/api/customers?id={}", id(last))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(
            "/api/customers",
            json!({ "id": uuid::Uuid::new_v4(), "name": "Ghost" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_supplier_endpoints() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/suppliers",
            json!({
                "code": "SUPP001",
                "name": "Tech Import",
                "arabicName": "تك للاستيراد",
                "type": "FOREIGN",
                "creditLimit": 100000,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["type"], "FOREIGN");

    let (_, body) = app.get("/api/suppliers?type=LOCAL").await;
    assert_eq!(body["pagination"]["total"], 0);

    let (_, body) = app.get("/api/suppliers?search=Tech").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(decimal(&body["data"][0]["totalPayments"]), dec!(0));
}

#[tokio::test]
async fn test_product_endpoints() {
    let app = spawn_app().await;
    let category = insert_category(&app.db, "Electronics").await;

    let (status, _) = app
        .post(
            "/api/products",
            json!({
                "categoryId": uuid::Uuid::new_v4(),
                "code": "PROD001",
                "name": "Laptop",
                "arabicName": "حاسوب محمول",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/products",
            json!({
                "categoryId": category,
                "code": "PROD001",
                "barcode": "1234567890123",
                "name": "Laptop",
                "arabicName": "حاسوب محمول",
                "costPrice": 2500,
                "salePrice": "3200.50",
                "minStock": 5,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["unit"], "piece");
    let laptop = id(&body["data"]);

    let (status, _) = app
        .post(
            "/api/products",
            json!({
                "categoryId": category,
                "code": "PROD002",
                "barcode": "1234567890123",
                "name": "Other",
                "arabicName": "آخر",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/products?includeInventory=true").await;
    assert_eq!(status, StatusCode::OK);
    let item = &body["data"][0];
    assert_eq!(item["category"]["name"], "Electronics");
    assert_eq!(item["stock"]["isLowStock"], true);
    assert_eq!(item["inventory"], json!([]));

    let (status, _) = app.delete(&format!("/api/products?id={laptop}")).await;
    assert_eq!(status, StatusCode::OK);
}
