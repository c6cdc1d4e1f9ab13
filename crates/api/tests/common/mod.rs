//! Shared harness for HTTP tests.
//!
//! Builds the real router over an in-memory SQLite database that holds the
//! default company, branch, fiscal year and user the configuration points at.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::str::FromStr;
use tower::ServiceExt;
use uuid::Uuid;

use qayd_api::{AppState, create_router};
use qayd_db::{
    entities::{
        branches, categories, companies, fiscal_years,
        sea_orm_active_enums::UserRole,
        users,
    },
    migration::Migrator,
};
use qayd_shared::{
    AppConfig,
    config::{DatabaseConfig, DefaultsConfig, ServerConfig},
    defaults::{ADMIN_USER_ID, DEFAULT_BRANCH_ID, DEFAULT_COMPANY_ID, DEFAULT_FISCAL_YEAR_ID},
};

/// Router plus a handle on its database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    seed_defaults(&db).await;

    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::with_url("sqlite::memory:"),
        defaults: DefaultsConfig::default(),
    };
    let state = AppState {
        db: Arc::new(db.clone()),
        config: Arc::new(config),
    };

    TestApp {
        router: create_router(state),
        db,
    }
}

async fn seed_defaults(db: &DatabaseConnection) {
    let now = Utc::now().into();
    companies::ActiveModel {
        id: Set(DEFAULT_COMPANY_ID),
        name: Set("Test Company".to_string()),
        arabic_name: Set("شركة الاختبار".to_string()),
        tax_number: Set(None),
        commercial: Set(None),
        address: Set(None),
        phone: Set(None),
        email: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert company");

    branches::ActiveModel {
        id: Set(DEFAULT_BRANCH_ID),
        company_id: Set(DEFAULT_COMPANY_ID),
        name: Set("Main Branch".to_string()),
        arabic_name: Set("الفرع الرئيسي".to_string()),
        address: Set(None),
        phone: Set(None),
        manager: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert branch");

    fiscal_years::ActiveModel {
        id: Set(DEFAULT_FISCAL_YEAR_ID),
        company_id: Set(DEFAULT_COMPANY_ID),
        name: Set("FY 2026".to_string()),
        start_date: Set(NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")),
        end_date: Set(NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date")),
        is_current: Set(true),
        is_closed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert fiscal year");

    users::ActiveModel {
        id: Set(ADMIN_USER_ID),
        username: Set("admin".to_string()),
        email: Set("admin@example.com".to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        full_name: Set("Administrator".to_string()),
        role: Set(UserRole::Admin),
        branch_id: Set(Some(DEFAULT_BRANCH_ID)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert user");
}

pub async fn insert_category(db: &DatabaseConnection, name: &str) -> Uuid {
    let now = Utc::now().into();
    let id = Uuid::new_v4();
    categories::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        arabic_name: Set(name.to_string()),
        parent_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert category");
    id
}

impl TestApp {
    /// Sends a request and returns the status with the parsed JSON body.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send_request(builder.body(body).expect("build request"))
            .await
    }

    /// Sends a raw request.
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }
}

/// Reads a decimal field that is serialized as a string.
pub fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal as string")).expect("valid decimal")
}

/// Reads an id field.
pub fn id(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}
