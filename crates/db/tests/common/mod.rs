//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the real
//! migrator. A single pooled connection keeps the database alive and
//! serializes concurrent work the way row locks would.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use qayd_db::entities::{
    accounts, branches, categories, companies, fiscal_years, inventory_items, products,
    sea_orm_active_enums::{AccountType, UserRole},
    users, warehouses,
};
use qayd_db::migration::Migrator;

/// Seeded organization rows most tests need.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub company_id: Uuid,
    pub branch_id: Uuid,
    pub fiscal_year_id: Uuid,
    pub user_id: Uuid,
}

pub async fn setup() -> Fixture {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let now = Utc::now().into();
    let company_id = Uuid::new_v4();
    companies::ActiveModel {
        id: Set(company_id),
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
    .insert(&db)
    .await
    .expect("insert company");

    let branch_id = Uuid::new_v4();
    branches::ActiveModel {
        id: Set(branch_id),
        company_id: Set(company_id),
        name: Set("Main Branch".to_string()),
        arabic_name: Set("الفرع الرئيسي".to_string()),
        address: Set(None),
        phone: Set(None),
        manager: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert branch");

    let fiscal_year_id = insert_fiscal_year(&db, company_id, 2026, true, false).await;

    let user_id = Uuid::new_v4();
    users::ActiveModel {
        id: Set(user_id),
        username: Set(format!("user-{user_id}")),
        email: Set(format!("{user_id}@example.com")),
        password_hash: Set("not-a-real-hash".to_string()),
        full_name: Set("Test User".to_string()),
        role: Set(UserRole::Accountant),
        branch_id: Set(Some(branch_id)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert user");

    Fixture {
        db,
        company_id,
        branch_id,
        fiscal_year_id,
        user_id,
    }
}

pub async fn insert_fiscal_year(
    db: &DatabaseConnection,
    company_id: Uuid,
    year: i32,
    is_current: bool,
    is_closed: bool,
) -> Uuid {
    let now = Utc::now().into();
    let id = Uuid::new_v4();
    fiscal_years::ActiveModel {
        id: Set(id),
        company_id: Set(company_id),
        name: Set(format!("FY {year}")),
        start_date: Set(NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date")),
        end_date: Set(NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date")),
        is_current: Set(is_current),
        is_closed: Set(is_closed),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert fiscal year");
    id
}

/// Inserts an account row directly, bypassing repository rules.
pub async fn insert_account(
    db: &DatabaseConnection,
    fiscal_year_id: Uuid,
    code: &str,
    account_type: AccountType,
    opening_balance: Decimal,
) -> Uuid {
    let now = Utc::now().into();
    let id = Uuid::new_v4();
    accounts::ActiveModel {
        id: Set(id),
        fiscal_year_id: Set(fiscal_year_id),
        code: Set(code.to_string()),
        name: Set(format!("Account {code}")),
        arabic_name: Set(format!("حساب {code}")),
        account_type: Set(account_type),
        parent_id: Set(None),
        level: Set(1),
        is_parent: Set(false),
        opening_balance: Set(opening_balance),
        current_balance: Set(opening_balance),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert account");
    id
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

pub async fn insert_warehouse(db: &DatabaseConnection, branch_id: Uuid, code: &str) -> Uuid {
    let now = Utc::now().into();
    let id = Uuid::new_v4();
    warehouses::ActiveModel {
        id: Set(id),
        branch_id: Set(branch_id),
        code: Set(code.to_string()),
        name: Set(format!("Warehouse {code}")),
        arabic_name: Set(format!("مستودع {code}")),
        address: Set(None),
        manager: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert warehouse");
    id
}

pub async fn insert_stock(
    db: &DatabaseConnection,
    warehouse_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    reserved: Decimal,
) {
    inventory_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        warehouse_id: Set(warehouse_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        reserved_qty: Set(reserved),
        avg_cost: Set(Decimal::ZERO),
        last_cost: Set(Decimal::ZERO),
        expiry_date: Set(None),
        batch_no: Set(None),
        serial_no: Set(None),
        updated_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("insert stock");
}

/// Reads an account's current balance.
pub async fn balance_of(db: &DatabaseConnection, account_id: Uuid) -> Decimal {
    use sea_orm::EntityTrait;

    accounts::Entity::find_by_id(account_id)
        .one(db)
        .await
        .expect("query account")
        .expect("account exists")
        .current_balance
}

/// A product row with sensible defaults.
pub fn product_row(category_id: Uuid, code: &str) -> products::ActiveModel {
    let now = Utc::now().into();
    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        code: Set(code.to_string()),
        barcode: Set(None),
        name: Set(format!("Product {code}")),
        arabic_name: Set(format!("منتج {code}")),
        description: Set(None),
        unit: Set("piece".to_string()),
        cost_price: Set(Decimal::ZERO),
        sale_price: Set(Decimal::ZERO),
        min_stock: Set(Decimal::ZERO),
        has_expiry: Set(false),
        track_serial: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
