//! Database seeder for Qayd development and demos.
//!
//! Seeds the default company, branch, current fiscal year and administrator
//! under the well-known ids the API falls back to, then a basic chart of
//! accounts, product categories, the main warehouse and sample customers,
//! suppliers and products. Records that already exist are skipped, so the
//! seeder can be run repeatedly.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use qayd_core::{
    auth::hash_password,
    ledger::AccountType,
    parties::{CustomerType, SupplierType},
};
use qayd_db::{
    AccountRepository, CustomerRepository, ProductRepository, SupplierRepository,
    entities::{
        accounts, branches, categories, companies, customers, fiscal_years, products,
        sea_orm_active_enums::UserRole, suppliers, users, warehouses,
    },
    repositories::{
        CreateAccountInput, CreateCustomerInput, CreateProductInput, CreateSupplierInput,
    },
};
use qayd_shared::{
    config::DatabaseConfig,
    defaults::{
        ADMIN_USER_ID, DEFAULT_BRANCH_ID, DEFAULT_COMPANY_ID, DEFAULT_FISCAL_YEAR_ID,
        DEFAULT_WAREHOUSE_ID,
    },
};

/// Development password of the seeded administrator.
const ADMIN_PASSWORD: &str = "admin123";

/// A chart of accounts row: code, parent code, English name, Arabic name,
/// type and opening balance.
type AccountSeed = (
    &'static str,
    Option<&'static str>,
    &'static str,
    &'static str,
    AccountType,
    i64,
);

/// Parents come before their children.
const CHART_OF_ACCOUNTS: &[AccountSeed] = &[
    ("1", None, "Assets", "الأصول", AccountType::Assets, 0),
    ("11", Some("1"), "Current Assets", "الأصول المتداولة", AccountType::Assets, 0),
    ("1101", Some("11"), "Cash", "النقدية", AccountType::Assets, 50_000),
    ("1102", Some("11"), "Bank", "البنك", AccountType::Assets, 100_000),
    ("1103", Some("11"), "Accounts Receivable", "العملاء", AccountType::Assets, 25_000),
    ("1104", Some("11"), "Inventory", "المخزون", AccountType::Assets, 75_000),
    ("2", None, "Liabilities", "الخصوم", AccountType::Liabilities, 0),
    ("21", Some("2"), "Current Liabilities", "الخصوم المتداولة", AccountType::Liabilities, 0),
    ("2101", Some("21"), "Accounts Payable", "الموردون", AccountType::Liabilities, 15_000),
    ("2102", Some("21"), "Accrued Expenses", "المصروفات المستحقة", AccountType::Liabilities, 5_000),
    ("3", None, "Equity", "حقوق الملكية", AccountType::Equity, 0),
    ("3101", Some("3"), "Capital", "رأس المال", AccountType::Equity, 200_000),
    ("3201", Some("3"), "Retained Earnings", "الأرباح المحتجزة", AccountType::Equity, 30_000),
    ("4", None, "Revenue", "الإيرادات", AccountType::Revenue, 0),
    ("4101", Some("4"), "Sales Revenue", "إيرادات المبيعات", AccountType::Revenue, 0),
    ("4201", Some("4"), "Service Revenue", "إيرادات الخدمات", AccountType::Revenue, 0),
    ("5", None, "Expenses", "المصروفات", AccountType::Expenses, 0),
    ("5101", Some("5"), "Cost of Goods Sold", "تكلفة البضاعة المباعة", AccountType::Expenses, 0),
    ("5201", Some("5"), "Operating Expenses", "المصروفات التشغيلية", AccountType::Expenses, 0),
    ("5301", Some("5"), "Salaries Expense", "مصروفات الرواتب", AccountType::Expenses, 0),
];

/// Product categories: name, Arabic name, parent name.
const CATEGORIES: &[(&str, &str, Option<&str>)] = &[
    ("Electronics", "الإلكترونيات", None),
    ("Computers", "أجهزة الكمبيوتر", Some("Electronics")),
    ("Mobile Phones", "الهواتف المحمولة", Some("Electronics")),
    ("Clothing", "الملابس", None),
    ("Men's Clothing", "ملابس رجالية", Some("Clothing")),
    ("Women's Clothing", "ملابس نسائية", Some("Clothing")),
    ("Office Supplies", "المستلزمات المكتبية", None),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = qayd_db::connect(&DatabaseConfig::with_url(database_url))
        .await
        .context("failed to connect to database")?;

    println!("Seeding company and branch...");
    seed_company(&db).await?;

    println!("Seeding fiscal year...");
    seed_fiscal_year(&db).await?;

    println!("Seeding administrator...");
    seed_admin(&db).await?;

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await?;

    println!("Seeding product categories...");
    let category_ids = seed_categories(&db).await?;

    println!("Seeding warehouse...");
    seed_warehouse(&db).await?;

    println!("Seeding customers and suppliers...");
    seed_customers(&db).await?;
    seed_suppliers(&db).await?;

    println!("Seeding products...");
    seed_products(&db, &category_ids).await?;

    println!("Seeding complete!");
    Ok(())
}

fn now() -> chrono::DateTime<chrono::FixedOffset> {
    Utc::now().into()
}

async fn seed_company(db: &DatabaseConnection) -> anyhow::Result<()> {
    if companies::Entity::find_by_id(DEFAULT_COMPANY_ID)
        .one(db)
        .await?
        .is_some()
    {
        println!("  Company already exists, skipping...");
    } else {
        companies::ActiveModel {
            id: Set(DEFAULT_COMPANY_ID),
            name: Set("Example Trading Company".to_string()),
            arabic_name: Set("شركة المثال للتجارة المحدودة".to_string()),
            tax_number: Set(Some("300123456789003".to_string())),
            commercial: Set(Some("1010123456".to_string())),
            address: Set(Some("Riyadh, Saudi Arabia".to_string())),
            phone: Set(Some("+966112345678".to_string())),
            email: Set(Some("info@example.com".to_string())),
            is_active: Set(true),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(db)
        .await?;
        println!("  Created company: Example Trading Company");
    }

    if branches::Entity::find_by_id(DEFAULT_BRANCH_ID)
        .one(db)
        .await?
        .is_some()
    {
        println!("  Main branch already exists, skipping...");
        return Ok(());
    }

    branches::ActiveModel {
        id: Set(DEFAULT_BRANCH_ID),
        company_id: Set(DEFAULT_COMPANY_ID),
        name: Set("Main Branch".to_string()),
        arabic_name: Set("الفرع الرئيسي".to_string()),
        address: Set(Some("Riyadh, Al Malaz".to_string())),
        phone: Set(Some("+966112345678".to_string())),
        manager: Set(Some("Branch Manager".to_string())),
        is_active: Set(true),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;
    println!("  Created branch: Main Branch");
    Ok(())
}

/// Seeds the calendar year containing today as the current fiscal year.
async fn seed_fiscal_year(db: &DatabaseConnection) -> anyhow::Result<()> {
    if fiscal_years::Entity::find_by_id(DEFAULT_FISCAL_YEAR_ID)
        .one(db)
        .await?
        .is_some()
    {
        println!("  Fiscal year already exists, skipping...");
        return Ok(());
    }

    let year = Utc::now().year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid fiscal year start")?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).context("invalid fiscal year end")?;

    fiscal_years::ActiveModel {
        id: Set(DEFAULT_FISCAL_YEAR_ID),
        company_id: Set(DEFAULT_COMPANY_ID),
        name: Set(format!("Fiscal Year {year}")),
        start_date: Set(start),
        end_date: Set(end),
        is_current: Set(true),
        is_closed: Set(false),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;
    println!("  Created fiscal year {year}");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let existing = users::Entity::find()
        .filter(users::Column::Username.eq("admin"))
        .one(db)
        .await?;
    if existing.is_some() {
        println!("  Administrator already exists, skipping...");
        return Ok(());
    }

    let password_hash = hash_password(ADMIN_PASSWORD)?;
    users::ActiveModel {
        id: Set(ADMIN_USER_ID),
        username: Set("admin".to_string()),
        email: Set("admin@example.com".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("System Administrator".to_string()),
        role: Set(UserRole::Admin),
        branch_id: Set(Some(DEFAULT_BRANCH_ID)),
        is_active: Set(true),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;
    println!("  Created administrator: admin@example.com");
    Ok(())
}

async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());
    let mut ids: HashMap<&str, Uuid> = HashMap::new();
    let mut created = 0;

    for &(code, parent_code, name, arabic_name, account_type, opening) in CHART_OF_ACCOUNTS {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::FiscalYearId.eq(DEFAULT_FISCAL_YEAR_ID))
            .filter(accounts::Column::Code.eq(code))
            .one(db)
            .await?;
        if let Some(account) = existing {
            ids.insert(code, account.id);
            continue;
        }

        let parent_id = match parent_code {
            Some(parent) => Some(
                *ids.get(parent)
                    .with_context(|| format!("parent {parent} of account {code} not seeded"))?,
            ),
            None => None,
        };

        let account = repo
            .create_account(CreateAccountInput {
                fiscal_year_id: DEFAULT_FISCAL_YEAR_ID,
                code: code.to_string(),
                name: name.to_string(),
                arabic_name: arabic_name.to_string(),
                account_type,
                parent_id,
                opening_balance: Decimal::from(opening),
            })
            .await?;
        ids.insert(code, account.id);
        created += 1;
    }

    println!("  Created {created} accounts");
    Ok(())
}

async fn seed_categories(db: &DatabaseConnection) -> anyhow::Result<HashMap<&'static str, Uuid>> {
    let mut ids = HashMap::new();

    for &(name, arabic_name, parent) in CATEGORIES {
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(db)
            .await?;
        if let Some(category) = existing {
            ids.insert(name, category.id);
            continue;
        }

        let parent_id = parent.and_then(|p| ids.get(p).copied());
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            arabic_name: Set(arabic_name.to_string()),
            parent_id: Set(parent_id),
            is_active: Set(true),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(db)
        .await?;
        ids.insert(name, category.id);
        println!("  Created category: {name}");
    }

    Ok(ids)
}

async fn seed_warehouse(db: &DatabaseConnection) -> anyhow::Result<()> {
    if warehouses::Entity::find_by_id(DEFAULT_WAREHOUSE_ID)
        .one(db)
        .await?
        .is_some()
    {
        println!("  Main warehouse already exists, skipping...");
        return Ok(());
    }

    warehouses::ActiveModel {
        id: Set(DEFAULT_WAREHOUSE_ID),
        branch_id: Set(DEFAULT_BRANCH_ID),
        code: Set("MAIN".to_string()),
        name: Set("Main Warehouse".to_string()),
        arabic_name: Set("المخزن الرئيسي".to_string()),
        address: Set(Some("Riyadh, Al Malaz".to_string())),
        manager: Set(Some("Warehouse Manager".to_string())),
        is_active: Set(true),
        created_at: Set(now()),
        updated_at: Set(now()),
    }
    .insert(db)
    .await?;
    println!("  Created warehouse: MAIN");
    Ok(())
}

async fn seed_customers(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = CustomerRepository::new(db.clone());
    let samples = [
        CreateCustomerInput {
            branch_id: DEFAULT_BRANCH_ID,
            code: "CUST001".to_string(),
            name: "Ahmed Mohammed".to_string(),
            arabic_name: "أحمد محمد".to_string(),
            customer_type: CustomerType::Individual,
            tax_number: None,
            commercial: None,
            address: Some("Riyadh, Al Nakheel".to_string()),
            city: Some("Riyadh".to_string()),
            phone: Some("+966501234567".to_string()),
            mobile: None,
            email: Some("ahmed@example.com".to_string()),
            credit_limit: Decimal::from(10_000),
            payment_terms: 30,
            sales_rep: None,
        },
        CreateCustomerInput {
            branch_id: DEFAULT_BRANCH_ID,
            code: "CUST002".to_string(),
            name: "Sarah Ali".to_string(),
            arabic_name: "سارة علي".to_string(),
            customer_type: CustomerType::Individual,
            tax_number: None,
            commercial: None,
            address: Some("Jeddah, Al Hamra".to_string()),
            city: Some("Jeddah".to_string()),
            phone: Some("+966507654321".to_string()),
            mobile: None,
            email: Some("sarah@example.com".to_string()),
            credit_limit: Decimal::from(5_000),
            payment_terms: 15,
            sales_rep: None,
        },
        CreateCustomerInput {
            branch_id: DEFAULT_BRANCH_ID,
            code: "CUST003".to_string(),
            name: "Tech Solutions Company".to_string(),
            arabic_name: "شركة الحلول التقنية".to_string(),
            customer_type: CustomerType::Company,
            tax_number: Some("300456789123001".to_string()),
            commercial: Some("1010456789".to_string()),
            address: Some("Riyadh, Al Olaya".to_string()),
            city: Some("Riyadh".to_string()),
            phone: Some("+966114567890".to_string()),
            mobile: None,
            email: Some("info@techsolutions.com".to_string()),
            credit_limit: Decimal::from(50_000),
            payment_terms: 45,
            sales_rep: None,
        },
    ];

    for input in samples {
        let exists = customers::Entity::find()
            .filter(customers::Column::BranchId.eq(input.branch_id))
            .filter(customers::Column::Code.eq(input.code.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            println!("  Customer {} already exists, skipping...", input.code);
            continue;
        }
        let customer = repo.create_customer(input).await?;
        println!("  Created customer: {}", customer.code);
    }
    Ok(())
}

async fn seed_suppliers(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = SupplierRepository::new(db.clone());
    let samples = [
        CreateSupplierInput {
            branch_id: DEFAULT_BRANCH_ID,
            code: "SUPP001".to_string(),
            name: "Electronics Wholesale".to_string(),
            arabic_name: "تجارة الإلكترونيات بالجملة".to_string(),
            supplier_type: SupplierType::Local,
            tax_number: Some("300789123456001".to_string()),
            commercial: Some("1010789123".to_string()),
            address: Some("Dammam, Commercial District".to_string()),
            city: Some("Dammam".to_string()),
            phone: Some("+966112345678".to_string()),
            mobile: None,
            email: Some("info@electronics-wholesale.com".to_string()),
            credit_limit: Decimal::from(100_000),
            payment_terms: 30,
        },
        CreateSupplierInput {
            branch_id: DEFAULT_BRANCH_ID,
            code: "SUPP002".to_string(),
            name: "Office Supplies Co.".to_string(),
            arabic_name: "شركة المستلزمات المكتبية".to_string(),
            supplier_type: SupplierType::Local,
            tax_number: None,
            commercial: None,
            address: Some("Riyadh, Industrial Area".to_string()),
            city: Some("Riyadh".to_string()),
            phone: Some("+966113456789".to_string()),
            mobile: None,
            email: Some("orders@officesupplies.com".to_string()),
            credit_limit: Decimal::from(25_000),
            payment_terms: 15,
        },
    ];

    for input in samples {
        let exists = suppliers::Entity::find()
            .filter(suppliers::Column::BranchId.eq(input.branch_id))
            .filter(suppliers::Column::Code.eq(input.code.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            println!("  Supplier {} already exists, skipping...", input.code);
            continue;
        }
        let supplier = repo.create_supplier(input).await?;
        println!("  Created supplier: {}", supplier.code);
    }
    Ok(())
}

async fn seed_products(
    db: &DatabaseConnection,
    category_ids: &HashMap<&'static str, Uuid>,
) -> anyhow::Result<()> {
    let repo = ProductRepository::new(db.clone());
    let category = |name: &str| {
        category_ids
            .get(name)
            .copied()
            .with_context(|| format!("category {name} not seeded"))
    };

    let samples = [
        CreateProductInput {
            category_id: category("Computers")?,
            code: "PROD001".to_string(),
            barcode: Some("1234567890123".to_string()),
            name: "Dell Laptop Inspiron 15".to_string(),
            arabic_name: "لابتوب ديل إنسبايرون 15".to_string(),
            description: Some("15 inch laptop with Intel Core i5".to_string()),
            unit: "piece".to_string(),
            cost_price: Decimal::from(2_500),
            sale_price: Decimal::from(3_200),
            min_stock: Decimal::from(5),
            has_expiry: false,
            track_serial: true,
        },
        CreateProductInput {
            category_id: category("Mobile Phones")?,
            code: "PROD002".to_string(),
            barcode: Some("2345678901234".to_string()),
            name: "Samsung Galaxy A54".to_string(),
            arabic_name: "سامسونج غالاكسي A54".to_string(),
            description: Some("Samsung Galaxy A54, 128 GB".to_string()),
            unit: "piece".to_string(),
            cost_price: Decimal::from(1_200),
            sale_price: Decimal::from(1_650),
            min_stock: Decimal::from(10),
            has_expiry: false,
            track_serial: true,
        },
        CreateProductInput {
            category_id: category("Office Supplies")?,
            code: "PROD003".to_string(),
            barcode: Some("3456789012345".to_string()),
            name: "A4 Paper Ream".to_string(),
            arabic_name: "رزمة ورق A4".to_string(),
            description: Some("White A4 paper, 500 sheets".to_string()),
            unit: "ream".to_string(),
            cost_price: Decimal::from(15),
            sale_price: Decimal::from(25),
            min_stock: Decimal::from(20),
            has_expiry: false,
            track_serial: false,
        },
    ];

    for input in samples {
        let exists = products::Entity::find()
            .filter(products::Column::Code.eq(input.code.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            println!("  Product {} already exists, skipping...", input.code);
            continue;
        }
        let product = repo.create_product(input).await?;
        println!("  Created product: {}", product.code);
    }
    Ok(())
}
