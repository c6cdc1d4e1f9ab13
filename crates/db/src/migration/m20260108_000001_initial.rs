//! Initial database migration.
//!
//! Creates the organization, ledger, party, catalog and invoicing tables.
//! Built with the schema builder so the same migration runs on PostgreSQL
//! and SQLite.

use sea_orm_migration::{prelude::*, schema::*};

const ENUM_LEN: u32 = 16;
const MONEY_PRECISION: u32 = 16;
const MONEY_SCALE: u32 = 4;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: ORGANIZATION
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(pk_uuid(Companies::Id))
                    .col(string(Companies::Name))
                    .col(string(Companies::ArabicName))
                    .col(string_null(Companies::TaxNumber))
                    .col(string_null(Companies::Commercial))
                    .col(string_null(Companies::Address))
                    .col(string_null(Companies::Phone))
                    .col(string_null(Companies::Email))
                    .col(boolean(Companies::IsActive).default(true))
                    .col(timestamp_with_time_zone(Companies::CreatedAt))
                    .col(timestamp_with_time_zone(Companies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(pk_uuid(Branches::Id))
                    .col(uuid(Branches::CompanyId))
                    .col(string(Branches::Name))
                    .col(string(Branches::ArabicName))
                    .col(string_null(Branches::Address))
                    .col(string_null(Branches::Phone))
                    .col(string_null(Branches::Manager))
                    .col(boolean(Branches::IsActive).default(true))
                    .col(timestamp_with_time_zone(Branches::CreatedAt))
                    .col(timestamp_with_time_zone(Branches::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_branches_company")
                            .from(Branches::Table, Branches::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FiscalYears::Table)
                    .if_not_exists()
                    .col(pk_uuid(FiscalYears::Id))
                    .col(uuid(FiscalYears::CompanyId))
                    .col(string(FiscalYears::Name))
                    .col(date(FiscalYears::StartDate))
                    .col(date(FiscalYears::EndDate))
                    .col(boolean(FiscalYears::IsCurrent).default(false))
                    .col(boolean(FiscalYears::IsClosed).default(false))
                    .col(timestamp_with_time_zone(FiscalYears::CreatedAt))
                    .col(timestamp_with_time_zone(FiscalYears::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fiscal_years_company")
                            .from(FiscalYears::Table, FiscalYears::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::FullName))
                    .col(string_len(Users::Role, ENUM_LEN))
                    .col(uuid_null(Users::BranchId))
                    .col(boolean(Users::IsActive).default(true))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_branch")
                            .from(Users::Table, Users::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: LEDGER
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_uuid(Accounts::Id))
                    .col(uuid(Accounts::FiscalYearId))
                    .col(string(Accounts::Code))
                    .col(string(Accounts::Name))
                    .col(string(Accounts::ArabicName))
                    .col(string_len(Accounts::AccountType, ENUM_LEN))
                    .col(uuid_null(Accounts::ParentId))
                    .col(integer(Accounts::Level).default(1))
                    .col(boolean(Accounts::IsParent).default(false))
                    .col(decimal_len(Accounts::OpeningBalance, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len(Accounts::CurrentBalance, MONEY_PRECISION, MONEY_SCALE))
                    .col(boolean(Accounts::IsActive).default(true))
                    .col(timestamp_with_time_zone(Accounts::CreatedAt))
                    .col(timestamp_with_time_zone(Accounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_fiscal_year")
                            .from(Accounts::Table, Accounts::FiscalYearId)
                            .to(FiscalYears::Table, FiscalYears::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_parent")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_accounts_fiscal_year_code")
                    .table(Accounts::Table)
                    .col(Accounts::FiscalYearId)
                    .col(Accounts::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_parent")
                    .table(Accounts::Table)
                    .col(Accounts::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Transactions::Id))
                    .col(uuid(Transactions::FiscalYearId))
                    .col(uuid(Transactions::BranchId))
                    .col(uuid(Transactions::UserId))
                    .col(string(Transactions::Number))
                    .col(big_integer(Transactions::Sequence))
                    .col(date(Transactions::Date))
                    .col(string(Transactions::Description))
                    .col(string_null(Transactions::Reference))
                    .col(string_len(Transactions::TransactionType, ENUM_LEN))
                    .col(string_len(Transactions::Status, ENUM_LEN))
                    .col(decimal_len(Transactions::TotalAmount, MONEY_PRECISION, MONEY_SCALE))
                    .col(timestamp_with_time_zone_null(Transactions::PostedAt))
                    .col(timestamp_with_time_zone(Transactions::CreatedAt))
                    .col(timestamp_with_time_zone(Transactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_fiscal_year")
                            .from(Transactions::Table, Transactions::FiscalYearId)
                            .to(FiscalYears::Table, FiscalYears::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_branch")
                            .from(Transactions::Table, Transactions::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Numbering relies on these two: concurrent creates collide here
        // instead of issuing the same number twice.
        manager
            .create_index(
                Index::create()
                    .name("uq_transactions_fiscal_year_sequence")
                    .table(Transactions::Table)
                    .col(Transactions::FiscalYearId)
                    .col(Transactions::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_transactions_fiscal_year_number")
                    .table(Transactions::Table)
                    .col(Transactions::FiscalYearId)
                    .col(Transactions::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_date")
                    .table(Transactions::Table)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(pk_uuid(JournalEntries::Id))
                    .col(uuid(JournalEntries::TransactionId))
                    .col(integer(JournalEntries::LineNo))
                    .col(uuid_null(JournalEntries::DebitAccountId))
                    .col(uuid_null(JournalEntries::CreditAccountId))
                    .col(decimal_len(JournalEntries::Amount, MONEY_PRECISION, MONEY_SCALE))
                    .col(string_null(JournalEntries::Description))
                    .col(timestamp_with_time_zone(JournalEntries::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_transaction")
                            .from(JournalEntries::Table, JournalEntries::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_debit_account")
                            .from(JournalEntries::Table, JournalEntries::DebitAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_credit_account")
                            .from(JournalEntries::Table, JournalEntries::CreditAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_journal_entries_transaction", JournalEntries::TransactionId),
            ("idx_journal_entries_debit", JournalEntries::DebitAccountId),
            ("idx_journal_entries_credit", JournalEntries::CreditAccountId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(JournalEntries::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // ============================================================
        // PART 3: CUSTOMERS & SUPPLIERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Customers::Id))
                    .col(uuid(Customers::BranchId))
                    .col(string(Customers::Code))
                    .col(string(Customers::Name))
                    .col(string(Customers::ArabicName))
                    .col(string_len(Customers::CustomerType, ENUM_LEN))
                    .col(string_null(Customers::TaxNumber))
                    .col(string_null(Customers::Commercial))
                    .col(string_null(Customers::Address))
                    .col(string_null(Customers::City))
                    .col(string_null(Customers::Phone))
                    .col(string_null(Customers::Mobile))
                    .col(string_null(Customers::Email))
                    .col(decimal_len(Customers::CreditLimit, MONEY_PRECISION, MONEY_SCALE))
                    .col(integer(Customers::PaymentTerms).default(0))
                    .col(string_null(Customers::SalesRep))
                    .col(boolean(Customers::IsActive).default(true))
                    .col(timestamp_with_time_zone(Customers::CreatedAt))
                    .col(timestamp_with_time_zone(Customers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_branch")
                            .from(Customers::Table, Customers::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_customers_branch_code")
                    .table(Customers::Table)
                    .col(Customers::BranchId)
                    .col(Customers::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Suppliers::Id))
                    .col(uuid(Suppliers::BranchId))
                    .col(string(Suppliers::Code))
                    .col(string(Suppliers::Name))
                    .col(string(Suppliers::ArabicName))
                    .col(string_len(Suppliers::SupplierType, ENUM_LEN))
                    .col(string_null(Suppliers::TaxNumber))
                    .col(string_null(Suppliers::Commercial))
                    .col(string_null(Suppliers::Address))
                    .col(string_null(Suppliers::City))
                    .col(string_null(Suppliers::Phone))
                    .col(string_null(Suppliers::Mobile))
                    .col(string_null(Suppliers::Email))
                    .col(decimal_len(Suppliers::CreditLimit, MONEY_PRECISION, MONEY_SCALE))
                    .col(integer(Suppliers::PaymentTerms).default(0))
                    .col(boolean(Suppliers::IsActive).default(true))
                    .col(timestamp_with_time_zone(Suppliers::CreatedAt))
                    .col(timestamp_with_time_zone(Suppliers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suppliers_branch")
                            .from(Suppliers::Table, Suppliers::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_suppliers_branch_code")
                    .table(Suppliers::Table)
                    .col(Suppliers::BranchId)
                    .col(Suppliers::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: CATALOG & INVENTORY
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_uuid(Categories::Id))
                    .col(string(Categories::Name))
                    .col(string(Categories::ArabicName))
                    .col(uuid_null(Categories::ParentId))
                    .col(boolean(Categories::IsActive).default(true))
                    .col(timestamp_with_time_zone(Categories::CreatedAt))
                    .col(timestamp_with_time_zone(Categories::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id))
                    .col(uuid(Products::CategoryId))
                    .col(string(Products::Code).unique_key())
                    .col(string_null(Products::Barcode))
                    .col(string(Products::Name))
                    .col(string(Products::ArabicName))
                    .col(text_null(Products::Description))
                    .col(string(Products::Unit))
                    .col(decimal_len(Products::CostPrice, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len(Products::SalePrice, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len(Products::MinStock, MONEY_PRECISION, MONEY_SCALE))
                    .col(boolean(Products::HasExpiry).default(false))
                    .col(boolean(Products::TrackSerial).default(false))
                    .col(boolean(Products::IsActive).default(true))
                    .col(timestamp_with_time_zone(Products::CreatedAt))
                    .col(timestamp_with_time_zone(Products::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_barcode")
                    .table(Products::Table)
                    .col(Products::Barcode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(pk_uuid(Warehouses::Id))
                    .col(uuid(Warehouses::BranchId))
                    .col(string(Warehouses::Code).unique_key())
                    .col(string(Warehouses::Name))
                    .col(string(Warehouses::ArabicName))
                    .col(string_null(Warehouses::Address))
                    .col(string_null(Warehouses::Manager))
                    .col(boolean(Warehouses::IsActive).default(true))
                    .col(timestamp_with_time_zone(Warehouses::CreatedAt))
                    .col(timestamp_with_time_zone(Warehouses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warehouses_branch")
                            .from(Warehouses::Table, Warehouses::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(pk_uuid(InventoryItems::Id))
                    .col(uuid(InventoryItems::WarehouseId))
                    .col(uuid(InventoryItems::ProductId))
                    .col(decimal_len(InventoryItems::Quantity, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len(InventoryItems::ReservedQty, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len(InventoryItems::AvgCost, MONEY_PRECISION, MONEY_SCALE))
                    .col(decimal_len(InventoryItems::LastCost, MONEY_PRECISION, MONEY_SCALE))
                    .col(date_null(InventoryItems::ExpiryDate))
                    .col(string_null(InventoryItems::BatchNo))
                    .col(string_null(InventoryItems::SerialNo))
                    .col(timestamp_with_time_zone(InventoryItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_items_warehouse")
                            .from(InventoryItems::Table, InventoryItems::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_items_product")
                            .from(InventoryItems::Table, InventoryItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_items_product")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::ProductId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: INVOICING
        // ============================================================
        manager
            .create_table(invoice_table(
                SalesInvoices::Table.into_iden(),
                SalesInvoices::CustomerId.into_iden(),
                Customers::Table.into_iden(),
                Customers::Id.into_iden(),
                "sales_invoices",
            ))
            .await?;
        manager
            .create_table(invoice_item_table(
                SalesInvoiceItems::Table.into_iden(),
                SalesInvoices::Table.into_iden(),
                "sales_invoice_items",
            ))
            .await?;
        manager
            .create_table(settlement_table(
                Receipts::Table.into_iden(),
                Receipts::CustomerId.into_iden(),
                Customers::Table.into_iden(),
                Customers::Id.into_iden(),
                SalesInvoices::Table.into_iden(),
                "receipts",
            ))
            .await?;

        manager
            .create_table(invoice_table(
                PurchaseInvoices::Table.into_iden(),
                PurchaseInvoices::SupplierId.into_iden(),
                Suppliers::Table.into_iden(),
                Suppliers::Id.into_iden(),
                "purchase_invoices",
            ))
            .await?;
        manager
            .create_table(invoice_item_table(
                PurchaseInvoiceItems::Table.into_iden(),
                PurchaseInvoices::Table.into_iden(),
                "purchase_invoice_items",
            ))
            .await?;
        manager
            .create_table(settlement_table(
                Payments::Table.into_iden(),
                Payments::SupplierId.into_iden(),
                Suppliers::Table.into_iden(),
                Suppliers::Id.into_iden(),
                PurchaseInvoices::Table.into_iden(),
                "payments",
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables: [DynIden; 19] = [
            Payments::Table.into_iden(),
            PurchaseInvoiceItems::Table.into_iden(),
            PurchaseInvoices::Table.into_iden(),
            Receipts::Table.into_iden(),
            SalesInvoiceItems::Table.into_iden(),
            SalesInvoices::Table.into_iden(),
            InventoryItems::Table.into_iden(),
            Warehouses::Table.into_iden(),
            Products::Table.into_iden(),
            Categories::Table.into_iden(),
            Suppliers::Table.into_iden(),
            Customers::Table.into_iden(),
            JournalEntries::Table.into_iden(),
            Transactions::Table.into_iden(),
            Accounts::Table.into_iden(),
            Users::Table.into_iden(),
            FiscalYears::Table.into_iden(),
            Branches::Table.into_iden(),
            Companies::Table.into_iden(),
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

/// Sales and purchase invoices share one layout.
fn invoice_table(
    table: DynIden,
    party_column: DynIden,
    party_table: DynIden,
    party_id: DynIden,
    name: &str,
) -> TableCreateStatement {
    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(pk_uuid(Invoice::Id))
        .col(uuid(party_column.clone()))
        .col(string(Invoice::Number).unique_key())
        .col(date(Invoice::Date))
        .col(date_null(Invoice::DueDate))
        .col(string_null(Invoice::Reference))
        .col(text_null(Invoice::Notes))
        .col(decimal_len(Invoice::Subtotal, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(Invoice::TaxAmount, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(Invoice::DiscountAmount, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(Invoice::TotalAmount, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(Invoice::PaidAmount, MONEY_PRECISION, MONEY_SCALE))
        .col(string_len(Invoice::Status, ENUM_LEN))
        .col(timestamp_with_time_zone(Invoice::CreatedAt))
        .col(timestamp_with_time_zone(Invoice::UpdatedAt))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_party"))
                .from(table, party_column)
                .to(party_table, party_id),
        )
        .to_owned()
}

fn invoice_item_table(table: DynIden, invoice_table: DynIden, name: &str) -> TableCreateStatement {
    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(pk_uuid(InvoiceItem::Id))
        .col(uuid(InvoiceItem::InvoiceId))
        .col(uuid(InvoiceItem::ProductId))
        .col(decimal_len(InvoiceItem::Quantity, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(InvoiceItem::UnitPrice, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(InvoiceItem::Discount, MONEY_PRECISION, MONEY_SCALE))
        .col(decimal_len(InvoiceItem::Total, MONEY_PRECISION, MONEY_SCALE))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_invoice"))
                .from(table.clone(), InvoiceItem::InvoiceId)
                .to(invoice_table, Invoice::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_product"))
                .from(table, InvoiceItem::ProductId)
                .to(Products::Table, Products::Id),
        )
        .to_owned()
}

/// Receipts and payments share one layout.
fn settlement_table(
    table: DynIden,
    party_column: DynIden,
    party_table: DynIden,
    party_id: DynIden,
    invoice_table: DynIden,
    name: &str,
) -> TableCreateStatement {
    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(pk_uuid(Settlement::Id))
        .col(uuid(party_column.clone()))
        .col(uuid_null(Settlement::InvoiceId))
        .col(string(Settlement::Number).unique_key())
        .col(date(Settlement::Date))
        .col(decimal_len(Settlement::Amount, MONEY_PRECISION, MONEY_SCALE))
        .col(string_len(Settlement::Method, ENUM_LEN))
        .col(string_null(Settlement::Reference))
        .col(text_null(Settlement::Notes))
        .col(timestamp_with_time_zone(Settlement::CreatedAt))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_party"))
                .from(table.clone(), party_column)
                .to(party_table, party_id),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_invoice"))
                .from(table, Settlement::InvoiceId)
                .to(invoice_table, Invoice::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    ArabicName,
    TaxNumber,
    Commercial,
    Address,
    Phone,
    Email,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Branches {
    Table,
    Id,
    CompanyId,
    Name,
    ArabicName,
    Address,
    Phone,
    Manager,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FiscalYears {
    Table,
    Id,
    CompanyId,
    Name,
    StartDate,
    EndDate,
    IsCurrent,
    IsClosed,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FullName,
    Role,
    BranchId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    FiscalYearId,
    Code,
    Name,
    ArabicName,
    AccountType,
    ParentId,
    Level,
    IsParent,
    OpeningBalance,
    CurrentBalance,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    FiscalYearId,
    BranchId,
    UserId,
    Number,
    Sequence,
    Date,
    Description,
    Reference,
    TransactionType,
    Status,
    TotalAmount,
    PostedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    TransactionId,
    LineNo,
    DebitAccountId,
    CreditAccountId,
    Amount,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    BranchId,
    Code,
    Name,
    ArabicName,
    CustomerType,
    TaxNumber,
    Commercial,
    Address,
    City,
    Phone,
    Mobile,
    Email,
    CreditLimit,
    PaymentTerms,
    SalesRep,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    BranchId,
    Code,
    Name,
    ArabicName,
    SupplierType,
    TaxNumber,
    Commercial,
    Address,
    City,
    Phone,
    Mobile,
    Email,
    CreditLimit,
    PaymentTerms,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    ArabicName,
    ParentId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    CategoryId,
    Code,
    Barcode,
    Name,
    ArabicName,
    Description,
    Unit,
    CostPrice,
    SalePrice,
    MinStock,
    HasExpiry,
    TrackSerial,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Warehouses {
    Table,
    Id,
    BranchId,
    Code,
    Name,
    ArabicName,
    Address,
    Manager,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    WarehouseId,
    ProductId,
    Quantity,
    ReservedQty,
    AvgCost,
    LastCost,
    ExpiryDate,
    BatchNo,
    SerialNo,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SalesInvoices {
    Table,
    CustomerId,
}

#[derive(DeriveIden)]
enum SalesInvoiceItems {
    Table,
}

#[derive(DeriveIden)]
enum PurchaseInvoices {
    Table,
    SupplierId,
}

#[derive(DeriveIden)]
enum PurchaseInvoiceItems {
    Table,
}

#[derive(DeriveIden)]
enum Receipts {
    Table,
    CustomerId,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    SupplierId,
}

/// Columns common to both invoice tables.
#[derive(DeriveIden)]
enum Invoice {
    Id,
    Number,
    Date,
    DueDate,
    Reference,
    Notes,
    Subtotal,
    TaxAmount,
    DiscountAmount,
    TotalAmount,
    PaidAmount,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InvoiceItem {
    Id,
    InvoiceId,
    ProductId,
    Quantity,
    UnitPrice,
    Discount,
    Total,
}

/// Columns common to receipts and payments.
#[derive(DeriveIden)]
enum Settlement {
    Id,
    InvoiceId,
    Number,
    Date,
    Amount,
    Method,
    Reference,
    Notes,
    CreatedAt,
}
