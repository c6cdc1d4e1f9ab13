//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod branches;
pub mod categories;
pub mod companies;
pub mod customers;
pub mod fiscal_years;
pub mod inventory_items;
pub mod journal_entries;
pub mod payments;
pub mod products;
pub mod purchase_invoice_items;
pub mod purchase_invoices;
pub mod receipts;
pub mod sales_invoice_items;
pub mod sales_invoices;
pub mod sea_orm_active_enums;
pub mod suppliers;
pub mod transactions;
pub mod users;
pub mod warehouses;
