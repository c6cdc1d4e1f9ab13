//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::branches::Entity as Branches;
pub use super::categories::Entity as Categories;
pub use super::companies::Entity as Companies;
pub use super::customers::Entity as Customers;
pub use super::fiscal_years::Entity as FiscalYears;
pub use super::inventory_items::Entity as InventoryItems;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::payments::Entity as Payments;
pub use super::products::Entity as Products;
pub use super::purchase_invoice_items::Entity as PurchaseInvoiceItems;
pub use super::purchase_invoices::Entity as PurchaseInvoices;
pub use super::receipts::Entity as Receipts;
pub use super::sales_invoice_items::Entity as SalesInvoiceItems;
pub use super::sales_invoices::Entity as SalesInvoices;
pub use super::suppliers::Entity as Suppliers;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
pub use super::warehouses::Entity as Warehouses;
