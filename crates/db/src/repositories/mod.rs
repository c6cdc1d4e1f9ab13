//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod customer;
pub mod fiscal;
pub mod product;
pub mod supplier;
pub mod transaction;

pub use account::{
    AccountError, AccountFilter, AccountRepository, AccountWithRelations, CreateAccountInput,
    UpdateAccountInput,
};
pub use customer::{
    CreateCustomerInput, CustomerError, CustomerFilter, CustomerRepository, CustomerWithBalance,
    UpdateCustomerInput,
};
pub use fiscal::{FiscalError, FiscalRepository};
pub use product::{
    CreateProductInput, InventoryWithWarehouse, ProductError, ProductFilter, ProductRepository,
    ProductWithStock, UpdateProductInput,
};
pub use supplier::{
    CreateSupplierInput, SupplierError, SupplierFilter, SupplierRepository, SupplierWithBalance,
    UpdateSupplierInput,
};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    TransactionWithEntries,
};
