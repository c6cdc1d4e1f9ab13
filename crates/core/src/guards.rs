//! Dependency checks that block deletion.
//!
//! Repositories count the dependent rows and hand the counts to these
//! functions. Any non-zero count rejects the deletion before anything is
//! written.

use thiserror::Error;

use crate::ledger::{TransactionStatus, ensure_deletable};

/// Reason a record cannot be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeletionBlocker {
    /// Account has child accounts.
    #[error("Cannot delete account: it has {0} child account(s)")]
    ChildAccounts(u64),

    /// Account is referenced by journal entry lines.
    #[error("Cannot delete account: it is used by {0} journal entry line(s)")]
    AccountEntries(u64),

    /// Transaction has been posted.
    #[error("Cannot delete a posted transaction")]
    PostedTransaction,

    /// Customer has sales invoices.
    #[error("Cannot delete customer: it has {0} sales invoice(s)")]
    CustomerInvoices(u64),

    /// Customer has receipts.
    #[error("Cannot delete customer: it has {0} receipt(s)")]
    CustomerReceipts(u64),

    /// Supplier has purchase invoices.
    #[error("Cannot delete supplier: it has {0} purchase invoice(s)")]
    SupplierInvoices(u64),

    /// Supplier has payments.
    #[error("Cannot delete supplier: it has {0} payment(s)")]
    SupplierPayments(u64),

    /// Product has inventory records.
    #[error("Cannot delete product: it has {0} inventory record(s)")]
    ProductInventory(u64),

    /// Product appears on sales or purchase invoices.
    #[error("Cannot delete product: it appears on {0} invoice item(s)")]
    ProductInvoiceItems(u64),
}

/// Rows that reference an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountDependents {
    /// Accounts whose parent is this account.
    pub children: u64,
    /// Entry lines debiting or crediting this account.
    pub entry_lines: u64,
}

/// Rows that reference a customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerDependents {
    /// Sales invoices billed to the customer.
    pub sales_invoices: u64,
    /// Receipts collected from the customer.
    pub receipts: u64,
}

/// Rows that reference a supplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupplierDependents {
    /// Purchase invoices from the supplier.
    pub purchase_invoices: u64,
    /// Payments made to the supplier.
    pub payments: u64,
}

/// Rows that reference a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductDependents {
    /// Stock records in any warehouse.
    pub inventory_items: u64,
    /// Lines on sales invoices.
    pub sales_items: u64,
    /// Lines on purchase invoices.
    pub purchase_items: u64,
}

/// Checks whether an account may be deleted.
///
/// # Errors
///
/// Blocked while the account has children or entry lines.
pub const fn check_account_deletion(deps: AccountDependents) -> Result<(), DeletionBlocker> {
    if deps.children > 0 {
        return Err(DeletionBlocker::ChildAccounts(deps.children));
    }
    if deps.entry_lines > 0 {
        return Err(DeletionBlocker::AccountEntries(deps.entry_lines));
    }
    Ok(())
}

/// Checks whether a transaction may be deleted.
///
/// # Errors
///
/// Blocked once the transaction is posted.
pub fn check_transaction_deletion(status: TransactionStatus) -> Result<(), DeletionBlocker> {
    ensure_deletable(status).map_err(|_| DeletionBlocker::PostedTransaction)
}

/// Checks whether a customer may be deleted.
///
/// # Errors
///
/// Blocked while the customer has invoices or receipts.
pub const fn check_customer_deletion(deps: CustomerDependents) -> Result<(), DeletionBlocker> {
    if deps.sales_invoices > 0 {
        return Err(DeletionBlocker::CustomerInvoices(deps.sales_invoices));
    }
    if deps.receipts > 0 {
        return Err(DeletionBlocker::CustomerReceipts(deps.receipts));
    }
    Ok(())
}

/// Checks whether a supplier may be deleted.
///
/// # Errors
///
/// Blocked while the supplier has invoices or payments.
pub const fn check_supplier_deletion(deps: SupplierDependents) -> Result<(), DeletionBlocker> {
    if deps.purchase_invoices > 0 {
        return Err(DeletionBlocker::SupplierInvoices(deps.purchase_invoices));
    }
    if deps.payments > 0 {
        return Err(DeletionBlocker::SupplierPayments(deps.payments));
    }
    Ok(())
}

/// Checks whether a product may be deleted.
///
/// # Errors
///
/// Blocked while the product has stock records or invoice lines.
pub const fn check_product_deletion(deps: ProductDependents) -> Result<(), DeletionBlocker> {
    if deps.inventory_items > 0 {
        return Err(DeletionBlocker::ProductInventory(deps.inventory_items));
    }
    let invoice_items = deps.sales_items.saturating_add(deps.purchase_items);
    if invoice_items > 0 {
        return Err(DeletionBlocker::ProductInvoiceItems(invoice_items));
    }
    Ok(())
}
