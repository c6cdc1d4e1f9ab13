//! Supplier repository for supplier database operations.

use std::collections::HashMap;

use qayd_core::{
    guards::{SupplierDependents, DeletionBlocker, check_supplier_deletion},
    parties::{SupplierType, PartyBalance},
};
use qayd_shared::{AppError, types::PageRequest};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{suppliers, payments, purchase_invoices, sea_orm_active_enums};

/// Error types for supplier operations.
#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    /// Supplier code already exists in the branch.
    #[error("Supplier code '{0}' already exists in this branch")]
    DuplicateCode(String),

    /// Email already used by another active supplier in the branch.
    #[error("Email '{0}' is already used by another supplier")]
    DuplicateEmail(String),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    NotFound(Uuid),

    /// Deletion blocked by invoices or payments.
    #[error(transparent)]
    Blocked(#[from] DeletionBlocker),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SupplierError> for AppError {
    fn from(err: SupplierError) -> Self {
        match err {
            SupplierError::DuplicateCode(_) | SupplierError::DuplicateEmail(_) => {
                Self::Conflict(err.to_string())
            }
            SupplierError::NotFound(_) => Self::NotFound(err.to_string()),
            SupplierError::Blocked(blocker) => Self::BusinessRule(blocker.to_string()),
            SupplierError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Supplier with invoice and payment totals.
#[derive(Debug, Clone)]
pub struct SupplierWithBalance {
    /// The supplier record.
    pub supplier: suppliers::Model,
    /// Invoiced and paid sums.
    pub balance: PartyBalance,
}

/// Input for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    /// Branch that owns the supplier.
    pub branch_id: Uuid,
    /// Supplier code (unique within the branch).
    pub code: String,
    /// Name.
    pub name: String,
    /// Arabic name.
    pub arabic_name: String,
    /// Local or foreign.
    pub supplier_type: SupplierType,
    /// Tax registration number.
    pub tax_number: Option<String>,
    /// Commercial registration number.
    pub commercial: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Landline.
    pub phone: Option<String>,
    /// Mobile phone.
    pub mobile: Option<String>,
    /// Email (unique among active suppliers of the branch).
    pub email: Option<String>,
    /// Credit limit; zero means none.
    pub credit_limit: Decimal,
    /// Payment terms in days.
    pub payment_terms: i32,
}

/// Input for updating a supplier.
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub arabic_name: Option<String>,
    pub supplier_type: Option<SupplierType>,
    pub tax_number: Option<String>,
    pub commercial: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub payment_terms: Option<i32>,
    pub is_active: Option<bool>,
}

/// Filter options for listing suppliers.
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    /// Filter by branch.
    pub branch_id: Option<Uuid>,
    /// Filter by supplier type.
    pub supplier_type: Option<SupplierType>,
    /// Matches code, names, phones or email.
    pub search: Option<String>,
    /// Include deactivated suppliers.
    pub include_inactive: bool,
}

/// Supplier repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: DatabaseConnection,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists suppliers ordered by code, with their balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_suppliers(
        &self,
        filter: SupplierFilter,
        page: PageRequest,
    ) -> Result<(Vec<SupplierWithBalance>, u64), SupplierError> {
        let mut query = suppliers::Entity::find();

        if !filter.include_inactive {
            query = query.filter(suppliers::Column::IsActive.eq(true));
        }
        if let Some(branch_id) = filter.branch_id {
            query = query.filter(suppliers::Column::BranchId.eq(branch_id));
        }
        if let Some(supplier_type) = filter.supplier_type {
            let supplier_type: sea_orm_active_enums::SupplierType = supplier_type.into();
            query = query.filter(suppliers::Column::SupplierType.eq(supplier_type));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(suppliers::Column::Code.contains(search))
                    .add(suppliers::Column::Name.contains(search))
                    .add(suppliers::Column::ArabicName.contains(search))
                    .add(suppliers::Column::Phone.contains(search))
                    .add(suppliers::Column::Mobile.contains(search))
                    .add(suppliers::Column::Email.contains(search)),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(suppliers::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let mut balances = self.balances(&ids).await?;

        let items = rows
            .into_iter()
            .map(|supplier| SupplierWithBalance {
                balance: balances.remove(&supplier.id).unwrap_or_default(),
                supplier,
            })
            .collect();

        Ok((items, total))
    }

    /// Finds a supplier with its balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_supplier(
        &self,
        id: Uuid,
    ) -> Result<Option<SupplierWithBalance>, SupplierError> {
        let Some(supplier) = suppliers::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let balance = self
            .balances(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(Some(SupplierWithBalance { supplier, balance }))
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code already exists in the branch
    /// - The email is used by another active supplier in the branch
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let existing = suppliers::Entity::find()
            .filter(suppliers::Column::BranchId.eq(input.branch_id))
            .filter(suppliers::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(SupplierError::DuplicateCode(input.code));
        }

        if let Some(email) = &input.email {
            self.ensure_email_free(input.branch_id, email, None).await?;
        }

        let now = chrono::Utc::now().into();
        let supplier = suppliers::ActiveModel {
            id: Set(Uuid::new_v4()),
            branch_id: Set(input.branch_id),
            code: Set(input.code),
            name: Set(input.name),
            arabic_name: Set(input.arabic_name),
            supplier_type: Set(input.supplier_type.into()),
            tax_number: Set(input.tax_number),
            commercial: Set(input.commercial),
            address: Set(input.address),
            city: Set(input.city),
            phone: Set(input.phone),
            mobile: Set(input.mobile),
            email: Set(input.email),
            credit_limit: Set(input.credit_limit),
            payment_terms: Set(input.payment_terms),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(supplier.insert(&self.db).await?)
    }

    /// Updates a supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Supplier not found
    /// - The new email is used by another active supplier in the branch
    pub async fn update_supplier(
        &self,
        id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let supplier = suppliers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SupplierError::NotFound(id))?;

        if let Some(email) = &input.email
            && supplier.email.as_ref() != Some(email)
        {
            self.ensure_email_free(supplier.branch_id, email, Some(id))
                .await?;
        }

        let mut active: suppliers::ActiveModel = supplier.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(arabic_name) = input.arabic_name {
            active.arabic_name = Set(arabic_name);
        }
        if let Some(supplier_type) = input.supplier_type {
            active.supplier_type = Set(supplier_type.into());
        }
        if let Some(tax_number) = input.tax_number {
            active.tax_number = Set(Some(tax_number));
        }
        if let Some(commercial) = input.commercial {
            active.commercial = Set(Some(commercial));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(city) = input.city {
            active.city = Set(Some(city));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(mobile) = input.mobile {
            active.mobile = Set(Some(mobile));
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(credit_limit) = input.credit_limit {
            active.credit_limit = Set(credit_limit);
        }
        if let Some(payment_terms) = input.payment_terms {
            active.payment_terms = Set(payment_terms);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a supplier without invoices or payments.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Supplier not found
    /// - Supplier has purchase invoices or payments
    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), SupplierError> {
        suppliers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SupplierError::NotFound(id))?;

        let purchase_invoices = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::SupplierId.eq(id))
            .count(&self.db)
            .await?;
        let payments = payments::Entity::find()
            .filter(payments::Column::SupplierId.eq(id))
            .count(&self.db)
            .await?;

        check_supplier_deletion(SupplierDependents {
            purchase_invoices,
            payments,
        })?;

        suppliers::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn ensure_email_free(
        &self,
        branch_id: Uuid,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<(), SupplierError> {
        let mut query = suppliers::Entity::find()
            .filter(suppliers::Column::BranchId.eq(branch_id))
            .filter(suppliers::Column::Email.eq(email))
            .filter(suppliers::Column::IsActive.eq(true));
        if let Some(id) = except {
            query = query.filter(suppliers::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(SupplierError::DuplicateEmail(email.to_string()));
        }
        Ok(())
    }

    /// Sums invoices and payments per supplier.
    async fn balances(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, PartyBalance>, SupplierError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let invoiced: Vec<(Uuid, Option<Decimal>)> = purchase_invoices::Entity::find()
            .select_only()
            .column(purchase_invoices::Column::SupplierId)
            .column_as(purchase_invoices::Column::TotalAmount.sum(), "invoiced")
            .filter(purchase_invoices::Column::SupplierId.is_in(ids.iter().copied()))
            .group_by(purchase_invoices::Column::SupplierId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let paid: Vec<(Uuid, Option<Decimal>)> = payments::Entity::find()
            .select_only()
            .column(payments::Column::SupplierId)
            .column_as(payments::Column::Amount.sum(), "paid")
            .filter(payments::Column::SupplierId.is_in(ids.iter().copied()))
            .group_by(payments::Column::SupplierId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut balances: HashMap<Uuid, PartyBalance> = HashMap::new();
        for (id, sum) in invoiced {
            balances.entry(id).or_default().invoiced = sum.unwrap_or_default();
        }
        for (id, sum) in paid {
            balances.entry(id).or_default().settled = sum.unwrap_or_default();
        }
        Ok(balances)
    }
}
