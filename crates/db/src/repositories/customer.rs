//! Customer repository for customer database operations.

use std::collections::HashMap;

use qayd_core::{
    guards::{CustomerDependents, DeletionBlocker, check_customer_deletion},
    parties::{CustomerType, PartyBalance},
};
use qayd_shared::{AppError, types::PageRequest};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{customers, receipts, sales_invoices, sea_orm_active_enums};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer code already exists in the branch.
    #[error("Customer code '{0}' already exists in this branch")]
    DuplicateCode(String),

    /// Email already used by another active customer in the branch.
    #[error("Email '{0}' is already used by another customer")]
    DuplicateEmail(String),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Deletion blocked by invoices or receipts.
    #[error(transparent)]
    Blocked(#[from] DeletionBlocker),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::DuplicateCode(_) | CustomerError::DuplicateEmail(_) => {
                Self::Conflict(err.to_string())
            }
            CustomerError::NotFound(_) => Self::NotFound(err.to_string()),
            CustomerError::Blocked(blocker) => Self::BusinessRule(blocker.to_string()),
            CustomerError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Customer with invoice and receipt totals.
#[derive(Debug, Clone)]
pub struct CustomerWithBalance {
    /// The customer record.
    pub customer: customers::Model,
    /// Invoiced and received sums.
    pub balance: PartyBalance,
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Branch that owns the customer.
    pub branch_id: Uuid,
    /// Customer code (unique within the branch).
    pub code: String,
    /// Name.
    pub name: String,
    /// Arabic name.
    pub arabic_name: String,
    /// Individual or company.
    pub customer_type: CustomerType,
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
    /// Email (unique among active customers of the branch).
    pub email: Option<String>,
    /// Credit limit; zero means none.
    pub credit_limit: Decimal,
    /// Payment terms in days.
    pub payment_terms: i32,
    /// Assigned sales representative.
    pub sales_rep: Option<String>,
}

/// Input for updating a customer.
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub arabic_name: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub tax_number: Option<String>,
    pub commercial: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub payment_terms: Option<i32>,
    pub sales_rep: Option<String>,
    pub is_active: Option<bool>,
}

/// Filter options for listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Filter by branch.
    pub branch_id: Option<Uuid>,
    /// Filter by customer type.
    pub customer_type: Option<CustomerType>,
    /// Matches code, names, phones or email.
    pub search: Option<String>,
    /// Include deactivated customers.
    pub include_inactive: bool,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists customers ordered by code, with their balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_customers(
        &self,
        filter: CustomerFilter,
        page: PageRequest,
    ) -> Result<(Vec<CustomerWithBalance>, u64), CustomerError> {
        let mut query = customers::Entity::find();

        if !filter.include_inactive {
            query = query.filter(customers::Column::IsActive.eq(true));
        }
        if let Some(branch_id) = filter.branch_id {
            query = query.filter(customers::Column::BranchId.eq(branch_id));
        }
        if let Some(customer_type) = filter.customer_type {
            let customer_type: sea_orm_active_enums::CustomerType = customer_type.into();
            query = query.filter(customers::Column::CustomerType.eq(customer_type));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(customers::Column::Code.contains(search))
                    .add(customers::Column::Name.contains(search))
                    .add(customers::Column::ArabicName.contains(search))
                    .add(customers::Column::Phone.contains(search))
                    .add(customers::Column::Mobile.contains(search))
                    .add(customers::Column::Email.contains(search)),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(customers::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let mut balances = self.balances(&ids).await?;

        let items = rows
            .into_iter()
            .map(|customer| CustomerWithBalance {
                balance: balances.remove(&customer.id).unwrap_or_default(),
                customer,
            })
            .collect();

        Ok((items, total))
    }

    /// Finds a customer with its balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_customer(
        &self,
        id: Uuid,
    ) -> Result<Option<CustomerWithBalance>, CustomerError> {
        let Some(customer) = customers::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let balance = self
            .balances(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(Some(CustomerWithBalance { customer, balance }))
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code already exists in the branch
    /// - The email is used by another active customer in the branch
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let existing = customers::Entity::find()
            .filter(customers::Column::BranchId.eq(input.branch_id))
            .filter(customers::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CustomerError::DuplicateCode(input.code));
        }

        if let Some(email) = &input.email {
            self.ensure_email_free(input.branch_id, email, None).await?;
        }

        let now = chrono::Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            branch_id: Set(input.branch_id),
            code: Set(input.code),
            name: Set(input.name),
            arabic_name: Set(input.arabic_name),
            customer_type: Set(input.customer_type.into()),
            tax_number: Set(input.tax_number),
            commercial: Set(input.commercial),
            address: Set(input.address),
            city: Set(input.city),
            phone: Set(input.phone),
            mobile: Set(input.mobile),
            email: Set(input.email),
            credit_limit: Set(input.credit_limit),
            payment_terms: Set(input.payment_terms),
            sales_rep: Set(input.sales_rep),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(customer.insert(&self.db).await?)
    }

    /// Updates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Customer not found
    /// - The new email is used by another active customer in the branch
    pub async fn update_customer(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let customer = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        if let Some(email) = &input.email
            && customer.email.as_ref() != Some(email)
        {
            self.ensure_email_free(customer.branch_id, email, Some(id))
                .await?;
        }

        let mut active: customers::ActiveModel = customer.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(arabic_name) = input.arabic_name {
            active.arabic_name = Set(arabic_name);
        }
        if let Some(customer_type) = input.customer_type {
            active.customer_type = Set(customer_type.into());
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
        if let Some(sales_rep) = input.sales_rep {
            active.sales_rep = Set(Some(sales_rep));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a customer without invoices or receipts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Customer not found
    /// - Customer has sales invoices or receipts
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), CustomerError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let sales_invoices = sales_invoices::Entity::find()
            .filter(sales_invoices::Column::CustomerId.eq(id))
            .count(&self.db)
            .await?;
        let receipts = receipts::Entity::find()
            .filter(receipts::Column::CustomerId.eq(id))
            .count(&self.db)
            .await?;

        check_customer_deletion(CustomerDependents {
            sales_invoices,
            receipts,
        })?;

        customers::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn ensure_email_free(
        &self,
        branch_id: Uuid,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<(), CustomerError> {
        let mut query = customers::Entity::find()
            .filter(customers::Column::BranchId.eq(branch_id))
            .filter(customers::Column::Email.eq(email))
            .filter(customers::Column::IsActive.eq(true));
        if let Some(id) = except {
            query = query.filter(customers::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(CustomerError::DuplicateEmail(email.to_string()));
        }
        Ok(())
    }

    /// Sums invoices and receipts per customer.
    async fn balances(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, PartyBalance>, CustomerError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let invoiced: Vec<(Uuid, Option<Decimal>)> = sales_invoices::Entity::find()
            .select_only()
            .column(sales_invoices::Column::CustomerId)
            .column_as(sales_invoices::Column::TotalAmount.sum(), "invoiced")
            .filter(sales_invoices::Column::CustomerId.is_in(ids.iter().copied()))
            .group_by(sales_invoices::Column::CustomerId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let received: Vec<(Uuid, Option<Decimal>)> = receipts::Entity::find()
            .select_only()
            .column(receipts::Column::CustomerId)
            .column_as(receipts::Column::Amount.sum(), "received")
            .filter(receipts::Column::CustomerId.is_in(ids.iter().copied()))
            .group_by(receipts::Column::CustomerId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut balances: HashMap<Uuid, PartyBalance> = HashMap::new();
        for (id, sum) in invoiced {
            balances.entry(id).or_default().invoiced = sum.unwrap_or_default();
        }
        for (id, sum) in received {
            balances.entry(id).or_default().settled = sum.unwrap_or_default();
        }
        Ok(balances)
    }
}
