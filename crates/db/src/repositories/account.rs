//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use qayd_core::{
    chart::{child_level, opening_balance_shift},
    guards::{AccountDependents, DeletionBlocker, check_account_deletion},
    ledger::{AccountType, LedgerError, MAX_AMOUNT},
};
use qayd_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{accounts, fiscal_years, journal_entries};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists in the fiscal year.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(Uuid),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to a different fiscal year.
    #[error("Parent account belongs to a different fiscal year")]
    ParentWrongFiscalYear,

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Opening balance does not fit the money column.
    #[error("Opening balance must be between -999999999999.9999 and 999999999999.9999")]
    OpeningBalanceOutOfRange,

    /// Opening balance changed since it was read.
    #[error("Account {0} was modified concurrently, please retry")]
    ConcurrentUpdate(Uuid),

    /// Balance arithmetic failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Deletion blocked by dependent records.
    #[error(transparent)]
    Blocked(#[from] DeletionBlocker),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            AccountError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            AccountError::ConcurrentUpdate(_) => Self::Conflict(err.to_string()),
            AccountError::FiscalYearNotFound(_)
            | AccountError::ParentNotFound(_)
            | AccountError::ParentWrongFiscalYear
            | AccountError::OpeningBalanceOutOfRange
            | AccountError::Ledger(_) => Self::Validation(err.to_string()),
            AccountError::Blocked(blocker) => Self::BusinessRule(blocker.to_string()),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Account with its parent and, on request, its children.
#[derive(Debug, Clone)]
pub struct AccountWithRelations {
    /// The account record.
    pub account: accounts::Model,
    /// Parent account, if any.
    pub parent: Option<accounts::Model>,
    /// Child accounts, active or not; `None` unless requested.
    pub children: Option<Vec<accounts::Model>>,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Fiscal year the account belongs to.
    pub fiscal_year_id: Uuid,
    /// Account code (must be unique within the fiscal year).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Arabic account name.
    pub arabic_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account ID for hierarchical structure.
    pub parent_id: Option<Uuid>,
    /// Opening balance; also the initial current balance.
    pub opening_balance: Decimal,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account name.
    pub name: Option<String>,
    /// Arabic account name.
    pub arabic_name: Option<String>,
    /// Opening balance.
    pub opening_balance: Option<Decimal>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Restrict to one fiscal year.
    pub fiscal_year_id: Option<Uuid>,
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by parent ID.
    pub parent_id: Option<Uuid>,
    /// Load the children of each account.
    pub include_children: bool,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// The level follows the parent's, and a parent that was a leaf is marked
    /// as a parent in the same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account code already exists in the fiscal year
    /// - Fiscal year does not exist
    /// - Parent account does not exist or belongs to another fiscal year
    /// - Opening balance does not fit the money column
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        ensure_opening_in_range(input.opening_balance)?;

        let txn = self.db.begin().await?;

        let existing = accounts::Entity::find()
            .filter(accounts::Column::FiscalYearId.eq(input.fiscal_year_id))
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&txn)
            .await?;

        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        fiscal_years::Entity::find_by_id(input.fiscal_year_id)
            .one(&txn)
            .await?
            .ok_or(AccountError::FiscalYearNotFound(input.fiscal_year_id))?;

        let parent = match input.parent_id {
            Some(parent_id) => {
                let parent = accounts::Entity::find_by_id(parent_id)
                    .one(&txn)
                    .await?
                    .ok_or(AccountError::ParentNotFound(parent_id))?;
                if parent.fiscal_year_id != input.fiscal_year_id {
                    return Err(AccountError::ParentWrongFiscalYear);
                }
                Some(parent)
            }
            None => None,
        };

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            fiscal_year_id: Set(input.fiscal_year_id),
            code: Set(input.code.clone()),
            name: Set(input.name),
            arabic_name: Set(input.arabic_name),
            account_type: Set(input.account_type.into()),
            parent_id: Set(input.parent_id),
            level: Set(child_level(parent.as_ref().map(|p| p.level))),
            is_parent: Set(false),
            opening_balance: Set(input.opening_balance),
            current_balance: Set(input.opening_balance),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account
            .insert(&txn)
            .await
            .map_err(|e| duplicate_code_or(e, &input.code))?;

        if let Some(parent) = parent.filter(|p| !p.is_parent) {
            let mut parent: accounts::ActiveModel = parent.into();
            parent.is_parent = Set(true);
            parent.updated_at = Set(now);
            parent.update(&txn).await?;
        }

        txn.commit().await?;

        tracing::debug!(account_id = %account.id, code = %account.code, "Account created");
        Ok(account)
    }

    /// Lists active accounts ordered by level, then code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<AccountWithRelations>, AccountError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Level)
            .order_by_asc(accounts::Column::Code);

        if let Some(fiscal_year_id) = filter.fiscal_year_id {
            query = query.filter(accounts::Column::FiscalYearId.eq(fiscal_year_id));
        }

        if let Some(account_type) = filter.account_type {
            let account_type: crate::entities::sea_orm_active_enums::AccountType =
                account_type.into();
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }

        if let Some(parent_id) = filter.parent_id {
            query = query.filter(accounts::Column::ParentId.eq(parent_id));
        }

        let accounts = query.all(&self.db).await?;

        let parent_ids: Vec<Uuid> = accounts.iter().filter_map(|a| a.parent_id).collect();
        let parents: HashMap<Uuid, accounts::Model> = if parent_ids.is_empty() {
            HashMap::new()
        } else {
            accounts::Entity::find()
                .filter(accounts::Column::Id.is_in(parent_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };

        let mut children: HashMap<Uuid, Vec<accounts::Model>> = HashMap::new();
        if filter.include_children && !accounts.is_empty() {
            let ids: Vec<Uuid> = accounts.iter().map(|a| a.id).collect();
            let rows = accounts::Entity::find()
                .filter(accounts::Column::ParentId.is_in(ids))
                .order_by_asc(accounts::Column::Code)
                .all(&self.db)
                .await?;
            for child in rows {
                if let Some(parent_id) = child.parent_id {
                    children.entry(parent_id).or_default().push(child);
                }
            }
        }

        let results = accounts
            .into_iter()
            .map(|account| {
                let parent = account.parent_id.and_then(|id| parents.get(&id).cloned());
                let kids = filter
                    .include_children
                    .then(|| children.remove(&account.id).unwrap_or_default());
                AccountWithRelations {
                    account,
                    parent,
                    children: kids,
                }
            })
            .collect();

        Ok(results)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates an account.
    ///
    /// Changing the opening balance shifts the current balance by the same
    /// difference so posted movements are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, the opening balance is
    /// out of range, or the opening balance changed concurrently.
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        if let Some(opening) = input.opening_balance {
            ensure_opening_in_range(opening)?;
        }

        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        if let Some(opening) = input.opening_balance {
            Self::shift_opening_balance(&txn, id, account.opening_balance, opening).await?;
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(arabic_name) = input.arabic_name {
            active.arabic_name = Set(arabic_name);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Replaces the opening balance of account `id` inside `txn`, moving the
    /// current balance by the same difference.
    ///
    /// The current balance is adjusted in place rather than rewritten, so
    /// movements posted meanwhile survive. The write only applies while the
    /// stored opening balance still equals `old_opening`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::ConcurrentUpdate`] if the opening balance no
    /// longer equals `old_opening`.
    pub async fn shift_opening_balance(
        txn: &DatabaseTransaction,
        id: Uuid,
        old_opening: Decimal,
        new_opening: Decimal,
    ) -> Result<(), AccountError> {
        let shift = opening_balance_shift(old_opening, new_opening)?;
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::OpeningBalance, Expr::value(new_opening))
            .col_expr(
                accounts::Column::CurrentBalance,
                Expr::col(accounts::Column::CurrentBalance).add(shift),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
            .filter(accounts::Column::Id.eq(id))
            .filter(accounts::Column::OpeningBalance.eq(old_opening))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AccountError::ConcurrentUpdate(id));
        }

        tracing::debug!(account_id = %id, %old_opening, %new_opening, "Opening balance changed");
        Ok(())
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account not found
    /// - Account has child accounts or journal entry lines
    pub async fn delete_account(&self, id: Uuid) -> Result<(), AccountError> {
        accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let children = accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(id))
            .count(&self.db)
            .await?;

        let entry_lines = journal_entries::Entity::find()
            .filter(
                Condition::any()
                    .add(journal_entries::Column::DebitAccountId.eq(id))
                    .add(journal_entries::Column::CreditAccountId.eq(id)),
            )
            .count(&self.db)
            .await?;

        check_account_deletion(AccountDependents {
            children,
            entry_lines,
        })?;

        accounts::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

fn ensure_opening_in_range(opening: Decimal) -> Result<(), AccountError> {
    if opening.abs() > MAX_AMOUNT {
        return Err(AccountError::OpeningBalanceOutOfRange);
    }
    Ok(())
}

fn duplicate_code_or(err: DbErr, code: &str) -> AccountError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::DuplicateCode(code.to_string()),
        _ => AccountError::Database(err),
    }
}
