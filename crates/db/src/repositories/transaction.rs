//! Transaction repository for journal transaction database operations.
//!
//! Creation validates the entry lines and assigns the next number of the
//! fiscal year; posting moves account balances and flips the status inside
//! one database transaction.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use qayd_core::{
    guards::{DeletionBlocker, check_transaction_deletion},
    ledger::{
        AccountInfo, EntryLine, EntryLineInput, FiscalYearInfo, LedgerError, LedgerService,
        TransactionStatus, TransactionType, balance_deltas, classify_line, format_number,
        next_sequence, parse_number,
    },
};
use qayd_shared::{
    AppError,
    types::{AccountId, FiscalYearId, PageRequest, TransactionId},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{
    accounts, branches, fiscal_years, journal_entries, sea_orm_active_enums, transactions, users,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Another transaction took the same number first.
    #[error("Transaction number {0} is already taken, please retry")]
    DuplicateNumber(String),

    /// Deletion blocked.
    #[error(transparent)]
    Blocked(#[from] DeletionBlocker),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Ledger(e) => match e {
                LedgerError::TransactionNotFound(_) => Self::NotFound(e.to_string()),
                LedgerError::AlreadyPosted => Self::Conflict(e.to_string()),
                LedgerError::TransactionCancelled
                | LedgerError::CannotDeletePosted
                | LedgerError::FiscalYearClosed(_) => Self::BusinessRule(e.to_string()),
                LedgerError::InvalidNumber(_) => Self::Internal(e.to_string()),
                _ => Self::Validation(e.to_string()),
            },
            TransactionError::DuplicateNumber(_) => Self::Conflict(err.to_string()),
            TransactionError::Blocked(blocker) => Self::BusinessRule(blocker.to_string()),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Fiscal year the transaction is recorded in.
    pub fiscal_year_id: Uuid,
    /// Branch that recorded the transaction.
    pub branch_id: Uuid,
    /// User who created the transaction.
    pub user_id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Entry lines in request order.
    pub entries: Vec<EntryLineInput>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by fiscal year.
    pub fiscal_year_id: Option<Uuid>,
    /// Filter by branch.
    pub branch_id: Option<Uuid>,
    /// Filter by transaction type.
    pub transaction_type: Option<TransactionType>,
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Matches number, description or reference.
    pub search: Option<String>,
    /// Filter by date range start (inclusive).
    pub from_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive).
    pub to_date: Option<NaiveDate>,
}

/// Transaction with its entry lines ordered by line number.
#[derive(Debug, Clone)]
pub struct TransactionWithEntries {
    /// The transaction record.
    pub transaction: transactions::Model,
    /// The entry lines.
    pub entries: Vec<journal_entries::Model>,
    /// Accounts named by the entry lines, keyed by ID.
    pub accounts: HashMap<Uuid, accounts::Model>,
    /// User who created the transaction.
    pub user: Option<users::Model>,
    /// Branch that recorded the transaction.
    pub branch: Option<branches::Model>,
}

impl TransactionWithEntries {
    /// Returns the account an entry line refers to, if loaded.
    #[must_use]
    pub fn account(&self, id: Option<Uuid>) -> Option<&accounts::Model> {
        id.and_then(|id| self.accounts.get(&id))
    }
}

/// Transaction repository for ledger operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending transaction with its entry lines.
    ///
    /// Balances are not touched until the transaction is posted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fiscal year does not exist or is closed
    /// - An entry line is malformed or the entries do not balance
    /// - A referenced account is missing, inactive, a parent, or in another year
    /// - A concurrent create took the same number
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<TransactionWithEntries, TransactionError> {
        let txn = self.db.begin().await?;

        let fiscal_year = fiscal_years::Entity::find_by_id(input.fiscal_year_id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::FiscalYearNotFound(input.fiscal_year_id.into()))?;

        let accounts = load_account_infos(&txn, &input.entries).await?;
        let validated = LedgerService::validate_entries(
            FiscalYearInfo {
                id: fiscal_year.id.into(),
                is_closed: fiscal_year.is_closed,
            },
            &input.entries,
            |id| accounts.get(&id).copied(),
        )?;

        let current_max: Option<i64> = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Sequence.max(), "max_sequence")
            .filter(transactions::Column::FiscalYearId.eq(input.fiscal_year_id))
            .into_tuple::<Option<i64>>()
            .one(&txn)
            .await?
            .flatten();
        let sequence = next_sequence(current_max);
        let number = format_number(sequence);

        let now = Utc::now().into();
        let transaction_id = Uuid::new_v4();
        let transaction = transactions::ActiveModel {
            id: Set(transaction_id),
            fiscal_year_id: Set(input.fiscal_year_id),
            branch_id: Set(input.branch_id),
            user_id: Set(input.user_id),
            number: Set(number.clone()),
            sequence: Set(sequence),
            date: Set(input.date),
            description: Set(input.description),
            reference: Set(input.reference),
            transaction_type: Set(input.transaction_type.into()),
            status: Set(sea_orm_active_enums::TransactionStatus::Pending),
            total_amount: Set(validated.total_amount()),
            posted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                TransactionError::DuplicateNumber(number.clone())
            }
            _ => TransactionError::Database(e),
        })?;

        for (index, line) in validated.lines.into_iter().enumerate() {
            let (debit, credit) = line.side.into_columns();
            let entry = journal_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                transaction_id: Set(transaction_id),
                line_no: Set(i32::try_from(index + 1).unwrap_or(i32::MAX)),
                debit_account_id: Set(debit.map(Uuid::from)),
                credit_account_id: Set(credit.map(Uuid::from)),
                amount: Set(line.amount),
                description: Set(line.description),
                created_at: Set(now),
            };
            entry.insert(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!(
            transaction_id = %transaction.id,
            number = %transaction.number,
            fiscal_year_id = %transaction.fiscal_year_id,
            "Transaction created"
        );

        let created = self
            .find_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(TransactionId::from(transaction_id)))?;
        Ok(created)
    }

    /// Lists transactions, newest first, with their entry lines.
    ///
    /// Returns the page and the total number of matching transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<(Vec<TransactionWithEntries>, u64), TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(fiscal_year_id) = filter.fiscal_year_id {
            query = query.filter(transactions::Column::FiscalYearId.eq(fiscal_year_id));
        }
        if let Some(branch_id) = filter.branch_id {
            query = query.filter(transactions::Column::BranchId.eq(branch_id));
        }
        if let Some(transaction_type) = filter.transaction_type {
            let transaction_type: sea_orm_active_enums::TransactionType = transaction_type.into();
            query = query.filter(transactions::Column::TransactionType.eq(transaction_type));
        }
        if let Some(status) = filter.status {
            let status: sea_orm_active_enums::TransactionStatus = status.into();
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(from_date) = filter.from_date {
            query = query.filter(transactions::Column::Date.gte(from_date));
        }
        if let Some(to_date) = filter.to_date {
            query = query.filter(transactions::Column::Date.lte(to_date));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let mut condition = Condition::any()
                .add(transactions::Column::Number.contains(search))
                .add(transactions::Column::Description.contains(search))
                .add(transactions::Column::Reference.contains(search));
            if let Ok(sequence) = parse_number(search) {
                condition = condition.add(transactions::Column::Sequence.eq(sequence));
            }
            query = query.filter(condition);
        }

        let total = query.clone().count(&self.db).await?;

        let transactions = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Sequence)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let items = with_details(&self.db, transactions).await?;
        Ok((items, total))
    }

    /// Finds a transaction with its entry lines, their accounts, its user
    /// and its branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_transaction(
        &self,
        id: Uuid,
    ) -> Result<Option<TransactionWithEntries>, TransactionError> {
        let Some(transaction) = transactions::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        Ok(with_details(&self.db, vec![transaction]).await?.pop())
    }

    /// Posts a pending transaction.
    ///
    /// Every debit line adds its amount to the account's current balance and
    /// every credit line subtracts it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Transaction not found
    /// - Transaction is already posted or cancelled
    pub async fn post_transaction(
        &self,
        id: Uuid,
    ) -> Result<TransactionWithEntries, TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(TransactionId::from(id)))?;

        LedgerService::validate_can_post(transaction.status.into())?;

        let lines = Self::apply_posting(&txn, id).await?;

        txn.commit().await?;

        tracing::info!(
            transaction_id = %id,
            number = %transaction.number,
            lines,
            "Transaction posted"
        );

        let posted = self
            .find_transaction(id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(TransactionId::from(id)))?;
        Ok(posted)
    }

    /// Flips transaction `id` from `PENDING` to `POSTED` and moves the
    /// balances of its accounts, inside `txn`.
    ///
    /// The flip is a compare-and-set on `PENDING`: when another poster got
    /// there first no row matches and nothing is applied. Returns the number
    /// of entry lines posted.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyPosted`] if the transaction is no longer
    /// pending, or a database error.
    pub async fn apply_posting(
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<usize, TransactionError> {
        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let flipped = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::Status,
                Expr::value(sea_orm_active_enums::TransactionStatus::Posted),
            )
            .col_expr(transactions::Column::PostedAt, Expr::value(now))
            .col_expr(transactions::Column::UpdatedAt, Expr::value(now))
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(sea_orm_active_enums::TransactionStatus::Pending))
            .exec(txn)
            .await?;

        if flipped.rows_affected == 0 {
            return Err(LedgerError::AlreadyPosted.into());
        }

        let rows = journal_entries::Entity::find()
            .filter(journal_entries::Column::TransactionId.eq(id))
            .order_by_asc(journal_entries::Column::LineNo)
            .all(txn)
            .await?;

        let lines = rows
            .iter()
            .enumerate()
            .map(|(index, row)| entry_line(index + 1, row))
            .collect::<Result<Vec<_>, _>>()?;

        for delta in balance_deltas(&lines)? {
            accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::CurrentBalance,
                    Expr::col(accounts::Column::CurrentBalance).add(delta.delta),
                )
                .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
                .filter(accounts::Column::Id.eq(Uuid::from(delta.account_id)))
                .exec(txn)
                .await?;
        }

        Ok(lines.len())
    }

    /// Deletes a transaction that has not been posted, with its entry lines.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Transaction not found
    /// - Transaction is posted
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(TransactionId::from(id)))?;

        check_transaction_deletion(transaction.status.into())?;

        journal_entries::Entity::delete_many()
            .filter(journal_entries::Column::TransactionId.eq(id))
            .exec(&txn)
            .await?;
        transactions::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Attaches entry lines, their accounts, users and branches to `transactions`,
/// keeping the input order.
async fn with_details<C: ConnectionTrait>(
    db: &C,
    transactions: Vec<transactions::Model>,
) -> Result<Vec<TransactionWithEntries>, DbErr> {
    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    let entries = transactions.load_many(journal_entries::Entity, db).await?;

    let account_ids: HashSet<Uuid> = entries
        .iter()
        .flatten()
        .flat_map(|e| [e.debit_account_id, e.credit_account_id])
        .flatten()
        .collect();
    let user_ids: HashSet<Uuid> = transactions.iter().map(|t| t.user_id).collect();
    let branch_ids: HashSet<Uuid> = transactions.iter().map(|t| t.branch_id).collect();

    let account_rows: HashMap<Uuid, accounts::Model> = if account_ids.is_empty() {
        HashMap::new()
    } else {
        accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect()
    };
    let user_rows: HashMap<Uuid, users::Model> = users::Entity::find()
        .filter(users::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let branch_rows: HashMap<Uuid, branches::Model> = branches::Entity::find()
        .filter(branches::Column::Id.is_in(branch_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    Ok(transactions
        .into_iter()
        .zip(entries)
        .map(|(transaction, mut entries)| {
            entries.sort_by_key(|e| e.line_no);
            let accounts = entries
                .iter()
                .flat_map(|e| [e.debit_account_id, e.credit_account_id])
                .flatten()
                .filter_map(|id| account_rows.get(&id).map(|a| (id, a.clone())))
                .collect();
            TransactionWithEntries {
                user: user_rows.get(&transaction.user_id).cloned(),
                branch: branch_rows.get(&transaction.branch_id).cloned(),
                transaction,
                entries,
                accounts,
            }
        })
        .collect())
}

/// Loads the accounts named by `entries`, keyed by ID.
async fn load_account_infos(
    txn: &DatabaseTransaction,
    entries: &[EntryLineInput],
) -> Result<HashMap<AccountId, AccountInfo>, DbErr> {
    let ids: HashSet<Uuid> = entries
        .iter()
        .flat_map(|e| [e.debit_account_id, e.credit_account_id])
        .flatten()
        .map(Uuid::from)
        .collect();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(ids))
        .all(txn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|a| {
            let id = AccountId::from(a.id);
            (
                id,
                AccountInfo {
                    id,
                    fiscal_year_id: FiscalYearId::from(a.fiscal_year_id),
                    is_active: a.is_active,
                    is_parent: a.is_parent,
                },
            )
        })
        .collect())
}

/// Rebuilds the domain line from a stored row.
fn entry_line(line: usize, row: &journal_entries::Model) -> Result<EntryLine, LedgerError> {
    classify_line(
        line,
        &EntryLineInput {
            debit_account_id: row.debit_account_id.map(AccountId::from),
            credit_account_id: row.credit_account_id.map(AccountId::from),
            amount: row.amount,
            description: row.description.clone(),
        },
    )
}
