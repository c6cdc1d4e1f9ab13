//! Journal transaction routes.
//!
//! Transactions are created pending; `PUT` with `action: "post"` applies them
//! to account balances. Posted transactions can no longer be deleted.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Response,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{IdQuery, required_id};
use crate::{AppState, response};
use qayd_core::ledger::{EntryLineInput, TransactionStatus, TransactionType};
use qayd_db::{
    entities::{accounts, branches, journal_entries, users},
    repositories::{
        CreateTransactionInput, FiscalRepository, TransactionFilter, TransactionRepository,
        TransactionWithEntries,
    },
};
use qayd_shared::types::{PageRequest, Pagination};

/// The only action `PUT /transactions` accepts.
const POST_ACTION: &str = "post";

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/transactions",
        get(list_transactions)
            .post(create_transaction)
            .put(update_transaction)
            .delete(delete_transaction),
    )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Fiscal year; defaults to the current one.
    pub fiscal_year_id: Option<Uuid>,
    /// Branch; defaults to the main branch.
    pub branch_id: Option<Uuid>,
    /// Filter by transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Matches number, description or reference.
    pub search: Option<String>,
    /// Date range start (YYYY-MM-DD, inclusive).
    pub from_date: Option<NaiveDate>,
    /// Date range end (YYYY-MM-DD, inclusive).
    pub to_date: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size (default: 50).
    pub page_size: Option<u64>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Fiscal year; defaults to the current one.
    pub fiscal_year_id: Option<Uuid>,
    /// Branch; defaults to the main branch.
    pub branch_id: Option<Uuid>,
    /// Author; defaults to the configured user.
    pub user_id: Option<Uuid>,
    /// Transaction date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Description.
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Entry lines, each naming exactly one of debit or credit account.
    pub entries: Vec<EntryLineInput>,
}

/// Request body for `PUT /transactions`.
#[derive(Debug, Deserialize)]
pub struct TransactionActionRequest {
    /// Transaction to act on.
    pub id: Uuid,
    /// Action to perform; only `"post"` is supported.
    pub action: String,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Fiscal year ID.
    pub fiscal_year_id: Uuid,
    /// Branch ID.
    pub branch_id: Uuid,
    /// Author user ID.
    pub user_id: Uuid,
    /// Sequential number within the fiscal year.
    pub number: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Status.
    pub status: TransactionStatus,
    /// Total of the debit lines.
    pub total_amount: Decimal,
    /// When the transaction was posted.
    pub posted_at: Option<DateTime<FixedOffset>>,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
    /// Author.
    pub user: Option<UserSummary>,
    /// Recording branch.
    pub branch: Option<BranchSummary>,
    /// Entry lines in order.
    pub entries: Vec<EntryResponse>,
}

/// Account named by an entry line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Arabic account name.
    pub arabic_name: String,
}

impl From<&accounts::Model> for AccountSummary {
    fn from(a: &accounts::Model) -> Self {
        Self {
            id: a.id,
            code: a.code.clone(),
            name: a.name.clone(),
            arabic_name: a.arabic_name.clone(),
        }
    }
}

/// Author of a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Display name.
    pub full_name: String,
    /// Login name.
    pub username: String,
}

impl From<users::Model> for UserSummary {
    fn from(u: users::Model) -> Self {
        Self {
            full_name: u.full_name,
            username: u.username,
        }
    }
}

/// Branch that recorded a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    /// Branch name.
    pub name: String,
    /// Arabic branch name.
    pub arabic_name: String,
}

impl From<branches::Model> for BranchSummary {
    fn from(b: branches::Model) -> Self {
        Self {
            name: b.name,
            arabic_name: b.arabic_name,
        }
    }
}

/// Response for an entry line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Position within the transaction, from 1.
    pub line_no: i32,
    /// Debited account.
    pub debit_account_id: Option<Uuid>,
    /// Credited account.
    pub credit_account_id: Option<Uuid>,
    /// Debited account details.
    pub debit_account: Option<AccountSummary>,
    /// Credited account details.
    pub credit_account: Option<AccountSummary>,
    /// Amount.
    pub amount: Decimal,
    /// Line description.
    pub description: Option<String>,
}

impl EntryResponse {
    fn new(e: journal_entries::Model, t: &TransactionWithEntries) -> Self {
        Self {
            id: e.id,
            line_no: e.line_no,
            debit_account_id: e.debit_account_id,
            credit_account_id: e.credit_account_id,
            debit_account: t.account(e.debit_account_id).map(Into::into),
            credit_account: t.account(e.credit_account_id).map(Into::into),
            amount: e.amount,
            description: e.description,
        }
    }
}

impl From<TransactionWithEntries> for TransactionResponse {
    fn from(mut t: TransactionWithEntries) -> Self {
        let entries = std::mem::take(&mut t.entries)
            .into_iter()
            .map(|e| EntryResponse::new(e, &t))
            .collect();
        let tx = t.transaction;
        Self {
            id: tx.id,
            fiscal_year_id: tx.fiscal_year_id,
            branch_id: tx.branch_id,
            user_id: tx.user_id,
            number: tx.number,
            date: tx.date,
            description: tx.description,
            reference: tx.reference,
            transaction_type: tx.transaction_type.into(),
            status: tx.status.into(),
            total_amount: tx.total_amount,
            posted_at: tx.posted_at,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
            user: t.user.map(Into::into),
            branch: t.branch.map(Into::into),
            entries,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return response::rejected_query(&rejection),
    };

    let defaults = state.config.defaults;
    let fiscal_repo = FiscalRepository::new((*state.db).clone());
    let fiscal_year_id = match fiscal_repo
        .resolve_fiscal_year_id(query.fiscal_year_id, defaults.fiscal_year_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };
    let branch_id = match fiscal_repo
        .resolve_branch_id(query.branch_id, defaults.branch_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };

    let page = PageRequest::new(query.page, query.page_size);
    let filter = TransactionFilter {
        fiscal_year_id: Some(fiscal_year_id),
        branch_id: Some(branch_id),
        transaction_type: query.transaction_type,
        status: query.status,
        search: query.search,
        from_date: query.from_date,
        to_date: query.to_date,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.list_transactions(filter, page).await {
        Ok((transactions, total)) => {
            let data: Vec<TransactionResponse> =
                transactions.into_iter().map(Into::into).collect();
            response::page(data, Pagination::new(page, total))
        }
        Err(e) => response::failure(e.into()),
    }
}

/// POST `/transactions` - Create a pending transaction.
async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let defaults = state.config.defaults;
    let fiscal_repo = FiscalRepository::new((*state.db).clone());
    let fiscal_year_id = match fiscal_repo
        .resolve_fiscal_year_id(payload.fiscal_year_id, defaults.fiscal_year_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };
    let branch_id = match fiscal_repo
        .resolve_branch_id(payload.branch_id, defaults.branch_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };

    let input = CreateTransactionInput {
        fiscal_year_id,
        branch_id,
        user_id: payload.user_id.unwrap_or(defaults.user_id),
        date: payload.date,
        description: payload.description,
        reference: payload.reference,
        transaction_type: payload.transaction_type,
        entries: payload.entries,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.create_transaction(input).await {
        Ok(created) => response::saved(
            StatusCode::CREATED,
            TransactionResponse::from(created),
            "Transaction created successfully",
        ),
        Err(e) => response::failure(e.into()),
    }
}

/// PUT `/transactions` - Post a pending transaction.
async fn update_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionActionRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };

    if payload.action != POST_ACTION {
        warn!(transaction_id = %payload.id, action = %payload.action, "Unsupported transaction action");
        return response::bad_request("invalid action");
    }

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.post_transaction(payload.id).await {
        Ok(posted) => {
            info!(transaction_id = %posted.transaction.id, number = %posted.transaction.number, "Transaction posted via API");
            response::saved(
                StatusCode::OK,
                TransactionResponse::from(posted),
                "Transaction posted successfully",
            )
        }
        Err(e) => response::failure(e.into()),
    }
}

/// DELETE `/transactions?id=` - Delete a transaction that is not posted.
async fn delete_transaction(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let id = match required_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.delete_transaction(id).await {
        Ok(()) => response::done("Transaction deleted successfully"),
        Err(e) => response::failure(e.into()),
    }
}
