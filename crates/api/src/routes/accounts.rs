//! Chart of accounts routes.

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
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{IdQuery, required_id};
use crate::{AppState, response};
use qayd_core::ledger::AccountType;
use qayd_db::{
    entities::accounts,
    repositories::{
        AccountFilter, AccountRepository, AccountWithRelations, CreateAccountInput,
        FiscalRepository, UpdateAccountInput,
    },
};
use qayd_shared::AppError;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/accounts",
        get(list_accounts)
            .post(create_account)
            .put(update_account)
            .delete(delete_account),
    )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing accounts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsQuery {
    /// Fiscal year; defaults to the current one.
    pub fiscal_year_id: Option<Uuid>,
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by parent account.
    pub parent_id: Option<Uuid>,
    /// Include each account's children.
    #[serde(default)]
    pub include_children: bool,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Fiscal year; defaults to the current one.
    pub fiscal_year_id: Option<Uuid>,
    /// Account code, unique within the fiscal year.
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub code: String,
    /// Account name.
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    /// Arabic account name.
    #[validate(length(min = 1, message = "is required"))]
    pub arabic_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account.
    pub parent_id: Option<Uuid>,
    /// Opening balance (default: 0).
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// Account to update.
    pub id: Uuid,
    /// Account name.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    /// Arabic account name.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub arabic_name: Option<String>,
    /// Opening balance.
    pub opening_balance: Option<Decimal>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Fiscal year ID.
    pub fiscal_year_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Arabic account name.
    pub arabic_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account ID.
    pub parent_id: Option<Uuid>,
    /// Depth in the tree, 1 for roots.
    pub level: i32,
    /// Whether the account has children.
    pub is_parent: bool,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Current balance.
    pub current_balance: Decimal,
    /// Whether the account is active.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
    /// Parent account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<AccountResponse>>,
    /// Child accounts, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AccountResponse>>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(a: accounts::Model) -> Self {
        Self {
            id: a.id,
            fiscal_year_id: a.fiscal_year_id,
            code: a.code,
            name: a.name,
            arabic_name: a.arabic_name,
            account_type: a.account_type.into(),
            parent_id: a.parent_id,
            level: a.level,
            is_parent: a.is_parent,
            opening_balance: a.opening_balance,
            current_balance: a.current_balance,
            is_active: a.is_active,
            created_at: a.created_at,
            updated_at: a.updated_at,
            parent: None,
            children: None,
        }
    }
}

impl From<AccountWithRelations> for AccountResponse {
    fn from(a: AccountWithRelations) -> Self {
        let mut response = Self::from(a.account);
        response.parent = a.parent.map(|p| Box::new(p.into()));
        response.children = a
            .children
            .map(|children| children.into_iter().map(Into::into).collect());
        response
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/accounts` - Active accounts ordered by level, then code.
async fn list_accounts(
    State(state): State<AppState>,
    query: Result<Query<ListAccountsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return response::rejected_query(&rejection),
    };

    let fiscal_repo = FiscalRepository::new((*state.db).clone());
    let fiscal_year_id = match fiscal_repo
        .resolve_fiscal_year_id(query.fiscal_year_id, state.config.defaults.fiscal_year_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };

    let repo = AccountRepository::new((*state.db).clone());
    let filter = AccountFilter {
        fiscal_year_id: Some(fiscal_year_id),
        account_type: query.account_type,
        parent_id: query.parent_id,
        include_children: query.include_children,
    };

    match repo.list_accounts(filter).await {
        Ok(accounts) => {
            let data: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
            response::ok(data)
        }
        Err(e) => response::failure(e.into()),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let fiscal_repo = FiscalRepository::new((*state.db).clone());
    let fiscal_year_id = match fiscal_repo
        .resolve_fiscal_year_id(payload.fiscal_year_id, state.config.defaults.fiscal_year_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        fiscal_year_id,
        code: payload.code,
        name: payload.name,
        arabic_name: payload.arabic_name,
        account_type: payload.account_type,
        parent_id: payload.parent_id,
        opening_balance: payload.opening_balance,
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, code = %account.code, "Account created");
            response::saved(
                StatusCode::CREATED,
                AccountResponse::from(account),
                "Account created successfully",
            )
        }
        Err(e) => response::failure(e.into()),
    }
}

/// PUT `/accounts` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        name: payload.name,
        arabic_name: payload.arabic_name,
        opening_balance: payload.opening_balance,
        is_active: payload.is_active,
    };

    match repo.update_account(payload.id, input).await {
        Ok(account) => response::saved(
            StatusCode::OK,
            AccountResponse::from(account),
            "Account updated successfully",
        ),
        Err(e) => response::failure(e.into()),
    }
}

/// DELETE `/accounts?id=` - Delete an account without children or entries.
async fn delete_account(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let id = match required_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = AccountRepository::new((*state.db).clone());
    match repo.delete_account(id).await {
        Ok(()) => {
            info!(account_id = %id, "Account deleted");
            response::done("Account deleted successfully")
        }
        Err(e) => response::failure(AppError::from(e)),
    }
}
