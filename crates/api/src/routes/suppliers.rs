//! Supplier routes.

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
use qayd_core::parties::SupplierType;
use qayd_db::repositories::{
    CreateSupplierInput, SupplierFilter, SupplierRepository, SupplierWithBalance,
    FiscalRepository, UpdateSupplierInput,
};
use qayd_shared::types::{PageRequest, Pagination};

/// Payment terms in days when a request does not set them.
const DEFAULT_PAYMENT_TERMS: i32 = 30;

/// Creates the supplier routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/suppliers",
        get(list_suppliers)
            .post(create_supplier)
            .put(update_supplier)
            .delete(delete_supplier),
    )
}

/// Query parameters for listing suppliers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSuppliersQuery {
    /// Branch; defaults to the main branch.
    pub branch_id: Option<Uuid>,
    /// Filter by supplier type.
    #[serde(rename = "type")]
    pub supplier_type: Option<SupplierType>,
    /// Matches code, names, phone numbers or email.
    pub search: Option<String>,
    /// Include deactivated suppliers.
    #[serde(default)]
    pub include_inactive: bool,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size (default: 50).
    pub page_size: Option<u64>,
}

/// Request body for creating a supplier.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    /// Branch; defaults to the main branch.
    pub branch_id: Option<Uuid>,
    /// Supplier code, unique within the branch.
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub code: String,
    /// Supplier name.
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    /// Arabic supplier name.
    #[validate(length(min = 1, message = "is required"))]
    pub arabic_name: String,
    /// Local or foreign (default: local).
    #[serde(rename = "type", default)]
    pub supplier_type: SupplierType,
    /// Tax registration number.
    pub tax_number: Option<String>,
    /// Commercial registration number.
    pub commercial: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Mobile number.
    pub mobile: Option<String>,
    /// Email address.
    #[validate(email(message = "is not a valid email"))]
    pub email: Option<String>,
    /// Credit limit; zero means none (default: 0).
    #[serde(default)]
    pub credit_limit: Decimal,
    /// Payment terms in days (default: 30).
    pub payment_terms: Option<i32>,
}

/// Request body for updating a supplier.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UpdateSupplierRequest {
    pub id: Uuid,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub arabic_name: Option<String>,
    #[serde(rename = "type")]
    pub supplier_type: Option<SupplierType>,
    pub tax_number: Option<String>,
    pub commercial: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    #[validate(email(message = "is not a valid email"))]
    pub email: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub payment_terms: Option<i32>,
    pub is_active: Option<bool>,
}

/// Response for a supplier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SupplierResponse {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub code: String,
    pub name: String,
    pub arabic_name: String,
    #[serde(rename = "type")]
    pub supplier_type: SupplierType,
    pub tax_number: Option<String>,
    pub commercial: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub credit_limit: Decimal,
    pub payment_terms: i32,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// Invoices minus payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    /// Sum of purchase invoice totals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_invoices: Option<Decimal>,
    /// Sum of payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_payments: Option<Decimal>,
    /// Whether the balance is above a configured credit limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_credit_limit: Option<bool>,
}

impl From<qayd_db::entities::suppliers::Model> for SupplierResponse {
    fn from(c: qayd_db::entities::suppliers::Model) -> Self {
        Self {
            id: c.id,
            branch_id: c.branch_id,
            code: c.code,
            name: c.name,
            arabic_name: c.arabic_name,
            supplier_type: c.supplier_type.into(),
            tax_number: c.tax_number,
            commercial: c.commercial,
            address: c.address,
            city: c.city,
            phone: c.phone,
            mobile: c.mobile,
            email: c.email,
            credit_limit: c.credit_limit,
            payment_terms: c.payment_terms,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
            balance: None,
            total_invoices: None,
            total_payments: None,
            over_credit_limit: None,
        }
    }
}

impl From<SupplierWithBalance> for SupplierResponse {
    fn from(c: SupplierWithBalance) -> Self {
        let balance = c.balance;
        let over = balance.exceeds(c.supplier.credit_limit);
        let mut response = Self::from(c.supplier);
        response.balance = Some(balance.outstanding());
        response.total_invoices = Some(balance.invoiced);
        response.total_payments = Some(balance.settled);
        response.over_credit_limit = Some(over);
        response
    }
}

/// GET `/suppliers` - List suppliers with balances.
async fn list_suppliers(
    State(state): State<AppState>,
    query: Result<Query<ListSuppliersQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return response::rejected_query(&rejection),
    };

    let branch_id = match FiscalRepository::new((*state.db).clone())
        .resolve_branch_id(query.branch_id, state.config.defaults.branch_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };

    let page = PageRequest::new(query.page, query.page_size);
    let filter = SupplierFilter {
        branch_id: Some(branch_id),
        supplier_type: query.supplier_type,
        search: query.search,
        include_inactive: query.include_inactive,
    };

    let repo = SupplierRepository::new((*state.db).clone());
    match repo.list_suppliers(filter, page).await {
        Ok((suppliers, total)) => {
            let data: Vec<SupplierResponse> = suppliers.into_iter().map(Into::into).collect();
            response::page(data, Pagination::new(page, total))
        }
        Err(e) => response::failure(e.into()),
    }
}

/// POST `/suppliers` - Create a supplier.
async fn create_supplier(
    State(state): State<AppState>,
    payload: Result<Json<CreateSupplierRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let branch_id = match FiscalRepository::new((*state.db).clone())
        .resolve_branch_id(payload.branch_id, state.config.defaults.branch_id)
        .await
    {
        Ok(id) => id,
        Err(e) => return response::failure(e.into()),
    };

    let input = CreateSupplierInput {
        branch_id,
        code: payload.code,
        name: payload.name,
        arabic_name: payload.arabic_name,
        supplier_type: payload.supplier_type,
        tax_number: payload.tax_number,
        commercial: payload.commercial,
        address: payload.address,
        city: payload.city,
        phone: payload.phone,
        mobile: payload.mobile,
        email: payload.email,
        credit_limit: payload.credit_limit,
        payment_terms: payload.payment_terms.unwrap_or(DEFAULT_PAYMENT_TERMS),
    };

    let repo = SupplierRepository::new((*state.db).clone());
    match repo.create_supplier(input).await {
        Ok(supplier) => {
            info!(supplier_id = %supplier.id, code = %supplier.code, "Supplier created");
            response::saved(
                StatusCode::CREATED,
                SupplierResponse::from(supplier),
                "Supplier created successfully",
            )
        }
        Err(e) => response::failure(e.into()),
    }
}

/// PUT `/suppliers` - Update a supplier.
async fn update_supplier(
    State(state): State<AppState>,
    payload: Result<Json<UpdateSupplierRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let input = UpdateSupplierInput {
        name: payload.name,
        arabic_name: payload.arabic_name,
        supplier_type: payload.supplier_type,
        tax_number: payload.tax_number,
        commercial: payload.commercial,
        address: payload.address,
        city: payload.city,
        phone: payload.phone,
        mobile: payload.mobile,
        email: payload.email,
        credit_limit: payload.credit_limit,
        payment_terms: payload.payment_terms,
        is_active: payload.is_active,
    };

    let repo = SupplierRepository::new((*state.db).clone());
    match repo.update_supplier(payload.id, input).await {
        Ok(supplier) => response::saved(
            StatusCode::OK,
            SupplierResponse::from(supplier),
            "Supplier updated successfully",
        ),
        Err(e) => response::failure(e.into()),
    }
}

/// DELETE `/suppliers?id=` - Delete a supplier without invoices or payments.
async fn delete_supplier(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let id = match required_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = SupplierRepository::new((*state.db).clone());
    match repo.delete_supplier(id).await {
        Ok(()) => response::done("Supplier deleted successfully"),
        Err(e) => response::failure(e.into()),
    }
}
