//! Customer routes.

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
use qayd_core::parties::CustomerType;
use qayd_db::repositories::{
    CreateCustomerInput, CustomerFilter, CustomerRepository, CustomerWithBalance,
    FiscalRepository, UpdateCustomerInput,
};
use qayd_shared::types::{PageRequest, Pagination};

/// Payment terms in days when a request does not set them.
const DEFAULT_PAYMENT_TERMS: i32 = 30;

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/customers",
        get(list_customers)
            .post(create_customer)
            .put(update_customer)
            .delete(delete_customer),
    )
}

/// Query parameters for listing customers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersQuery {
    /// Branch; defaults to the main branch.
    pub branch_id: Option<Uuid>,
    /// Filter by customer type.
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    /// Matches code, names, phone numbers or email.
    pub search: Option<String>,
    /// Include deactivated customers.
    #[serde(default)]
    pub include_inactive: bool,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size (default: 50).
    pub page_size: Option<u64>,
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    /// Branch; defaults to the main branch.
    pub branch_id: Option<Uuid>,
    /// Customer code, unique within the branch.
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub code: String,
    /// Customer name.
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    /// Arabic customer name.
    #[validate(length(min = 1, message = "is required"))]
    pub arabic_name: String,
    /// Individual or company (default: individual).
    #[serde(rename = "type", default)]
    pub customer_type: CustomerType,
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
    /// Assigned sales representative.
    pub sales_rep: Option<String>,
}

/// Request body for updating a customer.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UpdateCustomerRequest {
    pub id: Uuid,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub arabic_name: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
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
    pub sales_rep: Option<String>,
    pub is_active: Option<bool>,
}

/// Response for a customer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub code: String,
    pub name: String,
    pub arabic_name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub tax_number: Option<String>,
    pub commercial: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub credit_limit: Decimal,
    pub payment_terms: i32,
    pub sales_rep: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// Invoices minus receipts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    /// Sum of sales invoice totals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_invoices: Option<Decimal>,
    /// Sum of receipts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_receipts: Option<Decimal>,
    /// Whether the balance is above a configured credit limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_credit_limit: Option<bool>,
}

impl From<qayd_db::entities::customers::Model> for CustomerResponse {
    fn from(c: qayd_db::entities::customers::Model) -> Self {
        Self {
            id: c.id,
            branch_id: c.branch_id,
            code: c.code,
            name: c.name,
            arabic_name: c.arabic_name,
            customer_type: c.customer_type.into(),
            tax_number: c.tax_number,
            commercial: c.commercial,
            address: c.address,
            city: c.city,
            phone: c.phone,
            mobile: c.mobile,
            email: c.email,
            credit_limit: c.credit_limit,
            payment_terms: c.payment_terms,
            sales_rep: c.sales_rep,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
            balance: None,
            total_invoices: None,
            total_receipts: None,
            over_credit_limit: None,
        }
    }
}

impl From<CustomerWithBalance> for CustomerResponse {
    fn from(c: CustomerWithBalance) -> Self {
        let balance = c.balance;
        let over = balance.exceeds(c.customer.credit_limit);
        let mut response = Self::from(c.customer);
        response.balance = Some(balance.outstanding());
        response.total_invoices = Some(balance.invoiced);
        response.total_receipts = Some(balance.settled);
        response.over_credit_limit = Some(over);
        response
    }
}

/// GET `/customers` - List customers with balances.
async fn list_customers(
    State(state): State<AppState>,
    query: Result<Query<ListCustomersQuery>, QueryRejection>,
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
    let filter = CustomerFilter {
        branch_id: Some(branch_id),
        customer_type: query.customer_type,
        search: query.search,
        include_inactive: query.include_inactive,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.list_customers(filter, page).await {
        Ok((customers, total)) => {
            let data: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();
            response::page(data, Pagination::new(page, total))
        }
        Err(e) => response::failure(e.into()),
    }
}

/// POST `/customers` - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
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

    let input = CreateCustomerInput {
        branch_id,
        code: payload.code,
        name: payload.name,
        arabic_name: payload.arabic_name,
        customer_type: payload.customer_type,
        tax_number: payload.tax_number,
        commercial: payload.commercial,
        address: payload.address,
        city: payload.city,
        phone: payload.phone,
        mobile: payload.mobile,
        email: payload.email,
        credit_limit: payload.credit_limit,
        payment_terms: payload.payment_terms.unwrap_or(DEFAULT_PAYMENT_TERMS),
        sales_rep: payload.sales_rep,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.create_customer(input).await {
        Ok(customer) => {
            info!(customer_id = %customer.id, code = %customer.code, "Customer created");
            response::saved(
                StatusCode::CREATED,
                CustomerResponse::from(customer),
                "Customer created successfully",
            )
        }
        Err(e) => response::failure(e.into()),
    }
}

/// PUT `/customers` - Update a customer.
async fn update_customer(
    State(state): State<AppState>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let input = UpdateCustomerInput {
        name: payload.name,
        arabic_name: payload.arabic_name,
        customer_type: payload.customer_type,
        tax_number: payload.tax_number,
        commercial: payload.commercial,
        address: payload.address,
        city: payload.city,
        phone: payload.phone,
        mobile: payload.mobile,
        email: payload.email,
        credit_limit: payload.credit_limit,
        payment_terms: payload.payment_terms,
        sales_rep: payload.sales_rep,
        is_active: payload.is_active,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.update_customer(payload.id, input).await {
        Ok(customer) => response::saved(
            StatusCode::OK,
            CustomerResponse::from(customer),
            "Customer updated successfully",
        ),
        Err(e) => response::failure(e.into()),
    }
}

/// DELETE `/customers?id=` - Delete a customer without invoices or receipts.
async fn delete_customer(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let id = match required_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.delete_customer(id).await {
        Ok(()) => response::done("Customer deleted successfully"),
        Err(e) => response::failure(e.into()),
    }
}
