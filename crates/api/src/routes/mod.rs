//! API route definitions.

use axum::{Router, extract::Query, extract::rejection::QueryRejection, response::Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, response};

pub mod accounts;
pub mod customers;
pub mod health;
pub mod products;
pub mod suppliers;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(customers::routes())
        .merge(suppliers::routes())
        .merge(products::routes())
}

/// Query string of `DELETE` requests.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    /// Record to delete.
    pub id: Option<Uuid>,
}

/// Extracts the `id` a `DELETE` request must carry.
fn required_id(query: Result<Query<IdQuery>, QueryRejection>) -> Result<Uuid, Response> {
    match query {
        Ok(Query(IdQuery { id: Some(id) })) => Ok(id),
        Ok(_) => Err(response::bad_request("id is required")),
        Err(rejection) => Err(response::rejected_query(&rejection)),
    }
}
