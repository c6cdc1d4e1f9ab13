//! Product catalog routes.
//!
//! Every product in a response carries its stock summed across warehouses;
//! `includeInventory=true` adds the per-warehouse records.

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
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{IdQuery, required_id};
use crate::{AppState, response};
use qayd_db::{
    entities::products,
    repositories::{
        CreateProductInput, InventoryWithWarehouse, ProductFilter, ProductRepository,
        ProductWithStock, UpdateProductInput,
    },
};
use qayd_shared::types::{PageRequest, Pagination};

/// Unit of measure when a request does not set one.
const DEFAULT_UNIT: &str = "piece";

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/products",
        get(list_products)
            .post(create_product)
            .put(update_product)
            .delete(delete_product),
    )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing products.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Matches code, barcode, names or description.
    pub search: Option<String>,
    /// Include deactivated products.
    #[serde(default)]
    pub include_inactive: bool,
    /// Include per-warehouse stock records.
    #[serde(default)]
    pub include_inventory: bool,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size (default: 50).
    pub page_size: Option<u64>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Category the product belongs to.
    pub category_id: Uuid,
    /// Product code, unique across the catalog.
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub code: String,
    /// Barcode, unique among active products.
    pub barcode: Option<String>,
    /// Product name.
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    /// Arabic product name.
    #[validate(length(min = 1, message = "is required"))]
    pub arabic_name: String,
    /// Description.
    pub description: Option<String>,
    /// Unit of measure (default: piece).
    pub unit: Option<String>,
    /// Cost price (default: 0).
    #[serde(default)]
    pub cost_price: Decimal,
    /// Sale price (default: 0).
    #[serde(default)]
    pub sale_price: Decimal,
    /// Low-stock threshold (default: 0).
    #[serde(default)]
    pub min_stock: Decimal,
    /// Whether stock carries expiry dates.
    #[serde(default)]
    pub has_expiry: bool,
    /// Whether units are tracked by serial number.
    #[serde(default)]
    pub track_serial: bool,
}

/// Request body for updating a product.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UpdateProductRequest {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub barcode: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub arabic_name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub cost_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub min_stock: Option<Decimal>,
    pub has_expiry: Option<bool>,
    pub track_serial: Option<bool>,
    pub is_active: Option<bool>,
}

/// Response for a product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub code: String,
    pub barcode: Option<String>,
    pub name: String,
    pub arabic_name: String,
    pub description: Option<String>,
    pub unit: String,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    pub min_stock: Decimal,
    pub has_expiry: bool,
    pub track_serial: bool,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<StockResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<InventoryResponse>>,
}

/// Category summary embedded in a product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// Arabic category name.
    pub arabic_name: String,
}

/// Stock of a product across all warehouses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    /// Quantity on hand.
    pub total_quantity: Decimal,
    /// Quantity reserved for open orders.
    pub reserved_quantity: Decimal,
    /// Quantity free to sell.
    pub available_quantity: Decimal,
    /// Available quantity is at or below the minimum.
    pub is_low_stock: bool,
}

/// Stock record of one warehouse.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct InventoryResponse {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub warehouse_code: Option<String>,
    pub warehouse_name: Option<String>,
    pub quantity: Decimal,
    pub reserved_qty: Decimal,
    pub avg_cost: Decimal,
    pub last_cost: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub batch_no: Option<String>,
    pub serial_no: Option<String>,
}

impl From<products::Model> for ProductResponse {
    fn from(p: products::Model) -> Self {
        Self {
            id: p.id,
            category_id: p.category_id,
            code: p.code,
            barcode: p.barcode,
            name: p.name,
            arabic_name: p.arabic_name,
            description: p.description,
            unit: p.unit,
            cost_price: p.cost_price,
            sale_price: p.sale_price,
            min_stock: p.min_stock,
            has_expiry: p.has_expiry,
            track_serial: p.track_serial,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
            category: None,
            stock: None,
            inventory: None,
        }
    }
}

impl From<InventoryWithWarehouse> for InventoryResponse {
    fn from(i: InventoryWithWarehouse) -> Self {
        let (warehouse_code, warehouse_name) = i
            .warehouse
            .map_or((None, None), |w| (Some(w.code), Some(w.name)));
        Self {
            id: i.item.id,
            warehouse_id: i.item.warehouse_id,
            warehouse_code,
            warehouse_name,
            quantity: i.item.quantity,
            reserved_qty: i.item.reserved_qty,
            avg_cost: i.item.avg_cost,
            last_cost: i.item.last_cost,
            expiry_date: i.item.expiry_date,
            batch_no: i.item.batch_no,
            serial_no: i.item.serial_no,
        }
    }
}

impl From<ProductWithStock> for ProductResponse {
    fn from(p: ProductWithStock) -> Self {
        let stock = StockResponse {
            total_quantity: p.stock.total,
            reserved_quantity: p.stock.reserved,
            available_quantity: p.stock.available(),
            is_low_stock: p.stock.is_low_stock(p.product.min_stock),
        };
        let mut response = Self::from(p.product);
        response.category = p.category.map(|c| CategoryResponse {
            id: c.id,
            name: c.name,
            arabic_name: c.arabic_name,
        });
        response.stock = Some(stock);
        response.inventory = p
            .inventory
            .map(|items| items.into_iter().map(Into::into).collect());
        response
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/products` - List products with stock totals.
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return response::rejected_query(&rejection),
    };

    let page = PageRequest::new(query.page, query.page_size);
    let filter = ProductFilter {
        category_id: query.category_id,
        search: query.search,
        include_inactive: query.include_inactive,
        include_inventory: query.include_inventory,
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.list_products(filter, page).await {
        Ok((products, total)) => {
            let data: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
            response::page(data, Pagination::new(page, total))
        }
        Err(e) => response::failure(e.into()),
    }
}

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let input = CreateProductInput {
        category_id: payload.category_id,
        code: payload.code,
        barcode: payload.barcode.filter(|b| !b.trim().is_empty()),
        name: payload.name,
        arabic_name: payload.arabic_name,
        description: payload.description,
        unit: payload.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        cost_price: payload.cost_price,
        sale_price: payload.sale_price,
        min_stock: payload.min_stock,
        has_expiry: payload.has_expiry,
        track_serial: payload.track_serial,
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.create_product(input).await {
        Ok(product) => {
            info!(product_id = %product.id, code = %product.code, "Product created");
            response::saved(
                StatusCode::CREATED,
                ProductResponse::from(product),
                "Product created successfully",
            )
        }
        Err(e) => response::failure(e.into()),
    }
}

/// PUT `/products` - Update a product.
async fn update_product(
    State(state): State<AppState>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return response::rejected_body(&rejection),
    };
    if let Err(errors) = payload.validate() {
        return response::invalid(&errors);
    }

    let input = UpdateProductInput {
        category_id: payload.category_id,
        barcode: payload.barcode,
        name: payload.name,
        arabic_name: payload.arabic_name,
        description: payload.description,
        unit: payload.unit,
        cost_price: payload.cost_price,
        sale_price: payload.sale_price,
        min_stock: payload.min_stock,
        has_expiry: payload.has_expiry,
        track_serial: payload.track_serial,
        is_active: payload.is_active,
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.update_product(payload.id, input).await {
        Ok(product) => response::saved(
            StatusCode::OK,
            ProductResponse::from(product),
            "Product updated successfully",
        ),
        Err(e) => response::failure(e.into()),
    }
}

/// DELETE `/products?id=` - Delete a product without stock or invoice lines.
async fn delete_product(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let id = match required_id(query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.delete_product(id).await {
        Ok(()) => response::done("Product deleted successfully"),
        Err(e) => response::failure(e.into()),
    }
}
