//! Product repository for catalog and stock queries.

use std::collections::HashMap;

use qayd_core::{
    guards::{DeletionBlocker, ProductDependents, check_product_deletion},
    inventory::{StockLevel, StockRecord},
};
use qayd_shared::{AppError, types::PageRequest};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{
    categories, inventory_items, products, purchase_invoice_items, sales_invoice_items, warehouses,
};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product code already exists.
    #[error("Product code '{0}' already exists")]
    DuplicateCode(String),

    /// Barcode already used by another active product.
    #[error("Barcode '{0}' is already used by another product")]
    DuplicateBarcode(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Deletion blocked by stock records or invoice lines.
    #[error(transparent)]
    Blocked(#[from] DeletionBlocker),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::DuplicateCode(_) | ProductError::DuplicateBarcode(_) => {
                Self::Conflict(err.to_string())
            }
            ProductError::CategoryNotFound(_) => Self::Validation(err.to_string()),
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::Blocked(blocker) => Self::BusinessRule(blocker.to_string()),
            ProductError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Stock record with the warehouse holding it.
#[derive(Debug, Clone)]
pub struct InventoryWithWarehouse {
    /// The stock record.
    pub item: inventory_items::Model,
    /// The warehouse.
    pub warehouse: Option<warehouses::Model>,
}

/// Product with its category and stock summed across warehouses.
#[derive(Debug, Clone)]
pub struct ProductWithStock {
    /// The product record.
    pub product: products::Model,
    /// The product's category.
    pub category: Option<categories::Model>,
    /// Stock totals.
    pub stock: StockLevel,
    /// Per-warehouse stock; `None` unless requested.
    pub inventory: Option<Vec<InventoryWithWarehouse>>,
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Category the product belongs to.
    pub category_id: Uuid,
    /// Product code (globally unique).
    pub code: String,
    /// Barcode (unique among active products).
    pub barcode: Option<String>,
    /// Name.
    pub name: String,
    /// Arabic name.
    pub arabic_name: String,
    /// Free text description.
    pub description: Option<String>,
    /// Unit of measure.
    pub unit: String,
    /// Purchase cost.
    pub cost_price: Decimal,
    /// Selling price.
    pub sale_price: Decimal,
    /// Reorder threshold.
    pub min_stock: Decimal,
    /// Whether stock carries expiry dates.
    pub has_expiry: bool,
    /// Whether units are tracked by serial number.
    pub track_serial: bool,
}

/// Input for updating a product.
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)]
pub struct UpdateProductInput {
    pub category_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub name: Option<String>,
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

/// Filter options for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Matches code, barcode, names or description.
    pub search: Option<String>,
    /// Include deactivated products.
    pub include_inactive: bool,
    /// Load per-warehouse stock records.
    pub include_inventory: bool,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists products ordered by code, with stock totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<ProductWithStock>, u64), ProductError> {
        let mut query = products::Entity::find();

        if !filter.include_inactive {
            query = query.filter(products::Column::IsActive.eq(true));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(products::Column::Code.contains(search))
                    .add(products::Column::Barcode.contains(search))
                    .add(products::Column::Name.contains(search))
                    .add(products::Column::ArabicName.contains(search))
                    .add(products::Column::Description.contains(search)),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(products::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let items = self.with_stock(rows, filter.include_inventory).await?;
        Ok((items, total))
    }

    /// Finds a product with its stock and per-warehouse records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_product(&self, id: Uuid) -> Result<Option<ProductWithStock>, ProductError> {
        let Some(product) = products::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.with_stock(vec![product], true).await?.pop())
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code already exists
    /// - The barcode is used by another active product
    /// - The category does not exist
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        let existing = products::Entity::find()
            .filter(products::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(ProductError::DuplicateCode(input.code));
        }

        if let Some(barcode) = &input.barcode {
            self.ensure_barcode_free(barcode, None).await?;
        }

        self.ensure_category_exists(input.category_id).await?;

        let now = chrono::Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            code: Set(input.code),
            barcode: Set(input.barcode),
            name: Set(input.name),
            arabic_name: Set(input.arabic_name),
            description: Set(input.description),
            unit: Set(input.unit),
            cost_price: Set(input.cost_price),
            sale_price: Set(input.sale_price),
            min_stock: Set(input.min_stock),
            has_expiry: Set(input.has_expiry),
            track_serial: Set(input.track_serial),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(product.insert(&self.db).await?)
    }

    /// Updates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Product not found
    /// - The new barcode is used by another active product
    /// - The new category does not exist
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if let Some(barcode) = &input.barcode
            && product.barcode.as_ref() != Some(barcode)
        {
            self.ensure_barcode_free(barcode, Some(id)).await?;
        }

        if let Some(category_id) = input.category_id
            && category_id != product.category_id
        {
            self.ensure_category_exists(category_id).await?;
        }

        let mut active: products::ActiveModel = product.into();

        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(barcode) = input.barcode {
            active.barcode = Set(Some(barcode));
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(arabic_name) = input.arabic_name {
            active.arabic_name = Set(arabic_name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        if let Some(cost_price) = input.cost_price {
            active.cost_price = Set(cost_price);
        }
        if let Some(sale_price) = input.sale_price {
            active.sale_price = Set(sale_price);
        }
        if let Some(min_stock) = input.min_stock {
            active.min_stock = Set(min_stock);
        }
        if let Some(has_expiry) = input.has_expiry {
            active.has_expiry = Set(has_expiry);
        }
        if let Some(track_serial) = input.track_serial {
            active.track_serial = Set(track_serial);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a product without stock records or invoice lines.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Product not found
    /// - Product has inventory records or appears on an invoice
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let inventory_items = inventory_items::Entity::find()
            .filter(inventory_items::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        let sales_items = sales_invoice_items::Entity::find()
            .filter(sales_invoice_items::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        let purchase_items = purchase_invoice_items::Entity::find()
            .filter(purchase_invoice_items::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;

        check_product_deletion(ProductDependents {
            inventory_items,
            sales_items,
            purchase_items,
        })?;

        products::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn ensure_barcode_free(
        &self,
        barcode: &str,
        except: Option<Uuid>,
    ) -> Result<(), ProductError> {
        let mut query = products::Entity::find()
            .filter(products::Column::Barcode.eq(barcode))
            .filter(products::Column::IsActive.eq(true));
        if let Some(id) = except {
            query = query.filter(products::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(ProductError::DuplicateBarcode(barcode.to_string()));
        }
        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> Result<(), ProductError> {
        categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::CategoryNotFound(category_id))?;
        Ok(())
    }

    /// Attaches categories and stock to `rows`, keeping their order.
    async fn with_stock(
        &self,
        rows: Vec<products::Model>,
        include_inventory: bool,
    ) -> Result<Vec<ProductWithStock>, ProductError> {
        let categories = rows.load_one(categories::Entity, &self.db).await?;
        let stock = rows.load_many(inventory_items::Entity, &self.db).await?;

        let warehouses: HashMap<Uuid, warehouses::Model> = if include_inventory {
            let ids: Vec<Uuid> = stock.iter().flatten().map(|i| i.warehouse_id).collect();
            if ids.is_empty() {
                HashMap::new()
            } else {
                warehouses::Entity::find()
                    .filter(warehouses::Column::Id.is_in(ids))
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(|w| (w.id, w))
                    .collect()
            }
        } else {
            HashMap::new()
        };

        let items = rows
            .into_iter()
            .zip(categories)
            .zip(stock)
            .map(|((product, category), items)| {
                let level = StockLevel::from_records(items.iter().map(|i| StockRecord {
                    quantity: i.quantity,
                    reserved: i.reserved_qty,
                }));
                let inventory = include_inventory.then(|| {
                    items
                        .into_iter()
                        .map(|item| InventoryWithWarehouse {
                            warehouse: warehouses.get(&item.warehouse_id).cloned(),
                            item,
                        })
                        .collect()
                });
                ProductWithStock {
                    product,
                    category,
                    stock: level,
                    inventory,
                }
            })
            .collect();

        Ok(items)
    }
}
