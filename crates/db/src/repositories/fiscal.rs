//! Fiscal year and branch lookups.
//!
//! Requests may omit the fiscal year or branch; these lookups resolve the
//! defaults.

use qayd_shared::AppError;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::{branches, fiscal_years};

/// Error types for fiscal year lookups.
#[derive(Debug, thiserror::Error)]
pub enum FiscalError {
    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    YearNotFound(Uuid),

    /// No fiscal year is marked current.
    #[error("No current fiscal year is configured")]
    NoCurrentYear,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FiscalError> for AppError {
    fn from(err: FiscalError) -> Self {
        match err {
            FiscalError::YearNotFound(_) => Self::NotFound(err.to_string()),
            FiscalError::NoCurrentYear => Self::BusinessRule(err.to_string()),
            FiscalError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Repository for fiscal years and branches.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a fiscal year by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_fiscal_year(
        &self,
        id: Uuid,
    ) -> Result<Option<fiscal_years::Model>, FiscalError> {
        Ok(fiscal_years::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Returns the fiscal year marked current, latest start date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current_fiscal_year(&self) -> Result<Option<fiscal_years::Model>, FiscalError> {
        Ok(fiscal_years::Entity::find()
            .filter(fiscal_years::Column::IsCurrent.eq(true))
            .order_by_desc(fiscal_years::Column::StartDate)
            .one(&self.db)
            .await?)
    }

    /// Resolves the fiscal year a request works in.
    ///
    /// An explicit ID must exist; otherwise the current year is used, then
    /// `fallback` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit year is missing or no year can be
    /// resolved.
    pub async fn resolve_fiscal_year_id(
        &self,
        requested: Option<Uuid>,
        fallback: Uuid,
    ) -> Result<Uuid, FiscalError> {
        if let Some(id) = requested {
            return self
                .find_fiscal_year(id)
                .await?
                .map(|year| year.id)
                .ok_or(FiscalError::YearNotFound(id));
        }

        if let Some(current) = self.current_fiscal_year().await? {
            return Ok(current.id);
        }

        self.find_fiscal_year(fallback)
            .await?
            .map(|year| year.id)
            .ok_or(FiscalError::NoCurrentYear)
    }

    /// Resolves the branch a request works in: the requested one, else the
    /// oldest active branch, else `fallback`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resolve_branch_id(
        &self,
        requested: Option<Uuid>,
        fallback: Uuid,
    ) -> Result<Uuid, FiscalError> {
        if let Some(id) = requested {
            return Ok(id);
        }
        Ok(self.default_branch().await?.map_or(fallback, |branch| branch.id))
    }

    /// Returns the first active branch, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn default_branch(&self) -> Result<Option<branches::Model>, FiscalError> {
        Ok(branches::Entity::find()
            .filter(branches::Column::IsActive.eq(true))
            .order_by_asc(branches::Column::CreatedAt)
            .one(&self.db)
            .await?)
    }
}
