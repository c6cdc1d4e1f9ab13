//! Integration tests for fiscal year and branch resolution.

#![allow(clippy::unwrap_used)]

mod common;

use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use common::{insert_fiscal_year, setup};
use qayd_db::{
    FiscalRepository,
    entities::{branches, fiscal_years},
    repositories::FiscalError,
};

#[tokio::test]
async fn test_explicit_year_must_exist() {
    let f = setup().await;
    let repo = FiscalRepository::new(f.db.clone());
    let closed = insert_fiscal_year(&f.db, f.company_id, 2025, false, true).await;

    assert_eq!(
        repo.resolve_fiscal_year_id(Some(closed), Uuid::new_v4())
            .await
            .unwrap(),
        closed
    );

    let missing = Uuid::new_v4();
    let result = repo.resolve_fiscal_year_id(Some(missing), f.fiscal_year_id).await;
    assert!(matches!(result, Err(FiscalError::YearNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_current_year_is_preferred_over_fallback() {
    let f = setup().await;
    let repo = FiscalRepository::new(f.db.clone());
    let other = insert_fiscal_year(&f.db, f.company_id, 2025, false, false).await;

    let resolved = repo.resolve_fiscal_year_id(None, other).await.unwrap();
    assert_eq!(resolved, f.fiscal_year_id);
}

#[tokio::test]
async fn test_fallback_used_when_no_current_year() {
    let f = setup().await;
    let repo = FiscalRepository::new(f.db.clone());

    let year = fiscal_years::Entity::find_by_id(f.fiscal_year_id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: fiscal_years::ActiveModel = year.into();
    active.is_current = Set(false);
    active.update(&f.db).await.unwrap();

    assert_eq!(
        repo.resolve_fiscal_year_id(None, f.fiscal_year_id)
            .await
            .unwrap(),
        f.fiscal_year_id
    );
    assert!(matches!(
        repo.resolve_fiscal_year_id(None, Uuid::new_v4()).await,
        Err(FiscalError::NoCurrentYear)
    ));
}

#[tokio::test]
async fn test_branch_resolution() {
    let f = setup().await;
    let repo = FiscalRepository::new(f.db.clone());
    let requested = Uuid::new_v4();

    assert_eq!(
        repo.resolve_branch_id(Some(requested), Uuid::new_v4())
            .await
            .unwrap(),
        requested
    );
    assert_eq!(
        repo.resolve_branch_id(None, Uuid::new_v4()).await.unwrap(),
        f.branch_id
    );

    let branch = branches::Entity::find_by_id(f.branch_id)
        .one(&f.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: branches::ActiveModel = branch.into();
    active.is_active = Set(false);
    active.update(&f.db).await.unwrap();

    let fallback = Uuid::new_v4();
    assert_eq!(
        repo.resolve_branch_id(None, fallback).await.unwrap(),
        fallback
    );
}
