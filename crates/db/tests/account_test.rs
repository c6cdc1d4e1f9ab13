//! Integration tests for the chart of accounts repository.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::TransactionTrait;
use uuid::Uuid;

use common::{Fixture, balance_of, insert_fiscal_year, setup};
use qayd_core::{
    guards::DeletionBlocker,
    ledger::{AccountType, EntryLineInput, TransactionType},
};
use qayd_db::{
    AccountRepository, TransactionRepository,
    repositories::{
        AccountError, AccountFilter, CreateAccountInput, CreateTransactionInput,
        UpdateAccountInput,
    },
};
use qayd_shared::types::AccountId;

fn account(fiscal_year_id: Uuid, code: &str, parent_id: Option<Uuid>) -> CreateAccountInput {
    CreateAccountInput {
        fiscal_year_id,
        code: code.to_string(),
        name: format!("Account {code}"),
        arabic_name: format!("حساب {code}"),
        account_type: AccountType::Assets,
        parent_id,
        opening_balance: dec!(0),
    }
}

async fn post_sale(f: &Fixture, cash: Uuid, revenue: Uuid, amount: Decimal) {
    let transactions = TransactionRepository::new(f.db.clone());
    let created = transactions
        .create_transaction(CreateTransactionInput {
            fiscal_year_id: f.fiscal_year_id,
            branch_id: f.branch_id,
            user_id: f.user_id,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            description: "Sale".to_string(),
            reference: None,
            transaction_type: TransactionType::Journal,
            entries: vec![
                EntryLineInput::debit(AccountId::from(cash), amount),
                EntryLineInput::credit(AccountId::from(revenue), amount),
            ],
        })
        .await
        .unwrap();
    transactions
        .post_transaction(created.transaction.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_root_and_child_sets_levels_and_parent_flag() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let root = repo
        .create_account(account(f.fiscal_year_id, "1", None))
        .await
        .unwrap();
    assert_eq!(root.level, 1);
    assert!(!root.is_parent);

    let group = repo
        .create_account(account(f.fiscal_year_id, "11", Some(root.id)))
        .await
        .unwrap();
    let mut cash_input = account(f.fiscal_year_id, "1101", Some(group.id));
    cash_input.opening_balance = dec!(500);
    let cash = repo.create_account(cash_input).await.unwrap();

    assert_eq!(group.level, 2);
    assert_eq!(cash.level, 3);
    assert_eq!(cash.current_balance, dec!(500));

    let root = repo.find_account_by_id(root.id).await.unwrap().unwrap();
    let group = repo.find_account_by_id(group.id).await.unwrap().unwrap();
    assert!(root.is_parent);
    assert!(group.is_parent);
    assert!(!cash.is_parent);
}

#[tokio::test]
async fn test_duplicate_code_in_same_fiscal_year_is_rejected() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    repo.create_account(account(f.fiscal_year_id, "1101", None))
        .await
        .unwrap();
    let duplicate = repo
        .create_account(account(f.fiscal_year_id, "1101", None))
        .await;
    assert!(matches!(duplicate, Err(AccountError::DuplicateCode(code)) if code == "1101"));

    // The same code is free in another fiscal year
    let other_year = insert_fiscal_year(&f.db, f.company_id, 2027, false, false).await;
    assert!(
        repo.create_account(account(other_year, "1101", None))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_unknown_parent_is_rejected() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let missing = Uuid::new_v4();
    let result = repo
        .create_account(account(f.fiscal_year_id, "1101", Some(missing)))
        .await;
    assert!(matches!(result, Err(AccountError::ParentNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_parent_from_other_fiscal_year_is_rejected() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());
    let other_year = insert_fiscal_year(&f.db, f.company_id, 2025, false, false).await;

    let parent = repo
        .create_account(account(other_year, "1", None))
        .await
        .unwrap();
    let result = repo
        .create_account(account(f.fiscal_year_id, "11", Some(parent.id)))
        .await;
    assert!(matches!(result, Err(AccountError::ParentWrongFiscalYear)));
}

#[tokio::test]
async fn test_list_orders_by_level_then_code_and_loads_relations() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let assets = repo
        .create_account(account(f.fiscal_year_id, "1", None))
        .await
        .unwrap();
    let mut revenue_input = account(f.fiscal_year_id, "4", None);
    revenue_input.account_type = AccountType::Revenue;
    repo.create_account(revenue_input).await.unwrap();
    repo.create_account(account(f.fiscal_year_id, "1102", Some(assets.id)))
        .await
        .unwrap();
    repo.create_account(account(f.fiscal_year_id, "1101", Some(assets.id)))
        .await
        .unwrap();

    let all = repo
        .list_accounts(AccountFilter {
            fiscal_year_id: Some(f.fiscal_year_id),
            include_children: true,
            ..AccountFilter::default()
        })
        .await
        .unwrap();
    let codes: Vec<&str> = all.iter().map(|a| a.account.code.as_str()).collect();
    assert_eq!(codes, ["1", "4", "1101", "1102"]);

    let root = &all[0];
    let children: Vec<&str> = root
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.code.as_str())
        .collect();
    assert_eq!(children, ["1101", "1102"]);
    assert_eq!(all[2].parent.as_ref().unwrap().id, assets.id);

    let revenue_only = repo
        .list_accounts(AccountFilter {
            account_type: Some(AccountType::Revenue),
            ..AccountFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(revenue_only.len(), 1);
    assert!(revenue_only[0].children.is_none());

    let under_assets = repo
        .list_accounts(AccountFilter {
            parent_id: Some(assets.id),
            ..AccountFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(under_assets.len(), 2);
}

#[tokio::test]
async fn test_inactive_accounts_are_not_listed() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let cash = repo
        .create_account(account(f.fiscal_year_id, "1101", None))
        .await
        .unwrap();
    repo.update_account(
        cash.id,
        UpdateAccountInput {
            is_active: Some(false),
            ..UpdateAccountInput::default()
        },
    )
    .await
    .unwrap();

    let listed = repo.list_accounts(AccountFilter::default()).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_inactive_children_are_listed_under_their_parent() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let root = repo
        .create_account(account(f.fiscal_year_id, "1", None))
        .await
        .unwrap();
    let closed = repo
        .create_account(account(f.fiscal_year_id, "1101", Some(root.id)))
        .await
        .unwrap();
    repo.create_account(account(f.fiscal_year_id, "1102", Some(root.id)))
        .await
        .unwrap();
    repo.update_account(
        closed.id,
        UpdateAccountInput {
            is_active: Some(false),
            ..UpdateAccountInput::default()
        },
    )
    .await
    .unwrap();

    let listed = repo
        .list_accounts(AccountFilter {
            include_children: true,
            ..AccountFilter::default()
        })
        .await
        .unwrap();
    let codes: Vec<&str> = listed.iter().map(|a| a.account.code.as_str()).collect();
    assert_eq!(codes, ["1", "1102"]);

    let children = listed[0].children.as_ref().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].code, "1101");
    assert!(!children[0].is_active);
}

#[tokio::test]
async fn test_opening_balance_edit_keeps_posted_movements() {
    let f = setup().await;
    let accounts = AccountRepository::new(f.db.clone());
    let transactions = TransactionRepository::new(f.db.clone());

    let mut cash_input = account(f.fiscal_year_id, "1101", None);
    cash_input.opening_balance = dec!(1000);
    let cash = accounts.create_account(cash_input).await.unwrap();
    let mut revenue_input = account(f.fiscal_year_id, "4101", None);
    revenue_input.account_type = AccountType::Revenue;
    let revenue = accounts.create_account(revenue_input).await.unwrap();

    let created = transactions
        .create_transaction(CreateTransactionInput {
            fiscal_year_id: f.fiscal_year_id,
            branch_id: f.branch_id,
            user_id: f.user_id,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            description: "Sale".to_string(),
            reference: None,
            transaction_type: TransactionType::Journal,
            entries: vec![
                EntryLineInput::debit(AccountId::from(cash.id), dec!(250)),
                EntryLineInput::credit(AccountId::from(revenue.id), dec!(250)),
            ],
        })
        .await
        .unwrap();
    transactions
        .post_transaction(created.transaction.id)
        .await
        .unwrap();
    assert_eq!(balance_of(&f.db, cash.id).await, dec!(1250));

    let updated = accounts
        .update_account(
            cash.id,
            UpdateAccountInput {
                name: Some("Cash on hand".to_string()),
                opening_balance: Some(dec!(1200)),
                ..UpdateAccountInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Cash on hand");
    assert_eq!(updated.opening_balance, dec!(1200));
    assert_eq!(updated.current_balance, dec!(1450));
}

#[tokio::test]
async fn test_opening_edit_from_stale_read_keeps_later_posting() {
    let f = setup().await;
    let accounts = AccountRepository::new(f.db.clone());

    let mut cash_input = account(f.fiscal_year_id, "1101", None);
    cash_input.opening_balance = dec!(1000);
    let cash = accounts.create_account(cash_input).await.unwrap();
    let mut revenue_input = account(f.fiscal_year_id, "4101", None);
    revenue_input.account_type = AccountType::Revenue;
    let revenue = accounts.create_account(revenue_input).await.unwrap();

    // The editor read the account before the sale was posted.
    let stale = accounts.find_account_by_id(cash.id).await.unwrap().unwrap();
    assert_eq!(stale.current_balance, dec!(1000));
    post_sale(&f, cash.id, revenue.id, dec!(250)).await;

    let txn = f.db.begin().await.unwrap();
    AccountRepository::shift_opening_balance(&txn, cash.id, stale.opening_balance, dec!(1200))
        .await
        .unwrap();
    txn.commit().await.unwrap();

    let cash = accounts.find_account_by_id(cash.id).await.unwrap().unwrap();
    assert_eq!(cash.opening_balance, dec!(1200));
    assert_eq!(cash.current_balance, dec!(1450));
}

#[tokio::test]
async fn test_opening_edit_against_changed_opening_is_a_conflict() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let mut cash_input = account(f.fiscal_year_id, "1101", None);
    cash_input.opening_balance = dec!(1000);
    let cash = repo.create_account(cash_input).await.unwrap();

    repo.update_account(
        cash.id,
        UpdateAccountInput {
            opening_balance: Some(dec!(1100)),
            ..UpdateAccountInput::default()
        },
    )
    .await
    .unwrap();

    let txn = f.db.begin().await.unwrap();
    let result =
        AccountRepository::shift_opening_balance(&txn, cash.id, dec!(1000), dec!(900)).await;
    assert!(matches!(result, Err(AccountError::ConcurrentUpdate(id)) if id == cash.id));
    txn.rollback().await.unwrap();

    assert_eq!(balance_of(&f.db, cash.id).await, dec!(1100));
}

#[tokio::test]
async fn test_opening_balance_beyond_money_column_is_rejected() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let mut huge = account(f.fiscal_year_id, "1101", None);
    huge.opening_balance = dec!(1000000000000);
    let result = repo.create_account(huge).await;
    assert!(matches!(result, Err(AccountError::OpeningBalanceOutOfRange)));

    let cash = repo
        .create_account(account(f.fiscal_year_id, "1101", None))
        .await
        .unwrap();
    let result = repo
        .update_account(
            cash.id,
            UpdateAccountInput {
                opening_balance: Some(dec!(-1000000000000)),
                ..UpdateAccountInput::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AccountError::OpeningBalanceOutOfRange)));
    assert_eq!(balance_of(&f.db, cash.id).await, dec!(0));
}

#[tokio::test]
async fn test_update_missing_account_is_not_found() {
    let f = setup().await;
    let repo = AccountRepository::new(f.db.clone());

    let result = repo
        .update_account(Uuid::new_v4(), UpdateAccountInput::default())
        .await;
    assert!(matches!(result, Err(AccountError::AccountNotFound(_))));
}

#[tokio::test]
async fn test_delete_guards() {
    let f = setup().await;
    let accounts = AccountRepository::new(f.db.clone());
    let transactions = TransactionRepository::new(f.db.clone());

    let root = accounts
        .create_account(account(f.fiscal_year_id, "1", None))
        .await
        .unwrap();
    let cash = accounts
        .create_account(account(f.fiscal_year_id, "1101", Some(root.id)))
        .await
        .unwrap();
    let bank = accounts
        .create_account(account(f.fiscal_year_id, "1102", Some(root.id)))
        .await
        .unwrap();
    let spare = accounts
        .create_account(account(f.fiscal_year_id, "1103", Some(root.id)))
        .await
        .unwrap();

    // A pending transaction is enough to pin both accounts
    transactions
        .create_transaction(CreateTransactionInput {
            fiscal_year_id: f.fiscal_year_id,
            branch_id: f.branch_id,
            user_id: f.user_id,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            description: "Deposit".to_string(),
            reference: None,
            transaction_type: TransactionType::Journal,
            entries: vec![
                EntryLineInput::debit(AccountId::from(bank.id), dec!(10)),
                EntryLineInput::credit(AccountId::from(cash.id), dec!(10)),
            ],
        })
        .await
        .unwrap();

    let blocked = accounts.delete_account(root.id).await;
    assert!(matches!(
        blocked,
        Err(AccountError::Blocked(DeletionBlocker::ChildAccounts(3)))
    ));

    let blocked = accounts.delete_account(cash.id).await;
    assert!(matches!(
        blocked,
        Err(AccountError::Blocked(DeletionBlocker::AccountEntries(1)))
    ));

    accounts.delete_account(spare.id).await.unwrap();
    assert!(accounts.find_account_by_id(spare.id).await.unwrap().is_none());

    let missing = accounts.delete_account(Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AccountError::AccountNotFound(_))));
}
