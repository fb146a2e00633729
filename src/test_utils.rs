//! Shared test utilities for `BudgetFlow`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults, plus plain model
//! fixtures for the pure aggregation functions.

use crate::{
    core::{
        category::{self, NewCategory},
        event::{self, NewEvent},
        expense::{self, NewExpense},
        funder::{self, NewFunder},
        status::ExpenseStatus,
    },
    entities,
    errors::Result,
    store::BudgetStore,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a store over a fresh in-memory database. Replace-import backups
/// go to the system temp directory.
pub async fn setup_test_store() -> Result<BudgetStore> {
    let db = setup_test_db().await?;
    Ok(BudgetStore::new(db, std::env::temp_dir().join("budgetflow-test-backups")))
}

/// Creates a test category with an empty description.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(
        db,
        NewCategory {
            name: name.to_string(),
            description: None,
        },
    )
    .await
}

/// Creates a test funder without contact details.
pub async fn create_test_funder(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::funder::Model> {
    funder::create_funder(
        db,
        NewFunder {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates a test event on `date`.
///
/// # Defaults
/// * `budget`: 25000.0
/// * `category`, `location`, `description`: empty
pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
    date: &str,
) -> Result<entities::event::Model> {
    event::create_event(
        db,
        NewEvent {
            name: name.to_string(),
            date: date.to_string(),
            budget: 25_000.0,
            ..Default::default()
        },
    )
    .await
}

/// Creates a visible, unattached `Outstanding` expense of `amount`.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    amount: f64,
) -> Result<entities::expense::Model> {
    create_custom_expense(db, "Test expense", amount, ExpenseStatus::Outstanding, None, None, None)
        .await
}

/// Creates a visible expense with custom parameters.
/// Use this when a test needs specific references or a specific status.
pub async fn create_custom_expense(
    db: &DatabaseConnection,
    title: &str,
    amount: f64,
    status: ExpenseStatus,
    category_id: Option<i64>,
    funder_id: Option<i64>,
    event_id: Option<i64>,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        NewExpense {
            title: title.to_string(),
            amount,
            status,
            category_id,
            funder_id,
            event_id,
            ..Default::default()
        },
    )
    .await
}

/// An unsaved expense model. `status` is stored verbatim, so tests can feed
/// non-canonical values to the aggregation functions.
pub fn expense_fixture(
    id: i64,
    amount: f64,
    status: &str,
    is_hidden: bool,
) -> entities::expense::Model {
    let now = Utc::now();
    entities::expense::Model {
        id,
        title: format!("Expense {id}"),
        amount,
        description: String::new(),
        category_id: None,
        funder_id: None,
        event_id: None,
        status: status.to_string(),
        is_hidden,
        created_at: now,
        updated_at: now,
    }
}

/// An unsaved category model.
pub fn category_fixture(id: i64, name: &str) -> entities::category::Model {
    entities::category::Model {
        id,
        name: name.to_string(),
        description: String::new(),
        created_at: Utc::now(),
    }
}

/// An unsaved funder model.
pub fn funder_fixture(id: i64, name: &str) -> entities::funder::Model {
    entities::funder::Model {
        id,
        name: name.to_string(),
        phone: String::new(),
        email: String::new(),
        created_at: Utc::now(),
    }
}
