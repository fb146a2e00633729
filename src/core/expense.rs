//! Expense business logic - CRUD over the `expenses` table.
//!
//! Expenses are listed newest first and can be filtered by category, funder
//! and event. The status is always written in its canonical form; the
//! `is_hidden` flag is toggled in place and never removes a row.

use crate::{
    core::{coerce_amount, status::ExpenseStatus},
    entities::{EntityKind, Expense, expense},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Restricts [`list_expenses`] to rows matching every supplied reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only expenses filed under this category
    pub category_id: Option<i64>,
    /// Only expenses paid by this funder
    pub funder_id: Option<i64>,
    /// Only expenses belonging to this event
    pub event_id: Option<i64>,
}

impl ExpenseFilter {
    /// Filter for a single event's expenses.
    #[must_use]
    pub const fn for_event(event_id: i64) -> Self {
        Self {
            category_id: None,
            funder_id: None,
            event_id: Some(event_id),
        }
    }

    /// Filter for a single category's expenses.
    #[must_use]
    pub const fn for_category(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            funder_id: None,
            event_id: None,
        }
    }
}

/// Fields for a new expense. Everything not supplied takes its default:
/// empty text, zero amount, no references, `Outstanding`, visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewExpense {
    /// Short title
    pub title: String,
    /// Amount; NaN and infinities are stored as 0
    pub amount: f64,
    /// Description
    pub description: String,
    /// Category reference
    pub category_id: Option<i64>,
    /// Funder reference
    pub funder_id: Option<i64>,
    /// Event reference
    pub event_id: Option<i64>,
    /// Lifecycle status
    pub status: ExpenseStatus,
    /// Whether the expense is excluded from aggregates
    pub is_hidden: bool,
}

/// Partial update for an expense. The reference fields take
/// `Some(None)` to clear a reference and `Some(Some(id))` to set one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    /// New title
    pub title: Option<String>,
    /// New amount
    pub amount: Option<f64>,
    /// New description
    pub description: Option<String>,
    /// New category reference
    pub category_id: Option<Option<i64>>,
    /// New funder reference
    pub funder_id: Option<Option<i64>>,
    /// New event reference
    pub event_id: Option<Option<i64>>,
    /// New status
    pub status: Option<ExpenseStatus>,
    /// New visibility flag
    pub is_hidden: Option<bool>,
}

/// Retrieves expenses matching `filter`, newest first.
pub async fn list_expenses<C>(db: &C, filter: &ExpenseFilter) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Expense::find();
    if let Some(category_id) = filter.category_id {
        query = query.filter(expense::Column::CategoryId.eq(category_id));
    }
    if let Some(funder_id) = filter.funder_id {
        query = query.filter(expense::Column::FunderId.eq(funder_id));
    }
    if let Some(event_id) = filter.event_id {
        query = query.filter(expense::Column::EventId.eq(event_id));
    }

    query
        .order_by_desc(expense::Column::CreatedAt)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all expenses of one event, newest first.
pub async fn list_expenses_by_event<C>(db: &C, event_id: i64) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    list_expenses(db, &ExpenseFilter::for_event(event_id)).await
}

/// Finds an expense by id, returning `None` when it does not exist.
pub async fn get_expense<C>(db: &C, expense_id: i64) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find_by_id(expense_id).one(db).await.map_err(Into::into)
}

/// Creates an expense with a freshly assigned id and timestamps.
pub async fn create_expense<C>(db: &C, new: NewExpense) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let expense = expense::ActiveModel {
        title: Set(new.title),
        amount: Set(coerce_amount(new.amount)),
        description: Set(new.description),
        category_id: Set(new.category_id),
        funder_id: Set(new.funder_id),
        event_id: Set(new.event_id),
        status: Set(new.status.as_str().to_string()),
        is_hidden: Set(new.is_hidden),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = expense.insert(db).await?;
    debug!(expense_id = created.id, amount = created.amount, "Created expense");
    Ok(created)
}

/// Applies a shallow merge of `patch` onto an existing expense and refreshes
/// `updated_at`.
pub async fn update_expense<C>(
    db: &C,
    expense_id: i64,
    patch: ExpensePatch,
) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let existing = get_expense(db, expense_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Expense, expense_id))?;

    let mut expense: expense::ActiveModel = existing.into();
    if let Some(title) = patch.title {
        expense.title = Set(title);
    }
    if let Some(amount) = patch.amount {
        expense.amount = Set(coerce_amount(amount));
    }
    if let Some(description) = patch.description {
        expense.description = Set(description);
    }
    if let Some(category_id) = patch.category_id {
        expense.category_id = Set(category_id);
    }
    if let Some(funder_id) = patch.funder_id {
        expense.funder_id = Set(funder_id);
    }
    if let Some(event_id) = patch.event_id {
        expense.event_id = Set(event_id);
    }
    if let Some(status) = patch.status {
        expense.status = Set(status.as_str().to_string());
    }
    if let Some(is_hidden) = patch.is_hidden {
        expense.is_hidden = Set(is_hidden);
    }
    expense.updated_at = Set(Utc::now());

    expense.update(db).await.map_err(Into::into)
}

/// Flips the `is_hidden` flag of an expense and returns the updated row.
pub async fn toggle_expense_visibility<C>(db: &C, expense_id: i64) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let existing = get_expense(db, expense_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Expense, expense_id))?;

    update_expense(
        db,
        expense_id,
        ExpensePatch {
            is_hidden: Some(!existing.is_hidden),
            ..Default::default()
        },
    )
    .await
}

/// Deletes an expense by id and returns the id.
pub async fn delete_expense<C>(db: &C, expense_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(EntityKind::Expense, expense_id));
    }
    Ok(expense_id)
}
