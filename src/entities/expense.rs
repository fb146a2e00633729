//! Expense entity - A single budget line with an amount and a lifecycle status.
//!
//! `status` is stored as text and interpreted through
//! [`ExpenseStatus::from_stored`](crate::core::status::ExpenseStatus::from_stored),
//! so rows written by older versions (e.g. `"Received"`) still aggregate correctly.
//! Hidden expenses stay in listings but are left out of every total.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title (e.g., "Catering")
    pub title: String,
    /// Amount in the user's currency; expected non-negative but not enforced
    pub amount: f64,
    /// Free-form description
    pub description: String,
    /// Category this expense is filed under, if any
    pub category_id: Option<i64>,
    /// Funder paying for this expense, if any
    pub funder_id: Option<i64>,
    /// Event this expense belongs to, if any
    pub event_id: Option<i64>,
    /// Lifecycle status: `"Outstanding"`, `"Pending"`, `"Available"` or `"Spent"`
    pub status: String,
    /// Excluded from all aggregates when true
    pub is_hidden: bool,
    /// When the expense was created
    pub created_at: DateTimeUtc,
    /// When the expense was last modified
    pub updated_at: DateTimeUtc,
}

/// Expense references are unenforced; see the module docs of [`crate::entities`]
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
