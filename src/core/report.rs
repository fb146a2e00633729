//! Event report generation.
//!
//! This module gathers everything a per-event report needs into a structured
//! value. Turning it into PDF or HTML is left to the presentation layer.

use crate::{
    core::{
        coerce_amount, event as event_ops, expense as expense_ops,
        status::ExpenseStatus,
        summary::{EventStatusSummary, event_status_summary},
    },
    entities::{EntityKind, event, expense},
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Structured report for a single event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    /// The event being reported on
    pub event: event::Model,
    /// Amount per status over visible expenses
    pub status_totals: EventStatusSummary,
    /// Visible expenses grouped by status, newest first within a group
    pub expenses_by_status: BTreeMap<ExpenseStatus, Vec<expense::Model>>,
    /// Hidden expenses, listed separately
    pub hidden_expenses: Vec<expense::Model>,
    /// Sum of visible expense amounts
    pub total_amount: f64,
    /// `total_amount` as a percentage of the event budget
    pub budget_used_percent: f64,
}

/// Percentage of `budget` consumed by `amount`; 0 when there is no budget.
/// Can exceed 100 when the event is over budget.
#[must_use]
pub fn calculate_budget_usage(amount: f64, budget: f64) -> f64 {
    if budget == 0.0 || !budget.is_finite() {
        return 0.0;
    }

    (amount / budget) * 100.0
}

/// Builds the report from an event and its expenses. Expenses belonging to
/// other events are ignored.
#[must_use]
pub fn build_event_report(event: event::Model, expenses: &[expense::Model]) -> EventReport {
    let status_totals = event_status_summary(expenses, event.id);

    let mut expenses_by_status: BTreeMap<ExpenseStatus, Vec<expense::Model>> =
        ExpenseStatus::ALL.into_iter().map(|s| (s, Vec::new())).collect();
    let mut hidden_expenses = Vec::new();

    for expense in expenses.iter().filter(|e| e.event_id == Some(event.id)) {
        if expense.is_hidden {
            hidden_expenses.push(expense.clone());
        } else {
            expenses_by_status
                .entry(ExpenseStatus::from_stored(&expense.status))
                .or_default()
                .push(expense.clone());
        }
    }

    let total_amount: f64 = status_totals.values().copied().map(coerce_amount).sum();
    let budget_used_percent = calculate_budget_usage(total_amount, event.budget);

    EventReport {
        event,
        status_totals,
        expenses_by_status,
        hidden_expenses,
        total_amount,
        budget_used_percent,
    }
}

/// Reads an event and its expenses and builds its report.
pub async fn generate_event_report<C>(db: &C, event_id: i64) -> Result<EventReport>
where
    C: ConnectionTrait,
{
    let event = event_ops::get_event(db, event_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Event, event_id))?;
    let expenses = expense_ops::list_expenses_by_event(db, event_id).await?;

    Ok(build_event_report(event, &expenses))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_calculate_budget_usage() {
        assert_eq!(calculate_budget_usage(50.0, 200.0), 25.0);
        assert_eq!(calculate_budget_usage(300.0, 200.0), 150.0);
        assert_eq!(calculate_budget_usage(10.0, 0.0), 0.0);
    }

    #[tokio::test]
    async fn test_generate_event_report() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Birthday Party", "2025-09-08").await?;
        let event = event_ops::update_event(
            &db,
            event.id,
            event_ops::EventPatch {
                budget: Some(100_000.0),
                ..Default::default()
            },
        )
        .await?;

        create_custom_expense(
            &db,
            "Catering",
            60_000.0,
            ExpenseStatus::Spent,
            None,
            None,
            Some(event.id),
        )
        .await?;
        create_custom_expense(
            &db,
            "Decor",
            20_000.0,
            ExpenseStatus::Available,
            None,
            None,
            Some(event.id),
        )
        .await?;
        let hidden = create_custom_expense(
            &db,
            "Hidden",
            5_000.0,
            ExpenseStatus::Pending,
            None,
            None,
            Some(event.id),
        )
        .await?;
        expense_ops::toggle_expense_visibility(&db, hidden.id).await?;
        create_custom_expense(
            &db,
            "Elsewhere",
            1_000.0,
            ExpenseStatus::Spent,
            None,
            None,
            None,
        )
        .await?;

        let report = generate_event_report(&db, event.id).await?;

        assert_eq!(report.event.id, event.id);
        assert_eq!(report.total_amount, 80_000.0);
        assert_eq!(report.budget_used_percent, 80.0);
        assert_eq!(report.status_totals[&ExpenseStatus::Spent], 60_000.0);
        assert_eq!(report.status_totals[&ExpenseStatus::Pending], 0.0);
        assert_eq!(report.expenses_by_status[&ExpenseStatus::Spent].len(), 1);
        assert!(report.expenses_by_status[&ExpenseStatus::Outstanding].is_empty());
        assert_eq!(report.hidden_expenses.len(), 1);
        assert_eq!(report.hidden_expenses[0].id, hidden.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_generate_report_for_missing_event() -> Result<()> {
        let db = setup_test_db().await?;
        let result = generate_event_report(&db, 404).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: EntityKind::Event,
                id: 404
            }
        ));
        Ok(())
    }
}
