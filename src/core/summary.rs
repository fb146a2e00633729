//! Aggregation engine - budget, status and breakdown summaries.
//!
//! Everything here is a pure function over freshly read models. Hidden
//! expenses never contribute to a total, unknown statuses count as
//! `Outstanding`, and non-finite amounts count as zero. Sums are plain `f64`
//! additions; formatting for display is left to the caller.

use crate::{
    core::{coerce_amount, status::ExpenseStatus},
    entities::{category, expense, funder},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of expenses shown by [`recent_expenses`] when no limit is given.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Overall money position across all visible expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Sum of all visible expense amounts
    pub total_budget: f64,
    /// Sum of visible expenses whose status is `Available`
    pub received_fund: f64,
    /// `total_budget - received_fund`
    pub remaining_fund: f64,
}

/// Count and amount of expenses in one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusTotals {
    /// Number of visible expenses
    pub count: usize,
    /// Sum of their amounts
    pub amount: f64,
}

/// Per-status totals; always contains all four statuses.
pub type StatusSummary = BTreeMap<ExpenseStatus, StatusTotals>;

/// Per-status amounts for one event; always contains all four statuses.
pub type EventStatusSummary = BTreeMap<ExpenseStatus, f64>;

/// One row of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Category id
    pub category_id: i64,
    /// Category name
    pub name: String,
    /// Sum of visible expense amounts in this category
    pub total_amount: f64,
    /// Number of visible expenses in this category
    pub count: usize,
}

/// One row of the funder breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunderBreakdown {
    /// Funder id
    pub funder_id: i64,
    /// Funder name
    pub name: String,
    /// Sum of visible expense amounts paid by this funder
    pub total_amount: f64,
    /// Number of visible expenses paid by this funder
    pub count: usize,
}

struct Tally {
    id: i64,
    name: String,
    total_amount: f64,
    count: usize,
}

/// Entity counts and the grand total, as shown in export summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    /// Number of categories
    pub categories_count: usize,
    /// Number of funders
    pub funders_count: usize,
    /// Number of events
    pub events_count: usize,
    /// Number of expenses, hidden ones included
    pub expenses_count: usize,
    /// Sum of all expense amounts, hidden ones included
    pub total_expense_amount: f64,
}

/// Everything the dashboard shows, computed from one consistent read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Overall money position
    pub budget: BudgetSummary,
    /// Totals per status
    pub statuses: StatusSummary,
    /// Categories with spending, largest first
    pub categories: Vec<CategoryBreakdown>,
    /// Funders with spending, largest first
    pub funders: Vec<FunderBreakdown>,
    /// Most recent visible expenses
    pub recent: Vec<expense::Model>,
}

fn visible(expenses: &[expense::Model]) -> impl Iterator<Item = &expense::Model> {
    expenses.iter().filter(|e| !e.is_hidden)
}

fn status_of(expense: &expense::Model) -> ExpenseStatus {
    ExpenseStatus::from_stored(&expense.status)
}

/// Computes the overall budget position.
#[must_use]
pub fn budget_summary(expenses: &[expense::Model]) -> BudgetSummary {
    let (total_budget, received_fund) =
        visible(expenses).fold((0.0, 0.0), |(total, received), e| {
            let amount = coerce_amount(e.amount);
            if status_of(e) == ExpenseStatus::Available {
                (total + amount, received + amount)
            } else {
                (total + amount, received)
            }
        });

    BudgetSummary {
        total_budget,
        received_fund,
        remaining_fund: total_budget - received_fund,
    }
}

/// Counts and sums visible expenses per status, zero-filling absent ones.
#[must_use]
pub fn status_summary(expenses: &[expense::Model]) -> StatusSummary {
    let mut summary: StatusSummary = ExpenseStatus::ALL
        .into_iter()
        .map(|status| (status, StatusTotals::default()))
        .collect();

    for expense in visible(expenses) {
        let totals = summary.entry(status_of(expense)).or_default();
        totals.count += 1;
        totals.amount += coerce_amount(expense.amount);
    }

    summary
}

/// Sums the visible expenses of `event_id` per status.
#[must_use]
pub fn event_status_summary(expenses: &[expense::Model], event_id: i64) -> EventStatusSummary {
    let mut summary: EventStatusSummary =
        ExpenseStatus::ALL.into_iter().map(|s| (s, 0.0)).collect();

    for expense in visible(expenses).filter(|e| e.event_id == Some(event_id)) {
        *summary.entry(status_of(expense)).or_default() += coerce_amount(expense.amount);
    }

    summary
}

fn breakdown<I, K>(owners: I, expenses: &[expense::Model], key: K) -> Vec<Tally>
where
    I: IntoIterator<Item = (i64, String)>,
    K: Fn(&expense::Model) -> Option<i64>,
{
    let mut entries: Vec<Tally> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for (id, name) in owners {
        index.entry(id).or_insert_with(|| {
            entries.push(Tally {
                id,
                name,
                total_amount: 0.0,
                count: 0,
            });
            entries.len() - 1
        });
    }

    for expense in visible(expenses) {
        if let Some(&slot) = key(expense).and_then(|id| index.get(&id)) {
            entries[slot].total_amount += coerce_amount(expense.amount);
            entries[slot].count += 1;
        }
    }

    entries.retain(|entry| entry.total_amount > 0.0);
    // stable: ties keep owner order
    entries.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    entries
}

/// Per-category totals of visible expenses, largest first. Categories with
/// nothing attributed are left out, as are expenses pointing at unknown ids.
#[must_use]
pub fn category_breakdown(
    categories: &[category::Model],
    expenses: &[expense::Model],
) -> Vec<CategoryBreakdown> {
    breakdown(
        categories.iter().map(|c| (c.id, c.name.clone())),
        expenses,
        |e| e.category_id,
    )
    .into_iter()
    .map(|t| CategoryBreakdown {
        category_id: t.id,
        name: t.name,
        total_amount: t.total_amount,
        count: t.count,
    })
    .collect()
}

/// Per-funder totals of visible expenses, with the same rules as
/// [`category_breakdown`].
#[must_use]
pub fn funder_breakdown(
    funders: &[funder::Model],
    expenses: &[expense::Model],
) -> Vec<FunderBreakdown> {
    breakdown(
        funders.iter().map(|f| (f.id, f.name.clone())),
        expenses,
        |e| e.funder_id,
    )
    .into_iter()
    .map(|t| FunderBreakdown {
        funder_id: t.id,
        name: t.name,
        total_amount: t.total_amount,
        count: t.count,
    })
    .collect()
}

/// The `limit` most recently created visible expenses.
#[must_use]
pub fn recent_expenses(expenses: &[expense::Model], limit: usize) -> Vec<expense::Model> {
    let mut recent: Vec<expense::Model> = visible(expenses).cloned().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    recent.truncate(limit);
    recent
}

/// Counts every collection and totals every expense, hidden ones included.
#[must_use]
pub fn data_summary(
    categories_count: usize,
    funders_count: usize,
    events_count: usize,
    expenses: &[expense::Model],
) -> DataSummary {
    DataSummary {
        categories_count,
        funders_count,
        events_count,
        expenses_count: expenses.len(),
        total_expense_amount: expenses.iter().map(|e| coerce_amount(e.amount)).sum(),
    }
}

/// Builds the full dashboard from one read of each collection.
#[must_use]
pub fn dashboard(
    categories: &[category::Model],
    funders: &[funder::Model],
    expenses: &[expense::Model],
) -> Dashboard {
    Dashboard {
        budget: budget_summary(expenses),
        statuses: status_summary(expenses),
        categories: category_breakdown(categories, expenses),
        funders: funder_breakdown(funders, expenses),
        recent: recent_expenses(expenses, DEFAULT_RECENT_LIMIT),
    }
}
