//! Core business logic - framework-agnostic CRUD, aggregation and data transfer.
//!
//! Every function takes a SeaORM connection (or transaction) explicitly; the
//! [`crate::store::BudgetStore`] facade wraps them and publishes change
//! notifications.

/// Category CRUD
pub mod category;
/// Event CRUD, including the cascading delete
pub mod event;
/// Expense CRUD and visibility toggling
pub mod expense;
/// Funder CRUD
pub mod funder;
/// Per-event report data
pub mod report;
/// Expense status parsing and canonicalisation
pub mod status;
/// Budget, status and breakdown aggregation
pub mod summary;
/// JSON export/import, backups and clearing
pub mod transfer;

/// Replaces NaN and infinities with zero; every stored and summed amount
/// goes through this.
#[must_use]
pub const fn coerce_amount(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}
