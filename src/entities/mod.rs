//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the four budget collections. References between
//! them (`category_id`, `funder_id`, `event_id`) are plain nullable columns
//! without foreign-key constraints, so a deleted category or funder leaves
//! dangling ids behind on its expenses.

pub mod category;
pub mod event;
pub mod expense;
pub mod funder;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use funder::{Column as FunderColumn, Entity as Funder, Model as FunderModel};

/// Names one of the four collections. Used in not-found errors and change
/// notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Expense categories
    Category,
    /// People or organisations paying for expenses
    Funder,
    /// Budgeted events
    Event,
    /// Individual expenses
    Expense,
}

impl EntityKind {
    /// Every collection, in dependency order (referenced collections first).
    pub const ALL: [Self; 4] = [Self::Category, Self::Funder, Self::Event, Self::Expense];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Category => "Category",
            Self::Funder => "Funder",
            Self::Event => "Event",
            Self::Expense => "Expense",
        };
        f.write_str(name)
    }
}
