//! Sample data loading from config.toml
//!
//! The seed file lists categories, funders, events and expenses as TOML
//! arrays of tables. Each collection is seeded only when it is empty, so
//! running `init` twice never duplicates rows. Expenses name the category,
//! funder and event they belong to; names are resolved to ids after the
//! other collections are in place.

use crate::{
    core::{
        category::{self as category_ops, NewCategory},
        event::{self as event_ops, NewEvent},
        expense::{self as expense_ops, NewExpense},
        funder::{self as funder_ops, NewFunder},
        status::ExpenseStatus,
    },
    entities::{Category, Event, Expense, Funder},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info, instrument, warn};

/// Structure of the whole seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    /// Funders to seed
    #[serde(default)]
    pub funders: Vec<FunderSeed>,
    /// Events to seed
    #[serde(default)]
    pub events: Vec<EventSeed>,
    /// Expenses to seed
    #[serde(default)]
    pub expenses: Vec<ExpenseSeed>,
}

/// A seeded category
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
}

/// A seeded funder
#[derive(Debug, Clone, Deserialize)]
pub struct FunderSeed {
    /// Display name
    pub name: String,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

/// A seeded event
#[derive(Debug, Clone, Deserialize)]
pub struct EventSeed {
    /// Event name
    pub name: String,
    /// Date, e.g. "2025-09-08"
    #[serde(default)]
    pub date: String,
    /// Planned budget
    #[serde(default)]
    pub budget: f64,
    /// Free-text label
    #[serde(default)]
    pub category: String,
    /// Location
    #[serde(default)]
    pub location: String,
    /// Description
    #[serde(default)]
    pub description: String,
}

/// A seeded expense. References are by name.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseSeed {
    /// Short title
    pub title: String,
    /// Amount
    pub amount: f64,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Name of the category to file under
    #[serde(default)]
    pub category: Option<String>,
    /// Name of the paying funder
    #[serde(default)]
    pub funder: Option<String>,
    /// Name of the owning event
    #[serde(default)]
    pub event: Option<String>,
    /// Status name; unknown values become `Outstanding`
    #[serde(default)]
    pub status: Option<String>,
}

/// How many rows of each collection were seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Categories inserted
    pub categories: usize,
    /// Funders inserted
    pub funders: usize,
    /// Events inserted
    pub events: usize,
    /// Expenses inserted
    pub expenses: usize,
}

impl SeedOutcome {
    /// True when nothing was seeded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.categories == 0 && self.funders == 0 && self.events == 0 && self.expenses == 0
    }
}

/// Loads the seed configuration from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is
/// invalid.
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path = path.as_ref();
    debug!("Loading seed data from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file {}: {e}", path.display()),
    })
}

fn lookup(ids: &HashMap<String, i64>, kind: &str, name: Option<&String>) -> Option<i64> {
    let name = name?;
    let id = ids.get(name).copied();
    if id.is_none() {
        warn!("Seed expense references unknown {kind} '{name}', leaving it unset");
    }
    id
}

/// Seeds every empty collection from `seed`, in one transaction.
#[instrument(skip_all)]
pub async fn seed_if_empty(db: &DatabaseConnection, seed: &SeedConfig) -> Result<SeedOutcome> {
    let txn = db.begin().await?;
    let mut outcome = SeedOutcome::default();

    if Category::find().count(&txn).await? == 0 {
        for c in &seed.categories {
            category_ops::create_category(
                &txn,
                NewCategory {
                    name: c.name.clone(),
                    description: c.description.clone(),
                },
            )
            .await?;
            outcome.categories += 1;
        }
    }

    if Funder::find().count(&txn).await? == 0 {
        for f in &seed.funders {
            funder_ops::create_funder(
                &txn,
                NewFunder {
                    name: f.name.clone(),
                    phone: f.phone.clone(),
                    email: f.email.clone(),
                },
            )
            .await?;
            outcome.funders += 1;
        }
    }

    if Event::find().count(&txn).await? == 0 {
        for e in &seed.events {
            event_ops::create_event(
                &txn,
                NewEvent {
                    name: e.name.clone(),
                    date: e.date.clone(),
                    budget: e.budget,
                    category: e.category.clone(),
                    location: e.location.clone(),
                    description: e.description.clone(),
                },
            )
            .await?;
            outcome.events += 1;
        }
    }

    if Expense::find().count(&txn).await? == 0 && !seed.expenses.is_empty() {
        let categories: HashMap<String, i64> = category_ops::list_categories(&txn)
            .await?
            .into_iter()
            .map(|c| (c.name, c.id))
            .collect();
        let funders: HashMap<String, i64> = funder_ops::list_funders(&txn)
            .await?
            .into_iter()
            .map(|f| (f.name, f.id))
            .collect();
        let events: HashMap<String, i64> = event_ops::list_events(&txn)
            .await?
            .into_iter()
            .map(|e| (e.name, e.id))
            .collect();

        for x in &seed.expenses {
            expense_ops::create_expense(
                &txn,
                NewExpense {
                    title: x.title.clone(),
                    amount: x.amount,
                    description: x.description.clone(),
                    category_id: lookup(&categories, "category", x.category.as_ref()),
                    funder_id: lookup(&funders, "funder", x.funder.as_ref()),
                    event_id: lookup(&events, "event", x.event.as_ref()),
                    status: x
                        .status
                        .as_deref()
                        .map(ExpenseStatus::from_stored)
                        .unwrap_or_default(),
                    is_hidden: false,
                },
            )
            .await?;
            outcome.expenses += 1;
        }
    }

    txn.commit().await?;
    info!(
        categories = outcome.categories,
        funders = outcome.funders,
        events = outcome.events,
        expenses = outcome.expenses,
        "Seeded sample data"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::expense::ExpenseFilter;
    use crate::test_utils::*;

    const SAMPLE: &str = r#"
        [[categories]]
        name = "Food & Beverages"
        description = "Meals, snacks, and drinks"

        [[funders]]
        name = "Sujith"
        phone = "+94 77 123 4567"

        [[events]]
        name = "Birthday Party"
        date = "2025-09-08"
        budget = 25000.0

        [[expenses]]
        title = "Catering"
        amount = 60000.0
        category = "Food & Beverages"
        funder = "Sujith"
        event = "Birthday Party"
        status = "Spent"

        [[expenses]]
        title = "Stray"
        amount = 5.0
        event = "No Such Event"
    "#;

    #[test]
    fn test_parse_seed_config() {
        let seed: SeedConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(seed.categories.len(), 1);
        assert_eq!(seed.funders[0].phone.as_deref(), Some("+94 77 123 4567"));
        assert_eq!(seed.events[0].budget, 25_000.0);
        assert_eq!(seed.expenses.len(), 2);
        assert_eq!(seed.expenses[1].status, None);
    }

    #[test]
    fn test_bundled_seed_file_parses() {
        let seed: SeedConfig = toml::from_str(include_str!("../../config.toml")).unwrap();
        assert_eq!(seed.categories.len(), 4);
        assert_eq!(seed.funders.len(), 3);
        assert_eq!(seed.events.len(), 2);
        assert_eq!(seed.expenses.len(), 4);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = load_seed_config("/definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_seed_resolves_references_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        let seed: SeedConfig = toml::from_str(SAMPLE).unwrap();

        let outcome = seed_if_empty(&db, &seed).await?;
        assert_eq!(
            outcome,
            SeedOutcome {
                categories: 1,
                funders: 1,
                events: 1,
                expenses: 2,
            }
        );

        let expenses = expense_ops::list_expenses(&db, &ExpenseFilter::default()).await?;
        let catering = expenses.iter().find(|e| e.title == "Catering").unwrap();
        assert!(catering.category_id.is_some());
        assert!(catering.funder_id.is_some());
        assert!(catering.event_id.is_some());
        assert_eq!(catering.status, "Spent");

        let stray = expenses.iter().find(|e| e.title == "Stray").unwrap();
        assert_eq!(stray.event_id, None);
        assert_eq!(stray.status, "Outstanding");

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_twice_does_not_duplicate() -> Result<()> {
        let db = setup_test_db().await?;
        let seed: SeedConfig = toml::from_str(SAMPLE).unwrap();

        seed_if_empty(&db, &seed).await?;
        let second = seed_if_empty(&db, &seed).await?;

        assert!(second.is_empty());
        assert_eq!(category_ops::list_categories(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_skips_only_populated_collections() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Existing").await?;
        let seed: SeedConfig = toml::from_str(SAMPLE).unwrap();

        let outcome = seed_if_empty(&db, &seed).await?;

        assert_eq!(outcome.categories, 0);
        assert_eq!(outcome.funders, 1);
        // "Food & Beverages" was never created, so the reference stays unset
        let expenses = expense_ops::list_expenses(&db, &ExpenseFilter::default()).await?;
        assert!(expenses.iter().all(|e| e.category_id.is_none()));
        Ok(())
    }
}
