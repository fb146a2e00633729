//! The `BudgetStore` facade.
//!
//! One store is built in `main` (or per test) and cloned wherever it is
//! needed. It owns the database handle and the change channel: every
//! mutation goes through it, persists immediately and then publishes a
//! [`Change`] for each collection it touched. Reads always hit the database,
//! and the aggregation wrappers compute over freshly read rows.

use crate::{
    config::{
        database::{create_connection, create_tables},
        seed::{SeedConfig, SeedOutcome, seed_if_empty},
        settings::AppConfig,
    },
    core::{
        category::{self as category_ops, CategoryPatch, NewCategory},
        event::{self as event_ops, EventPatch, NewEvent},
        expense::{self as expense_ops, ExpenseFilter, ExpensePatch, NewExpense},
        funder::{self as funder_ops, FunderPatch, NewFunder},
        report::{EventReport, generate_event_report},
        summary::{
            self, BudgetSummary, CategoryBreakdown, Dashboard, DataSummary, EventStatusSummary,
            FunderBreakdown, StatusSummary,
        },
        transfer::{self, ExportDocument, ImportMode, ImportOutcome},
    },
    entities::{EntityKind, category, event, expense, funder},
    errors::Result,
    notify::{self, Change, ChangeKind, ChangeNotifier, SubscribeOptions, Subscription},
};
use sea_orm::DatabaseConnection;
use std::{
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, instrument};

/// Handle to the budget data. Cheap to clone; clones share the connection
/// and the change channel.
#[derive(Clone, Debug)]
pub struct BudgetStore {
    db: DatabaseConnection,
    notifier: ChangeNotifier,
    backup_dir: PathBuf,
    refresh_interval: Option<Duration>,
}

impl BudgetStore {
    /// Wraps an already initialised connection. Replace imports back up
    /// into `backup_dir`.
    #[must_use]
    pub fn new(db: DatabaseConnection, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            notifier: ChangeNotifier::default(),
            backup_dir: backup_dir.into(),
            refresh_interval: None,
        }
    }

    /// Sets the periodic refresh used by every subscription made through
    /// this store.
    #[must_use]
    pub fn with_refresh_interval(mut self, refresh_interval: Option<Duration>) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Connects to the configured database and makes sure the tables exist.
    #[instrument(skip(config), fields(database_url = %config.database_url))]
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let db = create_connection(&config.database_url).await?;
        create_tables(&db).await?;
        info!("Budget store ready");
        Ok(Self::new(db, config.backup_dir.clone()).with_refresh_interval(config.refresh_interval))
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// The change channel mutations are published on.
    #[must_use]
    pub const fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Directory replace imports write their backup into.
    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn publish_row(&self, entity: EntityKind, kind: ChangeKind, id: i64) {
        self.notifier.publish(Change::row(entity, kind, id));
    }

    fn publish_reset_all(&self) {
        for entity in EntityKind::ALL {
            self.notifier.publish(Change::reset(entity));
        }
    }

    // Categories

    /// All categories, alphabetically.
    pub async fn list_categories(&self) -> Result<Vec<category::Model>> {
        category_ops::list_categories(&self.db).await
    }

    /// A category by id, `None` if it does not exist.
    pub async fn get_category(&self, id: i64) -> Result<Option<category::Model>> {
        category_ops::get_category(&self.db, id).await
    }

    /// Creates a category.
    pub async fn create_category(&self, new: NewCategory) -> Result<category::Model> {
        let category = category_ops::create_category(&self.db, new).await?;
        self.publish_row(EntityKind::Category, ChangeKind::Created, category.id);
        Ok(category)
    }

    /// Updates a category; `NotFound` if it does not exist.
    pub async fn update_category(&self, id: i64, patch: CategoryPatch) -> Result<category::Model> {
        let category = category_ops::update_category(&self.db, id, patch).await?;
        self.publish_row(EntityKind::Category, ChangeKind::Updated, id);
        Ok(category)
    }

    /// Deletes a category; its expenses keep the dangling reference.
    pub async fn delete_category(&self, id: i64) -> Result<i64> {
        let id = category_ops::delete_category(&self.db, id).await?;
        self.publish_row(EntityKind::Category, ChangeKind::Deleted, id);
        Ok(id)
    }

    // Funders

    /// All funders, alphabetically.
    pub async fn list_funders(&self) -> Result<Vec<funder::Model>> {
        funder_ops::list_funders(&self.db).await
    }

    /// A funder by id, `None` if it does not exist.
    pub async fn get_funder(&self, id: i64) -> Result<Option<funder::Model>> {
        funder_ops::get_funder(&self.db, id).await
    }

    /// Creates a funder.
    pub async fn create_funder(&self, new: NewFunder) -> Result<funder::Model> {
        let funder = funder_ops::create_funder(&self.db, new).await?;
        self.publish_row(EntityKind::Funder, ChangeKind::Created, funder.id);
        Ok(funder)
    }

    /// Updates a funder; `NotFound` if it does not exist.
    pub async fn update_funder(&self, id: i64, patch: FunderPatch) -> Result<funder::Model> {
        let funder = funder_ops::update_funder(&self.db, id, patch).await?;
        self.publish_row(EntityKind::Funder, ChangeKind::Updated, id);
        Ok(funder)
    }

    /// Deletes a funder; its expenses keep the dangling reference.
    pub async fn delete_funder(&self, id: i64) -> Result<i64> {
        let id = funder_ops::delete_funder(&self.db, id).await?;
        self.publish_row(EntityKind::Funder, ChangeKind::Deleted, id);
        Ok(id)
    }

    // Events

    /// All events, latest date first.
    pub async fn list_events(&self) -> Result<Vec<event::Model>> {
        event_ops::list_events(&self.db).await
    }

    /// An event by id, `None` if it does not exist.
    pub async fn get_event(&self, id: i64) -> Result<Option<event::Model>> {
        event_ops::get_event(&self.db, id).await
    }

    /// Creates an event.
    pub async fn create_event(&self, new: NewEvent) -> Result<event::Model> {
        let event = event_ops::create_event(&self.db, new).await?;
        self.publish_row(EntityKind::Event, ChangeKind::Created, event.id);
        Ok(event)
    }

    /// Updates an event; `NotFound` if it does not exist.
    pub async fn update_event(&self, id: i64, patch: EventPatch) -> Result<event::Model> {
        let event = event_ops::update_event(&self.db, id, patch).await?;
        self.publish_row(EntityKind::Event, ChangeKind::Updated, id);
        Ok(event)
    }

    /// Deletes an event together with all of its expenses.
    pub async fn delete_event(&self, id: i64) -> Result<i64> {
        let id = event_ops::delete_event(&self.db, id).await?;
        self.publish_row(EntityKind::Event, ChangeKind::Deleted, id);
        self.notifier.publish(Change::reset(EntityKind::Expense));
        Ok(id)
    }

    // Expenses

    /// Expenses matching `filter`, newest first. Hidden expenses are included.
    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<expense::Model>> {
        expense_ops::list_expenses(&self.db, filter).await
    }

    /// Every expense of one event, newest first.
    pub async fn list_expenses_by_event(&self, event_id: i64) -> Result<Vec<expense::Model>> {
        expense_ops::list_expenses_by_event(&self.db, event_id).await
    }

    /// An expense by id, `None` if it does not exist.
    pub async fn get_expense(&self, id: i64) -> Result<Option<expense::Model>> {
        expense_ops::get_expense(&self.db, id).await
    }

    /// Creates an expense.
    pub async fn create_expense(&self, new: NewExpense) -> Result<expense::Model> {
        let expense = expense_ops::create_expense(&self.db, new).await?;
        self.publish_row(EntityKind::Expense, ChangeKind::Created, expense.id);
        Ok(expense)
    }

    /// Updates an expense; `NotFound` if it does not exist.
    pub async fn update_expense(&self, id: i64, patch: ExpensePatch) -> Result<expense::Model> {
        let expense = expense_ops::update_expense(&self.db, id, patch).await?;
        self.publish_row(EntityKind::Expense, ChangeKind::Updated, id);
        Ok(expense)
    }

    /// Flips an expense between hidden and visible.
    pub async fn toggle_expense_visibility(&self, id: i64) -> Result<expense::Model> {
        let expense = expense_ops::toggle_expense_visibility(&self.db, id).await?;
        self.publish_row(EntityKind::Expense, ChangeKind::Updated, id);
        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete_expense(&self, id: i64) -> Result<i64> {
        let id = expense_ops::delete_expense(&self.db, id).await?;
        self.publish_row(EntityKind::Expense, ChangeKind::Deleted, id);
        Ok(id)
    }

    // Aggregation

    async fn all_expenses(&self) -> Result<Vec<expense::Model>> {
        self.list_expenses(&ExpenseFilter::default()).await
    }

    /// Overall total, received and remaining amounts.
    pub async fn budget_summary(&self) -> Result<BudgetSummary> {
        Ok(summary::budget_summary(&self.all_expenses().await?))
    }

    /// Count and amount per status.
    pub async fn status_summary(&self) -> Result<StatusSummary> {
        Ok(summary::status_summary(&self.all_expenses().await?))
    }

    /// Amount per status for one event.
    pub async fn event_status_summary(&self, event_id: i64) -> Result<EventStatusSummary> {
        let expenses = self.list_expenses_by_event(event_id).await?;
        Ok(summary::event_status_summary(&expenses, event_id))
    }

    /// Spending per category, largest first.
    pub async fn category_breakdown(&self) -> Result<Vec<CategoryBreakdown>> {
        let categories = self.list_categories().await?;
        Ok(summary::category_breakdown(&categories, &self.all_expenses().await?))
    }

    /// Spending per funder, largest first.
    pub async fn funder_breakdown(&self) -> Result<Vec<FunderBreakdown>> {
        let funders = self.list_funders().await?;
        Ok(summary::funder_breakdown(&funders, &self.all_expenses().await?))
    }

    /// The `limit` newest visible expenses.
    pub async fn recent_expenses(&self, limit: usize) -> Result<Vec<expense::Model>> {
        Ok(summary::recent_expenses(&self.all_expenses().await?, limit))
    }

    /// Row counts and the grand total over every expense.
    pub async fn data_summary(&self) -> Result<DataSummary> {
        let categories = self.list_categories().await?;
        let funders = self.list_funders().await?;
        let events = self.list_events().await?;
        let expenses = self.all_expenses().await?;
        Ok(summary::data_summary(
            categories.len(),
            funders.len(),
            events.len(),
            &expenses,
        ))
    }

    /// Everything the dashboard shows.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let categories = self.list_categories().await?;
        let funders = self.list_funders().await?;
        let expenses = self.all_expenses().await?;
        Ok(summary::dashboard(&categories, &funders, &expenses))
    }

    /// Report data for one event; `NotFound` if the event does not exist.
    pub async fn event_report(&self, event_id: i64) -> Result<EventReport> {
        generate_event_report(&self.db, event_id).await
    }

    // Data transfer

    /// Builds the export document without writing it anywhere.
    pub async fn export_all(&self) -> Result<ExportDocument> {
        transfer::export_all(&self.db).await
    }

    /// Writes an export file into `dir` and returns its path.
    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        transfer::export_to_dir(&self.db, dir).await
    }

    /// Imports a JSON document.
    pub async fn import_from_str(&self, json: &str, mode: ImportMode) -> Result<ImportOutcome> {
        let outcome = transfer::import_from_str(&self.db, json, mode, &self.backup_dir).await?;
        self.publish_reset_all();
        Ok(outcome)
    }

    /// Imports a JSON file.
    pub async fn import_from_file(&self, path: &Path, mode: ImportMode) -> Result<ImportOutcome> {
        let outcome = transfer::import_from_file(&self.db, path, mode, &self.backup_dir).await?;
        self.publish_reset_all();
        Ok(outcome)
    }

    /// Deletes every row of every collection.
    pub async fn clear_all(&self) -> Result<()> {
        transfer::clear_all(&self.db).await?;
        self.publish_reset_all();
        Ok(())
    }

    /// Seeds every empty collection with sample data.
    pub async fn seed_if_empty(&self, seed: &SeedConfig) -> Result<SeedOutcome> {
        let outcome = seed_if_empty(&self.db, seed).await?;
        if !outcome.is_empty() {
            self.publish_reset_all();
        }
        Ok(outcome)
    }

    // Live queries

    /// Runs `query` against this store now and after every change to one of
    /// the `watch`ed collections, handing each result to `callback`.
    pub fn subscribe<T, Q, Fut, F>(&self, watch: &[EntityKind], query: Q, callback: F) -> Subscription
    where
        T: Send + 'static,
        Q: Fn(Self) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let store = self.clone();
        let options = SubscribeOptions::watching(watch).with_refresh_interval(self.refresh_interval);
        notify::subscribe(&self.notifier, options, move || query(store.clone()), callback)
    }

    /// Live list of expenses matching `filter`.
    pub fn watch_expenses<F>(&self, filter: ExpenseFilter, callback: F) -> Subscription
    where
        F: FnMut(Vec<expense::Model>) + Send + 'static,
    {
        self.subscribe(
            &[EntityKind::Expense],
            move |store| async move { store.list_expenses(&filter).await },
            callback,
        )
    }

    /// Live list of events.
    pub fn watch_events<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<event::Model>) + Send + 'static,
    {
        self.subscribe(
            &[EntityKind::Event],
            |store| async move { store.list_events().await },
            callback,
        )
    }

    /// Live list of categories.
    pub fn watch_categories<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<category::Model>) + Send + 'static,
    {
        self.subscribe(
            &[EntityKind::Category],
            |store| async move { store.list_categories().await },
            callback,
        )
    }

    /// Live list of funders.
    pub fn watch_funders<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<funder::Model>) + Send + 'static,
    {
        self.subscribe(
            &[EntityKind::Funder],
            |store| async move { store.list_funders().await },
            callback,
        )
    }

    /// Live dashboard, recomputed whenever any collection changes.
    pub fn watch_dashboard<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Dashboard) + Send + 'static,
    {
        self.subscribe(
            &EntityKind::ALL,
            |store| async move { store.dashboard().await },
            callback,
        )
    }
}
