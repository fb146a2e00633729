//! Event business logic - CRUD over the `events` table.
//!
//! Events are listed newest date first. Deleting an event removes every
//! expense attached to it in the same database transaction.

use crate::{
    core::coerce_amount,
    entities::{EntityKind, Event, Expense, event, expense},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Name given to events created without one.
pub const DEFAULT_EVENT_NAME: &str = "Untitled Event";

/// Fields for a new event. Empty strings and a zero budget are the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEvent {
    /// Event name; blank names become [`DEFAULT_EVENT_NAME`]
    pub name: String,
    /// Free-form date string
    pub date: String,
    /// Planned budget
    pub budget: f64,
    /// Free-text label
    pub category: String,
    /// Location
    pub location: String,
    /// Description
    pub description: String,
}

/// Partial update for an event; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    /// New name
    pub name: Option<String>,
    /// New date
    pub date: Option<String>,
    /// New budget
    pub budget: Option<f64>,
    /// New free-text label
    pub category: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Retrieves all events, most recent `date` first, then newest created.
pub async fn list_events<C>(db: &C) -> Result<Vec<event::Model>>
where
    C: ConnectionTrait,
{
    Event::find()
        .order_by_desc(event::Column::Date)
        .order_by_desc(event::Column::CreatedAt)
        .order_by_desc(event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an event by id, returning `None` when it does not exist.
pub async fn get_event<C>(db: &C, event_id: i64) -> Result<Option<event::Model>>
where
    C: ConnectionTrait,
{
    Event::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Creates an event with a freshly assigned id and timestamps.
pub async fn create_event<C>(db: &C, new: NewEvent) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    let name = if new.name.trim().is_empty() {
        DEFAULT_EVENT_NAME.to_string()
    } else {
        new.name
    };
    let now = Utc::now();

    let event = event::ActiveModel {
        name: Set(name),
        date: Set(new.date),
        budget: Set(coerce_amount(new.budget)),
        category: Set(new.category),
        location: Set(new.location),
        description: Set(new.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    event.insert(db).await.map_err(Into::into)
}

/// Applies a shallow merge of `patch` onto an existing event and refreshes
/// `updated_at`.
pub async fn update_event<C>(db: &C, event_id: i64, patch: EventPatch) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    let existing = get_event(db, event_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Event, event_id))?;

    let mut event: event::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        event.name = Set(name);
    }
    if let Some(date) = patch.date {
        event.date = Set(date);
    }
    if let Some(budget) = patch.budget {
        event.budget = Set(coerce_amount(budget));
    }
    if let Some(category) = patch.category {
        event.category = Set(category);
    }
    if let Some(location) = patch.location {
        event.location = Set(location);
    }
    if let Some(description) = patch.description {
        event.description = Set(description);
    }
    event.updated_at = Set(Utc::now());

    event.update(db).await.map_err(Into::into)
}

/// Deletes an event together with all of its expenses.
///
/// The event must exist; the expenses are removed first and the event row
/// second, both inside one transaction. Returns the deleted event id.
#[instrument(skip(db))]
pub async fn delete_event<C>(db: &C, event_id: i64) -> Result<i64>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Event, event_id))?;

    let removed = Expense::delete_many()
        .filter(expense::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;

    Event::delete_by_id(event_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        event_id,
        expenses_removed = removed.rows_affected,
        "Deleted event and its expenses"
    );
    Ok(event_id)
}
