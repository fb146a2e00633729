//! Event entity - Something being budgeted for (a party, a conference).
//!
//! `date` is free-form text and `category` is a free-text label, not a
//! reference to the categories table. Deleting an event deletes its expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event name, "Untitled Event" when none was given
    pub name: String,
    /// Free-form date string (usually `YYYY-MM-DD`)
    pub date: String,
    /// Planned budget for the event
    pub budget: f64,
    /// Free-text label such as "Celebration" or "Business"
    pub category: String,
    /// Where the event takes place
    pub location: String,
    /// Free-form description
    pub description: String,
    /// When the event was created
    pub created_at: DateTimeUtc,
    /// When the event was last modified
    pub updated_at: DateTimeUtc,
}

/// Events are referenced by expenses through `event_id`; the cascade on
/// delete is done by the store, not by the schema
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
