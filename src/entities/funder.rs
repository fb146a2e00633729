//! Funder entity - A person or organisation paying for expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Funder database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "funders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the funder
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the funder
    pub name: String,
    /// Contact phone number, empty when unknown
    pub phone: String,
    /// Contact email, empty when unknown
    pub email: String,
    /// When the funder was created
    pub created_at: DateTimeUtc,
}

/// Funders are referenced by expenses through an unenforced `funder_id`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
