//! Category entity - Groups expenses by kind (e.g., "Food & Beverages").
//!
//! Categories are never cascaded on delete; expenses keep their `category_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the category
    pub name: String,
    /// Free-form description, empty when not supplied
    pub description: String,
    /// When the category was created
    pub created_at: DateTimeUtc,
}

/// Categories are referenced by expenses through an unenforced `category_id`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
