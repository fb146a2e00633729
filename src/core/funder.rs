//! Funder business logic - CRUD over the `funders` table.

use crate::{
    entities::{EntityKind, Funder, funder},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields for a new funder. Contact details default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFunder {
    /// Display name
    pub name: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional email address
    pub email: Option<String>,
}

/// Partial update for a funder; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunderPatch {
    /// New display name
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New email address
    pub email: Option<String>,
}

impl FunderPatch {
    /// True when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none()
    }
}

/// Retrieves all funders ordered alphabetically by name.
pub async fn list_funders<C>(db: &C) -> Result<Vec<funder::Model>>
where
    C: ConnectionTrait,
{
    Funder::find()
        .order_by_asc(funder::Column::Name)
        .order_by_asc(funder::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a funder by id, returning `None` when it does not exist.
pub async fn get_funder<C>(db: &C, funder_id: i64) -> Result<Option<funder::Model>>
where
    C: ConnectionTrait,
{
    Funder::find_by_id(funder_id).one(db).await.map_err(Into::into)
}

/// Creates a funder with a freshly assigned id.
pub async fn create_funder<C>(db: &C, new: NewFunder) -> Result<funder::Model>
where
    C: ConnectionTrait,
{
    let funder = funder::ActiveModel {
        name: Set(new.name),
        phone: Set(new.phone.unwrap_or_default()),
        email: Set(new.email.unwrap_or_default()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    funder.insert(db).await.map_err(Into::into)
}

/// Applies a shallow merge of `patch` onto an existing funder.
pub async fn update_funder<C>(db: &C, funder_id: i64, patch: FunderPatch) -> Result<funder::Model>
where
    C: ConnectionTrait,
{
    let existing = get_funder(db, funder_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Funder, funder_id))?;

    if patch.is_empty() {
        return Ok(existing);
    }

    let mut funder: funder::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        funder.name = Set(name);
    }
    if let Some(phone) = patch.phone {
        funder.phone = Set(phone);
    }
    if let Some(email) = patch.email {
        funder.email = Set(email);
    }

    funder.update(db).await.map_err(Into::into)
}

/// Deletes a funder by id and returns the id. Expenses keep their `funder_id`.
pub async fn delete_funder<C>(db: &C, funder_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let result = Funder::delete_by_id(funder_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(EntityKind::Funder, funder_id));
    }
    Ok(funder_id)
}
