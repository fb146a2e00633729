//! Category business logic - CRUD over the `categories` table.
//!
//! Categories are listed alphabetically. Deleting a category leaves any
//! expenses that reference it untouched.

use crate::{
    entities::{Category, EntityKind, category},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields for a new category. Missing optional fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Partial update for a category; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
}

impl CategoryPatch {
    /// True when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Retrieves all categories ordered alphabetically by name.
pub async fn list_categories<C>(db: &C) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id, returning `None` when it does not exist.
pub async fn get_category<C>(db: &C, category_id: i64) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category with a freshly assigned id.
pub async fn create_category<C>(db: &C, new: NewCategory) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let category = category::ActiveModel {
        name: Set(new.name),
        description: Set(new.description.unwrap_or_default()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    category.insert(db).await.map_err(Into::into)
}

/// Applies a shallow merge of `patch` onto an existing category.
pub async fn update_category<C>(
    db: &C,
    category_id: i64,
    patch: CategoryPatch,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let existing = get_category(db, category_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Category, category_id))?;

    if patch.is_empty() {
        return Ok(existing);
    }

    let mut category: category::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        category.name = Set(name);
    }
    if let Some(description) = patch.description {
        category.description = Set(description);
    }

    category.update(db).await.map_err(Into::into)
}

/// Deletes a category by id and returns the id.
pub async fn delete_category<C>(db: &C, category_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let result = Category::delete_by_id(category_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(EntityKind::Category, category_id));
    }
    Ok(category_id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::status::ExpenseStatus;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_list_categories_sorted_by_name() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_category(&db, "Transportation").await?;
        create_test_category(&db, "Decorations").await?;
        create_test_category(&db, "Food & Beverages").await?;

        let names: Vec<String> = list_categories(&db)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Decorations", "Food & Beverages", "Transportation"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_defaults_description() -> Result<()> {
        let db = setup_test_db().await?;

        let category = create_category(
            &db,
            NewCategory {
                name: "Food".to_string(),
                description: None,
            },
        )
        .await?;

        assert_eq!(category.name, "Food");
        assert_eq!(category.description, "");
        assert!(category.id > 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_category_missing_is_none() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_category(&db, 999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_category_merges_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_category(
            &db,
            NewCategory {
                name: "Food".to_string(),
                description: Some("Meals".to_string()),
            },
        )
        .await?;

        let updated = update_category(
            &db,
            created.id,
            CategoryPatch {
                name: Some("Food & Drinks".to_string()),
                description: None,
            },
        )
        .await?;

        assert_eq!(updated.name, "Food & Drinks");
        assert_eq!(updated.description, "Meals");
        assert_eq!(updated.created_at, created.created_at);

        let unchanged = update_category(&db, created.id, CategoryPatch::default()).await?;
        assert_eq!(unchanged, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_category(
            &db,
            42,
            CategoryPatch {
                name: Some("x".to_string()),
                description: None,
            },
        )
        .await;

        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: EntityKind::Category,
                id: 42
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_keeps_expense_reference() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Food").await?;
        let expense = create_custom_expense(
            &db,
            "Lunch",
            20.0,
            ExpenseStatus::Spent,
            Some(category.id),
            None,
            None,
        )
        .await?;

        assert_eq!(delete_category(&db, category.id).await?, category.id);
        assert!(get_category(&db, category.id).await?.is_none());

        let orphan = crate::core::expense::get_expense(&db, expense.id).await?.unwrap();
        assert_eq!(orphan.category_id, Some(category.id));

        let again = delete_category(&db, category.id).await;
        assert!(matches!(again.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }
}
