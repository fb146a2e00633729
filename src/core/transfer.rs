//! Data transfer - JSON export, import, backups and clearing.
//!
//! The export document is a single JSON object:
//! `{version, exportDate, appName, data: {categories, funders, events, expenses}, summary}`.
//! Imports only require `version` and `data` to be present; individual
//! records are read leniently so that files written by older versions (string
//! amounts, `"Received"` statuses, missing fields) still load.

use crate::{
    core::{
        category::{self as category_ops, NewCategory},
        coerce_amount,
        event::{self as event_ops, DEFAULT_EVENT_NAME, NewEvent},
        expense::{self as expense_ops, ExpenseFilter, NewExpense},
        funder::{self as funder_ops, NewFunder},
        status::ExpenseStatus,
        summary::{DataSummary, data_summary},
    },
    entities::{Category, Event, Expense, Funder, category, event, expense, funder},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, EntityTrait, Set,
    TransactionTrait,
};
use serde::Serialize;
use serde_json::Value;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::{info, instrument, warn};

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "1.0";
/// Application name written into every export.
pub const APP_NAME: &str = "BudgetFlow";

const EXPORT_PREFIX: &str = "BudgetFlow_Export";
const BACKUP_PREFIX: &str = "BudgetFlow_Backup";

/// The four collections as exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportData {
    /// All categories
    pub categories: Vec<category::Model>,
    /// All funders
    pub funders: Vec<funder::Model>,
    /// All events
    pub events: Vec<event::Model>,
    /// All expenses, hidden ones included
    pub expenses: Vec<expense::Model>,
}

/// A complete export document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Format version
    pub version: String,
    /// When the export was taken
    pub export_date: DateTime<Utc>,
    /// Producing application
    pub app_name: String,
    /// The exported collections
    pub data: ExportData,
    /// Counts and grand total of the exported data
    pub summary: DataSummary,
}

/// How an import treats the data already in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Add every imported record as a new row with a fresh id
    #[default]
    Append,
    /// Back up the current data, wipe it, and load the imported records
    /// keeping their ids
    Replace,
}

/// What an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Categories written
    pub categories: usize,
    /// Funders written
    pub funders: usize,
    /// Events written
    pub events: usize,
    /// Expenses written
    pub expenses: usize,
    /// Backup taken before a replace import
    pub backup_path: Option<PathBuf>,
}

/// A parsed, not yet applied, import document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportDocument {
    /// Declared format version
    pub version: String,
    categories: Vec<ImportedCategory>,
    funders: Vec<ImportedFunder>,
    events: Vec<ImportedEvent>,
    expenses: Vec<ImportedExpense>,
}

#[derive(Debug, Clone, PartialEq)]
struct ImportedCategory {
    id: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    fields: NewCategory,
}

#[derive(Debug, Clone, PartialEq)]
struct ImportedFunder {
    id: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    fields: NewFunder,
}

#[derive(Debug, Clone, PartialEq)]
struct ImportedEvent {
    id: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    fields: NewEvent,
}

#[derive(Debug, Clone, PartialEq)]
struct ImportedExpense {
    id: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    fields: NewExpense,
}

fn text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_text(record: &Value, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn number(record: &Value, key: &str) -> f64 {
    let parsed = match record.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.map_or(0.0, coerce_amount)
}

fn reference(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn flag(record: &Value, key: &str) -> bool {
    matches!(record.get(key), Some(Value::Bool(true)))
}

fn timestamp(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = record.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            // SQLite CURRENT_TIMESTAMP format
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn records<'a>(data: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    data.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(move |record| {
            if record.is_object() {
                true
            } else {
                warn!(collection = key, "Skipping non-object record in import");
                false
            }
        })
}

/// Parses an import document, requiring only `version` and `data`.
pub fn parse_import_document(json: &str) -> Result<ImportDocument> {
    let root: Value = serde_json::from_str(json)?;

    let version = match root.get("version") {
        Some(Value::String(v)) if !v.is_empty() => v.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(Error::Import {
                message: "missing `version`".to_string(),
            });
        }
    };
    let data = root
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| Error::Import {
            message: "missing `data`".to_string(),
        })?;

    let categories = records(data, "categories")
        .map(|r| ImportedCategory {
            id: reference(r, "id"),
            created_at: timestamp(r, "createdAt"),
            fields: NewCategory {
                name: text(r, "name"),
                description: optional_text(r, "description"),
            },
        })
        .collect();

    let funders = records(data, "funders")
        .map(|r| ImportedFunder {
            id: reference(r, "id"),
            created_at: timestamp(r, "createdAt"),
            fields: NewFunder {
                name: text(r, "name"),
                phone: optional_text(r, "phone"),
                email: optional_text(r, "email"),
            },
        })
        .collect();

    let events = records(data, "events")
        .map(|r| ImportedEvent {
            id: reference(r, "id"),
            created_at: timestamp(r, "createdAt"),
            updated_at: timestamp(r, "updatedAt"),
            fields: NewEvent {
                name: text(r, "name"),
                date: text(r, "date"),
                budget: number(r, "budget"),
                category: text(r, "category"),
                location: text(r, "location"),
                description: text(r, "description"),
            },
        })
        .collect();

    let expenses = records(data, "expenses")
        .map(|r| ImportedExpense {
            id: reference(r, "id"),
            created_at: timestamp(r, "createdAt"),
            updated_at: timestamp(r, "updatedAt"),
            fields: NewExpense {
                title: text(r, "title"),
                amount: number(r, "amount"),
                description: text(r, "description"),
                category_id: reference(r, "categoryId"),
                funder_id: reference(r, "funderId"),
                event_id: reference(r, "eventId"),
                status: ExpenseStatus::from_stored(&text(r, "status")),
                is_hidden: flag(r, "isHidden"),
            },
        })
        .collect();

    Ok(ImportDocument {
        version,
        categories,
        funders,
        events,
        expenses,
    })
}

/// Reads every collection into an export document.
pub async fn export_all<C>(db: &C) -> Result<ExportDocument>
where
    C: ConnectionTrait,
{
    let categories = category_ops::list_categories(db).await?;
    let funders = funder_ops::list_funders(db).await?;
    let events = event_ops::list_events(db).await?;
    let expenses = expense_ops::list_expenses(db, &ExpenseFilter::default()).await?;

    let summary = data_summary(categories.len(), funders.len(), events.len(), &expenses);

    Ok(ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: Utc::now(),
        app_name: APP_NAME.to_string(),
        data: ExportData {
            categories,
            funders,
            events,
            expenses,
        },
        summary,
    })
}

/// Opens a file that did not exist before. Names that are already taken get
/// a `_<n>` suffix, so earlier exports and backups are never overwritten.
async fn create_unique_file(dir: &Path, stem: &str) -> Result<(PathBuf, tokio::fs::File)> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{stem}.json")
        } else {
            format!("{stem}_{attempt}.json")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

async fn write_document(document: &ExportDocument, dir: &Path, prefix: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let stamp = document.export_date.format("%Y-%m-%dT%H-%M-%S%.3f");
    let json = serde_json::to_string_pretty(document)?;
    let (path, mut file) = create_unique_file(dir, &format!("{prefix}_{stamp}")).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;
    Ok(path)
}

/// Exports everything into a timestamped file inside `dir`, creating the
/// directory if needed. Returns the path written.
#[instrument(skip(db))]
pub async fn export_to_dir<C>(db: &C, dir: &Path) -> Result<PathBuf>
where
    C: ConnectionTrait,
{
    let document = export_all(db).await?;
    let path = write_document(&document, dir, EXPORT_PREFIX).await?;
    info!(path = %path.display(), expenses = document.summary.expenses_count, "Exported data");
    Ok(path)
}

/// Writes a timestamped backup of the current data into `dir`.
#[instrument(skip(db))]
pub async fn write_backup<C>(db: &C, dir: &Path) -> Result<PathBuf>
where
    C: ConnectionTrait,
{
    let document = export_all(db).await?;
    let path = write_document(&document, dir, BACKUP_PREFIX).await?;
    info!(path = %path.display(), "Wrote backup");
    Ok(path)
}

async fn wipe<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    Expense::delete_many().exec(db).await?;
    Event::delete_many().exec(db).await?;
    Funder::delete_many().exec(db).await?;
    Category::delete_many().exec(db).await?;
    Ok(())
}

/// Deletes every row of every collection.
#[instrument(skip(db))]
pub async fn clear_all(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await?;
    wipe(&txn).await?;
    txn.commit().await?;
    info!("Cleared all data");
    Ok(())
}

async fn append<C>(db: &C, document: ImportDocument) -> Result<ImportOutcome>
where
    C: ConnectionTrait,
{
    let mut outcome = ImportOutcome::default();

    for record in document.categories {
        category_ops::create_category(db, record.fields).await?;
        outcome.categories += 1;
    }
    for record in document.funders {
        funder_ops::create_funder(db, record.fields).await?;
        outcome.funders += 1;
    }
    for record in document.events {
        event_ops::create_event(db, record.fields).await?;
        outcome.events += 1;
    }
    for record in document.expenses {
        expense_ops::create_expense(db, record.fields).await?;
        outcome.expenses += 1;
    }

    Ok(outcome)
}

async fn restore<C>(db: &C, document: ImportDocument) -> Result<ImportOutcome>
where
    C: ConnectionTrait,
{
    let mut outcome = ImportOutcome::default();
    let now = Utc::now();

    for record in document.categories {
        category::ActiveModel {
            id: record.id.map_or(NotSet, Set),
            name: Set(record.fields.name),
            description: Set(record.fields.description.unwrap_or_default()),
            created_at: Set(record.created_at.unwrap_or(now)),
        }
        .insert(db)
        .await?;
        outcome.categories += 1;
    }

    for record in document.funders {
        funder::ActiveModel {
            id: record.id.map_or(NotSet, Set),
            name: Set(record.fields.name),
            phone: Set(record.fields.phone.unwrap_or_default()),
            email: Set(record.fields.email.unwrap_or_default()),
            created_at: Set(record.created_at.unwrap_or(now)),
        }
        .insert(db)
        .await?;
        outcome.funders += 1;
    }

    for record in document.events {
        let fields = record.fields;
        let name = if fields.name.trim().is_empty() {
            DEFAULT_EVENT_NAME.to_string()
        } else {
            fields.name
        };
        event::ActiveModel {
            id: record.id.map_or(NotSet, Set),
            name: Set(name),
            date: Set(fields.date),
            budget: Set(fields.budget),
            category: Set(fields.category),
            location: Set(fields.location),
            description: Set(fields.description),
            created_at: Set(record.created_at.unwrap_or(now)),
            updated_at: Set(record.updated_at.unwrap_or(now)),
        }
        .insert(db)
        .await?;
        outcome.events += 1;
    }

    for record in document.expenses {
        let fields = record.fields;
        expense::ActiveModel {
            id: record.id.map_or(NotSet, Set),
            title: Set(fields.title),
            amount: Set(fields.amount),
            description: Set(fields.description),
            category_id: Set(fields.category_id),
            funder_id: Set(fields.funder_id),
            event_id: Set(fields.event_id),
            status: Set(fields.status.as_str().to_string()),
            is_hidden: Set(fields.is_hidden),
            created_at: Set(record.created_at.unwrap_or(now)),
            updated_at: Set(record.updated_at.unwrap_or(now)),
        }
        .insert(db)
        .await?;
        outcome.expenses += 1;
    }

    Ok(outcome)
}

/// Applies a parsed import document.
///
/// In [`ImportMode::Replace`] a backup is written to `backup_dir` before
/// anything is touched. Either way the writes happen in one transaction, so
/// a failing record leaves the store as it was.
#[instrument(skip(db, document), fields(version = %document.version))]
pub async fn import_document(
    db: &DatabaseConnection,
    document: ImportDocument,
    mode: ImportMode,
    backup_dir: &Path,
) -> Result<ImportOutcome> {
    let backup_path = match mode {
        ImportMode::Replace => Some(write_backup(db, backup_dir).await?),
        ImportMode::Append => None,
    };

    let txn = db.begin().await?;
    let mut outcome = match mode {
        ImportMode::Append => append(&txn, document).await?,
        ImportMode::Replace => {
            wipe(&txn).await?;
            restore(&txn, document).await?
        }
    };
    txn.commit().await?;

    outcome.backup_path = backup_path;
    info!(
        ?mode,
        categories = outcome.categories,
        funders = outcome.funders,
        events = outcome.events,
        expenses = outcome.expenses,
        "Imported data"
    );
    Ok(outcome)
}

/// Parses `json` and imports it.
pub async fn import_from_str(
    db: &DatabaseConnection,
    json: &str,
    mode: ImportMode,
    backup_dir: &Path,
) -> Result<ImportOutcome> {
    let document = parse_import_document(json)?;
    import_document(db, document, mode, backup_dir).await
}

/// Reads the file at `path` and imports it.
pub async fn import_from_file(
    db: &DatabaseConnection,
    path: &Path,
    mode: ImportMode,
    backup_dir: &Path,
) -> Result<ImportOutcome> {
    let json = tokio::fs::read_to_string(path).await?;
    import_from_str(db, &json, mode, backup_dir).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    async fn populate(db: &DatabaseConnection) -> Result<()> {
        let food = create_test_category(db, "Food").await?;
        create_test_category(db, "Decorations").await?;
        let funder = create_test_funder(db, "Sujith").await?;
        let event = create_test_event(db, "Birthday Party", "2025-09-08").await?;
        create_custom_expense(
            db,
            "Catering",
            60_000.0,
            ExpenseStatus::Spent,
            Some(food.id),
            Some(funder.id),
            Some(event.id),
        )
        .await?;
        let hidden = create_test_expense(db, 1_500.5).await?;
        expense_ops::toggle_expense_visibility(db, hidden.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_export_summary_counts_everything() -> Result<()> {
        let db = setup_test_db().await?;
        populate(&db).await?;

        let document = export_all(&db).await?;

        assert_eq!(document.version, EXPORT_VERSION);
        assert_eq!(document.app_name, APP_NAME);
        assert_eq!(document.summary.categories_count, 2);
        assert_eq!(document.summary.funders_count, 1);
        assert_eq!(document.summary.events_count, 1);
        assert_eq!(document.summary.expenses_count, 2);
        assert_eq!(document.summary.total_expense_amount, 61_500.5);

        let json = serde_json::to_value(&document)?;
        assert!(json["exportDate"].is_string());
        assert_eq!(json["summary"]["totalExpenseAmount"], 61_500.5);
        assert_eq!(json["data"]["expenses"][0]["isHidden"], Value::Bool(true));

        Ok(())
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() -> Result<()> {
        let source = setup_test_db().await?;
        populate(&source).await?;
        let exported = export_all(&source).await?;
        let json = serde_json::to_string(&exported)?;

        let target = setup_test_db().await?;
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = import_from_str(&target, &json, ImportMode::Append, dir.path()).await?;

        assert_eq!(outcome.expenses, 2);
        assert!(outcome.backup_path.is_none());

        let reimported = export_all(&target).await?;
        assert_eq!(reimported.summary.categories_count, exported.summary.categories_count);
        assert_eq!(reimported.summary.funders_count, exported.summary.funders_count);
        assert_eq!(reimported.summary.events_count, exported.summary.events_count);
        assert_eq!(reimported.summary.expenses_count, exported.summary.expenses_count);
        assert_eq!(
            reimported.summary.total_expense_amount,
            exported.summary.total_expense_amount
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_append_import_generates_fresh_ids() -> Result<()> {
        let db = setup_test_db().await?;
        populate(&db).await?;
        let json = serde_json::to_string(&export_all(&db).await?)?;
        let dir = tempfile::tempdir().expect("tempdir");

        import_from_str(&db, &json, ImportMode::Append, dir.path()).await?;

        let categories = category_ops::list_categories(&db).await?;
        assert_eq!(categories.len(), 4);
        let mut ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_import_writes_backup_and_keeps_ids() -> Result<()> {
        let db = setup_test_db().await?;
        populate(&db).await?;
        let dir = tempfile::tempdir().expect("tempdir");

        let json = r#"{
            "version": "1.0",
            "data": {
                "categories": [{"id": 10, "name": "Venue", "createdAt": "2025-09-01 10:00:00"}],
                "expenses": [
                    {"id": 7, "title": "Hall", "amount": "2500", "categoryId": 10, "status": "Received"},
                    {"id": 8, "title": "Tips", "amount": null, "status": "Foo", "isHidden": true}
                ]
            }
        }"#;

        let outcome = import_from_str(&db, json, ImportMode::Replace, dir.path()).await?;

        let backup = outcome.backup_path.expect("backup written");
        assert!(backup.starts_with(dir.path()));
        let backup_json: Value = serde_json::from_str(&std::fs::read_to_string(&backup)?)?;
        assert_eq!(backup_json["summary"]["expensesCount"], 2);

        let categories = category_ops::list_categories(&db).await?;
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, 10);
        assert!(funder_ops::list_funders(&db).await?.is_empty());
        assert!(event_ops::list_events(&db).await?.is_empty());

        let hall = expense_ops::get_expense(&db, 7).await?.unwrap();
        assert_eq!(hall.amount, 2500.0);
        assert_eq!(hall.status, "Available");
        assert_eq!(hall.category_id, Some(10));

        let tips = expense_ops::get_expense(&db, 8).await?.unwrap();
        assert_eq!(tips.amount, 0.0);
        assert_eq!(tips.status, "Outstanding");
        assert!(tips.is_hidden);

        Ok(())
    }

    #[tokio::test]
    async fn test_back_to_back_replace_imports_keep_every_backup() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Before").await?;
        let dir = tempfile::tempdir().expect("tempdir");

        let first_file = r#"{"version": "1.0", "data": {"categories": [{"id": 1, "name": "A"}]}}"#;
        let second_file = r#"{"version": "1.0", "data": {"categories": [{"id": 1, "name": "B"}]}}"#;
        let first = import_from_str(&db, first_file, ImportMode::Replace, dir.path()).await?;
        let second = import_from_str(&db, second_file, ImportMode::Replace, dir.path()).await?;

        let first_backup = first.backup_path.expect("first backup");
        let second_backup = second.backup_path.expect("second backup");
        assert_ne!(first_backup, second_backup);
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 2);

        let names = |path: &Path| -> Vec<Value> {
            let json: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
            json["data"]["categories"]
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["name"].clone())
                .collect()
        };
        assert_eq!(names(first_backup.as_path()), vec![Value::from("Before")]);
        assert_eq!(names(second_backup.as_path()), vec![Value::from("A")]);

        Ok(())
    }

    #[tokio::test]
    async fn test_existing_file_names_are_not_overwritten() -> Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("BudgetFlow_Backup_x.json"), "keep")?;

        let (path, _file) = create_unique_file(dir.path(), "BudgetFlow_Backup_x").await?;

        assert_eq!(path, dir.path().join("BudgetFlow_Backup_x_1.json"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("BudgetFlow_Backup_x.json"))?,
            "keep"
        );
        Ok(())
    }

    #[test]
    fn test_import_requires_version_and_data() {
        let no_version = parse_import_document(r#"{"data": {}}"#);
        assert!(matches!(no_version.unwrap_err(), Error::Import { .. }));

        let no_data = parse_import_document(r#"{"version": "1.0"}"#);
        assert!(matches!(no_data.unwrap_err(), Error::Import { .. }));

        let not_json = parse_import_document("not json");
        assert!(matches!(not_json.unwrap_err(), Error::Serialization(_)));

        let minimal = parse_import_document(r#"{"version": "1.0", "data": {}}"#).unwrap();
        assert_eq!(minimal.version, "1.0");
    }

    #[test]
    fn test_lenient_record_parsing() {
        let document = parse_import_document(
            r#"{"version": 1, "data": {"events": [{"budget": "abc"}, 5],
                "expenses": [{"amount": 12.5, "eventId": "3", "categoryId": null}]}}"#,
        )
        .unwrap();

        assert_eq!(document.events.len(), 1);
        assert_eq!(document.events[0].fields.budget, 0.0);
        assert_eq!(document.expenses[0].fields.amount, 12.5);
        assert_eq!(document.expenses[0].fields.event_id, Some(3));
        assert_eq!(document.expenses[0].fields.category_id, None);
        assert_eq!(document.expenses[0].fields.status, ExpenseStatus::Outstanding);
    }

    #[tokio::test]
    async fn test_export_to_dir_writes_named_file() -> Result<()> {
        let db = setup_test_db().await?;
        populate(&db).await?;
        let dir = tempfile::tempdir().expect("tempdir");

        let path = export_to_dir(&db, dir.path()).await?;

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("BudgetFlow_Export_"));
        assert!(name.ends_with(".json"));

        let outcome = import_from_file(&db, &path, ImportMode::Append, dir.path()).await?;
        assert_eq!(outcome.categories, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_all_empties_every_collection() -> Result<()> {
        let db = setup_test_db().await?;
        populate(&db).await?;

        clear_all(&db).await?;

        let document = export_all(&db).await?;
        assert_eq!(document.summary, DataSummary::default());

        Ok(())
    }
}
