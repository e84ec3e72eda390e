use once_cell::sync::Lazy;
use regex::Regex;

use crate::{AppError, AppResult};

pub const ERR_INVALID_IDENTIFIER: &str = "SCHEMA/INVALID_IDENTIFIER";

static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier validation pattern to compile")
});

const FIXED_COLUMNS: &[&str] = &["id", "title", "date", "description"];

/// Table layout for one kind of record. Both screens share the same five
/// columns and differ only in names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Short name used in logs and on the command line.
    pub label: &'static str,
    pub table: &'static str,
    /// Column holding the photo reference.
    pub media_column: &'static str,
    /// Database file name under the data directory.
    pub db_file: &'static str,
}

pub const DIARY: EntitySchema = EntitySchema {
    label: "diary",
    table: "experiences",
    media_column: "photo",
    db_file: "diary.db",
};

pub const EMERGENCY: EntitySchema = EntitySchema {
    label: "emergency",
    table: "emergencies",
    media_column: "image",
    db_file: "emergency-app.db",
};

pub const BUILT_IN: &[EntitySchema] = &[DIARY, EMERGENCY];

impl EntitySchema {
    pub fn new(
        label: &'static str,
        table: &'static str,
        media_column: &'static str,
        db_file: &'static str,
    ) -> AppResult<Self> {
        validate_identifier("table", table)?;
        validate_identifier("media_column", media_column)?;
        if FIXED_COLUMNS.contains(&media_column.to_ascii_lowercase().as_str()) {
            return Err(AppError::new(
                ERR_INVALID_IDENTIFIER,
                "Media column clashes with a fixed column.",
            )
            .with_context("media_column", media_column));
        }
        Ok(Self {
            label,
            table,
            media_column,
            db_file,
        })
    }

    pub fn by_label(label: &str) -> Option<Self> {
        BUILT_IN
            .iter()
            .copied()
            .find(|schema| schema.label.eq_ignore_ascii_case(label))
    }

    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, date TEXT, description TEXT, {} TEXT)",
            self.table, self.media_column
        )
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (id, title, date, description, {}) VALUES (?, ?, ?, ?, ?)",
            self.table, self.media_column
        )
    }

    /// Rows come back in insertion order; the id doubles as the rowid.
    pub fn select_all_sql(&self) -> String {
        format!(
            "SELECT id, title, date, description, {} FROM {} ORDER BY id",
            self.media_column, self.table
        )
    }

    pub fn delete_all_sql(&self) -> String {
        format!("DELETE FROM {}", self.table)
    }
}

fn validate_identifier(field: &str, value: &str) -> AppResult<()> {
    if IDENTIFIER_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(
            AppError::new(ERR_INVALID_IDENTIFIER, "Names must be plain SQL identifiers.")
                .with_context("field", field)
                .with_context("value", value),
        )
    }
}
