use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::id::RecordId;
use crate::time;

/// One saved entry: a diary experience or an emergency, depending on the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    /// ISO-8601 creation timestamp.
    pub date: String,
    pub description: String,
    pub media_uri: String,
}

impl Record {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        time::parse_iso(&self.date)
    }

    /// "3 days ago" style label; falls back to the raw date when it does not parse.
    pub fn relative_date(&self, now: DateTime<Utc>) -> String {
        match self.created_at() {
            Some(at) => time::from_now(at, now),
            None => self.date.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum DraftField {
    Title,
    Description,
    MediaUri,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::MediaUri => "mediaUri",
        })
    }
}

/// The fields of the add form before they become a [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Draft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub media_uri: Option<String>,
}

impl Draft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        media_uri: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            media_uri: Some(media_uri.into()),
        }
    }

    /// Fields that are still empty. Whitespace counts as content.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(DraftField::Title);
        }
        if self.description.is_empty() {
            missing.push(DraftField::Description);
        }
        if self.media_uri.as_deref().map_or(true, str::is_empty) {
            missing.push(DraftField::MediaUri);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self == &Draft::default()
    }

    /// Builds the record, or reports which fields are still missing.
    pub(crate) fn compose(&self, id: RecordId, date: String) -> Result<Record, Vec<DraftField>> {
        let missing = self.missing_fields();
        match &self.media_uri {
            Some(media_uri) if missing.is_empty() => Ok(Record {
                id,
                title: self.title.clone(),
                date,
                description: self.description.clone(),
                media_uri: media_uri.clone(),
            }),
            _ => Err(missing),
        }
    }
}
