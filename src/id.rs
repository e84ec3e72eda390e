use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a stored record: a creation timestamp in milliseconds,
/// rendered as a decimal string everywhere outside the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(into = "String", try_from = "String")]
#[ts(type = "string")]
pub struct RecordId(i64);

impl RecordId {
    pub fn from_millis(value: i64) -> Self {
        Self(value)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for RecordId {
    type Error = ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Hands out millisecond ids that never repeat within one screen, even when
/// two saves land in the same millisecond or the wall clock steps backwards.
#[derive(Debug, Default, Clone)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures future ids sort after `id`, typically the newest stored record.
    pub fn observe(&mut self, id: RecordId) {
        self.last = self.last.max(id.0);
    }

    pub fn next(&mut self, now_ms: i64) -> RecordId {
        let candidate = now_ms.max(self.last.saturating_add(1));
        self.last = candidate;
        RecordId(candidate)
    }
}
