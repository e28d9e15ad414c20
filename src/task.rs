//! To-do tasks, as exchanged with the backend

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{NaiveDate, NaiveDateTime};

/// The format of `due_date` values on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// The format of `created_at` values on the wire
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";


/// The identifier of a task. It is always assigned by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn as_u64(&self) -> u64 { self.0 }
}
impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
impl FromStr for TaskId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}


/// A to-do task
///
/// Instances are owned by the backend. Clients only hold copies of what the server returned, and should replace them (rather than mutate them) whenever the server sends a newer version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The server-assigned ID
    id: TaskId,
    /// The display name of the task. Never empty
    title: String,
    /// An optional longer description (empty if none)
    #[serde(default, deserialize_with = "null_as_empty")]
    description: String,
    /// Whether this task is done
    #[serde(default)]
    completed: bool,
    /// The time this task was created, as stamped by the server
    #[serde(with = "timestamp")]
    created_at: NaiveDateTime,
    /// The day this task is due, if any
    #[serde(default, with = "optional_date")]
    due_date: Option<NaiveDate>,
}

impl Task {
    /// Create a Task instance. Usually, tasks are rather deserialized from a server response.
    pub fn new(id: TaskId, title: String, description: String, completed: bool,
               created_at: NaiveDateTime, due_date: Option<NaiveDate>) -> Self
    {
        Self { id, title, description, completed, created_at, due_date }
    }

    pub fn id(&self) -> TaskId                  { self.id }
    pub fn title(&self) -> &str                 { &self.title }
    pub fn description(&self) -> &str           { &self.description }
    pub fn completed(&self) -> bool             { self.completed }
    pub fn created_at(&self) -> &NaiveDateTime  { &self.created_at }
    pub fn due_date(&self) -> Option<NaiveDate> { self.due_date }

    pub fn has_description(&self) -> bool {
        self.description.trim().is_empty() == false
    }

    /// Whether this task is due on `date`
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == Some(date)
    }

    // The following setters are meant for backends only (see [`crate::memory`]).
    // Clients never modify a Task they received.
    pub(crate) fn set_title(&mut self, title: String)                { self.title = title; }
    pub(crate) fn set_description(&mut self, description: String)    { self.description = description; }
    pub(crate) fn set_completed(&mut self, completed: bool)          { self.completed = completed; }
    pub(crate) fn set_due_date(&mut self, due_date: Option<NaiveDate>) { self.due_date = due_date; }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let status = if self.completed { "✓" } else { "○" };
        write!(f, "[{}] {}: {}", status, self.id, self.title)
    }
}


/// The body of a task creation request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "optional_date")]
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new<S: ToString>(title: S) -> Self {
        Self { title: title.to_string(), description: String::new(), due_date: None }
    }

    pub fn with_description<S: ToString>(mut self, description: S) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }
}


/// The body of a task update request.
///
/// Every field is optional, and missing fields are left unchanged by the server.
/// `due_date` has three states: `None` (unchanged), `Some(None)` (cleared) and `Some(Some(date))`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "update_date")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// An update that only sets the completion flag
    pub fn completion(completed: bool) -> Self {
        Self { completed: Some(completed), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none() && self.completed.is_none()
    }
}


/// Counters of the tasks known by a backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Stats {
    /// Count the given tasks
    pub fn from_tasks<'a, I: IntoIterator<Item = &'a Task>>(tasks: I) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            if task.completed() {
                stats.completed += 1;
            }
        }
        stats.pending = stats.total - stats.completed;
        stats
    }
}


fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Used to support serde for `created_at`
mod timestamp {
    use super::*;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a timestamp, either as the backend formats it, or as ISO-8601
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let text = text.trim();
    match NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
        Ok(ts) => Ok(ts),
        Err(err) => {
            // Fractional seconds are tolerated, but optional
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .map_err(|_| err)
        }
    }
}

/// Parse a `YYYY-MM-DD` date. Empty strings mean "no date"
pub fn parse_optional_date(text: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map(Some)
}

/// Used to support serde for optional dates.
/// `null`, missing values and empty strings all mean "no date"
pub(crate) mod optional_date {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            None => serializer.serialize_none(),
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) => parse_optional_date(&text).map_err(serde::de::Error::custom),
        }
    }
}

/// Used to support serde for `TaskUpdate::due_date`, where an explicit `null` is meaningful
mod update_date {
    use super::*;

    pub fn serialize<S>(value: &Option<Option<NaiveDate>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            None | Some(None) => serializer.serialize_none(),
            Some(Some(date)) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the field is present: a missing field falls back to `Default`
        optional_date::deserialize(deserializer).map(Some)
    }
}
