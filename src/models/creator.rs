use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the roster file. `name` is unique within the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    #[serde(rename = "Creator Name")]
    pub name: String,
    #[serde(rename = "Channel ID", default)]
    pub channel_id: String,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
    #[serde(rename = "Requests", default)]
    pub requests: Option<String>,
    #[serde(rename = "Priority", default)]
    pub priority: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(
        rename = "Last Updated",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub last_updated: Option<NaiveDate>,
}

impl CreatorRecord {
    pub fn new(name: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel_id: channel_id.into(),
            notes: None,
            requests: None,
            priority: None,
            status: None,
            last_updated: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into()).filter(|n: &String| !n.is_empty());
        self
    }

    /// Apply the provided fields of `update`; an empty string clears a field.
    pub fn apply(&mut self, update: CreatorUpdate) {
        if let Some(channel_id) = update.channel_id {
            self.channel_id = channel_id;
        }
        if let Some(notes) = update.notes {
            self.notes = non_empty(notes);
        }
        if let Some(requests) = update.requests {
            self.requests = non_empty(requests);
        }
        if let Some(priority) = update.priority {
            self.priority = non_empty(priority);
        }
        if let Some(status) = update.status {
            self.status = non_empty(status);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Partial edit of a roster row. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorUpdate {
    pub channel_id: Option<String>,
    pub notes: Option<String>,
    pub requests: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl CreatorUpdate {
    pub fn is_empty(&self) -> bool {
        self.channel_id.is_none()
            && self.notes.is_none()
            && self.requests.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}
