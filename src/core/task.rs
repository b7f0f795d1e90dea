use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl TaskStatus {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A single assignable, dated activity with a binary completion state.
///
/// Serialized field names and status keywords match the on-disk store format
/// exactly; changing them breaks existing stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: DateTime<Utc>,
    /// Member id, possibly empty or dangling. Resolved as "unassigned" at
    /// display time; never treated as an error.
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
    pub status: TaskStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
        assigned_to: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            due_date,
            assigned_to: assigned_to.into(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn toggle(&mut self) {
        self.status = self.status.toggled();
    }

    /// The calendar day this task falls on, in the local timezone.
    pub fn due_day_local(&self) -> NaiveDate {
        self.due_date.with_timezone(&Local).date_naive()
    }
}

/// Parse a due instant from user or service input.
///
/// Accepts RFC 3339 (`2026-09-14T17:00:00Z`) as well as the zoneless forms a
/// date-time field produces (`2026-09-14T17:00`, with or without seconds),
/// which are interpreted in the local timezone.
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
