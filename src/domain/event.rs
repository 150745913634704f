//! Event entities: organized events and per-user registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration attendance lifecycle, a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Registered,
    Attended,
    Absent,
    Cancelled,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Attended => "attended",
            Self::Absent => "absent",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "registered" => Some(Self::Registered),
            "attended" => Some(Self::Attended),
            "absent" => Some(Self::Absent),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub organizer_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub organizer_id: i64,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl EventPatch {
    pub fn apply(self, event: &mut Event) {
        if let Some(v) = self.title {
            event.title = v;
        }
        if let Some(v) = self.slug {
            event.slug = v;
        }
        if let Some(v) = self.description {
            event.description = Some(v);
        }
        if let Some(v) = self.starts_at {
            event.starts_at = v;
        }
        if let Some(v) = self.ends_at {
            event.ends_at = Some(v);
        }
        if let Some(v) = self.location {
            event.location = Some(v);
        }
        if let Some(v) = self.event_type {
            event.event_type = Some(v);
        }
        if let Some(v) = self.capacity {
            event.capacity = Some(v);
        }
        if let Some(v) = self.registration_deadline {
            event.registration_deadline = Some(v);
        }
        if let Some(v) = self.is_published {
            event.is_published = v;
        }
    }
}

/// One registration per (event, user) pair, enforced at write time and
/// by a declared unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub registered_at: DateTime<Utc>,
    pub attendance_status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventRegistration {
    pub event_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_labels_round_trip() {
        for status in [
            AttendanceStatus::Registered,
            AttendanceStatus::Attended,
            AttendanceStatus::Absent,
            AttendanceStatus::Cancelled,
        ] {
            assert_eq!(AttendanceStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(AttendanceStatus::from_str("maybe"), None);
    }
}
