//! Scholarship entities: offerings, historical awards, and applications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScholarshipStatus {
    Open,
    Closed,
    Archived,
}

impl ScholarshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Application lifecycle, a closed set with an explicit transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Valid forward transitions. Accepted/rejected are terminal.
    pub fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Submitted, Self::UnderReview)
                | (Self::Submitted, Self::Rejected)
                | (Self::UnderReview, Self::Accepted)
                | (Self::UnderReview, Self::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Award amount in minor currency units.
    pub amount_cents: i64,
    pub opens_on: Option<NaiveDate>,
    pub closes_on: Option<NaiveDate>,
    pub status: ScholarshipStatus,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScholarship {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub amount_cents: i64,
    #[serde(default)]
    pub opens_on: Option<NaiveDate>,
    #[serde(default)]
    pub closes_on: Option<NaiveDate>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScholarshipPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub opens_on: Option<NaiveDate>,
    #[serde(default)]
    pub closes_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ScholarshipStatus>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl ScholarshipPatch {
    pub fn apply(self, s: &mut Scholarship) {
        if let Some(v) = self.name {
            s.name = v;
        }
        if let Some(v) = self.slug {
            s.slug = v;
        }
        if let Some(v) = self.description {
            s.description = Some(v);
        }
        if let Some(v) = self.amount_cents {
            s.amount_cents = v;
        }
        if let Some(v) = self.opens_on {
            s.opens_on = Some(v);
        }
        if let Some(v) = self.closes_on {
            s.closes_on = Some(v);
        }
        if let Some(v) = self.status {
            s.status = v;
        }
        if let Some(v) = self.is_published {
            s.is_published = v;
        }
    }
}

/// Historical award record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecipient {
    pub id: i64,
    pub scholarship_id: i64,
    pub user_id: i64,
    pub award_year: i32,
    pub batch: Option<String>,
    pub major: Option<String>,
    pub citation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScholarshipRecipient {
    pub scholarship_id: i64,
    pub user_id: i64,
    pub award_year: i32,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipApplication {
    pub id: i64,
    pub scholarship_id: i64,
    pub user_id: i64,
    pub status: ApplicationStatus,
    pub essay: Option<String>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScholarshipApplication {
    pub scholarship_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub essay: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_forward_only() {
        use ApplicationStatus::*;
        assert!(Submitted.can_transition(UnderReview));
        assert!(UnderReview.can_transition(Accepted));
        assert!(UnderReview.can_transition(Rejected));
        assert!(Submitted.can_transition(Rejected));
        assert!(!Accepted.can_transition(Rejected));
        assert!(!Rejected.can_transition(Submitted));
        assert!(!UnderReview.can_transition(Submitted));
        assert!(!Submitted.can_transition(Accepted));
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            ApplicationStatus::Submitted,
            ApplicationStatus::UnderReview,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(
            serde_json::to_value(ApplicationStatus::UnderReview).unwrap(),
            "under_review"
        );
    }
}
