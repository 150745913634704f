//! Donation entities: payment accounts, fundraising programs, recorded
//! donations, donor pledges, and periodic reports.
//!
//! All money amounts are integer minor currency units.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Payment-receiving account descriptor (QRIS merchant details).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrisAccount {
    pub id: i64,
    pub bank_name: String,
    pub merchant_name: String,
    pub account_number: String,
    pub qr_image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQrisAccount {
    pub bank_name: String,
    pub merchant_name: String,
    pub account_number: String,
    #[serde(default)]
    pub qr_image_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QrisAccountPatch {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub qr_image_path: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl QrisAccountPatch {
    pub fn apply(self, account: &mut QrisAccount) {
        if let Some(v) = self.bank_name {
            account.bank_name = v;
        }
        if let Some(v) = self.merchant_name {
            account.merchant_name = v;
        }
        if let Some(v) = self.account_number {
            account.account_number = v;
        }
        if let Some(v) = self.qr_image_path {
            account.qr_image_path = Some(v);
        }
        if let Some(v) = self.is_active {
            account.is_active = v;
        }
    }
}

/// Fundraising campaign. `current_amount_cents` accumulates verified
/// manual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationProgram {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub target_amount_cents: i64,
    pub current_amount_cents: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub status: ProgramStatus,
    pub qris_account_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonationProgram {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount_cents: i64,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub qris_account_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonationProgramPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_amount_cents: Option<i64>,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ProgramStatus>,
    #[serde(default)]
    pub qris_account_id: Option<i64>,
}

impl DonationProgramPatch {
    pub fn apply(self, program: &mut DonationProgram) {
        if let Some(v) = self.name {
            program.name = v;
        }
        if let Some(v) = self.slug {
            program.slug = v;
        }
        if let Some(v) = self.description {
            program.description = Some(v);
        }
        if let Some(v) = self.target_amount_cents {
            program.target_amount_cents = v;
        }
        if let Some(v) = self.starts_on {
            program.starts_on = Some(v);
        }
        if let Some(v) = self.ends_on {
            program.ends_on = Some(v);
        }
        if let Some(v) = self.status {
            program.status = v;
        }
        if let Some(v) = self.qris_account_id {
            program.qris_account_id = Some(v);
        }
    }
}

/// A donation recorded by staff against a program. Verification links
/// the reviewing admin and bumps the program's running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualDonationEntry {
    pub id: i64,
    pub program_id: i64,
    pub account_id: Option<i64>,
    pub donor_name: String,
    pub amount_cents: i64,
    pub donated_on: NaiveDate,
    pub note: Option<String>,
    pub is_verified: bool,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewManualDonationEntry {
    pub program_id: i64,
    #[serde(default)]
    pub account_id: Option<i64>,
    pub donor_name: String,
    pub amount_cents: i64,
    pub donated_on: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

/// Donor-submitted pledge against a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorRegistration {
    pub id: i64,
    pub program_id: i64,
    pub user_id: Option<i64>,
    pub donor_name: Option<String>,
    pub amount_cents: i64,
    pub is_anonymous: bool,
    pub is_verified: bool,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonorRegistration {
    pub program_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub donor_name: Option<String>,
    pub amount_cents: i64,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Periodic financial summary for a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationReport {
    pub id: i64,
    pub program_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_received_cents: i64,
    pub total_used_cents: i64,
    pub report_file: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonationReport {
    pub program_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_received_cents: i64,
    pub total_used_cents: i64,
    #[serde(default)]
    pub report_file: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_status_labels_round_trip() {
        for status in [
            ProgramStatus::Draft,
            ProgramStatus::Active,
            ProgramStatus::Completed,
            ProgramStatus::Cancelled,
        ] {
            assert_eq!(ProgramStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ProgramStatus::from_str("paused"), None);
    }
}
