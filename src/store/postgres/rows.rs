//! sqlx row types for the Postgres store.
//!
//! Each `Pg*Row` mirrors one table and converts into the domain type via
//! `TryFrom`, failing on status labels or polymorphic target pairs the
//! database should never hold.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::*;

#[derive(sqlx::FromRow)]
pub(super) struct PgUserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub reset_token: Option<Uuid>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgUserRow> for User {
    type Error = String;

    fn try_from(r: PgUserRow) -> Result<Self, String> {
        Ok(User {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            role: UserRole::from_str(&r.role).ok_or_else(|| format!("unknown role '{}'", r.role))?,
            is_verified: r.is_verified,
            is_active: r.is_active,
            reset_token: r.reset_token,
            reset_token_expires_at: r.reset_token_expires_at,
            last_login_at: r.last_login_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgProfileRow {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub entry_year: Option<i32>,
    pub graduation_year: Option<i32>,
    pub gpa: Option<f64>,
    pub thesis_title: Option<String>,
    pub current_employer: Option<String>,
    pub job_title: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgProfileRow> for Profile {
    type Error = String;

    fn try_from(r: PgProfileRow) -> Result<Self, String> {
        Ok(Profile {
            id: r.id,
            user_id: r.user_id,
            full_name: r.full_name,
            phone: r.phone,
            address: r.address,
            entry_year: r.entry_year,
            graduation_year: r.graduation_year,
            gpa: r.gpa,
            thesis_title: r.thesis_title,
            current_employer: r.current_employer,
            job_title: r.job_title,
            profile_picture: r.profile_picture,
            bio: r.bio,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgCategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgCategoryRow> for Category {
    type Error = String;

    fn try_from(r: PgCategoryRow) -> Result<Self, String> {
        Ok(Category {
            id: r.id,
            name: r.name,
            slug: r.slug,
            description: r.description,
            parent_id: r.parent_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgTagRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgTagRow> for Tag {
    type Error = String;

    fn try_from(r: PgTagRow) -> Result<Self, String> {
        Ok(Tag {
            id: r.id,
            name: r.name,
            slug: r.slug,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgArticleRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgArticleRow> for Article {
    type Error = String;

    fn try_from(r: PgArticleRow) -> Result<Self, String> {
        Ok(Article {
            id: r.id,
            title: r.title,
            slug: r.slug,
            content: r.content,
            excerpt: r.excerpt,
            featured_image: r.featured_image,
            author_id: r.author_id,
            is_published: r.is_published,
            is_featured: r.is_featured,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgNewsRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgNewsRow> for News {
    type Error = String;

    fn try_from(r: PgNewsRow) -> Result<Self, String> {
        Ok(News {
            id: r.id,
            title: r.title,
            slug: r.slug,
            content: r.content,
            excerpt: r.excerpt,
            featured_image: r.featured_image,
            author_id: r.author_id,
            is_published: r.is_published,
            is_featured: r.is_featured,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgCommentRow {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub target_kind: Option<String>,
    pub target_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgCommentRow> for Comment {
    type Error = String;

    fn try_from(r: PgCommentRow) -> Result<Self, String> {
        let target = match (r.target_kind, r.target_id) {
            (Some(kind), Some(id)) => Some(
                CommentTarget::from_parts(&kind, id)
                    .ok_or_else(|| format!("invalid comment target kind '{kind}'"))?,
            ),
            (None, None) => None,
            _ => return Err(format!("comment {} has a half-set target", r.id)),
        };
        Ok(Comment {
            id: r.id,
            content: r.content,
            author_id: r.author_id,
            target,
            parent_id: r.parent_id,
            is_approved: r.is_approved,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgForumTopicRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub author_id: i64,
    pub is_closed: bool,
    pub is_pinned: bool,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgForumTopicRow> for ForumTopic {
    type Error = String;

    fn try_from(r: PgForumTopicRow) -> Result<Self, String> {
        Ok(ForumTopic {
            id: r.id,
            title: r.title,
            content: r.content,
            category_id: r.category_id,
            author_id: r.author_id,
            is_closed: r.is_closed,
            is_pinned: r.is_pinned,
            last_activity_at: r.last_activity_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgForumPostRow {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgForumPostRow> for ForumPost {
    type Error = String;

    fn try_from(r: PgForumPostRow) -> Result<Self, String> {
        Ok(ForumPost {
            id: r.id,
            topic_id: r.topic_id,
            author_id: r.author_id,
            content: r.content,
            parent_id: r.parent_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgEventRow {
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

impl TryFrom<PgEventRow> for Event {
    type Error = String;

    fn try_from(r: PgEventRow) -> Result<Self, String> {
        Ok(Event {
            id: r.id,
            title: r.title,
            slug: r.slug,
            description: r.description,
            organizer_id: r.organizer_id,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            location: r.location,
            event_type: r.event_type,
            capacity: r.capacity,
            registration_deadline: r.registration_deadline,
            is_published: r.is_published,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgEventRegistrationRow {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub registered_at: DateTime<Utc>,
    pub attendance_status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgEventRegistrationRow> for EventRegistration {
    type Error = String;

    fn try_from(r: PgEventRegistrationRow) -> Result<Self, String> {
        Ok(EventRegistration {
            id: r.id,
            event_id: r.event_id,
            user_id: r.user_id,
            registered_at: r.registered_at,
            attendance_status: AttendanceStatus::from_str(&r.attendance_status).ok_or_else(
                || format!("unknown attendance status '{}'", r.attendance_status),
            )?,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgGalleryRow {
    pub id: i64,
    pub title: String,
    pub media_kind: String,
    pub media_path: String,
    pub caption: Option<String>,
    pub uploader_id: i64,
    pub target_kind: Option<String>,
    pub target_id: Option<i64>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgGalleryRow> for Gallery {
    type Error = String;

    fn try_from(r: PgGalleryRow) -> Result<Self, String> {
        let target = match (r.target_kind, r.target_id) {
            (Some(kind), Some(id)) => Some(
                GalleryTarget::from_parts(&kind, id)
                    .ok_or_else(|| format!("invalid gallery target kind '{kind}'"))?,
            ),
            (None, None) => None,
            _ => return Err(format!("gallery {} has a half-set target", r.id)),
        };
        Ok(Gallery {
            id: r.id,
            title: r.title,
            media_kind: MediaKind::from_str(&r.media_kind)
                .ok_or_else(|| format!("unknown media kind '{}'", r.media_kind))?,
            media_path: r.media_path,
            caption: r.caption,
            uploader_id: r.uploader_id,
            target,
            is_published: r.is_published,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgScholarshipRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub opens_on: Option<NaiveDate>,
    pub closes_on: Option<NaiveDate>,
    pub status: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgScholarshipRow> for Scholarship {
    type Error = String;

    fn try_from(r: PgScholarshipRow) -> Result<Self, String> {
        Ok(Scholarship {
            id: r.id,
            name: r.name,
            slug: r.slug,
            description: r.description,
            amount_cents: r.amount_cents,
            opens_on: r.opens_on,
            closes_on: r.closes_on,
            status: ScholarshipStatus::from_str(&r.status)
                .ok_or_else(|| format!("unknown scholarship status '{}'", r.status))?,
            is_published: r.is_published,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgScholarshipRecipientRow {
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

impl TryFrom<PgScholarshipRecipientRow> for ScholarshipRecipient {
    type Error = String;

    fn try_from(r: PgScholarshipRecipientRow) -> Result<Self, String> {
        Ok(ScholarshipRecipient {
            id: r.id,
            scholarship_id: r.scholarship_id,
            user_id: r.user_id,
            award_year: r.award_year,
            batch: r.batch,
            major: r.major,
            citation: r.citation,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgScholarshipApplicationRow {
    pub id: i64,
    pub scholarship_id: i64,
    pub user_id: i64,
    pub status: String,
    pub essay: Option<String>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgScholarshipApplicationRow> for ScholarshipApplication {
    type Error = String;

    fn try_from(r: PgScholarshipApplicationRow) -> Result<Self, String> {
        Ok(ScholarshipApplication {
            id: r.id,
            scholarship_id: r.scholarship_id,
            user_id: r.user_id,
            status: ApplicationStatus::from_str(&r.status)
                .ok_or_else(|| format!("unknown application status '{}'", r.status))?,
            essay: r.essay,
            review_notes: r.review_notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgQrisAccountRow {
    pub id: i64,
    pub bank_name: String,
    pub merchant_name: String,
    pub account_number: String,
    pub qr_image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgQrisAccountRow> for QrisAccount {
    type Error = String;

    fn try_from(r: PgQrisAccountRow) -> Result<Self, String> {
        Ok(QrisAccount {
            id: r.id,
            bank_name: r.bank_name,
            merchant_name: r.merchant_name,
            account_number: r.account_number,
            qr_image_path: r.qr_image_path,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgDonationProgramRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub target_amount_cents: i64,
    pub current_amount_cents: i64,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub status: String,
    pub qris_account_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgDonationProgramRow> for DonationProgram {
    type Error = String;

    fn try_from(r: PgDonationProgramRow) -> Result<Self, String> {
        Ok(DonationProgram {
            id: r.id,
            name: r.name,
            slug: r.slug,
            description: r.description,
            target_amount_cents: r.target_amount_cents,
            current_amount_cents: r.current_amount_cents,
            starts_on: r.starts_on,
            ends_on: r.ends_on,
            status: ProgramStatus::from_str(&r.status)
                .ok_or_else(|| format!("unknown program status '{}'", r.status))?,
            qris_account_id: r.qris_account_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgManualDonationEntryRow {
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

impl TryFrom<PgManualDonationEntryRow> for ManualDonationEntry {
    type Error = String;

    fn try_from(r: PgManualDonationEntryRow) -> Result<Self, String> {
        Ok(ManualDonationEntry {
            id: r.id,
            program_id: r.program_id,
            account_id: r.account_id,
            donor_name: r.donor_name,
            amount_cents: r.amount_cents,
            donated_on: r.donated_on,
            note: r.note,
            is_verified: r.is_verified,
            verified_by: r.verified_by,
            verified_at: r.verified_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgDonorRegistrationRow {
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

impl TryFrom<PgDonorRegistrationRow> for DonorRegistration {
    type Error = String;

    fn try_from(r: PgDonorRegistrationRow) -> Result<Self, String> {
        Ok(DonorRegistration {
            id: r.id,
            program_id: r.program_id,
            user_id: r.user_id,
            donor_name: r.donor_name,
            amount_cents: r.amount_cents,
            is_anonymous: r.is_anonymous,
            is_verified: r.is_verified,
            message: r.message,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PgDonationReportRow {
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

impl TryFrom<PgDonationReportRow> for DonationReport {
    type Error = String;

    fn try_from(r: PgDonationReportRow) -> Result<Self, String> {
        Ok(DonationReport {
            id: r.id,
            program_id: r.program_id,
            period_start: r.period_start,
            period_end: r.period_end,
            total_received_cents: r.total_received_cents,
            total_used_cents: r.total_used_cents,
            report_file: r.report_file,
            is_published: r.is_published,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
