//! Table definitions for every entity and join table, in creation order.
//!
//! Uniqueness constraints (email, slugs, one-profile-per-user, join
//! pairs, one-registration-per-pair) are declared here explicitly so the
//! database enforces what the services check at write time.

use super::{col, fk, fk_nullable, fk_unique, nullable, unique, ColumnType::*, TableDef};
use crate::graph::EntityKind;

pub fn all() -> Vec<TableDef> {
    vec![
        // ── independent entities ────────────────────────────────
        TableDef {
            name: "users",
            entity: Some(EntityKind::User),
            columns: vec![
                unique("email", Text),
                col("password_hash", Text),
                col("role", Text),
                col("is_verified", Boolean),
                col("is_active", Boolean),
                nullable("reset_token", Uuid),
                nullable("reset_token_expires_at", TimestampTz),
                nullable("last_login_at", TimestampTz),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "categories",
            entity: Some(EntityKind::Category),
            columns: vec![
                col("name", Text),
                unique("slug", Text),
                nullable("description", Text),
                fk_nullable("parent_id", "categories"),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "tags",
            entity: Some(EntityKind::Tag),
            columns: vec![col("name", Text), unique("slug", Text)],
            uniques: vec![],
        },
        TableDef {
            name: "qris_accounts",
            entity: Some(EntityKind::QrisAccount),
            columns: vec![
                col("bank_name", Text),
                col("merchant_name", Text),
                col("account_number", Text),
                nullable("qr_image_path", Text),
                col("is_active", Boolean),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "scholarships",
            entity: Some(EntityKind::Scholarship),
            columns: vec![
                col("name", Text),
                unique("slug", Text),
                nullable("description", Text),
                col("amount_cents", BigInt),
                nullable("opens_on", Date),
                nullable("closes_on", Date),
                col("status", Text),
                col("is_published", Boolean),
            ],
            uniques: vec![],
        },
        // ── first-level dependents ──────────────────────────────
        TableDef {
            name: "profiles",
            entity: Some(EntityKind::Profile),
            columns: vec![
                fk_unique("user_id", "users"),
                col("full_name", Text),
                nullable("phone", Text),
                nullable("address", Text),
                nullable("entry_year", Integer),
                nullable("graduation_year", Integer),
                nullable("gpa", Double),
                nullable("thesis_title", Text),
                nullable("current_employer", Text),
                nullable("job_title", Text),
                nullable("profile_picture", Text),
                nullable("bio", Text),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "articles",
            entity: Some(EntityKind::Article),
            columns: vec![
                col("title", Text),
                unique("slug", Text),
                col("content", Text),
                nullable("excerpt", Text),
                nullable("featured_image", Text),
                fk("author_id", "users"),
                col("is_published", Boolean),
                col("is_featured", Boolean),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "news",
            entity: Some(EntityKind::News),
            columns: vec![
                col("title", Text),
                unique("slug", Text),
                col("content", Text),
                nullable("excerpt", Text),
                nullable("featured_image", Text),
                fk("author_id", "users"),
                col("is_published", Boolean),
                col("is_featured", Boolean),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "forum_topics",
            entity: Some(EntityKind::ForumTopic),
            columns: vec![
                col("title", Text),
                col("content", Text),
                fk("category_id", "categories"),
                fk("author_id", "users"),
                col("is_closed", Boolean),
                col("is_pinned", Boolean),
                col("last_activity_at", TimestampTz),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "events",
            entity: Some(EntityKind::Event),
            columns: vec![
                col("title", Text),
                unique("slug", Text),
                nullable("description", Text),
                fk("organizer_id", "users"),
                col("starts_at", TimestampTz),
                nullable("ends_at", TimestampTz),
                nullable("location", Text),
                nullable("event_type", Text),
                nullable("capacity", Integer),
                nullable("registration_deadline", TimestampTz),
                col("is_published", Boolean),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "donation_programs",
            entity: Some(EntityKind::DonationProgram),
            columns: vec![
                col("name", Text),
                unique("slug", Text),
                nullable("description", Text),
                col("target_amount_cents", BigInt),
                col("current_amount_cents", BigInt),
                nullable("starts_on", Date),
                nullable("ends_on", Date),
                col("status", Text),
                fk_nullable("qris_account_id", "qris_accounts"),
            ],
            uniques: vec![],
        },
        // ── second-level dependents ─────────────────────────────
        // Polymorphic attachments (comments, galleries) store
        // target_kind/target_id without a declared FK; target existence
        // is a service-level check against the relationship graph.
        TableDef {
            name: "comments",
            entity: Some(EntityKind::Comment),
            columns: vec![
                col("content", Text),
                fk("author_id", "users"),
                nullable("target_kind", Text),
                nullable("target_id", BigInt),
                fk_nullable("parent_id", "comments"),
                col("is_approved", Boolean),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "forum_posts",
            entity: Some(EntityKind::ForumPost),
            columns: vec![
                fk("topic_id", "forum_topics"),
                fk("author_id", "users"),
                col("content", Text),
                fk_nullable("parent_id", "forum_posts"),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "event_registrations",
            entity: Some(EntityKind::EventRegistration),
            columns: vec![
                fk("event_id", "events"),
                fk("user_id", "users"),
                col("registered_at", TimestampTz),
                col("attendance_status", Text),
                nullable("notes", Text),
            ],
            uniques: vec![vec!["event_id", "user_id"]],
        },
        TableDef {
            name: "galleries",
            entity: Some(EntityKind::Gallery),
            columns: vec![
                col("title", Text),
                col("media_kind", Text),
                col("media_path", Text),
                nullable("caption", Text),
                fk("uploader_id", "users"),
                nullable("target_kind", Text),
                nullable("target_id", BigInt),
                col("is_published", Boolean),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "scholarship_recipients",
            entity: Some(EntityKind::ScholarshipRecipient),
            columns: vec![
                fk("scholarship_id", "scholarships"),
                fk("user_id", "users"),
                col("award_year", Integer),
                nullable("batch", Text),
                nullable("major", Text),
                nullable("citation", Text),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "scholarship_applications",
            entity: Some(EntityKind::ScholarshipApplication),
            columns: vec![
                fk("scholarship_id", "scholarships"),
                fk("user_id", "users"),
                col("status", Text),
                nullable("essay", Text),
                nullable("review_notes", Text),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "manual_donation_entries",
            entity: Some(EntityKind::ManualDonationEntry),
            columns: vec![
                fk("program_id", "donation_programs"),
                fk_nullable("account_id", "qris_accounts"),
                col("donor_name", Text),
                col("amount_cents", BigInt),
                col("donated_on", Date),
                nullable("note", Text),
                col("is_verified", Boolean),
                fk_nullable("verified_by", "users"),
                nullable("verified_at", TimestampTz),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "donor_registrations",
            entity: Some(EntityKind::DonorRegistration),
            columns: vec![
                fk("program_id", "donation_programs"),
                fk_nullable("user_id", "users"),
                nullable("donor_name", Text),
                col("amount_cents", BigInt),
                col("is_anonymous", Boolean),
                col("is_verified", Boolean),
                nullable("message", Text),
            ],
            uniques: vec![],
        },
        TableDef {
            name: "donation_reports",
            entity: Some(EntityKind::DonationReport),
            columns: vec![
                fk("program_id", "donation_programs"),
                col("period_start", Date),
                col("period_end", Date),
                col("total_received_cents", BigInt),
                col("total_used_cents", BigInt),
                nullable("report_file", Text),
                col("is_published", Boolean),
            ],
            uniques: vec![],
        },
        // ── join tables ─────────────────────────────────────────
        join_table("article_categories", "article_id", "articles", "category_id", "categories"),
        join_table("article_tags", "article_id", "articles", "tag_id", "tags"),
        join_table("news_categories", "news_id", "news", "category_id", "categories"),
        join_table("news_tags", "news_id", "news", "tag_id", "tags"),
        join_table("event_categories", "event_id", "events", "category_id", "categories"),
        join_table("gallery_tags", "gallery_id", "galleries", "tag_id", "tags"),
    ]
}

fn join_table(
    name: &'static str,
    left: &'static str,
    left_parent: &'static str,
    right: &'static str,
    right_parent: &'static str,
) -> TableDef {
    TableDef {
        name,
        entity: None,
        columns: vec![fk(left, left_parent), fk(right, right_parent)],
        uniques: vec![vec![left, right]],
    }
}
