//! Storage port for the data model.
//!
//! Implemented by [`memory::MemoryStore`] and, behind the `database`
//! feature, by [`postgres::PgStore`]. Lifecycle services depend only on
//! this trait; all invariant enforcement happens above it, except the
//! atomicity of composite create-with-links calls, which each
//! implementation provides internally.
//!
//! Generic-by-kind operations take their table and column names from the
//! relationship graph and schema metadata, never from caller input.

pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::*;
use crate::error::Result;
use crate::graph::{EntityKind, JoinSide, JoinTable};

#[async_trait]
pub trait ModelStore: Send + Sync {
    // ── generic-by-kind probes ───────────────────────────────

    /// Does a row of `kind` with this id exist?
    async fn exists(&self, kind: EntityKind, id: i64) -> Result<bool>;

    /// Hard-delete one row. Returns false when the row was absent.
    async fn delete_row(&self, kind: EntityKind, id: i64) -> Result<bool>;

    /// Ids of child rows whose `fk` column equals `parent_id`, ascending.
    async fn child_ids(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<Vec<i64>>;

    async fn count_children(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<i64>;

    /// Clear a nullable `fk` column on every child row pointing at
    /// `parent_id`. Returns the number of rows touched.
    async fn nullify_fk(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<u64>;

    /// Ids of polymorphic children attached to (`target_kind`, `target_id`).
    async fn target_child_ids(
        &self,
        kind: EntityKind,
        target_kind: EntityKind,
        target_id: i64,
    ) -> Result<Vec<i64>>;

    /// Detach polymorphic children (clear both target columns).
    async fn clear_targets(
        &self,
        kind: EntityKind,
        target_kind: EntityKind,
        target_id: i64,
    ) -> Result<u64>;

    /// Is this slug taken by a row of `kind` other than `exclude`?
    async fn slug_in_use(&self, kind: EntityKind, slug: &str, exclude: Option<i64>)
        -> Result<bool>;

    /// All row ids for `kind`, ascending.
    async fn all_ids(&self, kind: EntityKind) -> Result<Vec<i64>>;

    // ── join links ───────────────────────────────────────────

    /// Create a link; returns false (and writes nothing) when the pair
    /// already exists.
    async fn link(&self, join: JoinTable, left_id: i64, right_id: i64) -> Result<bool>;

    async fn unlink(&self, join: JoinTable, left_id: i64, right_id: i64) -> Result<bool>;

    /// Ids on the opposite side of `side` for the given row.
    async fn linked_ids(&self, join: JoinTable, side: JoinSide, id: i64) -> Result<Vec<i64>>;

    /// Remove every link where `side` equals `id`.
    async fn drop_links(&self, join: JoinTable, side: JoinSide, id: i64) -> Result<u64>;

    // ── users & profiles ─────────────────────────────────────

    async fn insert_user(&self, user: &User) -> Result<i64>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn update_user(&self, user: &User) -> Result<bool>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn insert_profile(&self, profile: &Profile) -> Result<i64>;
    async fn get_profile(&self, id: i64) -> Result<Option<Profile>>;
    async fn update_profile(&self, profile: &Profile) -> Result<bool>;
    async fn profile_by_user(&self, user_id: i64) -> Result<Option<Profile>>;

    // ── taxonomy ─────────────────────────────────────────────

    async fn insert_category(&self, category: &Category) -> Result<i64>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>>;
    async fn update_category(&self, category: &Category) -> Result<bool>;

    async fn insert_tag(&self, tag: &Tag) -> Result<i64>;
    async fn get_tag(&self, id: i64) -> Result<Option<Tag>>;
    async fn update_tag(&self, tag: &Tag) -> Result<bool>;

    // ── content ──────────────────────────────────────────────

    /// Insert the article and its category/tag links as one atomic unit.
    async fn insert_article(
        &self,
        article: &Article,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<i64>;
    async fn get_article(&self, id: i64) -> Result<Option<Article>>;
    async fn update_article(&self, article: &Article) -> Result<bool>;

    /// Insert the news item and its links as one atomic unit.
    async fn insert_news(&self, news: &News, category_ids: &[i64], tag_ids: &[i64])
        -> Result<i64>;
    async fn get_news(&self, id: i64) -> Result<Option<News>>;
    async fn update_news(&self, news: &News) -> Result<bool>;

    async fn insert_comment(&self, comment: &Comment) -> Result<i64>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>>;
    async fn update_comment(&self, comment: &Comment) -> Result<bool>;

    // ── forum ────────────────────────────────────────────────

    async fn insert_forum_topic(&self, topic: &ForumTopic) -> Result<i64>;
    async fn get_forum_topic(&self, id: i64) -> Result<Option<ForumTopic>>;
    async fn update_forum_topic(&self, topic: &ForumTopic) -> Result<bool>;

    async fn insert_forum_post(&self, post: &ForumPost) -> Result<i64>;
    async fn get_forum_post(&self, id: i64) -> Result<Option<ForumPost>>;
    async fn update_forum_post(&self, post: &ForumPost) -> Result<bool>;

    // ── events ───────────────────────────────────────────────

    /// Insert the event and its category links as one atomic unit.
    async fn insert_event(&self, event: &Event, category_ids: &[i64]) -> Result<i64>;
    async fn get_event(&self, id: i64) -> Result<Option<Event>>;
    async fn update_event(&self, event: &Event) -> Result<bool>;

    async fn insert_registration(&self, registration: &EventRegistration) -> Result<i64>;
    async fn get_registration(&self, id: i64) -> Result<Option<EventRegistration>>;
    async fn update_registration(&self, registration: &EventRegistration) -> Result<bool>;
    async fn registration_for(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<EventRegistration>>;

    // ── galleries ────────────────────────────────────────────

    /// Insert the gallery and its tag links as one atomic unit.
    async fn insert_gallery(&self, gallery: &Gallery, tag_ids: &[i64]) -> Result<i64>;
    async fn get_gallery(&self, id: i64) -> Result<Option<Gallery>>;
    async fn update_gallery(&self, gallery: &Gallery) -> Result<bool>;

    // ── scholarships ─────────────────────────────────────────

    async fn insert_scholarship(&self, scholarship: &Scholarship) -> Result<i64>;
    async fn get_scholarship(&self, id: i64) -> Result<Option<Scholarship>>;
    async fn update_scholarship(&self, scholarship: &Scholarship) -> Result<bool>;

    async fn insert_recipient(&self, recipient: &ScholarshipRecipient) -> Result<i64>;
    async fn get_recipient(&self, id: i64) -> Result<Option<ScholarshipRecipient>>;
    async fn update_recipient(&self, recipient: &ScholarshipRecipient) -> Result<bool>;

    async fn insert_application(&self, application: &ScholarshipApplication) -> Result<i64>;
    async fn get_application(&self, id: i64) -> Result<Option<ScholarshipApplication>>;
    async fn update_application(&self, application: &ScholarshipApplication) -> Result<bool>;

    // ── donations ────────────────────────────────────────────

    async fn insert_qris_account(&self, account: &QrisAccount) -> Result<i64>;
    async fn get_qris_account(&self, id: i64) -> Result<Option<QrisAccount>>;
    async fn update_qris_account(&self, account: &QrisAccount) -> Result<bool>;

    async fn insert_program(&self, program: &DonationProgram) -> Result<i64>;
    async fn get_program(&self, id: i64) -> Result<Option<DonationProgram>>;
    async fn update_program(&self, program: &DonationProgram) -> Result<bool>;

    async fn insert_manual_entry(&self, entry: &ManualDonationEntry) -> Result<i64>;
    async fn get_manual_entry(&self, id: i64) -> Result<Option<ManualDonationEntry>>;
    async fn update_manual_entry(&self, entry: &ManualDonationEntry) -> Result<bool>;

    /// Mark an unverified entry verified and add its amount to the owning
    /// program's running total, as one atomic unit. Returns the updated
    /// entry, or `None` when the entry is absent or already verified.
    async fn verify_entry(
        &self,
        entry_id: i64,
        verifier_id: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<ManualDonationEntry>>;

    async fn insert_donor_registration(&self, registration: &DonorRegistration) -> Result<i64>;
    async fn get_donor_registration(&self, id: i64) -> Result<Option<DonorRegistration>>;
    async fn update_donor_registration(&self, registration: &DonorRegistration) -> Result<bool>;

    async fn insert_report(&self, report: &DonationReport) -> Result<i64>;
    async fn get_report(&self, id: i64) -> Result<Option<DonationReport>>;
    async fn update_report(&self, report: &DonationReport) -> Result<bool>;
}
