//! Scholarship lifecycle: offerings, award records, and the application
//! review workflow.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{
    ApplicationStatus, NewScholarship, NewScholarshipApplication, NewScholarshipRecipient,
    Scholarship, ScholarshipApplication, ScholarshipPatch, ScholarshipRecipient,
    ScholarshipStatus,
};
use crate::error::{ModelError, Result};
use crate::graph::EntityKind;
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found, resolve_slug};

pub struct ScholarshipService {
    store: Arc<dyn ModelStore>,
}

impl ScholarshipService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── scholarships ─────────────────────────────────────────

    pub async fn create_scholarship(&self, new: NewScholarship) -> Result<Scholarship> {
        check_required("name", &new.name)?;
        if new.amount_cents <= 0 {
            return Err(ModelError::validation("scholarship amount must be positive"));
        }
        if let (Some(opens), Some(closes)) = (new.opens_on, new.closes_on) {
            if closes < opens {
                return Err(ModelError::validation("closing date precedes opening date"));
            }
        }
        let slug =
            resolve_slug(self.store.as_ref(), EntityKind::Scholarship, new.slug, &new.name, None)
                .await?;

        let now = Utc::now();
        let mut scholarship = Scholarship {
            id: 0,
            name: new.name,
            slug,
            description: new.description,
            amount_cents: new.amount_cents,
            opens_on: new.opens_on,
            closes_on: new.closes_on,
            status: ScholarshipStatus::Open,
            is_published: new.is_published,
            created_at: now,
            updated_at: now,
        };
        scholarship.id = self.store.insert_scholarship(&scholarship).await?;
        info!(scholarship_id = scholarship.id, slug = %scholarship.slug, "created scholarship");
        Ok(scholarship)
    }

    pub async fn get_scholarship(&self, id: i64) -> Result<Scholarship> {
        self.store
            .get_scholarship(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "scholarships", id })
    }

    pub async fn update_scholarship(&self, id: i64, patch: ScholarshipPatch) -> Result<Scholarship> {
        let mut scholarship = self.get_scholarship(id).await?;
        if let Some(name) = &patch.name {
            check_required("name", name)?;
        }
        if let Some(amount) = patch.amount_cents {
            if amount <= 0 {
                return Err(ModelError::validation("scholarship amount must be positive"));
            }
        }
        if let Some(slug) = patch.slug.clone() {
            scholarship.slug = resolve_slug(
                self.store.as_ref(),
                EntityKind::Scholarship,
                Some(slug),
                &scholarship.name,
                Some(id),
            )
            .await?;
        }
        let opens = patch.opens_on.or(scholarship.opens_on);
        let closes = patch.closes_on.or(scholarship.closes_on);
        if let (Some(opens), Some(closes)) = (opens, closes) {
            if closes < opens {
                return Err(ModelError::validation("closing date precedes opening date"));
            }
        }
        let mut patch = patch;
        patch.slug = None;
        patch.apply(&mut scholarship);
        scholarship.updated_at = Utc::now();
        self.store.update_scholarship(&scholarship).await?;
        Ok(scholarship)
    }

    /// Restricted while recipients or applications reference it.
    pub async fn delete_scholarship(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Scholarship, id).await
    }

    // ── recipients ───────────────────────────────────────────

    pub async fn add_recipient(&self, new: NewScholarshipRecipient) -> Result<ScholarshipRecipient> {
        ensure_exists(self.store.as_ref(), EntityKind::Scholarship, new.scholarship_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.user_id).await?;

        let now = Utc::now();
        let mut recipient = ScholarshipRecipient {
            id: 0,
            scholarship_id: new.scholarship_id,
            user_id: new.user_id,
            award_year: new.award_year,
            batch: new.batch,
            major: new.major,
            citation: new.citation,
            created_at: now,
            updated_at: now,
        };
        recipient.id = self.store.insert_recipient(&recipient).await?;
        Ok(recipient)
    }

    pub async fn get_recipient(&self, id: i64) -> Result<ScholarshipRecipient> {
        self.store
            .get_recipient(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "scholarship_recipients", id })
    }

    pub async fn remove_recipient(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::ScholarshipRecipient, id).await
    }

    pub async fn recipients_of(&self, scholarship_id: i64) -> Result<Vec<ScholarshipRecipient>> {
        ensure_found(self.store.as_ref(), EntityKind::Scholarship, scholarship_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::ScholarshipRecipient, "scholarship_id", scholarship_id)
            .await?
        {
            if let Some(recipient) = self.store.get_recipient(id).await? {
                out.push(recipient);
            }
        }
        Ok(out)
    }

    // ── applications ─────────────────────────────────────────

    /// Submit an application. Only open scholarships accept them.
    pub async fn apply(&self, new: NewScholarshipApplication) -> Result<ScholarshipApplication> {
        let scholarship = self
            .store
            .get_scholarship(new.scholarship_id)
            .await?
            .ok_or(ModelError::MissingReference {
                entity: "scholarships",
                id: new.scholarship_id,
            })?;
        if scholarship.status != ScholarshipStatus::Open {
            return Err(ModelError::validation(format!(
                "scholarship {} is not accepting applications",
                scholarship.id
            )));
        }
        ensure_exists(self.store.as_ref(), EntityKind::User, new.user_id).await?;

        let now = Utc::now();
        let mut application = ScholarshipApplication {
            id: 0,
            scholarship_id: new.scholarship_id,
            user_id: new.user_id,
            status: ApplicationStatus::Submitted,
            essay: new.essay,
            review_notes: None,
            created_at: now,
            updated_at: now,
        };
        application.id = self.store.insert_application(&application).await?;
        info!(
            application_id = application.id,
            scholarship_id = application.scholarship_id,
            "application submitted"
        );
        Ok(application)
    }

    pub async fn get_application(&self, id: i64) -> Result<ScholarshipApplication> {
        self.store
            .get_application(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "scholarship_applications", id })
    }

    /// Move an application through the review workflow. Illegal moves
    /// (reopening a decided application, skipping review for acceptance)
    /// are rejected.
    pub async fn review(
        &self,
        id: i64,
        to: ApplicationStatus,
        review_notes: Option<String>,
    ) -> Result<ScholarshipApplication> {
        let mut application = self.get_application(id).await?;
        if !application.status.can_transition(to) {
            return Err(ModelError::InvalidTransition {
                from: application.status.as_str(),
                to: to.as_str(),
            });
        }
        application.status = to;
        if review_notes.is_some() {
            application.review_notes = review_notes;
        }
        application.updated_at = Utc::now();
        self.store.update_application(&application).await?;
        info!(application_id = id, status = to.as_str(), "application reviewed");
        Ok(application)
    }

    pub async fn withdraw_application(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::ScholarshipApplication, id).await
    }

    pub async fn applications_of(
        &self,
        scholarship_id: i64,
    ) -> Result<Vec<ScholarshipApplication>> {
        ensure_found(self.store.as_ref(), EntityKind::Scholarship, scholarship_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::ScholarshipApplication, "scholarship_id", scholarship_id)
            .await?
        {
            if let Some(application) = self.store.get_application(id).await? {
                out.push(application);
            }
        }
        Ok(out)
    }

    pub async fn applications_by_user(&self, user_id: i64) -> Result<Vec<ScholarshipApplication>> {
        ensure_found(self.store.as_ref(), EntityKind::User, user_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::ScholarshipApplication, "user_id", user_id)
            .await?
        {
            if let Some(application) = self.store.get_application(id).await? {
                out.push(application);
            }
        }
        Ok(out)
    }
}
