//! Donation lifecycle: QRIS accounts, fundraising programs, manual
//! entries and their verification, donor pledges, and reports.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{
    DonationProgram, DonationProgramPatch, DonationReport, DonorRegistration,
    ManualDonationEntry, NewDonationProgram, NewDonationReport, NewDonorRegistration,
    NewManualDonationEntry, NewQrisAccount, ProgramStatus, QrisAccount, QrisAccountPatch,
};
use crate::error::{ModelError, Result};
use crate::graph::EntityKind;
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found, resolve_slug};

pub struct DonationService {
    store: Arc<dyn ModelStore>,
}

impl DonationService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── QRIS accounts ────────────────────────────────────────

    pub async fn create_qris_account(&self, new: NewQrisAccount) -> Result<QrisAccount> {
        check_required("bank_name", &new.bank_name)?;
        check_required("merchant_name", &new.merchant_name)?;
        check_required("account_number", &new.account_number)?;

        let now = Utc::now();
        let mut account = QrisAccount {
            id: 0,
            bank_name: new.bank_name,
            merchant_name: new.merchant_name,
            account_number: new.account_number,
            qr_image_path: new.qr_image_path,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        account.id = self.store.insert_qris_account(&account).await?;
        info!(account_id = account.id, "created qris account");
        Ok(account)
    }

    pub async fn get_qris_account(&self, id: i64) -> Result<QrisAccount> {
        self.store
            .get_qris_account(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "qris_accounts", id })
    }

    pub async fn update_qris_account(&self, id: i64, patch: QrisAccountPatch) -> Result<QrisAccount> {
        let mut account = self.get_qris_account(id).await?;
        patch.apply(&mut account);
        account.updated_at = Utc::now();
        self.store.update_qris_account(&account).await?;
        Ok(account)
    }

    /// Programs and entries that point at the account fall back to null.
    pub async fn delete_qris_account(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::QrisAccount, id).await
    }

    // ── programs ─────────────────────────────────────────────

    pub async fn create_program(&self, new: NewDonationProgram) -> Result<DonationProgram> {
        check_required("name", &new.name)?;
        if new.target_amount_cents <= 0 {
            return Err(ModelError::validation("target amount must be positive"));
        }
        if let (Some(starts), Some(ends)) = (new.starts_on, new.ends_on) {
            if ends < starts {
                return Err(ModelError::validation("program end date precedes start date"));
            }
        }
        if let Some(account_id) = new.qris_account_id {
            ensure_exists(self.store.as_ref(), EntityKind::QrisAccount, account_id).await?;
        }
        let slug = resolve_slug(
            self.store.as_ref(),
            EntityKind::DonationProgram,
            new.slug,
            &new.name,
            None,
        )
        .await?;

        let now = Utc::now();
        let mut program = DonationProgram {
            id: 0,
            name: new.name,
            slug,
            description: new.description,
            target_amount_cents: new.target_amount_cents,
            current_amount_cents: 0,
            starts_on: new.starts_on,
            ends_on: new.ends_on,
            status: ProgramStatus::Draft,
            qris_account_id: new.qris_account_id,
            created_at: now,
            updated_at: now,
        };
        program.id = self.store.insert_program(&program).await?;
        info!(program_id = program.id, slug = %program.slug, "created donation program");
        Ok(program)
    }

    pub async fn get_program(&self, id: i64) -> Result<DonationProgram> {
        self.store
            .get_program(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "donation_programs", id })
    }

    pub async fn update_program(
        &self,
        id: i64,
        patch: DonationProgramPatch,
    ) -> Result<DonationProgram> {
        let mut program = self.get_program(id).await?;
        if let Some(name) = &patch.name {
            check_required("name", name)?;
        }
        if let Some(target) = patch.target_amount_cents {
            if target <= 0 {
                return Err(ModelError::validation("target amount must be positive"));
            }
        }
        if let Some(account_id) = patch.qris_account_id {
            ensure_exists(self.store.as_ref(), EntityKind::QrisAccount, account_id).await?;
        }
        if let Some(slug) = patch.slug.clone() {
            program.slug = resolve_slug(
                self.store.as_ref(),
                EntityKind::DonationProgram,
                Some(slug),
                &program.name,
                Some(id),
            )
            .await?;
        }
        let starts = patch.starts_on.or(program.starts_on);
        let ends = patch.ends_on.or(program.ends_on);
        if let (Some(starts), Some(ends)) = (starts, ends) {
            if ends < starts {
                return Err(ModelError::validation("program end date precedes start date"));
            }
        }
        let mut patch = patch;
        patch.slug = None;
        patch.apply(&mut program);
        program.updated_at = Utc::now();
        self.store.update_program(&program).await?;
        Ok(program)
    }

    /// Restricted while entries, pledges, or reports reference it.
    pub async fn delete_program(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::DonationProgram, id).await
    }

    // ── manual entries ───────────────────────────────────────

    pub async fn record_manual_entry(
        &self,
        new: NewManualDonationEntry,
    ) -> Result<ManualDonationEntry> {
        check_required("donor_name", &new.donor_name)?;
        if new.amount_cents <= 0 {
            return Err(ModelError::validation("donation amount must be positive"));
        }
        ensure_exists(self.store.as_ref(), EntityKind::DonationProgram, new.program_id).await?;
        if let Some(account_id) = new.account_id {
            ensure_exists(self.store.as_ref(), EntityKind::QrisAccount, account_id).await?;
        }

        let now = Utc::now();
        let mut entry = ManualDonationEntry {
            id: 0,
            program_id: new.program_id,
            account_id: new.account_id,
            donor_name: new.donor_name,
            amount_cents: new.amount_cents,
            donated_on: new.donated_on,
            note: new.note,
            is_verified: false,
            verified_by: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        };
        entry.id = self.store.insert_manual_entry(&entry).await?;
        Ok(entry)
    }

    pub async fn get_manual_entry(&self, id: i64) -> Result<ManualDonationEntry> {
        self.store
            .get_manual_entry(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "manual_donation_entries", id })
    }

    /// Verify an entry: records the reviewing user and adds the amount
    /// to the program's running total in one atomic store call.
    /// Verifying twice is an error.
    pub async fn verify_manual_entry(
        &self,
        id: i64,
        verifier_id: i64,
    ) -> Result<ManualDonationEntry> {
        ensure_found(self.store.as_ref(), EntityKind::ManualDonationEntry, id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::User, verifier_id).await?;

        let entry = self
            .store
            .verify_entry(id, verifier_id, Utc::now())
            .await?
            .ok_or_else(|| {
                ModelError::validation(format!("entry {id} is already verified"))
            })?;
        info!(
            entry_id = id,
            program_id = entry.program_id,
            amount_cents = entry.amount_cents,
            "donation entry verified"
        );
        Ok(entry)
    }

    /// Verified entries back the program's running total and cannot be
    /// deleted; reverse the verification out of band first.
    pub async fn delete_manual_entry(&self, id: i64) -> Result<()> {
        let entry = self.get_manual_entry(id).await?;
        if entry.is_verified {
            return Err(ModelError::validation(format!(
                "entry {id} is verified and counted in the program total"
            )));
        }
        delete_entity(self.store.as_ref(), EntityKind::ManualDonationEntry, id).await
    }

    pub async fn entries_of_program(&self, program_id: i64) -> Result<Vec<ManualDonationEntry>> {
        ensure_found(self.store.as_ref(), EntityKind::DonationProgram, program_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::ManualDonationEntry, "program_id", program_id)
            .await?
        {
            if let Some(entry) = self.store.get_manual_entry(id).await? {
                out.push(entry);
            }
        }
        Ok(out)
    }

    // ── donor registrations ──────────────────────────────────

    /// Record a donor pledge. An anonymous pledge needs no identity; a
    /// named one needs either a linked user or a donor name.
    pub async fn register_donor(&self, new: NewDonorRegistration) -> Result<DonorRegistration> {
        if new.amount_cents <= 0 {
            return Err(ModelError::validation("donation amount must be positive"));
        }
        ensure_exists(self.store.as_ref(), EntityKind::DonationProgram, new.program_id).await?;
        if let Some(user_id) = new.user_id {
            ensure_exists(self.store.as_ref(), EntityKind::User, user_id).await?;
        }
        if !new.is_anonymous && new.user_id.is_none() {
            let named = new.donor_name.as_deref().is_some_and(|n| !n.trim().is_empty());
            if !named {
                return Err(ModelError::validation(
                    "non-anonymous donor needs a user or a donor name",
                ));
            }
        }

        let now = Utc::now();
        let mut registration = DonorRegistration {
            id: 0,
            program_id: new.program_id,
            user_id: new.user_id,
            donor_name: new.donor_name,
            amount_cents: new.amount_cents,
            is_anonymous: new.is_anonymous,
            is_verified: false,
            message: new.message,
            created_at: now,
            updated_at: now,
        };
        registration.id = self.store.insert_donor_registration(&registration).await?;
        Ok(registration)
    }

    pub async fn get_donor_registration(&self, id: i64) -> Result<DonorRegistration> {
        self.store
            .get_donor_registration(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "donor_registrations", id })
    }

    pub async fn verify_donor_registration(&self, id: i64) -> Result<DonorRegistration> {
        let mut registration = self.get_donor_registration(id).await?;
        registration.is_verified = true;
        registration.updated_at = Utc::now();
        self.store.update_donor_registration(&registration).await?;
        Ok(registration)
    }

    pub async fn delete_donor_registration(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::DonorRegistration, id).await
    }

    pub async fn donors_of_program(&self, program_id: i64) -> Result<Vec<DonorRegistration>> {
        ensure_found(self.store.as_ref(), EntityKind::DonationProgram, program_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::DonorRegistration, "program_id", program_id)
            .await?
        {
            if let Some(registration) = self.store.get_donor_registration(id).await? {
                out.push(registration);
            }
        }
        Ok(out)
    }

    // ── reports ──────────────────────────────────────────────

    pub async fn create_report(&self, new: NewDonationReport) -> Result<DonationReport> {
        ensure_exists(self.store.as_ref(), EntityKind::DonationProgram, new.program_id).await?;
        if new.period_end < new.period_start {
            return Err(ModelError::validation("report period ends before it starts"));
        }
        if new.total_received_cents < 0 || new.total_used_cents < 0 {
            return Err(ModelError::validation("report totals must not be negative"));
        }

        let now = Utc::now();
        let mut report = DonationReport {
            id: 0,
            program_id: new.program_id,
            period_start: new.period_start,
            period_end: new.period_end,
            total_received_cents: new.total_received_cents,
            total_used_cents: new.total_used_cents,
            report_file: new.report_file,
            is_published: new.is_published,
            created_at: now,
            updated_at: now,
        };
        report.id = self.store.insert_report(&report).await?;
        Ok(report)
    }

    pub async fn get_report(&self, id: i64) -> Result<DonationReport> {
        self.store
            .get_report(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "donation_reports", id })
    }

    pub async fn publish_report(&self, id: i64) -> Result<DonationReport> {
        let mut report = self.get_report(id).await?;
        report.is_published = true;
        report.updated_at = Utc::now();
        self.store.update_report(&report).await?;
        Ok(report)
    }

    pub async fn delete_report(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::DonationReport, id).await
    }

    pub async fn reports_of_program(&self, program_id: i64) -> Result<Vec<DonationReport>> {
        ensure_found(self.store.as_ref(), EntityKind::DonationProgram, program_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::DonationReport, "program_id", program_id)
            .await?
        {
            if let Some(report) = self.store.get_report(id).await? {
                out.push(report);
            }
        }
        Ok(out)
    }
}
