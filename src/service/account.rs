//! Account lifecycle: users and their one-to-one profiles.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::slug::{check_email, check_required};
use crate::domain::{NewProfile, NewUser, Profile, ProfilePatch, User, UserPatch};
use crate::error::{ModelError, Result};
use crate::graph::EntityKind;
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found};

/// How long a password-reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 2;

pub struct AccountService {
    store: Arc<dyn ModelStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── users ────────────────────────────────────────────────

    pub async fn create_user(&self, new: NewUser) -> Result<User> {
        check_required("email", &new.email)?;
        check_required("password_hash", &new.password_hash)?;
        check_email(&new.email)?;
        if self.store.user_by_email(&new.email).await?.is_some() {
            return Err(ModelError::UniqueViolation(format!(
                "email '{}' is already registered",
                new.email
            )));
        }

        let now = Utc::now();
        let mut user = User {
            id: 0,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            is_verified: false,
            is_active: true,
            reset_token: None,
            reset_token_expires_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        user.id = self.store.insert_user(&user).await?;
        info!(user_id = user.id, "created user");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "users", id })
    }

    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User> {
        let mut user = self.get_user(id).await?;
        if let Some(email) = &patch.email {
            check_email(email)?;
            if let Some(other) = self.store.user_by_email(email).await? {
                if other.id != id {
                    return Err(ModelError::UniqueViolation(format!(
                        "email '{email}' is already registered"
                    )));
                }
            }
        }
        patch.apply(&mut user);
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        Ok(user)
    }

    /// Hard delete. Restricted while the user still owns content
    /// (articles, posts, registrations, ...); the profile cascades.
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::User, id).await
    }

    /// Issue a fresh password-reset token, replacing any previous one.
    pub async fn issue_reset_token(&self, id: i64) -> Result<Uuid> {
        let mut user = self.get_user(id).await?;
        let token = Uuid::new_v4();
        user.reset_token = Some(token);
        user.reset_token_expires_at = Some(Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS));
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        Ok(token)
    }

    /// Consume a reset token: verifies match and expiry, stores the new
    /// password hash, and clears the token.
    pub async fn reset_password(&self, id: i64, token: Uuid, password_hash: String) -> Result<()> {
        check_required("password_hash", &password_hash)?;
        let mut user = self.get_user(id).await?;
        let valid = user.reset_token == Some(token)
            && user
                .reset_token_expires_at
                .is_some_and(|expires| expires > Utc::now());
        if !valid {
            return Err(ModelError::validation("reset token invalid or expired"));
        }
        user.password_hash = password_hash;
        user.reset_token = None;
        user.reset_token_expires_at = None;
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        info!(user_id = id, "password reset");
        Ok(())
    }

    pub async fn record_login(&self, id: i64) -> Result<()> {
        let mut user = self.get_user(id).await?;
        user.last_login_at = Some(Utc::now());
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        Ok(())
    }

    // ── profiles ─────────────────────────────────────────────

    pub async fn create_profile(&self, new: NewProfile) -> Result<Profile> {
        check_required("full_name", &new.full_name)?;
        validate_academic(new.gpa, new.entry_year, new.graduation_year)?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.user_id).await?;
        if self.store.profile_by_user(new.user_id).await?.is_some() {
            return Err(ModelError::UniqueViolation(format!(
                "user {} already has a profile",
                new.user_id
            )));
        }

        let now = Utc::now();
        let mut profile = Profile {
            id: 0,
            user_id: new.user_id,
            full_name: new.full_name,
            phone: new.phone,
            address: new.address,
            entry_year: new.entry_year,
            graduation_year: new.graduation_year,
            gpa: new.gpa,
            thesis_title: new.thesis_title,
            current_employer: new.current_employer,
            job_title: new.job_title,
            profile_picture: new.profile_picture,
            bio: new.bio,
            created_at: now,
            updated_at: now,
        };
        profile.id = self.store.insert_profile(&profile).await?;
        info!(profile_id = profile.id, user_id = profile.user_id, "created profile");
        Ok(profile)
    }

    pub async fn get_profile(&self, id: i64) -> Result<Profile> {
        self.store
            .get_profile(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "profiles", id })
    }

    /// The user's profile, if any. `NotFound` when the user is absent.
    pub async fn profile_of_user(&self, user_id: i64) -> Result<Option<Profile>> {
        ensure_found(self.store.as_ref(), EntityKind::User, user_id).await?;
        self.store.profile_by_user(user_id).await
    }

    pub async fn update_profile(&self, id: i64, patch: ProfilePatch) -> Result<Profile> {
        let mut profile = self.get_profile(id).await?;
        if let Some(name) = &patch.full_name {
            check_required("full_name", name)?;
        }
        let gpa = patch.gpa.or(profile.gpa);
        let entry = patch.entry_year.or(profile.entry_year);
        let graduation = patch.graduation_year.or(profile.graduation_year);
        validate_academic(gpa, entry, graduation)?;
        patch.apply(&mut profile);
        profile.updated_at = Utc::now();
        self.store.update_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn delete_profile(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Profile, id).await
    }
}

fn validate_academic(
    gpa: Option<f64>,
    entry_year: Option<i32>,
    graduation_year: Option<i32>,
) -> Result<()> {
    if let Some(gpa) = gpa {
        if !(0.0..=4.0).contains(&gpa) {
            return Err(ModelError::validation(format!("gpa {gpa} out of range 0.0..=4.0")));
        }
    }
    if let (Some(entry), Some(graduation)) = (entry_year, graduation_year) {
        if graduation < entry {
            return Err(ModelError::validation(format!(
                "graduation year {graduation} precedes entry year {entry}"
            )));
        }
    }
    Ok(())
}
