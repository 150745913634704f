//! Account entities: User and its one-to-one Profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, a closed set. Unknown labels are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Alumni,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Alumni => "alumni",
            Self::Student => "student",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "alumni" => Some(Self::Alumni),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

/// Account record. The password arrives pre-hashed; credential handling
/// lives with the (out-of-scope) auth collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub is_active: bool,
    pub reset_token: Option<Uuid>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = self.is_verified {
            user.is_verified = v;
        }
        if let Some(v) = self.is_active {
            user.is_active = v;
        }
        if let Some(v) = self.last_login_at {
            user.last_login_at = Some(v);
        }
    }
}

/// Extended personal / academic / professional data. Exactly one per User.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub user_id: i64,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub entry_year: Option<i32>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub current_employer: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub entry_year: Option<i32>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub current_employer: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(v) = self.full_name {
            profile.full_name = v;
        }
        if let Some(v) = self.phone {
            profile.phone = Some(v);
        }
        if let Some(v) = self.address {
            profile.address = Some(v);
        }
        if let Some(v) = self.entry_year {
            profile.entry_year = Some(v);
        }
        if let Some(v) = self.graduation_year {
            profile.graduation_year = Some(v);
        }
        if let Some(v) = self.gpa {
            profile.gpa = Some(v);
        }
        if let Some(v) = self.thesis_title {
            profile.thesis_title = Some(v);
        }
        if let Some(v) = self.current_employer {
            profile.current_employer = Some(v);
        }
        if let Some(v) = self.job_title {
            profile.job_title = Some(v);
        }
        if let Some(v) = self.profile_picture {
            profile.profile_picture = Some(v);
        }
        if let Some(v) = self.bio {
            profile.bio = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_round_trip() {
        for role in [UserRole::Admin, UserRole::Alumni, UserRole::Student] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("superuser"), None);
        assert_eq!(serde_json::to_value(UserRole::Alumni).unwrap(), "alumni");
    }

    #[test]
    fn patch_leaves_untouched_fields_alone() {
        let now = Utc::now();
        let mut user = User {
            id: 1,
            email: "a@x.com".into(),
            password_hash: "h".into(),
            role: UserRole::Student,
            is_verified: false,
            is_active: true,
            reset_token: None,
            reset_token_expires_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        UserPatch {
            role: Some(UserRole::Alumni),
            is_verified: Some(true),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.role, UserRole::Alumni);
        assert!(user.is_verified);
        assert_eq!(user.email, "a@x.com");
    }
}
