//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use alumni_core::domain::*;
use alumni_core::service::ModelService;
use alumni_core::store::memory::MemoryStore;

pub fn service() -> ModelService {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    ModelService::new(Arc::new(MemoryStore::new()))
}

pub async fn alumni_user(svc: &ModelService, email: &str) -> User {
    svc.accounts
        .create_user(NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::Alumni,
        })
        .await
        .unwrap()
}

pub async fn admin_user(svc: &ModelService, email: &str) -> User {
    svc.accounts
        .create_user(NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::Admin,
        })
        .await
        .unwrap()
}

pub async fn category(svc: &ModelService, name: &str) -> Category {
    svc.taxonomy
        .create_category(NewCategory {
            name: name.to_string(),
            slug: None,
            description: None,
            parent_id: None,
        })
        .await
        .unwrap()
}

pub async fn tag(svc: &ModelService, name: &str) -> Tag {
    svc.taxonomy
        .create_tag(NewTag { name: name.to_string(), slug: None })
        .await
        .unwrap()
}

pub fn new_article(title: &str, author_id: i64) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        slug: None,
        content: "body".to_string(),
        excerpt: None,
        featured_image: None,
        author_id,
        is_published: true,
        is_featured: false,
        category_ids: Vec::new(),
        tag_ids: Vec::new(),
    }
}

pub fn new_event(title: &str, organizer_id: i64) -> NewEvent {
    let starts_at = chrono::Utc::now() + chrono::Duration::days(30);
    NewEvent {
        title: title.to_string(),
        slug: None,
        description: None,
        organizer_id,
        starts_at,
        ends_at: Some(starts_at + chrono::Duration::hours(3)),
        location: None,
        event_type: None,
        capacity: None,
        registration_deadline: None,
        is_published: true,
        category_ids: Vec::new(),
    }
}

pub fn new_scholarship(name: &str) -> NewScholarship {
    NewScholarship {
        name: name.to_string(),
        slug: None,
        description: None,
        amount_cents: 500_000_00,
        opens_on: None,
        closes_on: None,
        is_published: true,
    }
}

pub fn new_program(name: &str) -> NewDonationProgram {
    NewDonationProgram {
        name: name.to_string(),
        slug: None,
        description: None,
        target_amount_cents: 1_000_000_00,
        starts_on: None,
        ends_on: None,
        qris_account_id: None,
    }
}
