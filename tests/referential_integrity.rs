//! Write-time reference checks, declared uniqueness, and traversals.

mod common;

use alumni_core::domain::*;
use alumni_core::graph::EntityKind;
use alumni_core::ModelError;

use common::*;

#[tokio::test]
async fn creating_event_with_unknown_organizer_fails() {
    let svc = service();
    let err = svc.events.create_event(new_event("Reunion", 999)).await.unwrap_err();
    assert!(matches!(err, ModelError::MissingReference { entity: "users", id: 999 }));
}

#[tokio::test]
async fn article_with_unknown_category_fails_before_insert() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let mut new = new_article("Orphan", author.id);
    new.category_ids = vec![42];
    let err = svc.content.create_article(new).await.unwrap_err();
    assert!(matches!(err, ModelError::MissingReference { entity: "categories", id: 42 }));
    // Nothing was written.
    assert!(svc.content.get_article(1).await.is_err());
}

#[tokio::test]
async fn second_profile_for_same_user_is_rejected() {
    let svc = service();
    let user = alumni_user(&svc, "alum@example.org").await;
    let new = NewProfile {
        user_id: user.id,
        full_name: "Ayu Lestari".to_string(),
        phone: None,
        address: None,
        entry_year: Some(2010),
        graduation_year: Some(2014),
        gpa: Some(3.4),
        thesis_title: None,
        current_employer: None,
        job_title: None,
        profile_picture: None,
        bio: None,
    };
    svc.accounts.create_profile(new.clone()).await.unwrap();
    let err = svc.accounts.create_profile(new).await.unwrap_err();
    assert!(matches!(err, ModelError::UniqueViolation(_)));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let svc = service();
    alumni_user(&svc, "dup@example.org").await;
    let err = svc
        .accounts
        .create_user(NewUser {
            email: "dup@example.org".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::Student,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::UniqueViolation(_)));
}

#[tokio::test]
async fn slugs_are_unique_per_entity_kind_but_not_across() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    svc.content.create_article(new_article("Annual Meetup", author.id)).await.unwrap();
    let err = svc
        .content
        .create_article(new_article("Annual Meetup", author.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::UniqueViolation(_)));
    // The same slug is free under a different kind.
    let event = svc.events.create_event(new_event("Annual Meetup", author.id)).await.unwrap();
    assert_eq!(event.slug, "annual-meetup");
}

#[tokio::test]
async fn many_to_many_attach_is_idempotent() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let cat = category(&svc, "Campus").await;
    let article = svc.content.create_article(new_article("Hello", author.id)).await.unwrap();

    assert!(svc.content.attach_article_category(article.id, cat.id).await.unwrap());
    // Second attach is a no-op, not a duplicate row.
    assert!(!svc.content.attach_article_category(article.id, cat.id).await.unwrap());
    let cats = svc.content.categories_of_article(article.id).await.unwrap();
    assert_eq!(cats.len(), 1);
}

#[tokio::test]
async fn article_category_link_is_traversable_from_both_sides() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let cat = category(&svc, "Alumni News").await;
    let mut new = new_article("Linked", author.id);
    new.category_ids = vec![cat.id];
    let article = svc.content.create_article(new).await.unwrap();

    let from_article = svc.related_ids(EntityKind::Article, article.id, "categories").await.unwrap();
    assert_eq!(from_article, vec![cat.id]);
    let from_category = svc.related_ids(EntityKind::Category, cat.id, "articles").await.unwrap();
    assert_eq!(from_category, vec![article.id]);
}

#[tokio::test]
async fn related_ids_distinguishes_absent_owner_from_empty_relation() {
    let svc = service();
    let user = alumni_user(&svc, "solo@example.org").await;
    let articles = svc.related_ids(EntityKind::User, user.id, "articles").await.unwrap();
    assert!(articles.is_empty());

    let err = svc.related_ids(EntityKind::User, 404, "articles").await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound { entity: "users", id: 404 }));

    let err = svc.related_ids(EntityKind::User, user.id, "widgets").await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn comment_reply_chain_traverses_one_level_at_a_time() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let article = svc.content.create_article(new_article("Thread", author.id)).await.unwrap();
    let target = CommentTarget::Article(article.id);

    let a = svc
        .content
        .create_comment(NewComment {
            content: "first".to_string(),
            author_id: author.id,
            target: Some(target),
            parent_id: None,
        })
        .await
        .unwrap();
    let b = svc
        .content
        .create_comment(NewComment {
            content: "reply".to_string(),
            author_id: author.id,
            target: None,
            parent_id: Some(a.id),
        })
        .await
        .unwrap();
    // Reply inherits the parent's target.
    assert_eq!(b.target, Some(target));
    let c = svc
        .content
        .create_comment(NewComment {
            content: "reply to reply".to_string(),
            author_id: author.id,
            target: None,
            parent_id: Some(b.id),
        })
        .await
        .unwrap();

    let replies_a = svc.content.replies(a.id).await.unwrap();
    assert_eq!(replies_a.len(), 1);
    assert_eq!(replies_a[0].id, b.id);
    let replies_b = svc.content.replies(b.id).await.unwrap();
    assert_eq!(replies_b.len(), 1);
    assert_eq!(replies_b[0].id, c.id);
    assert!(svc.content.replies(c.id).await.unwrap().is_empty());

    // All three hang off the article.
    let all = svc.content.comments_for(target).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn reply_with_mismatched_target_is_rejected() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let first = svc.content.create_article(new_article("One", author.id)).await.unwrap();
    let second = svc.content.create_article(new_article("Two", author.id)).await.unwrap();

    let parent = svc
        .content
        .create_comment(NewComment {
            content: "on the first".to_string(),
            author_id: author.id,
            target: Some(CommentTarget::Article(first.id)),
            parent_id: None,
        })
        .await
        .unwrap();
    let err = svc
        .content
        .create_comment(NewComment {
            content: "on the second?".to_string(),
            author_id: author.id,
            target: Some(CommentTarget::Article(second.id)),
            parent_id: Some(parent.id),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn application_is_reachable_from_scholarship_and_user() {
    let svc = service();
    let user = alumni_user(&svc, "applicant@example.org").await;
    let scholarship = svc.scholarships.create_scholarship(new_scholarship("Merit")).await.unwrap();
    let application = svc
        .scholarships
        .apply(NewScholarshipApplication {
            scholarship_id: scholarship.id,
            user_id: user.id,
            essay: Some("essay".to_string()),
        })
        .await
        .unwrap();

    let via_scholarship = svc.scholarships.applications_of(scholarship.id).await.unwrap();
    assert_eq!(via_scholarship.len(), 1);
    assert_eq!(via_scholarship[0].id, application.id);
    let via_user = svc.scholarships.applications_by_user(user.id).await.unwrap();
    assert_eq!(via_user.len(), 1);

    let ids = svc
        .related_ids(EntityKind::Scholarship, scholarship.id, "applications")
        .await
        .unwrap();
    assert_eq!(ids, vec![application.id]);
}

#[tokio::test]
async fn duplicate_event_registration_is_rejected() {
    let svc = service();
    let organizer = admin_user(&svc, "admin@example.org").await;
    let attendee = alumni_user(&svc, "alum@example.org").await;
    let event = svc.events.create_event(new_event("Gala", organizer.id)).await.unwrap();

    svc.events
        .register(NewEventRegistration { event_id: event.id, user_id: attendee.id, notes: None })
        .await
        .unwrap();
    let err = svc
        .events
        .register(NewEventRegistration { event_id: event.id, user_id: attendee.id, notes: None })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::UniqueViolation(_)));
}

#[tokio::test]
async fn full_event_rejects_further_registrations() {
    let svc = service();
    let organizer = admin_user(&svc, "admin@example.org").await;
    let mut new = new_event("Workshop", organizer.id);
    new.capacity = Some(1);
    let event = svc.events.create_event(new).await.unwrap();

    let first = alumni_user(&svc, "first@example.org").await;
    let second = alumni_user(&svc, "second@example.org").await;
    svc.events
        .register(NewEventRegistration { event_id: event.id, user_id: first.id, notes: None })
        .await
        .unwrap();
    let err = svc
        .events
        .register(NewEventRegistration { event_id: event.id, user_id: second.id, notes: None })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn category_reparenting_cannot_form_a_cycle() {
    let svc = service();
    let root = category(&svc, "Root").await;
    let child = svc
        .taxonomy
        .create_category(NewCategory {
            name: "Child".to_string(),
            slug: None,
            description: None,
            parent_id: Some(root.id),
        })
        .await
        .unwrap();

    let patch = CategoryPatch { parent_id: Some(Some(child.id)), ..Default::default() };
    let err = svc.taxonomy.update_category(root.id, patch).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));

    let ancestors = svc.taxonomy.ancestors(child.id).await.unwrap();
    assert_eq!(ancestors.len(), 1);
    assert_eq!(ancestors[0].id, root.id);
}
