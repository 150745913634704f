//! Delete walks: cascade, restrict, and nullify per the declared graph.

mod common;

use alumni_core::domain::*;
use alumni_core::graph::EntityKind;
use alumni_core::ModelError;

use common::*;

#[tokio::test]
async fn deleting_user_cascades_profile_but_not_content() {
    let svc = service();
    let user = alumni_user(&svc, "alum@example.org").await;
    let profile = svc
        .accounts
        .create_profile(NewProfile {
            user_id: user.id,
            full_name: "Ayu Lestari".to_string(),
            phone: None,
            address: None,
            entry_year: None,
            graduation_year: None,
            gpa: None,
            thesis_title: None,
            current_employer: None,
            job_title: None,
            profile_picture: None,
            bio: None,
        })
        .await
        .unwrap();
    let article = svc.content.create_article(new_article("Mine", user.id)).await.unwrap();

    // Authored content blocks the delete.
    let err = svc.accounts.delete_user(user.id).await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::RestrictedDelete { entity: "users", dependent: "articles", .. }
    ));
    assert!(svc.accounts.get_user(user.id).await.is_ok());

    // With the article gone the delete proceeds and takes the profile.
    svc.content.delete_article(article.id).await.unwrap();
    svc.accounts.delete_user(user.id).await.unwrap();
    assert!(matches!(
        svc.accounts.get_profile(profile.id).await.unwrap_err(),
        ModelError::NotFound { entity: "profiles", .. }
    ));
}

#[tokio::test]
async fn category_with_children_or_topics_is_protected() {
    let svc = service();
    let root = category(&svc, "Root").await;
    svc.taxonomy
        .create_category(NewCategory {
            name: "Child".to_string(),
            slug: None,
            description: None,
            parent_id: Some(root.id),
        })
        .await
        .unwrap();

    let err = svc.taxonomy.delete_category(root.id).await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::RestrictedDelete { entity: "categories", dependent: "categories", .. }
    ));
}

#[tokio::test]
async fn deleting_article_cascades_comments_and_detaches_galleries() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let article = svc.content.create_article(new_article("Doomed", author.id)).await.unwrap();
    let comment = svc
        .content
        .create_comment(NewComment {
            content: "so long".to_string(),
            author_id: author.id,
            target: Some(CommentTarget::Article(article.id)),
            parent_id: None,
        })
        .await
        .unwrap();
    let reply = svc
        .content
        .create_comment(NewComment {
            content: "farewell".to_string(),
            author_id: author.id,
            target: None,
            parent_id: Some(comment.id),
        })
        .await
        .unwrap();
    let gallery = svc
        .galleries
        .create_gallery(NewGallery {
            title: "Cover shot".to_string(),
            media_kind: MediaKind::Image,
            media_path: "uploads/cover.jpg".to_string(),
            caption: None,
            uploader_id: author.id,
            target: Some(GalleryTarget::Article(article.id)),
            is_published: true,
            tag_ids: Vec::new(),
        })
        .await
        .unwrap();

    svc.content.delete_article(article.id).await.unwrap();

    // The whole comment chain went with it.
    assert!(svc.content.get_comment(comment.id).await.is_err());
    assert!(svc.content.get_comment(reply.id).await.is_err());
    // The gallery survives, detached.
    let gallery = svc.galleries.get_gallery(gallery.id).await.unwrap();
    assert_eq!(gallery.target, None);
}

#[tokio::test]
async fn deleting_event_cascades_registrations() {
    let svc = service();
    let organizer = admin_user(&svc, "admin@example.org").await;
    let attendee = alumni_user(&svc, "alum@example.org").await;
    let event = svc.events.create_event(new_event("Gala", organizer.id)).await.unwrap();
    let registration = svc
        .events
        .register(NewEventRegistration { event_id: event.id, user_id: attendee.id, notes: None })
        .await
        .unwrap();

    svc.events.delete_event(event.id).await.unwrap();
    assert!(svc.events.get_registration(registration.id).await.is_err());
    // The attendee is untouched and free to be deleted now.
    svc.accounts.delete_user(attendee.id).await.unwrap();
}

#[tokio::test]
async fn deleting_tag_drops_links_but_keeps_content() {
    let svc = service();
    let author = alumni_user(&svc, "writer@example.org").await;
    let t = tag(&svc, "reunion").await;
    let mut new = new_article("Tagged", author.id);
    new.tag_ids = vec![t.id];
    let article = svc.content.create_article(new).await.unwrap();

    svc.taxonomy.delete_tag(t.id).await.unwrap();
    assert!(svc.content.get_article(article.id).await.is_ok());
    assert!(svc.content.tags_of_article(article.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn program_with_financial_records_cannot_be_deleted() {
    let svc = service();
    let program = svc.donations.create_program(new_program("Build the Library")).await.unwrap();
    svc.donations
        .record_manual_entry(NewManualDonationEntry {
            program_id: program.id,
            account_id: None,
            donor_name: "Anonymous Benefactor".to_string(),
            amount_cents: 250_000_00,
            donated_on: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            note: None,
        })
        .await
        .unwrap();

    let err = svc.donations.delete_program(program.id).await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::RestrictedDelete {
            entity: "donation_programs",
            dependent: "manual_donation_entries",
            ..
        }
    ));
}

#[tokio::test]
async fn verified_entry_cannot_be_deleted_and_total_stands() {
    let svc = service();
    let admin = admin_user(&svc, "admin@example.org").await;
    let program = svc.donations.create_program(new_program("Chapel Fund")).await.unwrap();
    let verified = svc
        .donations
        .record_manual_entry(NewManualDonationEntry {
            program_id: program.id,
            account_id: None,
            donor_name: "Dewi".to_string(),
            amount_cents: 50_000_00,
            donated_on: chrono::NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            note: None,
        })
        .await
        .unwrap();
    let pending = svc
        .donations
        .record_manual_entry(NewManualDonationEntry {
            program_id: program.id,
            account_id: None,
            donor_name: "Eko".to_string(),
            amount_cents: 20_000_00,
            donated_on: chrono::NaiveDate::from_ymd_opt(2025, 5, 11).unwrap(),
            note: None,
        })
        .await
        .unwrap();
    svc.donations.verify_manual_entry(verified.id, admin.id).await.unwrap();

    // The verified entry backs the running total and stays put.
    let err = svc.donations.delete_manual_entry(verified.id).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    assert!(svc.donations.get_manual_entry(verified.id).await.is_ok());
    let program = svc.donations.get_program(program.id).await.unwrap();
    assert_eq!(program.current_amount_cents, 50_000_00);

    // An unverified entry is still removable.
    svc.donations.delete_manual_entry(pending.id).await.unwrap();
    assert!(svc.donations.get_manual_entry(pending.id).await.is_err());
}

#[tokio::test]
async fn deleting_qris_account_nullifies_references() {
    let svc = service();
    let account = svc
        .donations
        .create_qris_account(NewQrisAccount {
            bank_name: "Bank Nasional".to_string(),
            merchant_name: "Alumni Assoc".to_string(),
            account_number: "0123456789".to_string(),
            qr_image_path: None,
        })
        .await
        .unwrap();
    let mut new = new_program("Scholarship Fund");
    new.qris_account_id = Some(account.id);
    let program = svc.donations.create_program(new).await.unwrap();

    svc.donations.delete_qris_account(account.id).await.unwrap();
    let program = svc.donations.get_program(program.id).await.unwrap();
    assert_eq!(program.qris_account_id, None);
}

#[tokio::test]
async fn deleting_verifier_keeps_entries_but_clears_attribution() {
    let svc = service();
    let admin = admin_user(&svc, "admin@example.org").await;
    let program = svc.donations.create_program(new_program("Gym Fund")).await.unwrap();
    let entry = svc
        .donations
        .record_manual_entry(NewManualDonationEntry {
            program_id: program.id,
            account_id: None,
            donor_name: "Budi".to_string(),
            amount_cents: 100_000_00,
            donated_on: chrono::NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            note: None,
        })
        .await
        .unwrap();
    svc.donations.verify_manual_entry(entry.id, admin.id).await.unwrap();

    svc.accounts.delete_user(admin.id).await.unwrap();
    let entry = svc.donations.get_manual_entry(entry.id).await.unwrap();
    assert!(entry.is_verified);
    assert_eq!(entry.verified_by, None);
}

#[tokio::test]
async fn scholarship_with_history_is_protected() {
    let svc = service();
    let user = alumni_user(&svc, "laureate@example.org").await;
    let scholarship = svc.scholarships.create_scholarship(new_scholarship("Merit")).await.unwrap();
    svc.scholarships
        .add_recipient(NewScholarshipRecipient {
            scholarship_id: scholarship.id,
            user_id: user.id,
            award_year: 2024,
            batch: None,
            major: None,
            citation: None,
        })
        .await
        .unwrap();

    let err = svc.scholarships.delete_scholarship(scholarship.id).await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::RestrictedDelete {
            entity: "scholarships",
            dependent: "scholarship_recipients",
            ..
        }
    ));
}

#[tokio::test]
async fn deleting_topic_takes_posts_and_attached_comments() {
    let svc = service();
    let author = alumni_user(&svc, "poster@example.org").await;
    let cat = category(&svc, "General").await;
    let topic = svc
        .forum
        .create_topic(NewForumTopic {
            title: "Welcome".to_string(),
            content: "say hi".to_string(),
            category_id: cat.id,
            author_id: author.id,
        })
        .await
        .unwrap();
    let post = svc
        .forum
        .create_post(NewForumPost {
            topic_id: topic.id,
            author_id: author.id,
            content: "hi".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();
    let comment = svc
        .content
        .create_comment(NewComment {
            content: "nice thread".to_string(),
            author_id: author.id,
            target: Some(CommentTarget::ForumTopic(topic.id)),
            parent_id: None,
        })
        .await
        .unwrap();

    svc.forum.delete_topic(topic.id).await.unwrap();
    assert!(svc.forum.get_post(post.id).await.is_err());
    assert!(svc.content.get_comment(comment.id).await.is_err());
    // The category is now free of topics.
    let topics = svc.related_ids(EntityKind::Category, cat.id, "forum_topics").await.unwrap();
    assert!(topics.is_empty());
}
