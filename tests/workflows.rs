//! Multi-step lifecycles: review pipelines, verification, resets.

mod common;

use alumni_core::domain::*;
use alumni_core::ModelError;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn application_review_follows_the_transition_table() {
    let svc = service();
    let user = alumni_user(&svc, "applicant@example.org").await;
    let scholarship = svc.scholarships.create_scholarship(new_scholarship("Merit")).await.unwrap();
    let application = svc
        .scholarships
        .apply(NewScholarshipApplication {
            scholarship_id: scholarship.id,
            user_id: user.id,
            essay: None,
        })
        .await
        .unwrap();
    assert_eq!(application.status, ApplicationStatus::Submitted);

    // Acceptance straight from submission skips review.
    let err = svc
        .scholarships
        .review(application.id, ApplicationStatus::Accepted, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::InvalidTransition { from: "submitted", to: "accepted" }
    ));

    svc.scholarships
        .review(application.id, ApplicationStatus::UnderReview, None)
        .await
        .unwrap();
    let accepted = svc
        .scholarships
        .review(application.id, ApplicationStatus::Accepted, Some("strong essay".to_string()))
        .await
        .unwrap();
    assert_eq!(accepted.status, ApplicationStatus::Accepted);
    assert_eq!(accepted.review_notes.as_deref(), Some("strong essay"));

    // Decisions are terminal.
    let err = svc
        .scholarships
        .review(application.id, ApplicationStatus::Rejected, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidTransition { .. }));
}

#[tokio::test]
async fn closed_scholarship_rejects_applications() {
    let svc = service();
    let user = alumni_user(&svc, "late@example.org").await;
    let scholarship = svc.scholarships.create_scholarship(new_scholarship("Merit")).await.unwrap();
    svc.scholarships
        .update_scholarship(
            scholarship.id,
            ScholarshipPatch { status: Some(ScholarshipStatus::Closed), ..Default::default() },
        )
        .await
        .unwrap();

    let err = svc
        .scholarships
        .apply(NewScholarshipApplication {
            scholarship_id: scholarship.id,
            user_id: user.id,
            essay: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn verifying_entry_bumps_program_total_exactly_once() {
    let svc = service();
    let admin = admin_user(&svc, "admin@example.org").await;
    let program = svc.donations.create_program(new_program("Lab Fund")).await.unwrap();
    assert_eq!(program.current_amount_cents, 0);

    let entry = svc
        .donations
        .record_manual_entry(NewManualDonationEntry {
            program_id: program.id,
            account_id: None,
            donor_name: "Citra".to_string(),
            amount_cents: 75_000_00,
            donated_on: chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            note: Some("transfer".to_string()),
        })
        .await
        .unwrap();
    assert!(!entry.is_verified);

    let verified = svc.donations.verify_manual_entry(entry.id, admin.id).await.unwrap();
    assert_eq!(verified.verified_by, Some(admin.id));
    assert!(verified.verified_at.is_some());
    let program = svc.donations.get_program(program.id).await.unwrap();
    assert_eq!(program.current_amount_cents, 75_000_00);

    // A second verification neither double-counts nor succeeds.
    let err = svc.donations.verify_manual_entry(entry.id, admin.id).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    let program = svc.donations.get_program(program.id).await.unwrap();
    assert_eq!(program.current_amount_cents, 75_000_00);
}

#[tokio::test]
async fn racing_verifications_settle_to_one_winner() {
    let svc = service();
    let admin = admin_user(&svc, "admin@example.org").await;
    let other = admin_user(&svc, "second-admin@example.org").await;
    let program = svc.donations.create_program(new_program("Bench Fund")).await.unwrap();
    let entry = svc
        .donations
        .record_manual_entry(NewManualDonationEntry {
            program_id: program.id,
            account_id: None,
            donor_name: "Fajar".to_string(),
            amount_cents: 30_000_00,
            donated_on: chrono::NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
            note: None,
        })
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        svc.donations.verify_manual_entry(entry.id, admin.id),
        svc.donations.verify_manual_entry(entry.id, other.id),
    );
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let loser = a.err().or(b.err());
    assert!(matches!(loser, Some(ModelError::Validation(_))));

    // The amount was counted exactly once.
    let program = svc.donations.get_program(program.id).await.unwrap();
    assert_eq!(program.current_amount_cents, 30_000_00);
    let entry = svc.donations.get_manual_entry(entry.id).await.unwrap();
    assert!(entry.is_verified);
}

#[tokio::test]
async fn non_anonymous_donor_needs_an_identity() {
    let svc = service();
    let program = svc.donations.create_program(new_program("Roof Fund")).await.unwrap();

    let err = svc
        .donations
        .register_donor(NewDonorRegistration {
            program_id: program.id,
            user_id: None,
            donor_name: None,
            amount_cents: 10_000_00,
            is_anonymous: false,
            message: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));

    // Anonymous works without one.
    let pledge = svc
        .donations
        .register_donor(NewDonorRegistration {
            program_id: program.id,
            user_id: None,
            donor_name: None,
            amount_cents: 10_000_00,
            is_anonymous: true,
            message: None,
        })
        .await
        .unwrap();
    assert!(pledge.is_anonymous);
}

#[tokio::test]
async fn password_reset_consumes_the_token() {
    let svc = service();
    let user = alumni_user(&svc, "forgetful@example.org").await;

    let token = svc.accounts.issue_reset_token(user.id).await.unwrap();
    svc.accounts
        .reset_password(user.id, token, "$argon2id$new".to_string())
        .await
        .unwrap();
    let user_after = svc.accounts.get_user(user.id).await.unwrap();
    assert_eq!(user_after.password_hash, "$argon2id$new");
    assert_eq!(user_after.reset_token, None);

    // Spent token no longer works.
    let err = svc
        .accounts
        .reset_password(user.id, token, "$argon2id$again".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn wrong_reset_token_is_rejected() {
    let svc = service();
    let user = alumni_user(&svc, "careful@example.org").await;
    svc.accounts.issue_reset_token(user.id).await.unwrap();

    let err = svc
        .accounts
        .reset_password(user.id, Uuid::new_v4(), "$argon2id$new".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn closed_topic_rejects_posts_and_comments_touch_activity() {
    let svc = service();
    let author = alumni_user(&svc, "poster@example.org").await;
    let cat = category(&svc, "General").await;
    let topic = svc
        .forum
        .create_topic(NewForumTopic {
            title: "Open thread".to_string(),
            content: "discuss".to_string(),
            category_id: cat.id,
            author_id: author.id,
        })
        .await
        .unwrap();
    let before = topic.last_activity_at;

    svc.content
        .create_comment(NewComment {
            content: "bump".to_string(),
            author_id: author.id,
            target: Some(CommentTarget::ForumTopic(topic.id)),
            parent_id: None,
        })
        .await
        .unwrap();
    let topic_after = svc.forum.get_topic(topic.id).await.unwrap();
    assert!(topic_after.last_activity_at >= before);

    svc.forum.close_topic(topic.id).await.unwrap();
    let err = svc
        .forum
        .create_post(NewForumPost {
            topic_id: topic.id,
            author_id: author.id,
            content: "too late".to_string(),
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn forum_reply_must_stay_in_its_topic() {
    let svc = service();
    let author = alumni_user(&svc, "poster@example.org").await;
    let cat = category(&svc, "General").await;
    let make_topic = |title: &str| NewForumTopic {
        title: title.to_string(),
        content: "body".to_string(),
        category_id: cat.id,
        author_id: author.id,
    };
    let first = svc.forum.create_topic(make_topic("First")).await.unwrap();
    let second = svc.forum.create_topic(make_topic("Second")).await.unwrap();

    let post = svc
        .forum
        .create_post(NewForumPost {
            topic_id: first.id,
            author_id: author.id,
            content: "root".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();
    let err = svc
        .forum
        .create_post(NewForumPost {
            topic_id: second.id,
            author_id: author.id,
            content: "cross-thread reply".to_string(),
            parent_id: Some(post.id),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn attendance_can_be_updated_after_registration() {
    let svc = service();
    let organizer = admin_user(&svc, "admin@example.org").await;
    let attendee = alumni_user(&svc, "alum@example.org").await;
    let event = svc.events.create_event(new_event("Homecoming", organizer.id)).await.unwrap();
    let registration = svc
        .events
        .register(NewEventRegistration {
            event_id: event.id,
            user_id: attendee.id,
            notes: Some("vegetarian".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(registration.attendance_status, AttendanceStatus::Registered);

    let updated = svc
        .events
        .set_attendance(registration.id, AttendanceStatus::Attended)
        .await
        .unwrap();
    assert_eq!(updated.attendance_status, AttendanceStatus::Attended);
    let attendees = svc.events.attendees(event.id).await.unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0].id, attendee.id);
}

#[tokio::test]
async fn event_schedule_is_validated_on_create_and_update() {
    let svc = service();
    let organizer = admin_user(&svc, "admin@example.org").await;
    let mut new = new_event("Backwards", organizer.id);
    new.ends_at = Some(new.starts_at - chrono::Duration::hours(1));
    let err = svc.events.create_event(new).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));

    let event = svc.events.create_event(new_event("Fine", organizer.id)).await.unwrap();
    let patch = EventPatch {
        registration_deadline: Some(event.starts_at + chrono::Duration::days(1)),
        ..Default::default()
    };
    let err = svc.events.update_event(event.id, patch).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}
