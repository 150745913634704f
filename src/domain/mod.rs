//! Pure domain value types with no store dependencies.
//!
//! Each entity carries an integer surrogate id and server-assigned
//! `created_at` / `updated_at` timestamps. Draft (`NewXxx`) and patch
//! (`XxxPatch`) types are the write-side input contracts; the lifecycle
//! services in [`crate::service`] own validation and timestamping.

pub mod account;
pub mod content;
pub mod donation;
pub mod event;
pub mod forum;
pub mod gallery;
pub mod scholarship;
pub mod slug;
pub mod taxonomy;

pub use account::{NewProfile, NewUser, Profile, ProfilePatch, User, UserPatch, UserRole};
pub use content::{
    Article, ArticlePatch, Comment, CommentTarget, NewArticle, NewComment, NewNews, News,
    NewsPatch,
};
pub use donation::{
    DonationProgram, DonationProgramPatch, DonationReport, DonorRegistration, ManualDonationEntry,
    NewDonationProgram, NewDonationReport, NewDonorRegistration, NewManualDonationEntry,
    NewQrisAccount, ProgramStatus, QrisAccount, QrisAccountPatch,
};
pub use event::{
    AttendanceStatus, Event, EventPatch, EventRegistration, NewEvent, NewEventRegistration,
};
pub use forum::{
    ForumPost, ForumPostPatch, ForumTopic, ForumTopicPatch, NewForumPost, NewForumTopic,
};
pub use gallery::{Gallery, GalleryPatch, GalleryTarget, MediaKind, NewGallery};
pub use scholarship::{
    ApplicationStatus, NewScholarship, NewScholarshipApplication, NewScholarshipRecipient,
    Scholarship, ScholarshipApplication, ScholarshipPatch, ScholarshipRecipient,
    ScholarshipStatus,
};
pub use taxonomy::{Category, CategoryPatch, NewCategory, NewTag, Tag};
