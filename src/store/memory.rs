//! In-memory `ModelStore` implementation.
//!
//! One `RwLock` guards the whole dataset, so every trait call (including
//! the composite create-with-links operations) is atomic. Used by the
//! test suite and embeddable wherever a throwaway store is useful.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::*;
use crate::error::Result;
use crate::graph::{EntityKind, JoinSide, JoinTable};
use crate::store::ModelStore;

/// Row behaviors the generic-by-kind operations need. Foreign keys are
/// addressed by their schema column name; unknown names resolve to None
/// (the graph only hands us declared columns).
trait Row: Clone {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn fk(&self, name: &str) -> Option<i64>;
    fn set_fk(&mut self, _name: &str, _value: Option<i64>) {}
    fn slug(&self) -> Option<&str> {
        None
    }
    fn target(&self) -> Option<(EntityKind, i64)> {
        None
    }
    fn clear_target(&mut self) {}
}

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), next_id: 1 }
    }
}

impl<T: Row> Table<T> {
    fn insert(&mut self, row: &T) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        let mut stored = row.clone();
        stored.set_id(id);
        self.rows.insert(id, stored);
        id
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn update(&mut self, row: &T) -> bool {
        if self.rows.contains_key(&row.id()) {
            self.rows.insert(row.id(), row.clone());
            true
        } else {
            false
        }
    }

    fn delete(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn exists(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn ids(&self) -> Vec<i64> {
        self.rows.keys().copied().collect()
    }

    fn child_ids(&self, fk: &str, parent_id: i64) -> Vec<i64> {
        self.rows
            .values()
            .filter(|r| r.fk(fk) == Some(parent_id))
            .map(Row::id)
            .collect()
    }

    fn nullify_fk(&mut self, fk: &str, parent_id: i64) -> u64 {
        let mut touched = 0;
        for row in self.rows.values_mut() {
            if row.fk(fk) == Some(parent_id) {
                row.set_fk(fk, None);
                touched += 1;
            }
        }
        touched
    }

    fn target_child_ids(&self, target_kind: EntityKind, target_id: i64) -> Vec<i64> {
        self.rows
            .values()
            .filter(|r| r.target() == Some((target_kind, target_id)))
            .map(Row::id)
            .collect()
    }

    fn clear_targets(&mut self, target_kind: EntityKind, target_id: i64) -> u64 {
        let mut touched = 0;
        for row in self.rows.values_mut() {
            if row.target() == Some((target_kind, target_id)) {
                row.clear_target();
                touched += 1;
            }
        }
        touched
    }

    fn slug_in_use(&self, slug: &str, exclude: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|r| r.slug() == Some(slug) && Some(r.id()) != exclude)
    }
}

// ── Row impls ─────────────────────────────────────────────────

impl Row for User {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, _name: &str) -> Option<i64> {
        None
    }
}

impl Row for Profile {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "user_id" => Some(self.user_id),
            _ => None,
        }
    }
}

impl Row for Category {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "parent_id" => self.parent_id,
            _ => None,
        }
    }
    fn set_fk(&mut self, name: &str, value: Option<i64>) {
        if name == "parent_id" {
            self.parent_id = value;
        }
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for Tag {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, _name: &str) -> Option<i64> {
        None
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for Article {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "author_id" => Some(self.author_id),
            _ => None,
        }
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for News {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "author_id" => Some(self.author_id),
            _ => None,
        }
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for Comment {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "author_id" => Some(self.author_id),
            "parent_id" => self.parent_id,
            _ => None,
        }
    }
    fn set_fk(&mut self, name: &str, value: Option<i64>) {
        if name == "parent_id" {
            self.parent_id = value;
        }
    }
    fn target(&self) -> Option<(EntityKind, i64)> {
        self.target.map(|t| (t.kind(), t.id()))
    }
    fn clear_target(&mut self) {
        self.target = None;
    }
}

impl Row for ForumTopic {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "category_id" => Some(self.category_id),
            "author_id" => Some(self.author_id),
            _ => None,
        }
    }
}

impl Row for ForumPost {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "topic_id" => Some(self.topic_id),
            "author_id" => Some(self.author_id),
            "parent_id" => self.parent_id,
            _ => None,
        }
    }
    fn set_fk(&mut self, name: &str, value: Option<i64>) {
        if name == "parent_id" {
            self.parent_id = value;
        }
    }
}

impl Row for Event {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "organizer_id" => Some(self.organizer_id),
            _ => None,
        }
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for EventRegistration {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "event_id" => Some(self.event_id),
            "user_id" => Some(self.user_id),
            _ => None,
        }
    }
}

impl Row for Gallery {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "uploader_id" => Some(self.uploader_id),
            _ => None,
        }
    }
    fn target(&self) -> Option<(EntityKind, i64)> {
        self.target.map(|t| (t.kind(), t.id()))
    }
    fn clear_target(&mut self) {
        self.target = None;
    }
}

impl Row for Scholarship {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, _name: &str) -> Option<i64> {
        None
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for ScholarshipRecipient {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "scholarship_id" => Some(self.scholarship_id),
            "user_id" => Some(self.user_id),
            _ => None,
        }
    }
}

impl Row for ScholarshipApplication {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "scholarship_id" => Some(self.scholarship_id),
            "user_id" => Some(self.user_id),
            _ => None,
        }
    }
}

impl Row for QrisAccount {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, _name: &str) -> Option<i64> {
        None
    }
}

impl Row for DonationProgram {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "qris_account_id" => self.qris_account_id,
            _ => None,
        }
    }
    fn set_fk(&mut self, name: &str, value: Option<i64>) {
        if name == "qris_account_id" {
            self.qris_account_id = value;
        }
    }
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl Row for ManualDonationEntry {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "program_id" => Some(self.program_id),
            "account_id" => self.account_id,
            "verified_by" => self.verified_by,
            _ => None,
        }
    }
    fn set_fk(&mut self, name: &str, value: Option<i64>) {
        match name {
            "account_id" => self.account_id = value,
            "verified_by" => self.verified_by = value,
            _ => {}
        }
    }
}

impl Row for DonorRegistration {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "program_id" => Some(self.program_id),
            "user_id" => self.user_id,
            _ => None,
        }
    }
    fn set_fk(&mut self, name: &str, value: Option<i64>) {
        if name == "user_id" {
            self.user_id = value;
        }
    }
}

impl Row for DonationReport {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn fk(&self, name: &str) -> Option<i64> {
        match name {
            "program_id" => Some(self.program_id),
            _ => None,
        }
    }
}

// ── the store ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Inner {
    users: Table<User>,
    profiles: Table<Profile>,
    categories: Table<Category>,
    tags: Table<Tag>,
    articles: Table<Article>,
    news: Table<News>,
    comments: Table<Comment>,
    forum_topics: Table<ForumTopic>,
    forum_posts: Table<ForumPost>,
    events: Table<Event>,
    event_registrations: Table<EventRegistration>,
    galleries: Table<Gallery>,
    scholarships: Table<Scholarship>,
    scholarship_recipients: Table<ScholarshipRecipient>,
    scholarship_applications: Table<ScholarshipApplication>,
    qris_accounts: Table<QrisAccount>,
    donation_programs: Table<DonationProgram>,
    manual_donation_entries: Table<ManualDonationEntry>,
    donor_registrations: Table<DonorRegistration>,
    donation_reports: Table<DonationReport>,
    links: BTreeMap<&'static str, BTreeSet<(i64, i64)>>,
}

macro_rules! with_table {
    ($inner:expr, $kind:expr, $table:ident => $body:expr) => {
        match $kind {
            EntityKind::User => {
                let $table = &$inner.users;
                $body
            }
            EntityKind::Profile => {
                let $table = &$inner.profiles;
                $body
            }
            EntityKind::Category => {
                let $table = &$inner.categories;
                $body
            }
            EntityKind::Tag => {
                let $table = &$inner.tags;
                $body
            }
            EntityKind::Article => {
                let $table = &$inner.articles;
                $body
            }
            EntityKind::News => {
                let $table = &$inner.news;
                $body
            }
            EntityKind::Comment => {
                let $table = &$inner.comments;
                $body
            }
            EntityKind::ForumTopic => {
                let $table = &$inner.forum_topics;
                $body
            }
            EntityKind::ForumPost => {
                let $table = &$inner.forum_posts;
                $body
            }
            EntityKind::Event => {
                let $table = &$inner.events;
                $body
            }
            EntityKind::EventRegistration => {
                let $table = &$inner.event_registrations;
                $body
            }
            EntityKind::Gallery => {
                let $table = &$inner.galleries;
                $body
            }
            EntityKind::Scholarship => {
                let $table = &$inner.scholarships;
                $body
            }
            EntityKind::ScholarshipRecipient => {
                let $table = &$inner.scholarship_recipients;
                $body
            }
            EntityKind::ScholarshipApplication => {
                let $table = &$inner.scholarship_applications;
                $body
            }
            EntityKind::QrisAccount => {
                let $table = &$inner.qris_accounts;
                $body
            }
            EntityKind::DonationProgram => {
                let $table = &$inner.donation_programs;
                $body
            }
            EntityKind::ManualDonationEntry => {
                let $table = &$inner.manual_donation_entries;
                $body
            }
            EntityKind::DonorRegistration => {
                let $table = &$inner.donor_registrations;
                $body
            }
            EntityKind::DonationReport => {
                let $table = &$inner.donation_reports;
                $body
            }
        }
    };
}

macro_rules! with_table_mut {
    ($inner:expr, $kind:expr, $table:ident => $body:expr) => {
        match $kind {
            EntityKind::User => {
                let $table = &mut $inner.users;
                $body
            }
            EntityKind::Profile => {
                let $table = &mut $inner.profiles;
                $body
            }
            EntityKind::Category => {
                let $table = &mut $inner.categories;
                $body
            }
            EntityKind::Tag => {
                let $table = &mut $inner.tags;
                $body
            }
            EntityKind::Article => {
                let $table = &mut $inner.articles;
                $body
            }
            EntityKind::News => {
                let $table = &mut $inner.news;
                $body
            }
            EntityKind::Comment => {
                let $table = &mut $inner.comments;
                $body
            }
            EntityKind::ForumTopic => {
                let $table = &mut $inner.forum_topics;
                $body
            }
            EntityKind::ForumPost => {
                let $table = &mut $inner.forum_posts;
                $body
            }
            EntityKind::Event => {
                let $table = &mut $inner.events;
                $body
            }
            EntityKind::EventRegistration => {
                let $table = &mut $inner.event_registrations;
                $body
            }
            EntityKind::Gallery => {
                let $table = &mut $inner.galleries;
                $body
            }
            EntityKind::Scholarship => {
                let $table = &mut $inner.scholarships;
                $body
            }
            EntityKind::ScholarshipRecipient => {
                let $table = &mut $inner.scholarship_recipients;
                $body
            }
            EntityKind::ScholarshipApplication => {
                let $table = &mut $inner.scholarship_applications;
                $body
            }
            EntityKind::QrisAccount => {
                let $table = &mut $inner.qris_accounts;
                $body
            }
            EntityKind::DonationProgram => {
                let $table = &mut $inner.donation_programs;
                $body
            }
            EntityKind::ManualDonationEntry => {
                let $table = &mut $inner.manual_donation_entries;
                $body
            }
            EntityKind::DonorRegistration => {
                let $table = &mut $inner.donor_registrations;
                $body
            }
            EntityKind::DonationReport => {
                let $table = &mut $inner.donation_reports;
                $body
            }
        }
    };
}

/// In-memory store; cheap to create, one per test.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn link_set(&mut self, join: JoinTable) -> &mut BTreeSet<(i64, i64)> {
        self.links.entry(join.table()).or_default()
    }

    fn link_pairs(&self, join: JoinTable) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.links.get(join.table()).into_iter().flatten().copied()
    }
}

#[async_trait]
impl ModelStore for MemoryStore {
    async fn exists(&self, kind: EntityKind, id: i64) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(with_table!(inner, kind, t => t.exists(id)))
    }

    async fn delete_row(&self, kind: EntityKind, id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(with_table_mut!(inner, kind, t => t.delete(id)))
    }

    async fn child_ids(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<Vec<i64>> {
        let inner = self.inner.read().await;
        Ok(with_table!(inner, kind, t => t.child_ids(fk, parent_id)))
    }

    async fn count_children(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(with_table!(inner, kind, t => t.child_ids(fk, parent_id).len() as i64))
    }

    async fn nullify_fk(&self, kind: EntityKind, fk: &str, parent_id: i64) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(with_table_mut!(inner, kind, t => t.nullify_fk(fk, parent_id)))
    }

    async fn target_child_ids(
        &self,
        kind: EntityKind,
        target_kind: EntityKind,
        target_id: i64,
    ) -> Result<Vec<i64>> {
        let inner = self.inner.read().await;
        Ok(with_table!(inner, kind, t => t.target_child_ids(target_kind, target_id)))
    }

    async fn clear_targets(
        &self,
        kind: EntityKind,
        target_kind: EntityKind,
        target_id: i64,
    ) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(with_table_mut!(inner, kind, t => t.clear_targets(target_kind, target_id)))
    }

    async fn slug_in_use(
        &self,
        kind: EntityKind,
        slug: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(with_table!(inner, kind, t => t.slug_in_use(slug, exclude)))
    }

    async fn all_ids(&self, kind: EntityKind) -> Result<Vec<i64>> {
        let inner = self.inner.read().await;
        Ok(with_table!(inner, kind, t => t.ids()))
    }

    // ── join links ───────────────────────────────────────────

    async fn link(&self, join: JoinTable, left_id: i64, right_id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.link_set(join).insert((left_id, right_id)))
    }

    async fn unlink(&self, join: JoinTable, left_id: i64, right_id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.link_set(join).remove(&(left_id, right_id)))
    }

    async fn linked_ids(&self, join: JoinTable, side: JoinSide, id: i64) -> Result<Vec<i64>> {
        let inner = self.inner.read().await;
        let ids = inner
            .link_pairs(join)
            .filter_map(|(l, r)| match side {
                JoinSide::Left if l == id => Some(r),
                JoinSide::Right if r == id => Some(l),
                _ => None,
            })
            .collect();
        Ok(ids)
    }

    async fn drop_links(&self, join: JoinTable, side: JoinSide, id: i64) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let set = inner.link_set(join);
        let before = set.len();
        set.retain(|&(l, r)| match side {
            JoinSide::Left => l != id,
            JoinSide::Right => r != id,
        });
        Ok((before - set.len()) as u64)
    }

    // ── users & profiles ─────────────────────────────────────

    async fn insert_user(&self, user: &User) -> Result<i64> {
        Ok(self.inner.write().await.users.insert(user))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(id))
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        Ok(self.inner.write().await.users.update(user))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<i64> {
        Ok(self.inner.write().await.profiles.insert(profile))
    }

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        Ok(self.inner.read().await.profiles.get(id))
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool> {
        Ok(self.inner.write().await.profiles.update(profile))
    }

    async fn profile_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let inner = self.inner.read().await;
        Ok(inner
            .profiles
            .rows
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    // ── taxonomy ─────────────────────────────────────────────

    async fn insert_category(&self, category: &Category) -> Result<i64> {
        Ok(self.inner.write().await.categories.insert(category))
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.inner.read().await.categories.get(id))
    }

    async fn update_category(&self, category: &Category) -> Result<bool> {
        Ok(self.inner.write().await.categories.update(category))
    }

    async fn insert_tag(&self, tag: &Tag) -> Result<i64> {
        Ok(self.inner.write().await.tags.insert(tag))
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>> {
        Ok(self.inner.read().await.tags.get(id))
    }

    async fn update_tag(&self, tag: &Tag) -> Result<bool> {
        Ok(self.inner.write().await.tags.update(tag))
    }

    // ── content ──────────────────────────────────────────────

    async fn insert_article(
        &self,
        article: &Article,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let id = inner.articles.insert(article);
        for &category_id in category_ids {
            inner.link_set(JoinTable::ArticleCategories).insert((id, category_id));
        }
        for &tag_id in tag_ids {
            inner.link_set(JoinTable::ArticleTags).insert((id, tag_id));
        }
        Ok(id)
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        Ok(self.inner.read().await.articles.get(id))
    }

    async fn update_article(&self, article: &Article) -> Result<bool> {
        Ok(self.inner.write().await.articles.update(article))
    }

    async fn insert_news(
        &self,
        news: &News,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let id = inner.news.insert(news);
        for &category_id in category_ids {
            inner.link_set(JoinTable::NewsCategories).insert((id, category_id));
        }
        for &tag_id in tag_ids {
            inner.link_set(JoinTable::NewsTags).insert((id, tag_id));
        }
        Ok(id)
    }

    async fn get_news(&self, id: i64) -> Result<Option<News>> {
        Ok(self.inner.read().await.news.get(id))
    }

    async fn update_news(&self, news: &News) -> Result<bool> {
        Ok(self.inner.write().await.news.update(news))
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<i64> {
        Ok(self.inner.write().await.comments.insert(comment))
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.inner.read().await.comments.get(id))
    }

    async fn update_comment(&self, comment: &Comment) -> Result<bool> {
        Ok(self.inner.write().await.comments.update(comment))
    }

    // ── forum ────────────────────────────────────────────────

    async fn insert_forum_topic(&self, topic: &ForumTopic) -> Result<i64> {
        Ok(self.inner.write().await.forum_topics.insert(topic))
    }

    async fn get_forum_topic(&self, id: i64) -> Result<Option<ForumTopic>> {
        Ok(self.inner.read().await.forum_topics.get(id))
    }

    async fn update_forum_topic(&self, topic: &ForumTopic) -> Result<bool> {
        Ok(self.inner.write().await.forum_topics.update(topic))
    }

    async fn insert_forum_post(&self, post: &ForumPost) -> Result<i64> {
        Ok(self.inner.write().await.forum_posts.insert(post))
    }

    async fn get_forum_post(&self, id: i64) -> Result<Option<ForumPost>> {
        Ok(self.inner.read().await.forum_posts.get(id))
    }

    async fn update_forum_post(&self, post: &ForumPost) -> Result<bool> {
        Ok(self.inner.write().await.forum_posts.update(post))
    }

    // ── events ───────────────────────────────────────────────

    async fn insert_event(&self, event: &Event, category_ids: &[i64]) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let id = inner.events.insert(event);
        for &category_id in category_ids {
            inner.link_set(JoinTable::EventCategories).insert((id, category_id));
        }
        Ok(id)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.inner.read().await.events.get(id))
    }

    async fn update_event(&self, event: &Event) -> Result<bool> {
        Ok(self.inner.write().await.events.update(event))
    }

    async fn insert_registration(&self, registration: &EventRegistration) -> Result<i64> {
        Ok(self.inner.write().await.event_registrations.insert(registration))
    }

    async fn get_registration(&self, id: i64) -> Result<Option<EventRegistration>> {
        Ok(self.inner.read().await.event_registrations.get(id))
    }

    async fn update_registration(&self, registration: &EventRegistration) -> Result<bool> {
        Ok(self.inner.write().await.event_registrations.update(registration))
    }

    async fn registration_for(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<EventRegistration>> {
        let inner = self.inner.read().await;
        Ok(inner
            .event_registrations
            .rows
            .values()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    // ── galleries ────────────────────────────────────────────

    async fn insert_gallery(&self, gallery: &Gallery, tag_ids: &[i64]) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let id = inner.galleries.insert(gallery);
        for &tag_id in tag_ids {
            inner.link_set(JoinTable::GalleryTags).insert((id, tag_id));
        }
        Ok(id)
    }

    async fn get_gallery(&self, id: i64) -> Result<Option<Gallery>> {
        Ok(self.inner.read().await.galleries.get(id))
    }

    async fn update_gallery(&self, gallery: &Gallery) -> Result<bool> {
        Ok(self.inner.write().await.galleries.update(gallery))
    }

    // ── scholarships ─────────────────────────────────────────

    async fn insert_scholarship(&self, scholarship: &Scholarship) -> Result<i64> {
        Ok(self.inner.write().await.scholarships.insert(scholarship))
    }

    async fn get_scholarship(&self, id: i64) -> Result<Option<Scholarship>> {
        Ok(self.inner.read().await.scholarships.get(id))
    }

    async fn update_scholarship(&self, scholarship: &Scholarship) -> Result<bool> {
        Ok(self.inner.write().await.scholarships.update(scholarship))
    }

    async fn insert_recipient(&self, recipient: &ScholarshipRecipient) -> Result<i64> {
        Ok(self.inner.write().await.scholarship_recipients.insert(recipient))
    }

    async fn get_recipient(&self, id: i64) -> Result<Option<ScholarshipRecipient>> {
        Ok(self.inner.read().await.scholarship_recipients.get(id))
    }

    async fn update_recipient(&self, recipient: &ScholarshipRecipient) -> Result<bool> {
        Ok(self.inner.write().await.scholarship_recipients.update(recipient))
    }

    async fn insert_application(&self, application: &ScholarshipApplication) -> Result<i64> {
        Ok(self.inner.write().await.scholarship_applications.insert(application))
    }

    async fn get_application(&self, id: i64) -> Result<Option<ScholarshipApplication>> {
        Ok(self.inner.read().await.scholarship_applications.get(id))
    }

    async fn update_application(&self, application: &ScholarshipApplication) -> Result<bool> {
        Ok(self.inner.write().await.scholarship_applications.update(application))
    }

    // ── donations ────────────────────────────────────────────

    async fn insert_qris_account(&self, account: &QrisAccount) -> Result<i64> {
        Ok(self.inner.write().await.qris_accounts.insert(account))
    }

    async fn get_qris_account(&self, id: i64) -> Result<Option<QrisAccount>> {
        Ok(self.inner.read().await.qris_accounts.get(id))
    }

    async fn update_qris_account(&self, account: &QrisAccount) -> Result<bool> {
        Ok(self.inner.write().await.qris_accounts.update(account))
    }

    async fn insert_program(&self, program: &DonationProgram) -> Result<i64> {
        Ok(self.inner.write().await.donation_programs.insert(program))
    }

    async fn get_program(&self, id: i64) -> Result<Option<DonationProgram>> {
        Ok(self.inner.read().await.donation_programs.get(id))
    }

    async fn update_program(&self, program: &DonationProgram) -> Result<bool> {
        Ok(self.inner.write().await.donation_programs.update(program))
    }

    async fn insert_manual_entry(&self, entry: &ManualDonationEntry) -> Result<i64> {
        Ok(self.inner.write().await.manual_donation_entries.insert(entry))
    }

    async fn get_manual_entry(&self, id: i64) -> Result<Option<ManualDonationEntry>> {
        Ok(self.inner.read().await.manual_donation_entries.get(id))
    }

    async fn update_manual_entry(&self, entry: &ManualDonationEntry) -> Result<bool> {
        Ok(self.inner.write().await.manual_donation_entries.update(entry))
    }

    async fn verify_entry(
        &self,
        entry_id: i64,
        verifier_id: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<ManualDonationEntry>> {
        let mut inner = self.inner.write().await;
        let Some(mut entry) = inner.manual_donation_entries.get(entry_id) else {
            return Ok(None);
        };
        if entry.is_verified {
            return Ok(None);
        }
        entry.is_verified = true;
        entry.verified_by = Some(verifier_id);
        entry.verified_at = Some(verified_at);
        entry.updated_at = verified_at;
        inner.manual_donation_entries.update(&entry);
        if let Some(mut program) = inner.donation_programs.get(entry.program_id) {
            program.current_amount_cents += entry.amount_cents;
            program.updated_at = verified_at;
            inner.donation_programs.update(&program);
        }
        Ok(Some(entry))
    }

    async fn insert_donor_registration(&self, registration: &DonorRegistration) -> Result<i64> {
        Ok(self.inner.write().await.donor_registrations.insert(registration))
    }

    async fn get_donor_registration(&self, id: i64) -> Result<Option<DonorRegistration>> {
        Ok(self.inner.read().await.donor_registrations.get(id))
    }

    async fn update_donor_registration(&self, registration: &DonorRegistration) -> Result<bool> {
        Ok(self.inner.write().await.donor_registrations.update(registration))
    }

    async fn insert_report(&self, report: &DonationReport) -> Result<i64> {
        Ok(self.inner.write().await.donation_reports.insert(report))
    }

    async fn get_report(&self, id: i64) -> Result<Option<DonationReport>> {
        Ok(self.inner.read().await.donation_reports.get(id))
    }

    async fn update_report(&self, report: &DonationReport) -> Result<bool> {
        Ok(self.inner.write().await.donation_reports.update(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 0,
            email: "a@x.com".into(),
            password_hash: "h".into(),
            role: UserRole::Alumni,
            is_verified: false,
            is_active: true,
            reset_token: None,
            reset_token_expires_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.insert_user(&sample_user()).await.unwrap();
        let second = store.insert_user(&sample_user()).await.unwrap();
        assert_eq!((first, second), (1, 2));
        assert!(store.exists(EntityKind::User, 1).await.unwrap());
        assert!(!store.exists(EntityKind::User, 99).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_link_is_a_no_op() {
        let store = MemoryStore::new();
        assert!(store.link(JoinTable::ArticleTags, 1, 2).await.unwrap());
        assert!(!store.link(JoinTable::ArticleTags, 1, 2).await.unwrap());
        let tags = store
            .linked_ids(JoinTable::ArticleTags, JoinSide::Left, 1)
            .await
            .unwrap();
        assert_eq!(tags, vec![2]);
    }

    #[tokio::test]
    async fn drop_links_clears_one_side_only() {
        let store = MemoryStore::new();
        store.link(JoinTable::NewsTags, 1, 5).await.unwrap();
        store.link(JoinTable::NewsTags, 2, 5).await.unwrap();
        let dropped = store
            .drop_links(JoinTable::NewsTags, JoinSide::Left, 1)
            .await
            .unwrap();
        assert_eq!(dropped, 1);
        let remaining = store
            .linked_ids(JoinTable::NewsTags, JoinSide::Right, 5)
            .await
            .unwrap();
        assert_eq!(remaining, vec![2]);
    }
}
