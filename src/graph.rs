//! Statically-typed relationship graph.
//!
//! The graph is declared once, in a fixed initialization pass, rather
//! than assembled through a runtime registry: every relation names its
//! parent (`source`), child (`target`), foreign-key column, and the policy
//! applied to child rows when the parent is deleted. Services drive their
//! delete walks and traversals off this table instead of ad-hoc lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Discriminator for every entity table in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Profile,
    Category,
    Tag,
    Article,
    News,
    Comment,
    ForumTopic,
    ForumPost,
    Event,
    EventRegistration,
    Gallery,
    Scholarship,
    ScholarshipRecipient,
    ScholarshipApplication,
    QrisAccount,
    DonationProgram,
    ManualDonationEntry,
    DonorRegistration,
    DonationReport,
}

impl EntityKind {
    pub const ALL: [EntityKind; 20] = [
        Self::User,
        Self::Profile,
        Self::Category,
        Self::Tag,
        Self::Article,
        Self::News,
        Self::Comment,
        Self::ForumTopic,
        Self::ForumPost,
        Self::Event,
        Self::EventRegistration,
        Self::Gallery,
        Self::Scholarship,
        Self::ScholarshipRecipient,
        Self::ScholarshipApplication,
        Self::QrisAccount,
        Self::DonationProgram,
        Self::ManualDonationEntry,
        Self::DonorRegistration,
        Self::DonationReport,
    ];

    /// Table name; doubles as the stored `target_kind` discriminator for
    /// polymorphic attachments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Profile => "profiles",
            Self::Category => "categories",
            Self::Tag => "tags",
            Self::Article => "articles",
            Self::News => "news",
            Self::Comment => "comments",
            Self::ForumTopic => "forum_topics",
            Self::ForumPost => "forum_posts",
            Self::Event => "events",
            Self::EventRegistration => "event_registrations",
            Self::Gallery => "galleries",
            Self::Scholarship => "scholarships",
            Self::ScholarshipRecipient => "scholarship_recipients",
            Self::ScholarshipApplication => "scholarship_applications",
            Self::QrisAccount => "qris_accounts",
            Self::DonationProgram => "donation_programs",
            Self::ManualDonationEntry => "manual_donation_entries",
            Self::DonorRegistration => "donor_registrations",
            Self::DonationReport => "donation_reports",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

/// The five (plus event↔category) pure many-to-many join tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinTable {
    ArticleCategories,
    ArticleTags,
    NewsCategories,
    NewsTags,
    EventCategories,
    GalleryTags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

impl JoinTable {
    pub const ALL: [JoinTable; 6] = [
        Self::ArticleCategories,
        Self::ArticleTags,
        Self::NewsCategories,
        Self::NewsTags,
        Self::EventCategories,
        Self::GalleryTags,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Self::ArticleCategories => "article_categories",
            Self::ArticleTags => "article_tags",
            Self::NewsCategories => "news_categories",
            Self::NewsTags => "news_tags",
            Self::EventCategories => "event_categories",
            Self::GalleryTags => "gallery_tags",
        }
    }

    pub fn left(&self) -> (EntityKind, &'static str) {
        match self {
            Self::ArticleCategories | Self::ArticleTags => (EntityKind::Article, "article_id"),
            Self::NewsCategories | Self::NewsTags => (EntityKind::News, "news_id"),
            Self::EventCategories => (EntityKind::Event, "event_id"),
            Self::GalleryTags => (EntityKind::Gallery, "gallery_id"),
        }
    }

    pub fn right(&self) -> (EntityKind, &'static str) {
        match self {
            Self::ArticleCategories | Self::NewsCategories | Self::EventCategories => {
                (EntityKind::Category, "category_id")
            }
            Self::ArticleTags | Self::NewsTags | Self::GalleryTags => (EntityKind::Tag, "tag_id"),
        }
    }

    pub fn side(&self, side: JoinSide) -> (EntityKind, &'static str) {
        match side {
            JoinSide::Left => self.left(),
            JoinSide::Right => self.right(),
        }
    }
}

/// What happens to child rows when the parent row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    Cascade,
    Restrict,
    Nullify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// One-to-one: at most one child row carries the foreign key.
    HasOne { fk: &'static str },
    /// One-to-many over a plain foreign-key column.
    HasMany { fk: &'static str },
    /// One-to-many over the polymorphic (`target_kind`, `target_id`) pair.
    HasManyByTarget,
    /// Many-to-many through a join table; `side` is the parent's side.
    ManyToMany { join: JoinTable, side: JoinSide },
}

#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub name: &'static str,
    /// Parent side: the row whose deletion triggers `on_delete`.
    pub source: EntityKind,
    /// Child side: the rows carrying the reference.
    pub target: EntityKind,
    pub kind: RelationKind,
    pub on_delete: DeletePolicy,
}

/// The full association table, built once and indexed by source entity.
pub struct RelationshipGraph {
    relations: Vec<Relation>,
    by_source: HashMap<EntityKind, Vec<usize>>,
}

static GRAPH: OnceLock<RelationshipGraph> = OnceLock::new();

impl RelationshipGraph {
    /// Global graph, built on first use. Idempotent by construction.
    pub fn global() -> &'static RelationshipGraph {
        GRAPH.get_or_init(Self::build)
    }

    pub fn build() -> Self {
        use DeletePolicy::*;
        use EntityKind::*;
        use JoinSide::{Left, Right};
        use RelationKind::*;

        let relations = vec![
            // ── User ────────────────────────────────────────────
            rel("profile", User, Profile, HasOne { fk: "user_id" }, Cascade),
            rel("articles", User, Article, HasMany { fk: "author_id" }, Restrict),
            rel("news", User, News, HasMany { fk: "author_id" }, Restrict),
            rel("comments", User, Comment, HasMany { fk: "author_id" }, Restrict),
            rel("forum_topics", User, ForumTopic, HasMany { fk: "author_id" }, Restrict),
            rel("forum_posts", User, ForumPost, HasMany { fk: "author_id" }, Restrict),
            rel("organized_events", User, Event, HasMany { fk: "organizer_id" }, Restrict),
            rel(
                "event_registrations",
                User,
                EventRegistration,
                HasMany { fk: "user_id" },
                Restrict,
            ),
            rel("galleries", User, Gallery, HasMany { fk: "uploader_id" }, Restrict),
            rel(
                "scholarship_awards",
                User,
                ScholarshipRecipient,
                HasMany { fk: "user_id" },
                Restrict,
            ),
            rel(
                "scholarship_applications",
                User,
                ScholarshipApplication,
                HasMany { fk: "user_id" },
                Restrict,
            ),
            rel(
                "donor_registrations",
                User,
                DonorRegistration,
                HasMany { fk: "user_id" },
                Restrict,
            ),
            rel(
                "verified_donations",
                User,
                ManualDonationEntry,
                HasMany { fk: "verified_by" },
                Nullify,
            ),
            // ── Category ────────────────────────────────────────
            rel("children", Category, Category, HasMany { fk: "parent_id" }, Restrict),
            rel(
                "forum_topics",
                Category,
                ForumTopic,
                HasMany { fk: "category_id" },
                Restrict,
            ),
            rel(
                "articles",
                Category,
                Article,
                ManyToMany { join: JoinTable::ArticleCategories, side: Right },
                Cascade,
            ),
            rel(
                "news",
                Category,
                News,
                ManyToMany { join: JoinTable::NewsCategories, side: Right },
                Cascade,
            ),
            rel(
                "events",
                Category,
                Event,
                ManyToMany { join: JoinTable::EventCategories, side: Right },
                Cascade,
            ),
            // ── Tag ─────────────────────────────────────────────
            rel(
                "articles",
                Tag,
                Article,
                ManyToMany { join: JoinTable::ArticleTags, side: Right },
                Cascade,
            ),
            rel(
                "news",
                Tag,
                News,
                ManyToMany { join: JoinTable::NewsTags, side: Right },
                Cascade,
            ),
            rel(
                "galleries",
                Tag,
                Gallery,
                ManyToMany { join: JoinTable::GalleryTags, side: Right },
                Cascade,
            ),
            // ── Article ─────────────────────────────────────────
            rel(
                "categories",
                Article,
                Category,
                ManyToMany { join: JoinTable::ArticleCategories, side: Left },
                Cascade,
            ),
            rel(
                "tags",
                Article,
                Tag,
                ManyToMany { join: JoinTable::ArticleTags, side: Left },
                Cascade,
            ),
            rel("comments", Article, Comment, HasManyByTarget, Cascade),
            rel("galleries", Article, Gallery, HasManyByTarget, Nullify),
            // ── News ────────────────────────────────────────────
            rel(
                "categories",
                News,
                Category,
                ManyToMany { join: JoinTable::NewsCategories, side: Left },
                Cascade,
            ),
            rel(
                "tags",
                News,
                Tag,
                ManyToMany { join: JoinTable::NewsTags, side: Left },
                Cascade,
            ),
            rel("comments", News, Comment, HasManyByTarget, Cascade),
            rel("galleries", News, Gallery, HasManyByTarget, Nullify),
            // ── Comment ─────────────────────────────────────────
            rel("replies", Comment, Comment, HasMany { fk: "parent_id" }, Cascade),
            // ── ForumTopic ──────────────────────────────────────
            rel("posts", ForumTopic, ForumPost, HasMany { fk: "topic_id" }, Cascade),
            rel("comments", ForumTopic, Comment, HasManyByTarget, Cascade),
            // ── ForumPost ───────────────────────────────────────
            rel("replies", ForumPost, ForumPost, HasMany { fk: "parent_id" }, Cascade),
            // ── Event ───────────────────────────────────────────
            rel(
                "registrations",
                Event,
                EventRegistration,
                HasMany { fk: "event_id" },
                Cascade,
            ),
            rel(
                "categories",
                Event,
                Category,
                ManyToMany { join: JoinTable::EventCategories, side: Left },
                Cascade,
            ),
            rel("galleries", Event, Gallery, HasManyByTarget, Nullify),
            // ── Gallery ─────────────────────────────────────────
            rel(
                "tags",
                Gallery,
                Tag,
                ManyToMany { join: JoinTable::GalleryTags, side: Left },
                Cascade,
            ),
            // ── Scholarship ─────────────────────────────────────
            rel(
                "recipients",
                Scholarship,
                ScholarshipRecipient,
                HasMany { fk: "scholarship_id" },
                Restrict,
            ),
            rel(
                "applications",
                Scholarship,
                ScholarshipApplication,
                HasMany { fk: "scholarship_id" },
                Restrict,
            ),
            // ── QrisAccount ─────────────────────────────────────
            rel(
                "programs",
                QrisAccount,
                DonationProgram,
                HasMany { fk: "qris_account_id" },
                Nullify,
            ),
            rel(
                "manual_entries",
                QrisAccount,
                ManualDonationEntry,
                HasMany { fk: "account_id" },
                Nullify,
            ),
            // ── DonationProgram ─────────────────────────────────
            rel(
                "manual_entries",
                DonationProgram,
                ManualDonationEntry,
                HasMany { fk: "program_id" },
                Restrict,
            ),
            rel(
                "donor_registrations",
                DonationProgram,
                DonorRegistration,
                HasMany { fk: "program_id" },
                Restrict,
            ),
            rel(
                "reports",
                DonationProgram,
                DonationReport,
                HasMany { fk: "program_id" },
                Restrict,
            ),
        ];

        let mut by_source: HashMap<EntityKind, Vec<usize>> = HashMap::new();
        for (idx, relation) in relations.iter().enumerate() {
            by_source.entry(relation.source).or_default().push(idx);
        }
        Self { relations, by_source }
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Relations where `kind` is the parent, exactly the set a delete
    /// walk must resolve before removing a row.
    pub fn relations_from(&self, kind: EntityKind) -> impl Iterator<Item = &Relation> {
        self.by_source
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&idx| &self.relations[idx])
    }

    /// Look up a relation by source entity and name.
    pub fn relation(&self, source: EntityKind, name: &str) -> Option<&Relation> {
        self.relations_from(source).find(|r| r.name == name)
    }
}

fn rel(
    name: &'static str,
    source: EntityKind,
    target: EntityKind,
    kind: RelationKind,
    on_delete: DeletePolicy,
) -> Relation {
    Relation { name, source, target, kind, on_delete }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_names_unique_per_source() {
        let graph = RelationshipGraph::build();
        for kind in EntityKind::ALL {
            let mut names: Vec<&str> = graph.relations_from(kind).map(|r| r.name).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate relation name under {kind:?}");
        }
    }

    #[test]
    fn every_many_to_many_is_declared_from_both_sides() {
        let graph = RelationshipGraph::build();
        for join in JoinTable::ALL {
            let sides: Vec<JoinSide> = graph
                .relations()
                .iter()
                .filter_map(|r| match r.kind {
                    RelationKind::ManyToMany { join: j, side } if j == join => Some(side),
                    _ => None,
                })
                .collect();
            assert_eq!(sides.len(), 2, "{join:?} must be declared from both sides");
            assert!(sides.contains(&JoinSide::Left) && sides.contains(&JoinSide::Right));
        }
    }

    #[test]
    fn global_graph_is_stable() {
        let first = RelationshipGraph::global();
        let second = RelationshipGraph::global();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.relations().len(), RelationshipGraph::build().relations().len());
    }

    #[test]
    fn kind_labels_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::from_str("widgets"), None);
    }

    #[test]
    fn financial_children_are_restricted() {
        let graph = RelationshipGraph::global();
        for name in ["manual_entries", "donor_registrations", "reports"] {
            let relation = graph.relation(EntityKind::DonationProgram, name).unwrap();
            assert_eq!(relation.on_delete, DeletePolicy::Restrict);
        }
        let profile = graph.relation(EntityKind::User, "profile").unwrap();
        assert_eq!(profile.on_delete, DeletePolicy::Cascade);
    }
}
