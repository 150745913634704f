//! Entity lifecycle services.
//!
//! One service per domain area, all backed by the same [`ModelStore`].
//! Invariants are enforced here, at write time: foreign-key existence,
//! uniqueness, polymorphic-target validity, cycle prevention, delete
//! policies, and status transitions.

pub mod account;
pub mod content;
pub mod donation;
pub mod event;
pub mod forum;
pub mod gallery;
pub mod scholarship;
pub mod taxonomy;

pub use account::AccountService;
pub use content::ContentService;
pub use donation::DonationService;
pub use event::EventService;
pub use forum::ForumService;
pub use gallery::GalleryService;
pub use scholarship::ScholarshipService;
pub use taxonomy::TaxonomyService;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ModelError, Result};
use crate::graph::{DeletePolicy, EntityKind, RelationKind, RelationshipGraph};
use crate::store::ModelStore;

/// Facade wiring every domain service over one store, in the spirit of
/// a CRUD executor that owns all domain services.
pub struct ModelService {
    store: Arc<dyn ModelStore>,
    pub accounts: AccountService,
    pub taxonomy: TaxonomyService,
    pub content: ContentService,
    pub forum: ForumService,
    pub events: EventService,
    pub galleries: GalleryService,
    pub scholarships: ScholarshipService,
    pub donations: DonationService,
}

impl ModelService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            taxonomy: TaxonomyService::new(store.clone()),
            content: ContentService::new(store.clone()),
            forum: ForumService::new(store.clone()),
            events: EventService::new(store.clone()),
            galleries: GalleryService::new(store.clone()),
            scholarships: ScholarshipService::new(store.clone()),
            donations: DonationService::new(store.clone()),
            store,
        }
    }

    /// Generic relation traversal: ids of the rows related to
    /// (`kind`, `id`) through the named relation. Empty when no related
    /// rows exist; `NotFound` only when the owning row itself is absent.
    pub async fn related_ids(&self, kind: EntityKind, id: i64, relation: &str) -> Result<Vec<i64>> {
        if !self.store.exists(kind, id).await? {
            return Err(ModelError::NotFound { entity: kind.as_str(), id });
        }
        let rel = RelationshipGraph::global()
            .relation(kind, relation)
            .ok_or_else(|| {
                ModelError::validation(format!(
                    "unknown relation '{relation}' on {}",
                    kind.as_str()
                ))
            })?;
        match rel.kind {
            RelationKind::HasOne { fk } | RelationKind::HasMany { fk } => {
                self.store.child_ids(rel.target, fk, id).await
            }
            RelationKind::HasManyByTarget => self.store.target_child_ids(rel.target, kind, id).await,
            RelationKind::ManyToMany { join, side } => self.store.linked_ids(join, side, id).await,
        }
    }
}

// ── shared write-time helpers ────────────────────────────────

/// Foreign-key existence check: `MissingReference` when absent.
pub(crate) async fn ensure_exists(
    store: &dyn ModelStore,
    kind: EntityKind,
    id: i64,
) -> Result<()> {
    if store.exists(kind, id).await? {
        Ok(())
    } else {
        Err(ModelError::MissingReference { entity: kind.as_str(), id })
    }
}

/// Read-side check: `NotFound` when absent.
pub(crate) async fn ensure_found(store: &dyn ModelStore, kind: EntityKind, id: i64) -> Result<()> {
    if store.exists(kind, id).await? {
        Ok(())
    } else {
        Err(ModelError::NotFound { entity: kind.as_str(), id })
    }
}

/// Resolve and reserve a slug: take the explicit one or derive it from
/// the title, validate the format, and reject duplicates within `kind`.
pub(crate) async fn resolve_slug(
    store: &dyn ModelStore,
    kind: EntityKind,
    explicit: Option<String>,
    title: &str,
    exclude: Option<i64>,
) -> Result<String> {
    let slug = match explicit {
        Some(s) => s,
        None => crate::domain::slug::slugify(title),
    };
    crate::domain::slug::check_slug(&slug)?;
    if store.slug_in_use(kind, &slug, exclude).await? {
        return Err(ModelError::UniqueViolation(format!(
            "slug '{slug}' already used by another {}",
            kind.as_str()
        )));
    }
    Ok(slug)
}

/// Policy-driven delete. Returns `NotFound` when the row is absent;
/// otherwise resolves every relation the graph declares for `kind`
/// (restrict checks first, then cascades and nullifies, children before
/// the parent row) and removes the row.
pub(crate) async fn delete_entity(
    store: &dyn ModelStore,
    kind: EntityKind,
    id: i64,
) -> Result<()> {
    ensure_found(store, kind, id).await?;
    remove(store, kind, id).await?;
    debug!(entity = kind.as_str(), id, "deleted");
    Ok(())
}

fn remove<'a>(
    store: &'a dyn ModelStore,
    kind: EntityKind,
    id: i64,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        // A cascading parent may have removed this row already.
        if !store.exists(kind, id).await? {
            return Ok(());
        }
        let graph = RelationshipGraph::global();

        for rel in graph.relations_from(kind) {
            if rel.on_delete != DeletePolicy::Restrict {
                continue;
            }
            let blocked = match rel.kind {
                RelationKind::HasOne { fk } | RelationKind::HasMany { fk } => {
                    store.count_children(rel.target, fk, id).await? > 0
                }
                RelationKind::HasManyByTarget => {
                    !store.target_child_ids(rel.target, kind, id).await?.is_empty()
                }
                RelationKind::ManyToMany { join, side } => {
                    !store.linked_ids(join, side, id).await?.is_empty()
                }
            };
            if blocked {
                return Err(ModelError::RestrictedDelete {
                    entity: kind.as_str(),
                    id,
                    dependent: rel.target.as_str(),
                });
            }
        }

        for rel in graph.relations_from(kind) {
            match (rel.kind, rel.on_delete) {
                (_, DeletePolicy::Restrict) => {}
                (RelationKind::HasOne { fk } | RelationKind::HasMany { fk }, policy) => {
                    match policy {
                        DeletePolicy::Cascade => {
                            for child in store.child_ids(rel.target, fk, id).await? {
                                remove(store, rel.target, child).await?;
                            }
                        }
                        DeletePolicy::Nullify => {
                            store.nullify_fk(rel.target, fk, id).await?;
                        }
                        DeletePolicy::Restrict => unreachable!(),
                    }
                }
                (RelationKind::HasManyByTarget, policy) => match policy {
                    DeletePolicy::Cascade => {
                        for child in store.target_child_ids(rel.target, kind, id).await? {
                            remove(store, rel.target, child).await?;
                        }
                    }
                    DeletePolicy::Nullify => {
                        store.clear_targets(rel.target, kind, id).await?;
                    }
                    DeletePolicy::Restrict => unreachable!(),
                },
                (RelationKind::ManyToMany { join, side }, _) => {
                    store.drop_links(join, side, id).await?;
                }
            }
        }

        store.delete_row(kind, id).await?;
        Ok(())
    })
}
