//! Taxonomy lifecycle: category tree and tags.
//!
//! Reparenting walks the ancestor chain before assigning a new parent;
//! the data layer will not catch a cycle on its own.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{Category, CategoryPatch, NewCategory, NewTag, Tag};
use crate::error::{ModelError, Result};
use crate::graph::EntityKind;
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, resolve_slug};

pub struct TaxonomyService {
    store: Arc<dyn ModelStore>,
}

impl TaxonomyService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── categories ───────────────────────────────────────────

    pub async fn create_category(&self, new: NewCategory) -> Result<Category> {
        check_required("name", &new.name)?;
        if let Some(parent_id) = new.parent_id {
            ensure_exists(self.store.as_ref(), EntityKind::Category, parent_id).await?;
        }
        let slug = resolve_slug(
            self.store.as_ref(),
            EntityKind::Category,
            new.slug,
            &new.name,
            None,
        )
        .await?;

        let now = Utc::now();
        let mut category = Category {
            id: 0,
            name: new.name,
            slug,
            description: new.description,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
        };
        category.id = self.store.insert_category(&category).await?;
        info!(category_id = category.id, slug = %category.slug, "created category");
        Ok(category)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category> {
        self.store
            .get_category(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "categories", id })
    }

    pub async fn update_category(&self, id: i64, patch: CategoryPatch) -> Result<Category> {
        let mut category = self.get_category(id).await?;
        if let Some(name) = &patch.name {
            check_required("name", name)?;
        }
        if let Some(slug) = patch.slug.clone() {
            category.slug = resolve_slug(
                self.store.as_ref(),
                EntityKind::Category,
                Some(slug),
                &category.name,
                Some(id),
            )
            .await?;
        }
        if let Some(new_parent) = patch.parent_id {
            self.check_reparent(id, new_parent).await?;
            category.parent_id = new_parent;
        }
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        category.updated_at = Utc::now();
        self.store.update_category(&category).await?;
        Ok(category)
    }

    /// Restricted while child categories, topics, or content links exist.
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Category, id).await
    }

    pub async fn children(&self, id: i64) -> Result<Vec<Category>> {
        self.get_category(id).await?;
        let mut out = Vec::new();
        for child_id in self
            .store
            .child_ids(EntityKind::Category, "parent_id", id)
            .await?
        {
            if let Some(child) = self.store.get_category(child_id).await? {
                out.push(child);
            }
        }
        Ok(out)
    }

    pub async fn parent(&self, id: i64) -> Result<Option<Category>> {
        let category = self.get_category(id).await?;
        match category.parent_id {
            Some(parent_id) => self.store.get_category(parent_id).await,
            None => Ok(None),
        }
    }

    /// Ancestor chain from the immediate parent up to the root.
    pub async fn ancestors(&self, id: i64) -> Result<Vec<Category>> {
        let mut chain = Vec::new();
        let mut cursor = self.get_category(id).await?.parent_id;
        while let Some(ancestor_id) = cursor {
            let ancestor = self
                .store
                .get_category(ancestor_id)
                .await?
                .ok_or(ModelError::NotFound { entity: "categories", id: ancestor_id })?;
            cursor = ancestor.parent_id;
            chain.push(ancestor);
        }
        Ok(chain)
    }

    async fn check_reparent(&self, id: i64, new_parent: Option<i64>) -> Result<()> {
        let Some(parent_id) = new_parent else {
            return Ok(());
        };
        if parent_id == id {
            return Err(ModelError::validation("category cannot be its own parent"));
        }
        ensure_exists(self.store.as_ref(), EntityKind::Category, parent_id).await?;
        // Walk up from the proposed parent; reaching `id` means a cycle.
        let mut cursor = Some(parent_id);
        while let Some(current) = cursor {
            if current == id {
                return Err(ModelError::validation(format!(
                    "reparenting category {id} under {parent_id} would create a cycle"
                )));
            }
            cursor = self
                .store
                .get_category(current)
                .await?
                .and_then(|c| c.parent_id);
        }
        Ok(())
    }

    // ── tags ─────────────────────────────────────────────────

    pub async fn create_tag(&self, new: NewTag) -> Result<Tag> {
        check_required("name", &new.name)?;
        let slug =
            resolve_slug(self.store.as_ref(), EntityKind::Tag, new.slug, &new.name, None).await?;
        let now = Utc::now();
        let mut tag = Tag { id: 0, name: new.name, slug, created_at: now, updated_at: now };
        tag.id = self.store.insert_tag(&tag).await?;
        Ok(tag)
    }

    pub async fn get_tag(&self, id: i64) -> Result<Tag> {
        self.store
            .get_tag(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "tags", id })
    }

    pub async fn rename_tag(&self, id: i64, name: String, slug: Option<String>) -> Result<Tag> {
        check_required("name", &name)?;
        let mut tag = self.get_tag(id).await?;
        if slug.is_some() {
            tag.slug =
                resolve_slug(self.store.as_ref(), EntityKind::Tag, slug, &name, Some(id)).await?;
        }
        tag.name = name;
        tag.updated_at = Utc::now();
        self.store.update_tag(&tag).await?;
        Ok(tag)
    }

    /// Deleting a tag drops its links everywhere.
    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Tag, id).await
    }
}
