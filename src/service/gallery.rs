//! Gallery lifecycle: media items and their optional attachments.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{Gallery, GalleryPatch, GalleryTarget, NewGallery, Tag};
use crate::error::{ModelError, Result};
use crate::graph::{EntityKind, JoinSide, JoinTable};
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found};

pub struct GalleryService {
    store: Arc<dyn ModelStore>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    pub async fn create_gallery(&self, new: NewGallery) -> Result<Gallery> {
        check_required("title", &new.title)?;
        check_required("media_path", &new.media_path)?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.uploader_id).await?;
        if let Some(target) = new.target {
            ensure_exists(self.store.as_ref(), target.kind(), target.id()).await?;
        }
        for &tag_id in &new.tag_ids {
            ensure_exists(self.store.as_ref(), EntityKind::Tag, tag_id).await?;
        }

        let now = Utc::now();
        let mut gallery = Gallery {
            id: 0,
            title: new.title,
            media_kind: new.media_kind,
            media_path: new.media_path,
            caption: new.caption,
            uploader_id: new.uploader_id,
            target: new.target,
            is_published: new.is_published,
            created_at: now,
            updated_at: now,
        };
        gallery.id = self.store.insert_gallery(&gallery, &new.tag_ids).await?;
        info!(gallery_id = gallery.id, "created gallery item");
        Ok(gallery)
    }

    pub async fn get_gallery(&self, id: i64) -> Result<Gallery> {
        self.store
            .get_gallery(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "galleries", id })
    }

    pub async fn update_gallery(&self, id: i64, patch: GalleryPatch) -> Result<Gallery> {
        let mut gallery = self.get_gallery(id).await?;
        if let Some(title) = &patch.title {
            check_required("title", title)?;
        }
        patch.apply(&mut gallery);
        gallery.updated_at = Utc::now();
        self.store.update_gallery(&gallery).await?;
        Ok(gallery)
    }

    /// Move or clear the attachment target.
    pub async fn retarget(&self, id: i64, target: Option<GalleryTarget>) -> Result<Gallery> {
        let mut gallery = self.get_gallery(id).await?;
        if let Some(target) = target {
            ensure_exists(self.store.as_ref(), target.kind(), target.id()).await?;
        }
        gallery.target = target;
        gallery.updated_at = Utc::now();
        self.store.update_gallery(&gallery).await?;
        Ok(gallery)
    }

    pub async fn delete_gallery(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Gallery, id).await
    }

    pub async fn attach_tag(&self, gallery_id: i64, tag_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Gallery, gallery_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::Tag, tag_id).await?;
        self.store.link(JoinTable::GalleryTags, gallery_id, tag_id).await
    }

    pub async fn detach_tag(&self, gallery_id: i64, tag_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Gallery, gallery_id).await?;
        self.store.unlink(JoinTable::GalleryTags, gallery_id, tag_id).await
    }

    pub async fn tags_of_gallery(&self, gallery_id: i64) -> Result<Vec<Tag>> {
        ensure_found(self.store.as_ref(), EntityKind::Gallery, gallery_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .linked_ids(JoinTable::GalleryTags, JoinSide::Left, gallery_id)
            .await?
        {
            if let Some(tag) = self.store.get_tag(id).await? {
                out.push(tag);
            }
        }
        Ok(out)
    }

    /// Media attached to one target row.
    pub async fn galleries_for(&self, target: GalleryTarget) -> Result<Vec<Gallery>> {
        ensure_found(self.store.as_ref(), target.kind(), target.id()).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .target_child_ids(EntityKind::Gallery, target.kind(), target.id())
            .await?
        {
            if let Some(gallery) = self.store.get_gallery(id).await? {
                out.push(gallery);
            }
        }
        Ok(out)
    }
}
