//! Forum lifecycle: topics and threaded posts.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{
    ForumPost, ForumPostPatch, ForumTopic, ForumTopicPatch, NewForumPost, NewForumTopic,
};
use crate::error::{ModelError, Result};
use crate::graph::EntityKind;
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found};

pub struct ForumService {
    store: Arc<dyn ModelStore>,
}

impl ForumService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── topics ───────────────────────────────────────────────

    pub async fn create_topic(&self, new: NewForumTopic) -> Result<ForumTopic> {
        check_required("title", &new.title)?;
        check_required("content", &new.content)?;
        ensure_exists(self.store.as_ref(), EntityKind::Category, new.category_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.author_id).await?;

        let now = Utc::now();
        let mut topic = ForumTopic {
            id: 0,
            title: new.title,
            content: new.content,
            category_id: new.category_id,
            author_id: new.author_id,
            is_closed: false,
            is_pinned: false,
            last_activity_at: now,
            created_at: now,
            updated_at: now,
        };
        topic.id = self.store.insert_forum_topic(&topic).await?;
        info!(topic_id = topic.id, "created forum topic");
        Ok(topic)
    }

    pub async fn get_topic(&self, id: i64) -> Result<ForumTopic> {
        self.store
            .get_forum_topic(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "forum_topics", id })
    }

    pub async fn update_topic(&self, id: i64, patch: ForumTopicPatch) -> Result<ForumTopic> {
        let mut topic = self.get_topic(id).await?;
        if let Some(title) = &patch.title {
            check_required("title", title)?;
        }
        if let Some(category_id) = patch.category_id {
            ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        }
        patch.apply(&mut topic);
        topic.updated_at = Utc::now();
        self.store.update_forum_topic(&topic).await?;
        Ok(topic)
    }

    /// Cascades every post and attached comment in the thread.
    pub async fn delete_topic(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::ForumTopic, id).await
    }

    pub async fn close_topic(&self, id: i64) -> Result<ForumTopic> {
        let mut topic = self.get_topic(id).await?;
        topic.is_closed = true;
        topic.updated_at = Utc::now();
        self.store.update_forum_topic(&topic).await?;
        Ok(topic)
    }

    pub async fn pin_topic(&self, id: i64, pinned: bool) -> Result<ForumTopic> {
        let mut topic = self.get_topic(id).await?;
        topic.is_pinned = pinned;
        topic.updated_at = Utc::now();
        self.store.update_forum_topic(&topic).await?;
        Ok(topic)
    }

    // ── posts ────────────────────────────────────────────────

    /// Post into a topic. Closed topics reject new posts; a reply's
    /// parent must live in the same topic.
    pub async fn create_post(&self, new: NewForumPost) -> Result<ForumPost> {
        check_required("content", &new.content)?;
        let mut topic = self.get_topic(new.topic_id).await.map_err(|err| match err {
            ModelError::NotFound { entity, id } => ModelError::MissingReference { entity, id },
            other => other,
        })?;
        if topic.is_closed {
            return Err(ModelError::validation(format!(
                "topic {} is closed to new posts",
                topic.id
            )));
        }
        ensure_exists(self.store.as_ref(), EntityKind::User, new.author_id).await?;
        if let Some(parent_id) = new.parent_id {
            let parent = self
                .store
                .get_forum_post(parent_id)
                .await?
                .ok_or(ModelError::MissingReference { entity: "forum_posts", id: parent_id })?;
            if parent.topic_id != new.topic_id {
                return Err(ModelError::validation(
                    "reply parent belongs to a different topic",
                ));
            }
        }

        let now = Utc::now();
        let mut post = ForumPost {
            id: 0,
            topic_id: new.topic_id,
            author_id: new.author_id,
            content: new.content,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
        };
        post.id = self.store.insert_forum_post(&post).await?;

        topic.last_activity_at = now;
        self.store.update_forum_topic(&topic).await?;
        Ok(post)
    }

    pub async fn get_post(&self, id: i64) -> Result<ForumPost> {
        self.store
            .get_forum_post(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "forum_posts", id })
    }

    pub async fn update_post(&self, id: i64, patch: ForumPostPatch) -> Result<ForumPost> {
        let mut post = self.get_post(id).await?;
        if let Some(content) = &patch.content {
            check_required("content", content)?;
        }
        patch.apply(&mut post);
        post.updated_at = Utc::now();
        self.store.update_forum_post(&post).await?;
        Ok(post)
    }

    /// Cascades replies to the post.
    pub async fn delete_post(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::ForumPost, id).await
    }

    pub async fn posts_of_topic(&self, topic_id: i64) -> Result<Vec<ForumPost>> {
        ensure_found(self.store.as_ref(), EntityKind::ForumTopic, topic_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::ForumPost, "topic_id", topic_id)
            .await?
        {
            if let Some(post) = self.store.get_forum_post(id).await? {
                out.push(post);
            }
        }
        Ok(out)
    }

    pub async fn replies(&self, post_id: i64) -> Result<Vec<ForumPost>> {
        ensure_found(self.store.as_ref(), EntityKind::ForumPost, post_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::ForumPost, "parent_id", post_id)
            .await?
        {
            if let Some(post) = self.store.get_forum_post(id).await? {
                out.push(post);
            }
        }
        Ok(out)
    }
}
