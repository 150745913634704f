//! Content lifecycle: articles, news, and polymorphic comments.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::slug::check_required;
use crate::domain::{
    Article, ArticlePatch, Category, Comment, CommentTarget, NewArticle, NewComment, NewNews,
    News, NewsPatch, Tag,
};
use crate::error::{ModelError, Result};
use crate::graph::{EntityKind, JoinSide, JoinTable};
use crate::store::ModelStore;

use super::{delete_entity, ensure_exists, ensure_found, resolve_slug};

pub struct ContentService {
    store: Arc<dyn ModelStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self { store }
    }

    // ── articles ─────────────────────────────────────────────

    pub async fn create_article(&self, new: NewArticle) -> Result<Article> {
        check_required("title", &new.title)?;
        check_required("content", &new.content)?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.author_id).await?;
        for &category_id in &new.category_ids {
            ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        }
        for &tag_id in &new.tag_ids {
            ensure_exists(self.store.as_ref(), EntityKind::Tag, tag_id).await?;
        }
        let slug = resolve_slug(
            self.store.as_ref(),
            EntityKind::Article,
            new.slug,
            &new.title,
            None,
        )
        .await?;

        let now = Utc::now();
        let mut article = Article {
            id: 0,
            title: new.title,
            slug,
            content: new.content,
            excerpt: new.excerpt,
            featured_image: new.featured_image,
            author_id: new.author_id,
            is_published: new.is_published,
            is_featured: new.is_featured,
            created_at: now,
            updated_at: now,
        };
        article.id = self
            .store
            .insert_article(&article, &new.category_ids, &new.tag_ids)
            .await?;
        info!(article_id = article.id, slug = %article.slug, "created article");
        Ok(article)
    }

    pub async fn get_article(&self, id: i64) -> Result<Article> {
        self.store
            .get_article(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "articles", id })
    }

    pub async fn update_article(&self, id: i64, patch: ArticlePatch) -> Result<Article> {
        let mut article = self.get_article(id).await?;
        if let Some(title) = &patch.title {
            check_required("title", title)?;
        }
        if let Some(slug) = patch.slug.clone() {
            article.slug = resolve_slug(
                self.store.as_ref(),
                EntityKind::Article,
                Some(slug),
                &article.title,
                Some(id),
            )
            .await?;
        }
        let slug_already_set = patch.slug.is_some();
        let mut patch = patch;
        if slug_already_set {
            patch.slug = None;
        }
        patch.apply(&mut article);
        article.updated_at = Utc::now();
        self.store.update_article(&article).await?;
        Ok(article)
    }

    /// Cascades comments, detaches galleries, drops category/tag links.
    pub async fn delete_article(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Article, id).await
    }

    pub async fn attach_article_category(&self, article_id: i64, category_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Article, article_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        self.store
            .link(JoinTable::ArticleCategories, article_id, category_id)
            .await
    }

    pub async fn detach_article_category(&self, article_id: i64, category_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Article, article_id).await?;
        self.store
            .unlink(JoinTable::ArticleCategories, article_id, category_id)
            .await
    }

    pub async fn attach_article_tag(&self, article_id: i64, tag_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Article, article_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::Tag, tag_id).await?;
        self.store.link(JoinTable::ArticleTags, article_id, tag_id).await
    }

    pub async fn detach_article_tag(&self, article_id: i64, tag_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::Article, article_id).await?;
        self.store.unlink(JoinTable::ArticleTags, article_id, tag_id).await
    }

    pub async fn categories_of_article(&self, article_id: i64) -> Result<Vec<Category>> {
        ensure_found(self.store.as_ref(), EntityKind::Article, article_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .linked_ids(JoinTable::ArticleCategories, JoinSide::Left, article_id)
            .await?
        {
            if let Some(category) = self.store.get_category(id).await? {
                out.push(category);
            }
        }
        Ok(out)
    }

    pub async fn tags_of_article(&self, article_id: i64) -> Result<Vec<Tag>> {
        ensure_found(self.store.as_ref(), EntityKind::Article, article_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .linked_ids(JoinTable::ArticleTags, JoinSide::Left, article_id)
            .await?
        {
            if let Some(tag) = self.store.get_tag(id).await? {
                out.push(tag);
            }
        }
        Ok(out)
    }

    // ── news ─────────────────────────────────────────────────

    pub async fn create_news(&self, new: NewNews) -> Result<News> {
        check_required("title", &new.title)?;
        check_required("content", &new.content)?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.author_id).await?;
        for &category_id in &new.category_ids {
            ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        }
        for &tag_id in &new.tag_ids {
            ensure_exists(self.store.as_ref(), EntityKind::Tag, tag_id).await?;
        }
        let slug =
            resolve_slug(self.store.as_ref(), EntityKind::News, new.slug, &new.title, None).await?;

        let now = Utc::now();
        let mut news = News {
            id: 0,
            title: new.title,
            slug,
            content: new.content,
            excerpt: new.excerpt,
            featured_image: new.featured_image,
            author_id: new.author_id,
            is_published: new.is_published,
            is_featured: new.is_featured,
            created_at: now,
            updated_at: now,
        };
        news.id = self
            .store
            .insert_news(&news, &new.category_ids, &new.tag_ids)
            .await?;
        info!(news_id = news.id, slug = %news.slug, "created news");
        Ok(news)
    }

    pub async fn get_news(&self, id: i64) -> Result<News> {
        self.store
            .get_news(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "news", id })
    }

    pub async fn update_news(&self, id: i64, patch: NewsPatch) -> Result<News> {
        let mut news = self.get_news(id).await?;
        if let Some(title) = &patch.title {
            check_required("title", title)?;
        }
        if let Some(slug) = patch.slug.clone() {
            news.slug = resolve_slug(
                self.store.as_ref(),
                EntityKind::News,
                Some(slug),
                &news.title,
                Some(id),
            )
            .await?;
        }
        let mut patch = patch;
        patch.slug = None;
        patch.apply(&mut news);
        news.updated_at = Utc::now();
        self.store.update_news(&news).await?;
        Ok(news)
    }

    pub async fn delete_news(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::News, id).await
    }

    pub async fn attach_news_category(&self, news_id: i64, category_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::News, news_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::Category, category_id).await?;
        self.store.link(JoinTable::NewsCategories, news_id, category_id).await
    }

    pub async fn attach_news_tag(&self, news_id: i64, tag_id: i64) -> Result<bool> {
        ensure_found(self.store.as_ref(), EntityKind::News, news_id).await?;
        ensure_exists(self.store.as_ref(), EntityKind::Tag, tag_id).await?;
        self.store.link(JoinTable::NewsTags, news_id, tag_id).await
    }

    pub async fn categories_of_news(&self, news_id: i64) -> Result<Vec<Category>> {
        ensure_found(self.store.as_ref(), EntityKind::News, news_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .linked_ids(JoinTable::NewsCategories, JoinSide::Left, news_id)
            .await?
        {
            if let Some(category) = self.store.get_category(id).await? {
                out.push(category);
            }
        }
        Ok(out)
    }

    // ── comments ─────────────────────────────────────────────

    /// Create a comment. A reply without an explicit target inherits its
    /// parent's; an explicit target must match the parent's. New comments
    /// start unapproved.
    pub async fn create_comment(&self, new: NewComment) -> Result<Comment> {
        check_required("content", &new.content)?;
        ensure_exists(self.store.as_ref(), EntityKind::User, new.author_id).await?;

        let mut target = new.target;
        if let Some(parent_id) = new.parent_id {
            let parent = self
                .store
                .get_comment(parent_id)
                .await?
                .ok_or(ModelError::MissingReference { entity: "comments", id: parent_id })?;
            match (target, parent.target) {
                (None, inherited) => target = inherited,
                (Some(t), Some(p)) if t == p => {}
                _ => {
                    return Err(ModelError::validation(
                        "reply target must match the parent comment's target",
                    ))
                }
            }
        }
        if let Some(t) = target {
            ensure_exists(self.store.as_ref(), t.kind(), t.id()).await?;
        }

        let now = Utc::now();
        let mut comment = Comment {
            id: 0,
            content: new.content,
            author_id: new.author_id,
            target,
            parent_id: new.parent_id,
            is_approved: false,
            created_at: now,
            updated_at: now,
        };
        comment.id = self.store.insert_comment(&comment).await?;

        // A comment landing in a forum thread counts as activity.
        if let Some(CommentTarget::ForumTopic(topic_id)) = target {
            if let Some(mut topic) = self.store.get_forum_topic(topic_id).await? {
                topic.last_activity_at = now;
                self.store.update_forum_topic(&topic).await?;
            }
        }
        Ok(comment)
    }

    pub async fn get_comment(&self, id: i64) -> Result<Comment> {
        self.store
            .get_comment(id)
            .await?
            .ok_or(ModelError::NotFound { entity: "comments", id })
    }

    pub async fn approve_comment(&self, id: i64) -> Result<Comment> {
        let mut comment = self.get_comment(id).await?;
        comment.is_approved = true;
        comment.updated_at = Utc::now();
        self.store.update_comment(&comment).await?;
        Ok(comment)
    }

    /// Cascades the whole reply chain.
    pub async fn delete_comment(&self, id: i64) -> Result<()> {
        delete_entity(self.store.as_ref(), EntityKind::Comment, id).await
    }

    pub async fn replies(&self, comment_id: i64) -> Result<Vec<Comment>> {
        ensure_found(self.store.as_ref(), EntityKind::Comment, comment_id).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .child_ids(EntityKind::Comment, "parent_id", comment_id)
            .await?
        {
            if let Some(comment) = self.store.get_comment(id).await? {
                out.push(comment);
            }
        }
        Ok(out)
    }

    /// All comments attached to a target row, top-level and replies alike.
    pub async fn comments_for(&self, target: CommentTarget) -> Result<Vec<Comment>> {
        ensure_found(self.store.as_ref(), target.kind(), target.id()).await?;
        let mut out = Vec::new();
        for id in self
            .store
            .target_child_ids(EntityKind::Comment, target.kind(), target.id())
            .await?
        {
            if let Some(comment) = self.store.get_comment(id).await? {
                out.push(comment);
            }
        }
        Ok(out)
    }
}
