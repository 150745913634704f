//! Published content entities: Article, News, and the polymorphic Comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::EntityKind;

/// Long-form authored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    pub author_id: i64,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    /// Categories / tags attached atomically with the row.
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

impl ArticlePatch {
    pub fn apply(self, article: &mut Article) {
        if let Some(v) = self.title {
            article.title = v;
        }
        if let Some(v) = self.slug {
            article.slug = v;
        }
        if let Some(v) = self.content {
            article.content = v;
        }
        if let Some(v) = self.excerpt {
            article.excerpt = Some(v);
        }
        if let Some(v) = self.featured_image {
            article.featured_image = Some(v);
        }
        if let Some(v) = self.is_published {
            article.is_published = v;
        }
        if let Some(v) = self.is_featured {
            article.is_featured = v;
        }
    }
}

/// News item. Same shape as Article, kept as a distinct entity type
/// because it has its own join tables and traversals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNews {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    pub author_id: i64,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

impl NewsPatch {
    pub fn apply(self, news: &mut News) {
        if let Some(v) = self.title {
            news.title = v;
        }
        if let Some(v) = self.slug {
            news.slug = v;
        }
        if let Some(v) = self.content {
            news.content = v;
        }
        if let Some(v) = self.excerpt {
            news.excerpt = Some(v);
        }
        if let Some(v) = self.featured_image {
            news.featured_image = Some(v);
        }
        if let Some(v) = self.is_published {
            news.is_published = v;
        }
        if let Some(v) = self.is_featured {
            news.is_featured = v;
        }
    }
}

/// Comment attachment target: a tagged variant instead of three nullable
/// foreign keys, so "exactly one or none" is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CommentTarget {
    Article(i64),
    ForumTopic(i64),
    News(i64),
}

impl CommentTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Article(_) => EntityKind::Article,
            Self::ForumTopic(_) => EntityKind::ForumTopic,
            Self::News(_) => EntityKind::News,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Article(id) | Self::ForumTopic(id) | Self::News(id) => *id,
        }
    }

    pub fn from_parts(kind: &str, id: i64) -> Option<Self> {
        match kind {
            "articles" => Some(Self::Article(id)),
            "forum_topics" => Some(Self::ForumTopic(id)),
            "news" => Some(Self::News(id)),
            _ => None,
        }
    }
}

/// User comment, optionally attached to one content row and optionally a
/// reply to another comment (adjacency-list chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub target: Option<CommentTarget>,
    pub parent_id: Option<i64>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub author_id: i64,
    #[serde(default)]
    pub target: Option<CommentTarget>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_target_serde_is_tagged() {
        let target = CommentTarget::ForumTopic(12);
        let json = serde_json::to_value(target).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "forum_topic", "id": 12 }));
        let back: CommentTarget = serde_json::from_value(json).unwrap();
        assert_eq!(back, target);
    }

    #[test]
    fn comment_target_column_round_trip() {
        let target = CommentTarget::News(3);
        let rebuilt = CommentTarget::from_parts(target.kind().as_str(), target.id());
        assert_eq!(rebuilt, Some(target));
        assert_eq!(CommentTarget::from_parts("events", 3), None);
    }
}
