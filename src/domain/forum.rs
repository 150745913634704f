//! Forum entities: discussion topics and threaded posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discussion thread. `last_activity_at` is touched whenever a post or
/// comment lands in the thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumTopic {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub author_id: i64,
    pub is_closed: bool,
    pub is_pinned: bool,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewForumTopic {
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub author_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForumTopicPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_closed: Option<bool>,
    #[serde(default)]
    pub is_pinned: Option<bool>,
}

impl ForumTopicPatch {
    pub fn apply(self, topic: &mut ForumTopic) {
        if let Some(v) = self.title {
            topic.title = v;
        }
        if let Some(v) = self.content {
            topic.content = v;
        }
        if let Some(v) = self.category_id {
            topic.category_id = v;
        }
        if let Some(v) = self.is_closed {
            topic.is_closed = v;
        }
        if let Some(v) = self.is_pinned {
            topic.is_pinned = v;
        }
    }
}

/// Reply within a topic. `parent_id` points at another post in the same
/// topic (one level of threading, modeled as an adjacency list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewForumPost {
    pub topic_id: i64,
    pub author_id: i64,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForumPostPatch {
    #[serde(default)]
    pub content: Option<String>,
}

impl ForumPostPatch {
    pub fn apply(self, post: &mut ForumPost) {
        if let Some(v) = self.content {
            post.content = v;
        }
    }
}
