//! Gallery entities: uploaded media, optionally attached to content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Gallery attachment target: a tagged variant, same shape as
/// [`crate::domain::CommentTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum GalleryTarget {
    Event(i64),
    News(i64),
    Article(i64),
}

impl GalleryTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Event(_) => EntityKind::Event,
            Self::News(_) => EntityKind::News,
            Self::Article(_) => EntityKind::Article,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Event(id) | Self::News(id) | Self::Article(id) => *id,
        }
    }

    pub fn from_parts(kind: &str, id: i64) -> Option<Self> {
        match kind {
            "events" => Some(Self::Event(id)),
            "news" => Some(Self::News(id)),
            "articles" => Some(Self::Article(id)),
            _ => None,
        }
    }
}

/// Media item. `media_path` is the path string handed back by the
/// (out-of-scope) file-storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    pub id: i64,
    pub title: String,
    pub media_kind: MediaKind,
    pub media_path: String,
    pub caption: Option<String>,
    pub uploader_id: i64,
    pub target: Option<GalleryTarget>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGallery {
    pub title: String,
    pub media_kind: MediaKind,
    pub media_path: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub uploader_id: i64,
    #[serde(default)]
    pub target: Option<GalleryTarget>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl GalleryPatch {
    pub fn apply(self, gallery: &mut Gallery) {
        if let Some(v) = self.title {
            gallery.title = v;
        }
        if let Some(v) = self.caption {
            gallery.caption = Some(v);
        }
        if let Some(v) = self.is_published {
            gallery.is_published = v;
        }
    }
}
