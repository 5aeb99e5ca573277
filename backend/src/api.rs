//! Public API surface for the blog backend.
//!
//! This file holds the entity types shared by the HTTP layer and the
//! repositories. All types derive Serialize/Deserialize for JSON
//! serialization; field names are lower_snake_case on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

crate::define_id_type!(i64, ArticleId, "Primary key of an article.");
crate::define_id_type!(i64, CommentId, "Primary key of a comment.");

/// A blog article.
///
/// `comments` is `None` when the related rows were not loaded for this read
/// and serializes as `null`; list reads always populate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub content: String,
    pub comments: Option<Vec<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Whether the article has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A comment attached to an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether the comment has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Article fields supplied on creation.
///
/// Fields stay optional here: the store's NOT NULL constraint is what rejects
/// a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArticle {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            content: Some(content.into()),
        }
    }
}

/// Comment fields supplied on creation. `article_id` always comes from the
/// request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub article_id: ArticleId,
    pub name: Option<String>,
    pub comment: Option<String>,
}

impl NewComment {
    pub fn new(article_id: ArticleId, name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            article_id,
            name: Some(name.into()),
            comment: Some(comment.into()),
        }
    }
}

/// Untyped partial-update payload: field name to JSON value.
pub type FieldMap = Map<String, Value>;

/// Article fields that exist but can never be written by a client.
pub const IMMUTABLE_ARTICLE_FIELDS: &[&str] =
    &["id", "comments", "created_at", "updated_at", "deleted_at"];

/// Reasons a field map is rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldMapError {
    #[error("field '{0}' cannot be updated")]
    ImmutableField(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' must be a string")]
    InvalidType { field: String },
}

/// Validated partial update for an article. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

impl ArticlePatch {
    /// Validate a field map against the mutable-field allow-list.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, FieldMapError> {
        let mut patch = ArticlePatch::default();

        for (key, value) in fields {
            if IMMUTABLE_ARTICLE_FIELDS.contains(&key.as_str()) {
                return Err(FieldMapError::ImmutableField(key.clone()));
            }

            let slot = match key.as_str() {
                "title" => &mut patch.title,
                "author" => &mut patch.author,
                "content" => &mut patch.content,
                _ => return Err(FieldMapError::UnknownField(key.clone())),
            };

            let text = value
                .as_str()
                .ok_or_else(|| FieldMapError::InvalidType { field: key.clone() })?;
            *slot = Some(text.to_string());
        }

        Ok(patch)
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.content.is_none()
    }

    /// Apply the present fields onto an in-memory article.
    pub fn apply_to(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(author) = &self.author {
            article.author = author.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
    }
}

impl TryFrom<&FieldMap> for ArticlePatch {
    type Error = FieldMapError;

    fn try_from(fields: &FieldMap) -> Result<Self, Self::Error> {
        Self::from_fields(fields)
    }
}
