//! Data Transfer Objects for the HTTP API.
//!
//! Responses reuse the entity types from [`crate::api`] directly; only
//! request bodies and the health payload need their own shapes.

use serde::{Deserialize, Serialize};

use crate::api::{ArticleId, NewArticle, NewComment};

/// Request body for creating an article.
///
/// Every field is optional at this layer; a missing one is rejected by the
/// store's NOT NULL constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

impl From<CreateArticleRequest> for NewArticle {
    fn from(req: CreateArticleRequest) -> Self {
        NewArticle {
            title: req.title,
            author: req.author,
            content: req.content,
        }
    }
}

/// Request body for creating a comment.
///
/// Extra keys such as `article_id` are accepted and ignored; the owning
/// article comes from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub name: Option<String>,
    pub comment: Option<String>,
}

impl CreateCommentRequest {
    pub fn into_new_comment(self, article_id: ArticleId) -> NewComment {
        NewComment {
            article_id,
            name: self.name,
            comment: self.comment,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Database connection status
    pub database: String,
}
