//! High-level database service layer.
//!
//! Repository-agnostic operations backing each HTTP route. These functions
//! hold the rules that must not depend on the storage backend: which reads
//! load related comments, how a partial update is validated, and that a
//! comment's owning article always comes from the request path.
//!
//! # Usage
//!
//! ```no_run
//! use blog_backend::api::NewArticle;
//! use blog_backend::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     services::create_article(&repo, &NewArticle::new("Hello", "Ann", "First post")).await?;
//!     let articles = services::list_articles(&repo).await?;
//!     println!("Found {} articles", articles.len());
//!
//!     Ok(())
//! }
//! ```

use tracing::{debug, info};

use super::repository::{FullRepository, RepositoryResult};
use crate::api::{
    Article, ArticleId, ArticlePatch, Comment, CommentId, FieldMap, FieldMapError, NewArticle,
    NewComment,
};

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Article Operations ====================

/// List every active article with its active comments loaded.
///
/// Articles come back in ascending id order; an article with no comments
/// carries an empty list, never `None`.
pub async fn list_articles<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Article>> {
    let articles = repo.list_articles(true).await?;
    info!("Service layer: listed {} articles", articles.len());
    Ok(articles)
}

/// Fetch one active article. Comments are not loaded.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` when the id is unknown or soft-deleted
pub async fn get_article<R: FullRepository + ?Sized>(
    repo: &R,
    id: ArticleId,
) -> RepositoryResult<Article> {
    repo.get_article(id).await
}

/// Insert a new article. Missing required fields are rejected by the store.
pub async fn create_article<R: FullRepository + ?Sized>(
    repo: &R,
    article: &NewArticle,
) -> RepositoryResult<Article> {
    let created = repo.insert_article(article).await?;
    info!("Service layer: created article {}", created.id);
    Ok(created)
}

/// Validate a raw field map against the article's mutable fields.
pub fn article_patch_from_fields(fields: &FieldMap) -> Result<ArticlePatch, FieldMapError> {
    ArticlePatch::try_from(fields)
}

/// Apply a partial update to an active article and return the fresh row.
///
/// An empty patch changes nothing and just re-reads the article.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` when the id is unknown or soft-deleted
pub async fn update_article<R: FullRepository + ?Sized>(
    repo: &R,
    id: ArticleId,
    patch: &ArticlePatch,
) -> RepositoryResult<Article> {
    let updated = repo.update_article_fields(id, patch).await?;
    if !patch.is_empty() {
        info!("Service layer: updated article {}", id);
    }
    Ok(updated)
}

/// Soft-delete an article. Deleting a missing or already deleted article
/// succeeds without touching anything.
pub async fn delete_article<R: FullRepository + ?Sized>(
    repo: &R,
    id: ArticleId,
) -> RepositoryResult<()> {
    let affected = repo.soft_delete_article(id).await?;
    if affected == 0 {
        debug!("Service layer: delete of article {} matched no active row", id);
    } else {
        info!("Service layer: deleted article {}", id);
    }
    Ok(())
}

// ==================== Comment Operations ====================

/// List all comments recorded against an article, soft-deleted ones included.
///
/// The article itself is not checked; an unknown id yields an empty list.
pub async fn list_comments<R: FullRepository + ?Sized>(
    repo: &R,
    article_id: ArticleId,
) -> RepositoryResult<Vec<Comment>> {
    repo.list_comments_for_article(article_id, true).await
}

/// Insert a comment under the article named by `article_id`.
///
/// Any article id carried by the payload is overwritten. The article is not
/// required to exist.
pub async fn create_comment<R: FullRepository + ?Sized>(
    repo: &R,
    article_id: ArticleId,
    comment: NewComment,
) -> RepositoryResult<Comment> {
    let comment = NewComment {
        article_id,
        ..comment
    };
    let created = repo.insert_comment(&comment).await?;
    info!(
        "Service layer: created comment {} on article {}",
        created.id, article_id
    );
    Ok(created)
}

/// Soft-delete a comment by id. Idempotent like [`delete_article`].
pub async fn delete_comment<R: FullRepository + ?Sized>(
    repo: &R,
    id: CommentId,
) -> RepositoryResult<()> {
    let affected = repo.soft_delete_comment(id).await?;
    if affected == 0 {
        debug!("Service layer: delete of comment {} matched no active row", id);
    } else {
        info!("Service layer: deleted comment {}", id);
    }
    Ok(())
}
