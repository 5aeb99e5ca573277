//! Article repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Article, ArticleId, ArticlePatch, NewArticle};

/// Repository trait for article operations.
///
/// Reads exclude soft-deleted rows unless the method says otherwise.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Reads ====================

    /// List all active articles ordered by id.
    ///
    /// # Arguments
    /// * `with_comments` - Attach each article's active comments. Articles
    ///   without comments get an empty list.
    async fn list_articles(&self, with_comments: bool) -> RepositoryResult<Vec<Article>>;

    /// Retrieve a single active article. Comments are not loaded.
    ///
    /// # Returns
    /// * `Ok(Article)` - The article
    /// * `Err(RepositoryError::NotFound)` - If no active article has this id
    async fn get_article(&self, id: ArticleId) -> RepositoryResult<Article>;

    /// Look up an article regardless of its soft-deletion state.
    async fn find_article_unscoped(&self, id: ArticleId) -> RepositoryResult<Option<Article>>;

    // ==================== Writes ====================

    /// Insert a new article and return it with its assigned id and timestamps.
    ///
    /// A missing required field fails with the store's NOT NULL violation.
    async fn insert_article(&self, article: &NewArticle) -> RepositoryResult<Article>;

    /// Apply the fields present in `patch` to the active article `id`, then
    /// re-read it.
    ///
    /// # Returns
    /// * `Ok(Article)` - The full updated article
    /// * `Err(RepositoryError::NotFound)` - If no active article has this id
    async fn update_article_fields(
        &self,
        id: ArticleId,
        patch: &ArticlePatch,
    ) -> RepositoryResult<Article>;

    /// Soft-delete an article by setting its deletion timestamp.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows transitioned to deleted (0 when the
    ///   article is missing or already deleted)
    async fn soft_delete_article(&self, id: ArticleId) -> RepositoryResult<usize>;
}
