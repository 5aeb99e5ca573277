//! Comment repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{ArticleId, Comment, CommentId, NewComment};

/// Repository trait for comment operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// List the comments of an article ordered by id.
    ///
    /// # Arguments
    /// * `article_id` - Owning article; its existence is not checked
    /// * `include_deleted` - Also return soft-deleted comments
    async fn list_comments_for_article(
        &self,
        article_id: ArticleId,
        include_deleted: bool,
    ) -> RepositoryResult<Vec<Comment>>;

    /// Insert a new comment and return it with its assigned id and timestamps.
    async fn insert_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;

    /// Soft-delete a comment.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows transitioned to deleted
    async fn soft_delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;

    /// Look up a comment regardless of its soft-deletion state.
    async fn find_comment_unscoped(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;
}
