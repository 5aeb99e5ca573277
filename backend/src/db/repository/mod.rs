//! Repository trait definitions for database operations.
//!
//! The persistence gateway is split into two focused traits, one per entity.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`article`]: Article CRUD, soft delete and eager loading of comments
//! - [`comment`]: Comment creation, listing and soft delete
//!
//! # Convenience Trait Bound
//!
//! For functions that need both capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn article_with_comments<R: FullRepository + ?Sized>(
//!     repo: &R,
//!     id: ArticleId,
//! ) -> RepositoryResult<(Article, Vec<Comment>)> {
//!     let article = repo.get_article(id).await?;
//!     let comments = repo.list_comments_for_article(id, false).await?;
//!     Ok((article, comments))
//! }
//! ```

pub mod article;
pub mod comment;
pub mod error;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use article::ArticleRepository;
pub use comment::CommentRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both entity traits.
pub trait FullRepository: ArticleRepository + CommentRepository {}

impl<T> FullRepository for T where T: ArticleRepository + CommentRepository {}
