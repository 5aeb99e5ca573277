//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository traits
//! suitable for unit testing and local development. All data is kept in
//! ordered maps behind a `RwLock`, giving fast, deterministic and isolated
//! execution with the same soft-delete semantics as the SQLite backend.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::{Article, ArticleId, ArticlePatch, Comment, CommentId, NewArticle, NewComment};
use crate::db::repository::*;

/// In-memory local repository.
///
/// # Example
/// ```
/// use blog_backend::api::NewArticle;
/// use blog_backend::db::repositories::LocalRepository;
/// use blog_backend::db::repository::ArticleRepository;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.insert_article(&NewArticle::new("T", "A", "C")).await.unwrap();
///
///     let articles = repo.list_articles(true).await.unwrap();
///     assert_eq!(articles.len(), 1);
/// });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    // Stored with `comments: None`; comments live in their own map.
    articles: BTreeMap<ArticleId, Article>,
    comments: BTreeMap<CommentId, Comment>,

    // ID counters
    next_article_id: i64,
    next_comment_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            articles: BTreeMap::new(),
            comments: BTreeMap::new(),
            next_article_id: 1,
            next_comment_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn active_comments_of(&self, article_id: ArticleId) -> Vec<Comment> {
        self.comments
            .values()
            .filter(|c| c.article_id == article_id && !c.is_deleted())
            .cloned()
            .collect()
    }
}

/// Mirror of SQLite's NOT NULL failure for a missing required column.
fn require(
    table: &str,
    column: &str,
    value: &Option<String>,
    operation: &str,
) -> RepositoryResult<String> {
    value.clone().ok_or_else(|| {
        RepositoryError::query_with_context(
            format!("NOT NULL constraint failed: {}.{}", table, column),
            ErrorContext::new(operation).with_entity(table),
        )
    })
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) -> RepositoryResult<()> {
        self.write()?.is_healthy = healthy;
        Ok(())
    }

    /// Clear all data from the repository.
    pub fn clear(&self) -> RepositoryResult<()> {
        let mut data = self.write()?;
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
        Ok(())
    }

    /// Number of stored articles, soft-deleted ones included.
    pub fn article_count(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.articles.len())
    }

    /// Number of stored comments, soft-deleted ones included.
    pub fn comment_count(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.comments.len())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, LocalData>> {
        self.data
            .read()
            .map_err(|e| RepositoryError::internal(format!("Lock poisoned: {}", e)))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, LocalData>> {
        self.data
            .write()
            .map_err(|e| RepositoryError::internal(format!("Lock poisoned: {}", e)))
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.read()?.is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn active_article(data: &LocalData, id: ArticleId) -> RepositoryResult<Article> {
        data.articles
            .get(&id)
            .filter(|a| !a.is_deleted())
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Article {} not found", id),
                    ErrorContext::new("get_article")
                        .with_entity("article")
                        .with_entity_id(id),
                )
            })
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.read()?.is_healthy)
    }

    async fn list_articles(&self, with_comments: bool) -> RepositoryResult<Vec<Article>> {
        self.check_health()?;
        let data = self.read()?;

        let articles = data
            .articles
            .values()
            .filter(|a| !a.is_deleted())
            .map(|a| {
                let mut article = a.clone();
                if with_comments {
                    article.comments = Some(data.active_comments_of(article.id));
                }
                article
            })
            .collect();

        Ok(articles)
    }

    async fn get_article(&self, id: ArticleId) -> RepositoryResult<Article> {
        self.check_health()?;
        let data = self.read()?;
        Self::active_article(&data, id)
    }

    async fn find_article_unscoped(&self, id: ArticleId) -> RepositoryResult<Option<Article>> {
        self.check_health()?;
        Ok(self.read()?.articles.get(&id).cloned())
    }

    async fn insert_article(&self, article: &NewArticle) -> RepositoryResult<Article> {
        self.check_health()?;

        let title = require("articles", "title", &article.title, "insert_article")?;
        let author = require("articles", "author", &article.author, "insert_article")?;
        let content = require("articles", "content", &article.content, "insert_article")?;

        let mut data = self.write()?;
        let id = ArticleId::new(data.next_article_id);
        data.next_article_id += 1;

        let now = Utc::now();
        let stored = Article {
            id,
            title,
            author,
            content,
            comments: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        data.articles.insert(id, stored.clone());

        Ok(stored)
    }

    async fn update_article_fields(
        &self,
        id: ArticleId,
        patch: &ArticlePatch,
    ) -> RepositoryResult<Article> {
        self.check_health()?;
        let mut data = self.write()?;

        if !patch.is_empty() {
            if let Some(article) = data.articles.get_mut(&id).filter(|a| !a.is_deleted()) {
                patch.apply_to(article);
                article.updated_at = Utc::now();
            }
        }

        Self::active_article(&data, id).map_err(|e| e.with_operation("update_article_fields"))
    }

    async fn soft_delete_article(&self, id: ArticleId) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.write()?;

        match data.articles.get_mut(&id).filter(|a| !a.is_deleted()) {
            Some(article) => {
                article.deleted_at = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl CommentRepository for LocalRepository {
    async fn list_comments_for_article(
        &self,
        article_id: ArticleId,
        include_deleted: bool,
    ) -> RepositoryResult<Vec<Comment>> {
        self.check_health()?;
        let data = self.read()?;

        Ok(data
            .comments
            .values()
            .filter(|c| c.article_id == article_id && (include_deleted || !c.is_deleted()))
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        self.check_health()?;

        let name = require("comments", "name", &comment.name, "insert_comment")?;
        let body = require("comments", "comment", &comment.comment, "insert_comment")?;

        let mut data = self.write()?;
        let id = CommentId::new(data.next_comment_id);
        data.next_comment_id += 1;

        let now = Utc::now();
        let stored = Comment {
            id,
            article_id: comment.article_id,
            name,
            comment: body,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        data.comments.insert(id, stored.clone());

        Ok(stored)
    }

    async fn soft_delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.write()?;

        match data.comments.get_mut(&id).filter(|c| !c.is_deleted()) {
            Some(comment) => {
                comment.deleted_at = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_comment_unscoped(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        self.check_health()?;
        Ok(self.read()?.comments.get(&id).cloned())
    }
}
