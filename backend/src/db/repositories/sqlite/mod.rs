//! SQLite repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - WAL journal mode and a busy timeout on every pooled connection
//! - Automatic migration execution at construction
//!
//! Connection settings come from [`SqliteConfig`].

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::{debug, info};

use crate::api::{Article, ArticleId, ArticlePatch, Comment, CommentId, NewArticle, NewComment};
use crate::db::repo_config::SqliteConfig;
use crate::db::repository::{
    ArticleRepository, CommentRepository, ErrorContext, RepositoryError, RepositoryResult,
};

mod models;
mod schema;

use models::*;
use schema::*;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/sqlite/migrations");

/// Pragmas applied to every connection handed out by the pool.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Diesel-backed repository for SQLite.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    config: SqliteConfig,
}

impl SqliteRepository {
    /// Open (or create) the database file and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(SqliteRepository)` on success
    /// * `Err(RepositoryError)` if the file cannot be opened or migrations fail
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_path);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout_ms: config.busy_timeout_ms,
            }))
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("path={}", config.database_path)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(path = %config.database_path, "SQLite repository ready");

        Ok(Self { pool, config })
    }

    /// The configuration this repository was opened with.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut SqliteConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a blocking database operation on the blocking thread pool.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new(operation),
                )
            })?;
            f(&mut conn).map_err(|e| e.with_operation(operation))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn article_not_found(id: i64) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Article {} not found", id),
        ErrorContext::new("get_article")
            .with_entity("article")
            .with_entity_id(id),
    )
}

fn load_active_article(conn: &mut SqliteConnection, id: i64) -> RepositoryResult<Article> {
    articles::table
        .filter(articles::id.eq(id))
        .filter(articles::deleted_at.is_null())
        .select(ArticleRow::as_select())
        .first::<ArticleRow>(conn)
        .optional()?
        .map(ArticleRow::into_article)
        .ok_or_else(|| article_not_found(id))
}

#[async_trait]
impl ArticleRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn list_articles(&self, with_comments: bool) -> RepositoryResult<Vec<Article>> {
        self.with_conn("list_articles", move |conn| {
            let rows: Vec<ArticleRow> = articles::table
                .filter(articles::deleted_at.is_null())
                .order(articles::id.asc())
                .select(ArticleRow::as_select())
                .load(conn)?;

            if !with_comments {
                return Ok(rows.into_iter().map(ArticleRow::into_article).collect());
            }

            // No bind parameter per article: SQLite caps them at 32766.
            let comment_rows: Vec<CommentRow> = comments::table
                .inner_join(articles::table)
                .filter(comments::deleted_at.is_null())
                .filter(articles::deleted_at.is_null())
                .order(comments::id.asc())
                .select(CommentRow::as_select())
                .load(conn)?;

            let grouped = comment_rows.grouped_by(&rows);

            Ok(rows
                .into_iter()
                .zip(grouped)
                .map(|(row, children)| {
                    let mut article = row.into_article();
                    article.comments = Some(children.into_iter().map(Comment::from).collect());
                    article
                })
                .collect())
        })
        .await
    }

    async fn get_article(&self, id: ArticleId) -> RepositoryResult<Article> {
        let id = id.value();
        self.with_conn("get_article", move |conn| load_active_article(conn, id))
            .await
    }

    async fn find_article_unscoped(&self, id: ArticleId) -> RepositoryResult<Option<Article>> {
        let id = id.value();
        self.with_conn("find_article_unscoped", move |conn| {
            let row = articles::table
                .find(id)
                .select(ArticleRow::as_select())
                .first::<ArticleRow>(conn)
                .optional()?;
            Ok(row.map(ArticleRow::into_article))
        })
        .await
    }

    async fn insert_article(&self, article: &NewArticle) -> RepositoryResult<Article> {
        let row = NewArticleRow::new(article, now());
        self.with_conn("insert_article", move |conn| {
            let inserted = diesel::insert_into(articles::table)
                .values(&row)
                .returning(ArticleRow::as_returning())
                .get_result::<ArticleRow>(conn)?;
            Ok(inserted.into_article())
        })
        .await
    }

    async fn update_article_fields(
        &self,
        id: ArticleId,
        patch: &ArticlePatch,
    ) -> RepositoryResult<Article> {
        let id = id.value();
        let changeset = (!patch.is_empty()).then(|| ArticleChangeset::new(patch, now()));

        self.with_conn("update_article_fields", move |conn| {
            if let Some(changeset) = changeset {
                let updated = diesel::update(
                    articles::table
                        .filter(articles::id.eq(id))
                        .filter(articles::deleted_at.is_null()),
                )
                .set(&changeset)
                .execute(conn)?;
                debug!(article_id = id, rows = updated, "article update applied");
            }

            load_active_article(conn, id)
        })
        .await
    }

    async fn soft_delete_article(&self, id: ArticleId) -> RepositoryResult<usize> {
        let id = id.value();
        self.with_conn("soft_delete_article", move |conn| {
            let affected = diesel::update(
                articles::table
                    .filter(articles::id.eq(id))
                    .filter(articles::deleted_at.is_null()),
            )
            .set(articles::deleted_at.eq(Some(now())))
            .execute(conn)?;
            Ok(affected)
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for SqliteRepository {
    async fn list_comments_for_article(
        &self,
        article_id: ArticleId,
        include_deleted: bool,
    ) -> RepositoryResult<Vec<Comment>> {
        let article_id = article_id.value();
        self.with_conn("list_comments_for_article", move |conn| {
            let mut query = comments::table
                .filter(comments::article_id.eq(article_id))
                .select(CommentRow::as_select())
                .into_boxed();
            if !include_deleted {
                query = query.filter(comments::deleted_at.is_null());
            }

            let rows: Vec<CommentRow> = query.order(comments::id.asc()).load(conn)?;
            Ok(rows.into_iter().map(Comment::from).collect())
        })
        .await
    }

    async fn insert_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        let row = NewCommentRow::new(comment, now());
        self.with_conn("insert_comment", move |conn| {
            let inserted = diesel::insert_into(comments::table)
                .values(&row)
                .returning(CommentRow::as_returning())
                .get_result::<CommentRow>(conn)?;
            Ok(Comment::from(inserted))
        })
        .await
    }

    async fn soft_delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        let id = id.value();
        self.with_conn("soft_delete_comment", move |conn| {
            let affected = diesel::update(
                comments::table
                    .filter(comments::id.eq(id))
                    .filter(comments::deleted_at.is_null()),
            )
            .set(comments::deleted_at.eq(Some(now())))
            .execute(conn)?;
            Ok(affected)
        })
        .await
    }

    async fn find_comment_unscoped(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        let id = id.value();
        self.with_conn("find_comment_unscoped", move |conn| {
            let row = comments::table
                .find(id)
                .select(CommentRow::as_select())
                .first::<CommentRow>(conn)
                .optional()?;
            Ok(row.map(Comment::from))
        })
        .await
    }
}
