//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Path and body rejections are taken as
//! `Result` so they surface through [`AppError`] as JSON 400 responses.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use super::dto::{CreateArticleRequest, CreateCommentRequest, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Article, ArticleId, Comment, CommentId, FieldMap};
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Articles
// =============================================================================

/// GET /articles
///
/// List all active articles, each with its comments attached.
pub async fn list_articles(State(state): State<AppState>) -> HandlerResult<Vec<Article>> {
    let articles = db_services::list_articles(state.repository.as_ref()).await?;
    Ok(Json(articles))
}

/// GET /articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Article> {
    let Path(id) = path?;
    let article = db_services::get_article(state.repository.as_ref(), ArticleId::new(id)).await?;
    Ok(Json(article))
}

/// POST /articles
pub async fn create_article(
    State(state): State<AppState>,
    body: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> HandlerResult<Article> {
    let Json(request) = body?;
    let article = db_services::create_article(state.repository.as_ref(), &request.into()).await?;
    Ok(Json(article))
}

/// PATCH /articles/{id}
///
/// The body is a JSON object naming any subset of `title`, `author` and
/// `content`. Responds with the full article as stored after the update.
pub async fn update_article(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<FieldMap>, JsonRejection>,
) -> HandlerResult<Article> {
    let Path(id) = path?;
    let Json(fields) = body?;
    let patch = db_services::article_patch_from_fields(&fields)?;

    let article =
        db_services::update_article(state.repository.as_ref(), ArticleId::new(id), &patch).await?;
    Ok(Json(article))
}

/// DELETE /articles/{id}
pub async fn delete_article(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    db_services::delete_article(state.repository.as_ref(), ArticleId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Comments
// =============================================================================

/// GET /articles/{id}/comments
///
/// Every comment ever recorded against the article, soft-deleted ones included.
pub async fn list_comments(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Vec<Comment>> {
    let Path(article_id) = path?;
    let comments =
        db_services::list_comments(state.repository.as_ref(), ArticleId::new(article_id)).await?;
    Ok(Json(comments))
}

/// POST /articles/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> HandlerResult<Comment> {
    let Path(article_id) = path?;
    let Json(request) = body?;
    let article_id = ArticleId::new(article_id);

    let comment = db_services::create_comment(
        state.repository.as_ref(),
        article_id,
        request.into_new_comment(article_id),
    )
    .await?;
    Ok(Json(comment))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    db_services::delete_comment(state.repository.as_ref(), CommentId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
