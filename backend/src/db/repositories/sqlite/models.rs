use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{articles, comments};
use crate::api::{Article, ArticleId, ArticlePatch, Comment, CommentId, NewArticle, NewComment};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl ArticleRow {
    /// Convert into the API type; `comments` stays unloaded.
    pub fn into_article(self) -> Article {
        Article {
            id: ArticleId::new(self.id),
            title: self.title,
            author: self.author,
            content: self.content,
            comments: None,
            created_at: self.created_at.and_utc(),
            updated_at: self.updated_at.and_utc(),
            deleted_at: self.deleted_at.map(|t| t.and_utc()),
        }
    }
}

/// Required columns are `Option` so that a missing value reaches SQLite and
/// trips its NOT NULL constraint.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticleRow {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewArticleRow {
    pub fn new(article: &NewArticle, now: NaiveDateTime) -> Self {
        Self {
            title: article.title.clone(),
            author: article.author.clone(),
            content: article.content.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// `None` fields are left out of the UPDATE statement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
pub struct ArticleChangeset {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl ArticleChangeset {
    pub fn new(patch: &ArticlePatch, now: NaiveDateTime) -> Self {
        Self {
            title: patch.title.clone(),
            author: patch.author.clone(),
            content: patch.content.clone(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = comments)]
#[diesel(belongs_to(ArticleRow, foreign_key = article_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CommentRow {
    pub id: i64,
    pub article_id: i64,
    pub name: String,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: CommentId::new(row.id),
            article_id: ArticleId::new(row.article_id),
            name: row.name,
            comment: row.comment,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
            deleted_at: row.deleted_at.map(|t| t.and_utc()),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow {
    pub article_id: i64,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewCommentRow {
    pub fn new(comment: &NewComment, now: NaiveDateTime) -> Self {
        Self {
            article_id: comment.article_id.value(),
            name: comment.name.clone(),
            comment: comment.comment.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
