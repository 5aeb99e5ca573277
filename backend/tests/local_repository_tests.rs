//! Behaviour of the in-memory repository.

mod support;

use blog_backend::api::{ArticleId, ArticlePatch, CommentId, NewArticle, NewComment};
use blog_backend::db::repositories::LocalRepository;
use blog_backend::db::repository::{ArticleRepository, CommentRepository, RepositoryError};

use support::seed_article;

// ===== articles =====

#[tokio::test]
async fn test_insert_then_get_returns_same_fields() {
    let repo = LocalRepository::new();
    let created = repo
        .insert_article(&NewArticle::new("Title", "Author", "Content"))
        .await
        .unwrap();

    let fetched = repo.get_article(created.id).await.unwrap();
    assert_eq!(fetched.title, "Title");
    assert_eq!(fetched.author, "Author");
    assert_eq!(fetched.content, "Content");
    assert!(fetched.comments.is_none());
    assert!(fetched.deleted_at.is_none());
}

#[tokio::test]
async fn test_insert_missing_field_fails_like_not_null() {
    let repo = LocalRepository::new();
    let article = NewArticle {
        title: Some("T".into()),
        author: None,
        content: Some("C".into()),
    };

    let err = repo.insert_article(&article).await.unwrap_err();
    assert!(matches!(err, RepositoryError::QueryError { .. }));
    assert!(err.to_string().contains("NOT NULL constraint failed: articles.author"));
    assert_eq!(repo.article_count().unwrap(), 0);
}

#[tokio::test]
async fn test_get_unknown_article_is_not_found() {
    let repo = LocalRepository::new();
    let err = repo.get_article(ArticleId::new(99)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_title_only_keeps_other_fields() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Old").await;

    let patch = ArticlePatch {
        title: Some("New".into()),
        ..Default::default()
    };
    let updated = repo.update_article_fields(article.id, &patch).await.unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.author, article.author);
    assert_eq!(updated.content, article.content);
    assert!(updated.updated_at >= article.updated_at);

    let fetched = repo.get_article(article.id).await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_deleted_article_is_not_found() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Gone").await;
    repo.soft_delete_article(article.id).await.unwrap();

    let patch = ArticlePatch {
        content: Some("revived".into()),
        ..Default::default()
    };
    let err = repo.update_article_fields(article.id, &patch).await.unwrap_err();
    assert!(err.is_not_found());

    let stored = repo.find_article_unscoped(article.id).await.unwrap().unwrap();
    assert_eq!(stored.content, article.content);
}

#[tokio::test]
async fn test_soft_delete_hides_article_but_keeps_row() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Doomed").await;

    assert_eq!(repo.soft_delete_article(article.id).await.unwrap(), 1);
    assert!(repo.get_article(article.id).await.unwrap_err().is_not_found());
    assert!(repo.list_articles(true).await.unwrap().is_empty());

    let stored = repo.find_article_unscoped(article.id).await.unwrap().unwrap();
    assert!(stored.deleted_at.is_some());
    assert_eq!(repo.article_count().unwrap(), 1);
}

#[tokio::test]
async fn test_soft_delete_twice_affects_nothing_second_time() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Twice").await;

    assert_eq!(repo.soft_delete_article(article.id).await.unwrap(), 1);
    assert_eq!(repo.soft_delete_article(article.id).await.unwrap(), 0);
    assert_eq!(repo.soft_delete_article(ArticleId::new(404)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_articles_attaches_active_comments() {
    let repo = LocalRepository::new();
    let first = seed_article(&repo, "First").await;
    let second = seed_article(&repo, "Second").await;

    let kept = repo
        .insert_comment(&NewComment::new(first.id, "Bob", "nice"))
        .await
        .unwrap();
    let removed = repo
        .insert_comment(&NewComment::new(first.id, "Eve", "spam"))
        .await
        .unwrap();
    repo.soft_delete_comment(removed.id).await.unwrap();

    let articles = repo.list_articles(true).await.unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].id, first.id);
    assert_eq!(articles[0].comments.as_deref(), Some(&[kept][..]));
    assert_eq!(articles[1].id, second.id);
    assert_eq!(articles[1].comments, Some(vec![]));
}

// ===== comments =====

#[tokio::test]
async fn test_list_comments_includes_soft_deleted_when_asked() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Post").await;
    let comment = repo
        .insert_comment(&NewComment::new(article.id, "Bob", "hello"))
        .await
        .unwrap();
    repo.soft_delete_comment(comment.id).await.unwrap();

    let all = repo.list_comments_for_article(article.id, true).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].deleted_at.is_some());

    let active = repo.list_comments_for_article(article.id, false).await.unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn test_comment_on_unknown_article_is_accepted() {
    let repo = LocalRepository::new();
    let comment = repo
        .insert_comment(&NewComment::new(ArticleId::new(77), "Bob", "orphan"))
        .await
        .unwrap();
    assert_eq!(comment.article_id, ArticleId::new(77));
}

#[tokio::test]
async fn test_comment_missing_body_fails_like_not_null() {
    let repo = LocalRepository::new();
    let comment = NewComment {
        article_id: ArticleId::new(1),
        name: Some("Bob".into()),
        comment: None,
    };
    let err = repo.insert_comment(&comment).await.unwrap_err();
    assert!(err.to_string().contains("comments.comment"));
    assert_eq!(repo.comment_count().unwrap(), 0);
}

#[tokio::test]
async fn test_delete_comment_is_idempotent() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Post").await;
    let comment = repo
        .insert_comment(&NewComment::new(article.id, "Bob", "hi"))
        .await
        .unwrap();

    assert_eq!(repo.soft_delete_comment(comment.id).await.unwrap(), 1);
    assert_eq!(repo.soft_delete_comment(comment.id).await.unwrap(), 0);
    assert_eq!(repo.soft_delete_comment(CommentId::new(500)).await.unwrap(), 0);

    let stored = repo.find_comment_unscoped(comment.id).await.unwrap().unwrap();
    assert!(stored.is_deleted());
    assert_eq!(repo.comment_count().unwrap(), 1);
}
