mod support;

use blog_backend::api::{ArticleId, ArticlePatch, CommentId, FieldMap, NewArticle, NewComment};
use blog_backend::db::repositories::LocalRepository;
use blog_backend::db::repository::{ArticleRepository, CommentRepository};
use blog_backend::db::services::{
    article_patch_from_fields, create_article, create_comment, delete_article, delete_comment,
    get_article, health_check, list_articles, list_comments, update_article,
};
use serde_json::json;

use support::seed_article;

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(health_check(&repo).await.unwrap());

    repo.set_healthy(false).unwrap();
    assert!(!health_check(&repo).await.unwrap());
}

#[tokio::test]
async fn test_create_then_get() {
    let repo = LocalRepository::new();
    let created = create_article(&repo, &NewArticle::new("T", "A", "C"))
        .await
        .unwrap();

    let fetched = get_article(&repo, created.id).await.unwrap();
    assert_eq!(fetched.title, "T");
    assert_eq!(fetched.author, "A");
    assert_eq!(fetched.content, "C");
}

#[tokio::test]
async fn test_list_articles_always_has_comment_list() {
    let repo = LocalRepository::new();
    seed_article(&repo, "One").await;
    seed_article(&repo, "Two").await;

    let articles = list_articles(&repo).await.unwrap();
    assert_eq!(articles.len(), 2);
    assert!(articles.iter().all(|a| a.comments == Some(vec![])));
}

#[tokio::test]
async fn test_update_from_field_map() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Draft").await;

    let fields: FieldMap = json!({"content": "Final"}).as_object().cloned().unwrap();
    let patch = article_patch_from_fields(&fields).unwrap();
    let updated = update_article(&repo, article.id, &patch).await.unwrap();

    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.content, "Final");
}

#[tokio::test]
async fn test_update_rejects_immutable_field() {
    let fields: FieldMap = json!({"id": 9, "title": "x"}).as_object().cloned().unwrap();
    assert!(article_patch_from_fields(&fields).is_err());
}

#[tokio::test]
async fn test_update_missing_article_is_not_found() {
    let repo = LocalRepository::new();
    let err = update_article(&repo, ArticleId::new(3), &ArticlePatch::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_article_is_idempotent() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Once").await;

    delete_article(&repo, article.id).await.unwrap();
    delete_article(&repo, article.id).await.unwrap();
    delete_article(&repo, ArticleId::new(1234)).await.unwrap();

    assert!(get_article(&repo, article.id).await.unwrap_err().is_not_found());
    let stored = repo.find_article_unscoped(article.id).await.unwrap().unwrap();
    assert!(stored.deleted_at.is_some());
}

#[tokio::test]
async fn test_create_comment_takes_article_from_path() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Target").await;
    let other = seed_article(&repo, "Other").await;

    let payload = NewComment::new(other.id, "Bob", "misdirected");
    let comment = create_comment(&repo, article.id, payload).await.unwrap();
    assert_eq!(comment.article_id, article.id);

    let listed = list_comments(&repo, article.id).await.unwrap();
    assert_eq!(listed, vec![comment]);
    assert!(list_comments(&repo, other.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_comment_still_listed() {
    let repo = LocalRepository::new();
    let article = seed_article(&repo, "Post").await;
    let comment = create_comment(&repo, article.id, NewComment::new(article.id, "Bob", "hi"))
        .await
        .unwrap();

    delete_comment(&repo, comment.id).await.unwrap();
    delete_comment(&repo, comment.id).await.unwrap();
    delete_comment(&repo, CommentId::new(999)).await.unwrap();

    let listed = list_comments(&repo, article.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].deleted_at.is_some());

    let articles = list_articles(&repo).await.unwrap();
    assert_eq!(articles[0].comments, Some(vec![]));
    assert!(repo
        .find_comment_unscoped(comment.id)
        .await
        .unwrap()
        .unwrap()
        .is_deleted());
}

#[tokio::test]
async fn test_list_comments_for_unknown_article_is_empty() {
    let repo = LocalRepository::new();
    assert!(list_comments(&repo, ArticleId::new(42)).await.unwrap().is_empty());
}
