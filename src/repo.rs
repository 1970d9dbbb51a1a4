// src/repo.rs
//
// Write and by-id read path. Each create validates its DTO first (per-field
// errors), sanitizes free-text content, then performs a single-record insert;
// mandatory relations are enforced by the database constraints.

use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        article::{Article, ArticleResponse, CreateArticleRequest},
        author::{Author, CreateAuthorRequest},
        comment::{Comment, CreateCommentRequest},
        tag::{CreateTagRequest, Tag},
        user::{CreateUserRequest, User},
    },
    utils::html::clean_html,
};

pub async fn create_user(pool: &PgPool, payload: &CreateUserRequest) -> Result<User, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password, first_name, last_name, gender) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&payload.password)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.gender)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn create_author(
    pool: &PgPool,
    payload: &CreateAuthorRequest,
) -> Result<Author, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let author = sqlx::query_as::<_, Author>(
        "INSERT INTO authors (user_id, bio) VALUES ($1, $2) RETURNING *",
    )
    .bind(payload.user_id)
    .bind(&payload.bio)
    .fetch_one(pool)
    .await?;

    Ok(author)
}

pub async fn create_tag(pool: &PgPool, payload: &CreateTagRequest) -> Result<Tag, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(pool)
    .await?;

    Ok(tag)
}

pub async fn create_article(
    pool: &PgPool,
    payload: &CreateArticleRequest,
) -> Result<Article, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let article = sqlx::query_as::<_, Article>(
        "INSERT INTO articles (author_id, title, content, is_published, published_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(payload.author_id)
    .bind(&payload.title)
    .bind(clean_html(&payload.content))
    .bind(payload.is_published)
    .bind(payload.published_at)
    .fetch_one(pool)
    .await?;

    Ok(article)
}

/// Attach tags to an article. Already-attached tags are left untouched.
pub async fn add_article_tags(
    pool: &PgPool,
    article_id: i64,
    tag_ids: &[i64],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    for tag_id in tag_ids {
        sqlx::query(
            "INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(article_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn create_comment(
    pool: &PgPool,
    payload: &CreateCommentRequest,
) -> Result<Comment, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (user_id, article_id, content, is_approved) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(payload.user_id)
    .bind(payload.article_id)
    .bind(clean_html(&payload.content))
    .bind(payload.is_approved)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Fetch a single article by id, with author info and approved-comment count.
pub async fn get_article(pool: &PgPool, id: i64) -> Result<ArticleResponse, AppError> {
    let article = sqlx::query_as::<_, ArticleResponse>(
        "SELECT a.id, a.author_id, a.title, a.content, a.is_published, a.published_at, \
         a.created_at, a.updated_at, u.username AS author_username, \
         (SELECT COUNT(DISTINCT c.id) FROM comments c \
          WHERE c.article_id = a.id AND c.is_approved = TRUE) AS approved_comments_count \
         FROM articles a \
         JOIN authors au ON au.id = a.author_id \
         JOIN users u ON u.id = au.user_id \
         WHERE a.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Article not found".to_string()))?;

    Ok(article)
}

/// Fetch the tag names attached to an article, in attachment-id order.
pub async fn get_article_tag_names(pool: &PgPool, article_id: i64) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT t.name FROM tags t \
         JOIN article_tags atg ON atg.tag_id = t.id \
         WHERE atg.article_id = $1 \
         ORDER BY t.id",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(names)
}
