// src/models/comment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub article_id: i64,
    pub content: String,

    /// Set by a moderator action; defaults to false.
    pub is_approved: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub user_id: i64,
    pub article_id: i64,

    #[validate(length(min = 1, message = "Content cannot be blank."))]
    pub content: String,

    #[serde(default)]
    pub is_approved: bool,
}

/// DTO for listing a comment with joined user and article info.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: i64,
    pub user_id: i64,
    pub article_id: i64,
    pub username: String,
    pub article_title: String,
    pub content: String,
    pub is_approved: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Query parameters for listing comments.
#[derive(Debug, Deserialize)]
pub struct CommentListParams {
    /// 'True', 'False' or 'all' (default).
    pub approved: Option<String>,

    pub user_id: Option<i64>,

    pub page: Option<i64>,
}
