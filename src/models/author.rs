// src/models/author.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'authors' table in the database.
/// One-to-one profile wrapping a user; cascade-deleted with it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub user_id: i64,
    pub bio: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new author profile.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAuthorRequest {
    pub user_id: i64,

    #[validate(length(max = 255, message = "Bio must be at most 255 characters."))]
    pub bio: Option<String>,
}

/// DTO for listing an author, including joined user info and the distinct
/// approved-comment count across all of the author's articles.
#[derive(Debug, Serialize, FromRow)]
pub struct AuthorResponse {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub approved_comments_count: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Query parameters for listing authors.
#[derive(Debug, Deserialize)]
pub struct AuthorListParams {
    /// Flag: short-circuit to the top-active-authors ranking view.
    pub top_active_authors: Option<String>,

    /// Activity cutoff (ISO timestamp). Defaults to 365 days before now.
    pub date_time: Option<chrono::DateTime<chrono::Utc>>,

    /// 'True', 'False' or 'all' (default).
    pub published: Option<String>,

    /// Flag: restrict to authors owning at least one article.
    pub with_articles: Option<String>,

    #[serde(rename = "article_titles[]", default)]
    pub article_titles: Vec<String>,

    /// Flag: restrict to authors owning at least one tagged article.
    pub tagged: Option<String>,

    #[serde(rename = "tag_names[]", default)]
    pub tag_names: Vec<String>,

    pub page: Option<i64>,
}
