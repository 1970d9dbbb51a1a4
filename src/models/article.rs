// src/models/article.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'articles' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,

    pub is_published: bool,

    /// Set independently of is_published: an article may be flagged published
    /// without a timestamp, or carry a timestamp while unpublished.
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new article.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    pub author_id: i64,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Title length must be between 1 and 255 characters."
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Content cannot be blank."))]
    pub content: String,

    #[serde(default)]
    pub is_published: bool,

    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for listing an article, including joined author info and the distinct
/// approved-comment count used by the ranking views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ArticleResponse {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub author_username: String,
    pub approved_comments_count: i64,
}

/// Query parameters for listing articles.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    /// Case-insensitive match against title or content.
    pub search: Option<String>,

    /// Recency window in days.
    pub days: Option<i64>,

    /// 'True', 'False' or 'all' (default).
    pub published: Option<String>,

    #[serde(rename = "author_names[]", default)]
    pub author_names: Vec<String>,

    /// Named ranking view: 'hot' or 'trending'.
    pub special: Option<String>,

    /// Flag: restrict to articles carrying at least one tag.
    pub tagged: Option<String>,

    #[serde(rename = "tag_names[]", default)]
    pub tag_names: Vec<String>,

    /// Flag: restrict to articles with at least one approved comment.
    pub with_approved_comment: Option<String>,

    /// Approved-comment threshold, used together with the flag above.
    pub comments_count: Option<i64>,

    pub page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlong_title_is_rejected() {
        let request = CreateArticleRequest {
            author_id: 1,
            title: "A".repeat(256),
            content: "Article content".to_string(),
            is_published: false,
            published_at: None,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn blank_title_and_content_are_rejected() {
        let request = CreateArticleRequest {
            author_id: 1,
            title: String::new(),
            content: String::new(),
            is_published: false,
            published_at: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("content"));
    }
}
