// src/models/tag.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'tags' table in the database.
/// Many-to-many with articles via 'article_tags'.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new tag.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(
        min = 1,
        max = 64,
        message = "Name length must be between 1 and 64 characters."
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "Description must be at most 255 characters."))]
    pub description: String,
}
