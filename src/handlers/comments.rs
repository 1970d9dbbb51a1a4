// src/handlers/comments.rs

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::Query;
use sqlx::PgPool;

use crate::{error::AppError, models::comment::CommentListParams, query::comment::CommentQuery};

const PAGE_SIZE: i64 = 20;

fn resolve(params: &CommentListParams) -> CommentQuery {
    let mut query = CommentQuery::new();

    match params.approved.as_deref() {
        Some("True") => query = query.approved(),
        Some("False") => query = query.non_approved(),
        _ => {}
    }

    if let Some(user_id) = params.user_id {
        query = query.by_user(user_id);
    }

    query
}

/// List comments, filterable by approval state and authoring user.
pub async fn list_comments(
    State(pool): State<PgPool>,
    Query(params): Query<CommentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::NotFound("Invalid page.".to_string()));
    }

    let comments = resolve(&params).page(page, PAGE_SIZE).fetch(&pool).await?;

    if comments.is_empty() && page > 1 {
        return Err(AppError::NotFound("Invalid page.".to_string()));
    }

    Ok(Json(comments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_values_map_to_the_three_states() {
        let mut params = CommentListParams {
            approved: Some("True".to_string()),
            user_id: None,
            page: None,
        };
        assert!(format!("{:?}", resolve(&params)).contains("approved: Some(true)"));

        params.approved = Some("False".to_string());
        assert!(format!("{:?}", resolve(&params)).contains("approved: Some(false)"));

        params.approved = Some("all".to_string());
        assert!(format!("{:?}", resolve(&params)).contains("approved: None"));
    }
}
