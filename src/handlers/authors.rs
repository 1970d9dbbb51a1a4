// src/handlers/authors.rs

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::Query;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::author::AuthorListParams,
    query::author::{AuthorQuery, TOP_AUTHORS_MIN_COMMENTS},
};

use super::flag;

const PAGE_SIZE: i64 = 10;

/// Default activity cutoff when the caller supplies none: one year back.
const DEFAULT_ACTIVE_DAYS: i64 = 365;

fn resolve(params: &AuthorListParams) -> Result<AuthorQuery, AppError> {
    let date_time = params
        .date_time
        .unwrap_or_else(|| Utc::now() - Duration::days(DEFAULT_ACTIVE_DAYS));

    if flag(&params.top_active_authors) {
        return AuthorQuery::new().top_active_authors(date_time, None, TOP_AUTHORS_MIN_COMMENTS);
    }

    let mut query = AuthorQuery::new();

    match params.published.as_deref() {
        Some("True") => query = query.with_published_articles(),
        Some("False") => query = query.with_un_published_articles(),
        _ => {}
    }

    if flag(&params.with_articles) {
        let titles = (!params.article_titles.is_empty()).then(|| params.article_titles.clone());
        query = query.with_articles(titles);
    }

    if flag(&params.tagged) {
        let tag_names = (!params.tag_names.is_empty()).then(|| params.tag_names.clone());
        query = query.with_tagged_articles(tag_names);
    }

    Ok(query.active_since(date_time).order_by_id())
}

/// List authors with composable filters and the top-active-authors view.
pub async fn list_authors(
    State(pool): State<PgPool>,
    Query(params): Query<AuthorListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::NotFound("Invalid page.".to_string()));
    }

    let authors = resolve(&params)?.page(page, PAGE_SIZE).fetch(&pool).await?;

    if authors.is_empty() && page > 1 {
        return Err(AppError::NotFound("Invalid page.".to_string()));
    }

    Ok(Json(authors))
}
