// src/query/comment.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{error::AppError, models::comment::CommentResponse};

use super::page_offset;

/// Composable filter state over the comments collection.
/// Display order is stable by identity.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    approved: Option<bool>,
    user_id: Option<i64>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl CommentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// is_approved = true.
    pub fn approved(mut self) -> Self {
        self.approved = Some(true);
        self
    }

    /// is_approved = false.
    pub fn non_approved(mut self) -> Self {
        self.approved = Some(false);
        self
    }

    /// Authored by the given user.
    pub fn by_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn page(mut self, page: i64, per_page: i64) -> Self {
        self.limit = Some(per_page);
        self.offset = Some(page_offset(page, per_page));
        self
    }

    pub async fn fetch(&self, pool: &PgPool) -> Result<Vec<CommentResponse>, AppError> {
        let mut builder = self.build();
        let comments = builder
            .build_query_as::<CommentResponse>()
            .fetch_all(pool)
            .await?;
        Ok(comments)
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(
            "SELECT c.id, c.user_id, c.article_id, u.username, a.title AS article_title, \
             c.content, c.is_approved, c.created_at, c.updated_at \
             FROM comments c \
             JOIN users u ON u.id = c.user_id \
             JOIN articles a ON a.id = c.article_id \
             WHERE 1 = 1",
        );

        if let Some(approved) = self.approved {
            qb.push(" AND c.is_approved = ");
            qb.push_bind(approved);
        }
        if let Some(user_id) = self.user_id {
            qb.push(" AND c.user_id = ");
            qb.push_bind(user_id);
        }

        qb.push(" ORDER BY c.id");

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }
        if let Some(offset) = self.offset {
            qb.push(" OFFSET ");
            qb.push_bind(offset);
        }

        qb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_and_by_user_compose_by_intersection() {
        let query = CommentQuery::new().approved().by_user(42);
        assert_eq!(query.approved, Some(true));
        assert_eq!(query.user_id, Some(42));

        let sql = query.build().into_sql();
        assert!(sql.contains("c.is_approved = "));
        assert!(sql.contains("c.user_id = "));
    }

    #[test]
    fn non_approved_flips_the_flag() {
        let query = CommentQuery::new().non_approved();
        assert_eq!(query.approved, Some(false));
    }

    #[test]
    fn default_query_orders_by_id_without_filters() {
        let sql = CommentQuery::new().build().into_sql();
        assert!(!sql.contains("c.is_approved = $"));
        assert!(sql.ends_with("ORDER BY c.id"));
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let query = CommentQuery::new().page(i64::MAX, 20);
        assert_eq!(query.offset, Some(i64::MAX));
    }
}
