// src/query/author.rs

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{error::AppError, models::author::AuthorResponse};

use super::page_offset;

/// Minimum approved-comment threshold enforced by `top_active_authors`.
pub const TOP_AUTHORS_MIN_COMMENTS: i64 = 5;

/// Article-tag membership filter at the author level.
#[derive(Debug, Clone)]
enum TagFilter {
    Any,
    Named(Vec<String>),
}

/// Article-ownership filter: any article, or any with a title in the set.
#[derive(Debug, Clone)]
enum ArticleFilter {
    Any,
    Titled(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AuthorOrder {
    #[default]
    ById,
    /// Approved-comment count descending. Equal counts fall back to identity
    /// order so paginated pages stay reproducible across requests.
    ByApprovedComments,
}

/// Composable filter state over the authors collection.
///
/// Ownership predicates use EXISTS subqueries, so an author with several
/// matching articles still counts once.
#[derive(Debug, Clone, Default)]
pub struct AuthorQuery {
    has_published: bool,
    has_un_published: bool,
    article_filter: Option<ArticleFilter>,
    tag_filter: Option<TagFilter>,
    active_cutoff: Option<DateTime<Utc>>,
    min_approved_comments: Option<i64>,
    order: AuthorOrder,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl AuthorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owns at least one article with is_published = true.
    pub fn with_published_articles(mut self) -> Self {
        self.has_published = true;
        self
    }

    /// Owns at least one article with is_published = false.
    pub fn with_un_published_articles(mut self) -> Self {
        self.has_un_published = true;
        self
    }

    /// Owns at least one article, optionally restricted to a title set.
    pub fn with_articles(mut self, article_titles: Option<Vec<String>>) -> Self {
        self.article_filter = Some(match article_titles {
            Some(titles) if !titles.is_empty() => ArticleFilter::Titled(titles),
            _ => ArticleFilter::Any,
        });
        self
    }

    /// Owns at least one article carrying any tag (or any of the named tags).
    pub fn with_tagged_articles(mut self, tag_names: Option<Vec<String>>) -> Self {
        self.tag_filter = Some(match tag_names {
            Some(names) if !names.is_empty() => TagFilter::Named(names),
            _ => TagFilter::Any,
        });
        self
    }

    /// Owns at least one published article with published_at >= `date_time`.
    pub fn active_since(mut self, date_time: DateTime<Utc>) -> Self {
        self.active_cutoff = Some(date_time);
        self
    }

    /// active_since(date_time) AND with_tagged_articles(tag_names), with a
    /// distinct approved-comment count across all of the author's articles of
    /// at least `min_comments`, ordered by that count descending (ties by id).
    ///
    /// Errors when `min_comments` < 5.
    pub fn top_active_authors(
        self,
        date_time: DateTime<Utc>,
        tag_names: Option<Vec<String>>,
        min_comments: i64,
    ) -> Result<Self, AppError> {
        if min_comments < 5 {
            return Err(AppError::BadRequest("count can't be less than 5".to_string()));
        }

        let mut query = self.active_since(date_time).with_tagged_articles(tag_names);
        query.min_approved_comments = Some(min_comments);
        query.order = AuthorOrder::ByApprovedComments;
        Ok(query)
    }

    pub fn order_by_id(mut self) -> Self {
        self.order = AuthorOrder::ById;
        self
    }

    pub fn page(mut self, page: i64, per_page: i64) -> Self {
        self.limit = Some(per_page);
        self.offset = Some(page_offset(page, per_page));
        self
    }

    pub async fn fetch(&self, pool: &PgPool) -> Result<Vec<AuthorResponse>, AppError> {
        let mut builder = self.build();
        let authors = builder
            .build_query_as::<AuthorResponse>()
            .fetch_all(pool)
            .await?;
        Ok(authors)
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(
            "SELECT au.id, au.user_id, u.username, u.first_name, u.last_name, au.bio, \
             au.created_at, au.updated_at, \
             (SELECT COUNT(DISTINCT c.id) FROM comments c \
              JOIN articles a ON a.id = c.article_id \
              WHERE a.author_id = au.id AND c.is_approved = TRUE) AS approved_comments_count \
             FROM authors au \
             JOIN users u ON u.id = au.user_id \
             WHERE 1 = 1",
        );

        if self.has_published {
            qb.push(
                " AND EXISTS (SELECT 1 FROM articles a \
                 WHERE a.author_id = au.id AND a.is_published = TRUE)",
            );
        }
        if self.has_un_published {
            qb.push(
                " AND EXISTS (SELECT 1 FROM articles a \
                 WHERE a.author_id = au.id AND a.is_published = FALSE)",
            );
        }
        match &self.article_filter {
            Some(ArticleFilter::Any) => {
                qb.push(" AND EXISTS (SELECT 1 FROM articles a WHERE a.author_id = au.id)");
            }
            Some(ArticleFilter::Titled(titles)) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM articles a \
                     WHERE a.author_id = au.id AND a.title = ANY(",
                );
                qb.push_bind(titles.clone());
                qb.push("))");
            }
            None => {}
        }
        match &self.tag_filter {
            Some(TagFilter::Any) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM articles a \
                     JOIN article_tags atg ON atg.article_id = a.id \
                     WHERE a.author_id = au.id)",
                );
            }
            Some(TagFilter::Named(names)) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM articles a \
                     JOIN article_tags atg ON atg.article_id = a.id \
                     JOIN tags t ON t.id = atg.tag_id \
                     WHERE a.author_id = au.id AND t.name = ANY(",
                );
                qb.push_bind(names.clone());
                qb.push("))");
            }
            None => {}
        }
        if let Some(cutoff) = self.active_cutoff {
            qb.push(
                " AND EXISTS (SELECT 1 FROM articles a \
                 WHERE a.author_id = au.id AND a.is_published = TRUE \
                 AND a.published_at >= ",
            );
            qb.push_bind(cutoff);
            qb.push(")");
        }
        if let Some(count) = self.min_approved_comments {
            qb.push(
                " AND (SELECT COUNT(DISTINCT c.id) FROM comments c \
                 JOIN articles a ON a.id = c.article_id \
                 WHERE a.author_id = au.id AND c.is_approved = TRUE) >= ",
            );
            qb.push_bind(count);
        }

        match self.order {
            AuthorOrder::ById => {
                qb.push(" ORDER BY au.id");
            }
            AuthorOrder::ByApprovedComments => {
                qb.push(" ORDER BY approved_comments_count DESC, au.id");
            }
        }

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
    use chrono::Duration;

    #[test]
    fn top_active_authors_rejects_min_comments_below_five() {
        let cutoff = Utc::now() - Duration::days(9);
        let err = AuthorQuery::new()
            .top_active_authors(cutoff, None, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(msg) if msg == "count can't be less than 5"
        ));
    }

    #[test]
    fn top_active_authors_composes_activity_tags_and_threshold() {
        let cutoff = Utc::now() - Duration::days(9);
        let query = AuthorQuery::new()
            .top_active_authors(cutoff, None, TOP_AUTHORS_MIN_COMMENTS)
            .unwrap();
        assert_eq!(query.min_approved_comments, Some(5));
        assert_eq!(query.order, AuthorOrder::ByApprovedComments);

        let sql = query.build().into_sql();
        assert!(sql.contains("a.published_at >= "));
        assert!(sql.contains("JOIN article_tags atg"));
        assert!(sql.contains("ORDER BY approved_comments_count DESC"));
    }

    #[test]
    fn ranking_order_breaks_count_ties_by_identity() {
        let cutoff = Utc::now() - Duration::days(9);
        let sql = AuthorQuery::new()
            .top_active_authors(cutoff, None, TOP_AUTHORS_MIN_COMMENTS)
            .unwrap()
            .build()
            .into_sql();
        assert!(sql.contains("ORDER BY approved_comments_count DESC, au.id"));
    }

    #[test]
    fn published_and_un_published_ownership_render_both_clauses() {
        let sql = AuthorQuery::new()
            .with_published_articles()
            .with_un_published_articles()
            .build()
            .into_sql();
        assert!(sql.contains("a.is_published = TRUE"));
        assert!(sql.contains("a.is_published = FALSE"));
    }

    #[test]
    fn with_articles_accepts_an_optional_title_set() {
        let sql = AuthorQuery::new().with_articles(None).build().into_sql();
        assert!(sql.contains("EXISTS (SELECT 1 FROM articles a WHERE a.author_id = au.id)"));

        let sql = AuthorQuery::new()
            .with_articles(Some(vec!["Published article title".to_string()]))
            .build()
            .into_sql();
        assert!(sql.contains("a.title = ANY"));
    }

    #[test]
    fn default_order_is_by_id() {
        let sql = AuthorQuery::new().build().into_sql();
        assert!(sql.ends_with("ORDER BY au.id"));
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let query = AuthorQuery::new().page(i64::MAX, 10);
        assert_eq!(query.offset, Some(i64::MAX));
    }
}
