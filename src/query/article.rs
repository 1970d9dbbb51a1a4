// src/query/article.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{error::AppError, models::article::ArticleResponse};

use super::{escape_like, page_offset};

/// Default recency window for `recent` and `hot_articles`, in days.
pub const DEFAULT_RECENT_DAYS: i64 = 7;

/// Recency window for `trending`, in days.
pub const TRENDING_DAYS: i64 = 3;

/// Minimum approved-comment threshold enforced by `trending`.
pub const TRENDING_MIN_COMMENTS: i64 = 5;

/// Maximum number of rows returned by `trending`.
pub const TRENDING_LIMIT: i64 = 5;

/// Tag membership filter: any tag at all, or any of the named tags.
#[derive(Debug, Clone)]
enum TagFilter {
    Any,
    Named(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ArticleOrder {
    /// Stable identity order for reproducible listing pages.
    #[default]
    ById,
    /// Approved-comment count descending, ties broken by published_at
    /// descending (most recent first).
    Trending,
}

/// Composable filter state over the articles collection.
///
/// Predicates consume and return the query by value and compose by logical
/// AND. Tag and author membership use EXISTS subqueries, so an article
/// matching several tags still counts once.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    published_only: bool,
    un_published_only: bool,
    published_since: Option<DateTime<Utc>>,
    tag_filter: Option<TagFilter>,
    search_text: Option<String>,
    author_usernames: Option<Vec<String>>,
    min_approved_comments: Option<i64>,
    order: ArticleOrder,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ArticleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// is_published = true, independent of published_at presence.
    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }

    /// is_published = false.
    pub fn un_published(mut self) -> Self {
        self.un_published_only = true;
        self
    }

    /// published() AND published_at within the last `days` days.
    pub fn recent(self, days: i64) -> Self {
        let mut query = self.published();
        query.published_since = Some(Utc::now() - Duration::days(days));
        query
    }

    /// With names: carries at least one tag in the name set.
    /// Without: carries at least one tag at all.
    pub fn tagged(mut self, tag_names: Option<Vec<String>>) -> Self {
        self.tag_filter = Some(match tag_names {
            Some(names) if !names.is_empty() => TagFilter::Named(names),
            _ => TagFilter::Any,
        });
        self
    }

    /// Case-insensitive containment match against title or content.
    pub fn search(mut self, text: &str) -> Self {
        self.search_text = Some(text.to_string());
        self
    }

    /// Article's author's underlying user's username is in the given set.
    pub fn by_author(mut self, usernames: Vec<String>) -> Self {
        self.author_usernames = Some(usernames);
        self
    }

    /// published() AND distinct approved-comment count >= `count`.
    ///
    /// Errors when `count` < 1; the threshold is never silently clamped here.
    pub fn with_approved_comments(self, count: i64) -> Result<Self, AppError> {
        if count < 1 {
            return Err(AppError::BadRequest("count can't be less than 1".to_string()));
        }

        Ok(self.min_approved(count))
    }

    /// Chaining two thresholds keeps the stricter one.
    fn min_approved(mut self, count: i64) -> Self {
        self.published_only = true;
        self.min_approved_comments = Some(match self.min_approved_comments {
            Some(existing) => existing.max(count),
            None => count,
        });
        self
    }

    /// recent(days) AND tagged(tag_names) AND approved-comment count >= 1.
    /// The threshold is fixed at 1 regardless of caller.
    pub fn hot_articles(self, days: i64, tag_names: Option<Vec<String>>) -> Self {
        self.recent(days).tagged(tag_names).min_approved(1)
    }

    /// hot_articles(days, tag_names) AND approved-comment count >=
    /// `min_comments`, ordered by (count desc, published_at desc), top 5.
    ///
    /// Errors when `min_comments` < 5.
    pub fn trending(
        self,
        min_comments: i64,
        days: i64,
        tag_names: Option<Vec<String>>,
    ) -> Result<Self, AppError> {
        if min_comments < 5 {
            return Err(AppError::BadRequest("count can't be less than 5".to_string()));
        }

        let mut query = self.hot_articles(days, tag_names).min_approved(min_comments);
        query.order = ArticleOrder::Trending;
        query.limit = Some(TRENDING_LIMIT);
        query.offset = None;
        Ok(query)
    }

    /// Deterministic tertiary ordering by identity, for stable pages.
    pub fn order_by_id(mut self) -> Self {
        self.order = ArticleOrder::ById;
        self
    }

    pub fn page(mut self, page: i64, per_page: i64) -> Self {
        self.limit = Some(per_page);
        self.offset = Some(page_offset(page, per_page));
        self
    }

    pub async fn fetch(&self, pool: &PgPool) -> Result<Vec<ArticleResponse>, AppError> {
        let mut builder = self.build();
        let articles = builder
            .build_query_as::<ArticleResponse>()
            .fetch_all(pool)
            .await?;
        Ok(articles)
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(
            "SELECT a.id, a.author_id, a.title, a.content, a.is_published, a.published_at, \
             a.created_at, a.updated_at, u.username AS author_username, \
             (SELECT COUNT(DISTINCT c.id) FROM comments c \
              WHERE c.article_id = a.id AND c.is_approved = TRUE) AS approved_comments_count \
             FROM articles a \
             JOIN authors au ON au.id = a.author_id \
             JOIN users u ON u.id = au.user_id \
             WHERE 1 = 1",
        );

        if self.published_only {
            qb.push(" AND a.is_published = TRUE");
        }
        if self.un_published_only {
            qb.push(" AND a.is_published = FALSE");
        }
        if let Some(cutoff) = self.published_since {
            qb.push(" AND a.published_at >= ");
            qb.push_bind(cutoff);
        }
        match &self.tag_filter {
            Some(TagFilter::Any) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM article_tags atg \
                     WHERE atg.article_id = a.id)",
                );
            }
            Some(TagFilter::Named(names)) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM article_tags atg \
                     JOIN tags t ON t.id = atg.tag_id \
                     WHERE atg.article_id = a.id AND t.name = ANY(",
                );
                qb.push_bind(names.clone());
                qb.push("))");
            }
            None => {}
        }
        if let Some(text) = &self.search_text {
            let pattern = format!("%{}%", escape_like(text));
            qb.push(" AND (a.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR a.content ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(usernames) = &self.author_usernames {
            qb.push(" AND u.username = ANY(");
            qb.push_bind(usernames.clone());
            qb.push(")");
        }
        if let Some(count) = self.min_approved_comments {
            qb.push(
                " AND (SELECT COUNT(DISTINCT c.id) FROM comments c \
                 WHERE c.article_id = a.id AND c.is_approved = TRUE) >= ",
            );
            qb.push_bind(count);
        }

        match self.order {
            ArticleOrder::ById => {
                qb.push(" ORDER BY a.id");
            }
            ArticleOrder::Trending => {
                qb.push(" ORDER BY approved_comments_count DESC, a.published_at DESC");
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

    #[test]
    fn with_approved_comments_rejects_count_below_one() {
        let err = ArticleQuery::new().with_approved_comments(0).unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(msg) if msg == "count can't be less than 1"
        ));
    }

    #[test]
    fn trending_rejects_min_comments_below_five() {
        let err = ArticleQuery::new().trending(3, TRENDING_DAYS, None).unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(msg) if msg == "count can't be less than 5"
        ));
    }

    #[test]
    fn recent_implies_published() {
        let query = ArticleQuery::new().recent(7);
        let sql = query.build().into_sql();
        assert!(sql.contains("a.is_published = TRUE"));
        assert!(sql.contains("a.published_at >= "));
    }

    #[test]
    fn with_approved_comments_implies_published() {
        let query = ArticleQuery::new().with_approved_comments(2).unwrap();
        let sql = query.build().into_sql();
        assert!(sql.contains("a.is_published = TRUE"));
        assert!(sql.contains(">= $1"));
    }

    #[test]
    fn tagged_without_names_requires_any_tag() {
        let sql = ArticleQuery::new().tagged(None).build().into_sql();
        assert!(sql.contains("EXISTS (SELECT 1 FROM article_tags atg"));
        assert!(!sql.contains("t.name = ANY"));
    }

    #[test]
    fn tagged_with_names_matches_the_name_set() {
        let sql = ArticleQuery::new()
            .tagged(Some(vec!["Tag 1".to_string()]))
            .build()
            .into_sql();
        assert!(sql.contains("t.name = ANY"));
    }

    #[test]
    fn tagged_with_empty_name_list_behaves_like_any_tag() {
        let sql = ArticleQuery::new().tagged(Some(vec![])).build().into_sql();
        assert!(!sql.contains("t.name = ANY"));
        assert!(sql.contains("EXISTS (SELECT 1 FROM article_tags atg"));
    }

    #[test]
    fn search_matches_title_or_content_case_insensitively() {
        let sql = ArticleQuery::new().search("rust").build().into_sql();
        assert!(sql.contains("a.title ILIKE "));
        assert!(sql.contains("a.content ILIKE "));
    }

    #[test]
    fn chained_thresholds_keep_the_stricter_one() {
        let query = ArticleQuery::new()
            .with_approved_comments(1)
            .unwrap()
            .with_approved_comments(5)
            .unwrap();
        assert_eq!(query.min_approved_comments, Some(5));

        let query = ArticleQuery::new()
            .with_approved_comments(5)
            .unwrap()
            .with_approved_comments(1)
            .unwrap();
        assert_eq!(query.min_approved_comments, Some(5));
    }

    #[test]
    fn hot_articles_fixes_the_threshold_at_one() {
        let query = ArticleQuery::new().hot_articles(DEFAULT_RECENT_DAYS, None);
        assert_eq!(query.min_approved_comments, Some(1));
        assert!(query.published_only);
        assert!(query.published_since.is_some());
        assert!(matches!(query.tag_filter, Some(TagFilter::Any)));
    }

    #[test]
    fn trending_orders_by_count_then_published_at_and_limits_to_five() {
        let query = ArticleQuery::new()
            .trending(TRENDING_MIN_COMMENTS, TRENDING_DAYS, None)
            .unwrap();
        assert_eq!(query.order, ArticleOrder::Trending);
        assert_eq!(query.limit, Some(TRENDING_LIMIT));
        assert_eq!(query.min_approved_comments, Some(5));

        let sql = query.build().into_sql();
        assert!(sql.contains("ORDER BY approved_comments_count DESC, a.published_at DESC"));
        assert!(sql.contains("LIMIT "));
    }

    #[test]
    fn default_order_is_by_id() {
        let sql = ArticleQuery::new().build().into_sql();
        assert!(sql.ends_with("ORDER BY a.id"));
    }

    #[test]
    fn page_sets_limit_and_offset() {
        let query = ArticleQuery::new().page(3, 20);
        assert_eq!(query.limit, Some(20));
        assert_eq!(query.offset, Some(40));
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let query = ArticleQuery::new().page(i64::MAX, 20);
        assert_eq!(query.offset, Some(i64::MAX));
    }
}
