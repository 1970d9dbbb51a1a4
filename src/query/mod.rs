// src/query/mod.rs
//
// Chainable filter composition over the persisted collections. Each entity
// gets a query type holding pure filter state; predicates narrow the state
// (logical AND) and `fetch` renders it into SQL with sqlx's QueryBuilder.
// Callers pass the pool explicitly; there are no ambient query entry points.

pub mod article;
pub mod author;
pub mod comment;

/// OFFSET for a 1-based page number. Saturates instead of overflowing, so an
/// absurd caller-supplied page yields an empty result rather than a panic or
/// a negative offset the database would reject.
pub(crate) fn page_offset(page: i64, per_page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(per_page).max(0)
}

/// Escape LIKE metacharacters so user-supplied search text matches literally.
pub(crate) fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn page_offset_saturates_instead_of_overflowing() {
        assert_eq!(page_offset(i64::MAX, 20), i64::MAX);
        assert_eq!(page_offset(i64::MIN, 20), 0);
        assert_eq!(page_offset(0, 20), 0);
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("100% _done_"), "100\\% \\_done\\_");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain text"), "plain text");
    }
}
