// src/handlers/mod.rs

pub mod articles;
pub mod authors;
pub mod comments;

/// Boolean query-string flags: present and non-empty means set.
pub(crate) fn flag(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_set_for_any_non_empty_value() {
        assert!(flag(&Some("1".to_string())));
        assert!(flag(&Some("0".to_string())));
        assert!(!flag(&Some(String::new())));
        assert!(!flag(&None));
    }
}
