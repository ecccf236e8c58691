//! Cache types for catalog responses.

/// Cache key for catalog listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// The full product listing.
    Catalog,
    /// Search results for a query, as returned by [`normalize_search`].
    Search(String),
}

/// Search text as sent to the backend and used as the cache key.
///
/// Queries differing only in case or surrounding whitespace share an entry.
pub fn normalize_search(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search(" Running SHOES "), "running shoes");
        assert_eq!(
            CacheKey::Search(normalize_search("  Shoes ")),
            CacheKey::Search(normalize_search("shoes"))
        );
        assert_ne!(CacheKey::Search(normalize_search("shoes")), CacheKey::Catalog);
    }
}
