use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based sanitization: safe tags (like <b>, <p>) survive, dangerous
/// tags (like <script>, <iframe>) and malicious attributes (like onclick) are
/// stripped. Applied to article and comment bodies on the write path, since
/// both are user-supplied free text that ends up rendered by clients.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
