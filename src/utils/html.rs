// src/utils/html.rs

/// Sanitizes administrator-entered text (titles, descriptions, question and
/// option text) before it is stored.
///
/// Whitelist based: safe inline tags survive, `<script>` and event-handler
/// attributes are stripped along with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// `clean_html` over an optional field, dropping values that sanitize to empty.
pub fn clean_optional(input: Option<&str>) -> Option<String> {
    input
        .map(clean_html)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_removed() {
        assert_eq!(clean_html("Knots<script>alert(1)</script>"), "Knots");
        assert_eq!(clean_html("<b>Bold</b>"), "<b>Bold</b>");
    }

    #[test]
    fn test_clean_optional_drops_empty() {
        assert_eq!(clean_optional(Some("<script>x</script>")), None);
        assert_eq!(clean_optional(None), None);
        assert_eq!(clean_optional(Some(" hi ")).as_deref(), Some("hi"));
    }
}
