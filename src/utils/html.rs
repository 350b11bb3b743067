/// Clean rich-text question content using the ammonia library.
///
/// Question bodies and choices come from an HTML editor. Safe formatting tags
/// (like <b>, <p>) survive; <script>, <iframe> and event-handler attributes
/// are stripped before the text is stored.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_handlers_keeps_formatting() {
        let cleaned = clean_html(r#"<p onclick="steal()">2 + 2 = <b>4</b></p>"#);
        assert_eq!(cleaned, "<p>2 + 2 = <b>4</b></p>");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(clean_html("True"), "True");
    }
}
