/// Escapes the five HTML-significant characters in a single left-to-right
/// pass. Entities produced by this function are never rescanned, so each input
/// character maps to exactly one output token.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_significant_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn empty_and_plain_input_pass_through() {
        assert_eq!(escape(""), "");
        assert_eq!(escape("Café Münster 東京"), "Café Münster 東京");
    }

    #[test]
    fn output_has_no_raw_significant_characters() {
        let inputs = ["<script>alert('x')</script>", "a&&b", "\"'\"'", "&amp;", "><><"];

        for input in inputs {
            let out = escape(input);
            assert!(!out.contains('<') && !out.contains('>'));
            assert!(!out.contains('"') && !out.contains('\''));

            // every remaining ampersand starts one of our entities
            for (i, _) in out.match_indices('&') {
                let rest = &out[i..];
                assert!(
                    ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"]
                        .iter()
                        .any(|e| rest.starts_with(e)),
                    "stray ampersand in {out:?}"
                );
            }
        }
    }

    #[test]
    fn is_not_idempotent() {
        let once = escape("<b>");
        let twice = escape(&once);

        assert_eq!(once, "&lt;b&gt;");
        assert_eq!(twice, "&amp;lt;b&amp;gt;");
        assert_eq!(twice.replace("&amp;", "&"), once);
    }
}
