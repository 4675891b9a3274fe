use crate::config::{DEFAULT_FUNCTION_CODE, DEFAULT_PLACEHOLDER};
use crate::literal::quote;

/// Placeholder as it appears in serialized text
pub fn quote_placeholder(placeholder: &str) -> String {
    quote(placeholder)
}

/// Replaces every quoted placeholder in `text` with function code.
///
/// Plain text substitution: a string field whose value equals the
/// placeholder is replaced as well.
pub fn rewrite_placeholders(
    text: &str,
    placeholder_literal: Option<&str>,
    replacement: Option<&str>,
) -> String {
    let default_literal;
    let literal = match placeholder_literal {
        Some(literal) => literal,
        None => {
            default_literal = quote_placeholder(DEFAULT_PLACEHOLDER);
            &default_literal
        }
    };

    text.replace(literal, replacement.unwrap_or(DEFAULT_FUNCTION_CODE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_defaults() {
        let text = format!(
            "{{\n  \"a\": {p},\n  \"b\": {{\n    \"c\": {p}\n  }}\n}}",
            p = quote_placeholder(DEFAULT_PLACEHOLDER)
        );
        assert_eq!(
            rewrite_placeholders(&text, None, None),
            "{\n  \"a\": function() {},\n  \"b\": {\n    \"c\": function() {}\n  }\n}"
        );
    }

    #[test]
    fn test_rewrite_custom() {
        let text = r#"{"a": "@fn", "b": "@fnx"}"#;
        assert_eq!(
            rewrite_placeholders(text, Some("\"@fn\""), Some("() => undefined")),
            r#"{"a": () => undefined, "b": "@fnx"}"#
        );
    }

    #[test]
    fn test_rewrite_leaves_unquoted_occurrences() {
        let text = format!(r#"{{"note": "see {DEFAULT_PLACEHOLDER} docs"}}"#);
        assert_eq!(rewrite_placeholders(&text, None, None), text);
    }
}
