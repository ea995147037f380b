//! String literal quoting for both grammars.
//!
//! Operands are single-quoted. Operands that contain a quote character are
//! still emitted as a well-formed literal rather than a truncated one.

/// Quote `value` as a CSS attribute-value string.
pub(crate) fn css(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Quote `value` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape syntax, so a value holding both quote kinds is
/// assembled with `concat()`.
pub(crate) fn xpath(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|segment| format!("'{segment}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_are_single_quoted() {
        assert_eq!(css("submit"), "'submit'");
        assert_eq!(xpath("submit"), "'submit'");
    }

    #[test]
    fn test_css_escapes_quote_and_backslash() {
        assert_eq!(css("it's"), r"'it\'s'");
        assert_eq!(css(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_xpath_switches_to_double_quotes() {
        assert_eq!(xpath("it's"), "\"it's\"");
    }

    #[test]
    fn test_xpath_concat_for_mixed_quotes() {
        assert_eq!(
            xpath("say \"it's\""),
            "concat('say \"it', \"'\", 's\"')"
        );
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(css(""), "''");
        assert_eq!(xpath(""), "''");
    }
}
