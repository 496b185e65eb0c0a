//! Quoting for identifiers and string literals spliced into SQL text.

/// Double-quoted identifier; embedded double quotes are doubled.
///
/// ```
/// use rk_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("session"), r#""session""#);
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push('"');
    for c in ident.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Comma-separated quoted identifiers, no spaces: `"a","b"`
pub fn quote_ident_list<'a>(idents: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = idents.into_iter().map(quote_ident).collect();
    quoted.join(",")
}

/// Single-quoted string literal; embedded single quotes are doubled.
///
/// ```
/// use rk_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("rat's"), "'rat''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_keeps_dots() {
        assert_eq!(quote_ident("lab.subject"), r#""lab.subject""#);
        assert_eq!(quote_ident(""), r#""""#);
    }

    #[test]
    fn test_quote_ident_list() {
        assert_eq!(quote_ident_list(["subject_id", "sess\"ion"]), r#""subject_id","sess""ion""#);
        assert_eq!(quote_ident_list(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_quote_literal_cannot_close_early() {
        assert_eq!(quote_literal(""), "''");
        assert_eq!(
            quote_literal("x'); DROP TABLE lab.subject; --"),
            "'x''); DROP TABLE lab.subject; --'"
        );
    }
}
