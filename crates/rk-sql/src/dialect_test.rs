use super::*;

#[test]
fn test_duckdb_parse() {
    let dialect = DuckDbDialect::new();
    let stmts = dialect
        .parse("CREATE TABLE t (id INTEGER PRIMARY KEY)")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_quote_ident() {
    let dialect = DuckDbDialect::new();
    assert_eq!(dialect.quote_ident("user"), "\"user\"");
    assert_eq!(dialect.quote_ident("user\"name"), "\"user\"\"name\"");
}

#[test]
fn test_parse_error_location() {
    let dialect = DuckDbDialect::new();
    let result = dialect.parse("CREATE TABLE t (\nid INTEGER,,\n)");
    match result {
        Err(SqlError::ParseError { line, message, .. }) => {
            assert_eq!(line, 2, "unexpected line in: {message}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_error_location() {
    assert_eq!(
        error_location("Expected: ), found: , at Line: 3, Column: 17"),
        Some((3, 17))
    );
    assert_eq!(error_location("no location here"), None);
    assert_eq!(error_location("Line: x, Column: 2"), None);
}

#[test]
fn test_tokenize_keeps_whitespace() {
    let dialect = DuckDbDialect::new();
    let tokens = dialect.tokenize("id INT").unwrap();
    let text: String = tokens.iter().map(ToString::to_string).collect();
    assert_eq!(text, "id INT");
    assert!(tokens.iter().any(|t| matches!(t, Token::Whitespace(_))));
}

#[test]
fn test_tokenize_error() {
    let dialect = DuckDbDialect::new();
    let result = dialect.tokenize("note VARCHAR DEFAULT 'unterminated");
    assert!(matches!(result, Err(SqlError::TokenizeError(_))));
}
