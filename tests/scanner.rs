#[cfg(test)]
mod scanner_tests {
    use loxide as lox;

    use lox::scanner::*;
    use lox::token::*;

    fn scan(source: &str) -> Vec<Result<Token, lox::error::LoxError>> {
        Scanner::new(source.as_bytes().to_vec()).collect()
    }

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes().to_vec());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_one_and_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= / ;",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_line_comments_emit_no_tokens() {
        assert_token_sequence(
            "// nothing to see here\nvar // trailing\n",
            &[(TokenType::VAR, "var"), (TokenType::EOF, "")],
        );
    }

    #[test]
    fn test_scanner_04_keywords_and_identifiers() {
        assert_token_sequence(
            "class clazz fun fungus _under score99",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "clazz"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "fungus"),
                (TokenType::IDENTIFIER, "_under"),
                (TokenType::IDENTIFIER, "score99"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_string_literal_payload() {
        let results = scan("\"hello world\"");

        let token = results[0].as_ref().expect("string token");
        match &token.token_type {
            TokenType::STRING(s) => assert_eq!(s, "hello world"),
            other => panic!("expected STRING, got {:?}", other),
        }

        // The lexeme keeps the quotes; the literal drops them.
        assert_eq!(token.lexeme, "\"hello world\"");
    }

    #[test]
    fn test_scanner_06_multiline_string_tracks_lines() {
        let results = scan("\"a\nb\"\nvar");

        let string_token = results[0].as_ref().expect("string token");
        assert_eq!(string_token.token_type, TokenType::STRING(String::new()));

        let var_token = results[1].as_ref().expect("var token");
        assert_eq!(var_token.line, 3);
    }

    #[test]
    fn test_scanner_07_unterminated_string_is_an_error() {
        let results = scan("\"oops");

        let err = results[0].as_ref().expect_err("should fail");
        assert!(err.to_string().contains("Unterminated string."));
    }

    #[test]
    fn test_scanner_08_number_payloads() {
        let results = scan("42 3.25 1.");

        match &results[0].as_ref().expect("int token").token_type {
            TokenType::NUMBER(n) => assert_eq!(*n, 42.0),
            other => panic!("expected NUMBER, got {:?}", other),
        }

        match &results[1].as_ref().expect("decimal token").token_type {
            TokenType::NUMBER(n) => assert_eq!(*n, 3.25),
            other => panic!("expected NUMBER, got {:?}", other),
        }

        // A trailing dot is not part of the number.
        match &results[2].as_ref().expect("bare int token").token_type {
            TokenType::NUMBER(n) => assert_eq!(*n, 1.0),
            other => panic!("expected NUMBER, got {:?}", other),
        }
        assert_eq!(
            results[3].as_ref().expect("dot token").token_type,
            TokenType::DOT
        );
    }

    #[test]
    fn test_scanner_09_unexpected_chars_keep_scanning() {
        let results = scan(",.$(#");

        // ',' '.' Error('$') '(' Error('#') EOF
        assert_eq!(results.len(), 6);

        assert_eq!(
            results[0].as_ref().expect(",").token_type,
            TokenType::COMMA
        );
        assert_eq!(results[1].as_ref().expect(".").token_type, TokenType::DOT);
        assert_eq!(
            results[3].as_ref().expect("(").token_type,
            TokenType::LEFT_PAREN
        );
        assert_eq!(results[5].as_ref().expect("eof").token_type, TokenType::EOF);

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                err
            );
        }
    }

    #[test]
    fn test_scanner_10_exactly_one_eof_in_source_order() {
        let results = scan("var a = 1;\nprint a;");

        let tokens: Vec<Token> = results
            .into_iter()
            .map(|r| r.expect("clean source"))
            .collect();

        let eof_count = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::EOF)
            .count();
        assert_eq!(eof_count, 1);
        assert_eq!(tokens.last().expect("non-empty").token_type, TokenType::EOF);

        // Lines never decrease.
        let mut last_line = 0;
        for token in &tokens {
            assert!(token.line >= last_line);
            last_line = token.line;
        }
    }
}
