//! Property-based lexer tests over arbitrary inputs, in the style of the
//! teacher's own `faxc-lex` proptest suite: generate a whole input string
//! and check a structural property of the single token it should produce.

use pscc_util::Handler;
use proptest::prelude::*;

fn lex_one(source: &str) -> pscc_lex::Token {
    let mut handler = Handler::new();
    let mut lexer = pscc_lex::Lexer::new(source, &mut handler);
    lexer.next_token()
}

proptest! {
    /// Any ASCII-letter-or-underscore-led run of word characters lexes as a
    /// single token (an identifier, or a reserved word if the spelling
    /// happens to match one) that consumes the entire input.
    #[test]
    fn arbitrary_identifiers_lex_as_a_single_whole_input_token(
        input in "[a-zA-Z_][a-zA-Z0-9_]{0,64}"
    ) {
        let mut handler = Handler::new();
        let mut lexer = pscc_lex::Lexer::new(&input, &mut handler);
        let token = lexer.next_token();
        prop_assert!(!matches!(token, pscc_lex::Token::Invalid(_) | pscc_lex::Token::Eof));
        prop_assert_eq!(lexer.token_span().end, input.len());
        prop_assert_eq!(lexer.next_token(), pscc_lex::Token::Eof);
    }

    /// Any run of decimal digits lexes as a single integer literal token
    /// whose value matches the plain `i64` parse of the same digits, as
    /// long as the digits fit (the lexer itself never overflow-checks here).
    #[test]
    fn arbitrary_digit_runs_lex_as_the_same_integer(
        digits in "[0-9]{1,15}"
    ) {
        let token = lex_one(&digits);
        let expected: i64 = digits.parse().unwrap();
        prop_assert_eq!(token, pscc_lex::Token::IntLiteral(expected));
    }

    /// A digit run followed by a decimal point and another digit run
    /// always lexes as a single real literal, never splitting at the dot
    /// the way a bare `lo..hi` range would.
    #[test]
    fn arbitrary_decimal_literals_lex_as_a_single_real(
        whole in "[0-9]{1,8}", frac in "[0-9]{1,8}"
    ) {
        let source = format!("{whole}.{frac}");
        let token = lex_one(&source);
        prop_assert!(matches!(token, pscc_lex::Token::RealLiteral(_)));
    }

    /// Any quote-and-newline-free text, wrapped in single quotes, lexes as
    /// one string literal carrying exactly that content (no escapes are
    /// recognized in this language beyond the doubled-quote rule).
    #[test]
    fn arbitrary_string_bodies_round_trip_through_the_lexer(
        body in "[a-zA-Z0-9 ]{0,64}"
    ) {
        let source = format!("'{body}'");
        let token = lex_one(&source);
        match token {
            pscc_lex::Token::StringLiteral(sym) => prop_assert_eq!(sym.as_str(), body.as_str()),
            other => prop_assert!(false, "expected a string literal, got {other:?}"),
        }
    }

    /// Leading whitespace never changes which token comes out, only where
    /// it starts.
    #[test]
    fn leading_whitespace_does_not_change_the_next_token(spaces in 0..32usize) {
        let padded = format!("{}begin", " ".repeat(spaces));
        prop_assert_eq!(lex_one(&padded), pscc_lex::Token::KwBegin);
    }
}
