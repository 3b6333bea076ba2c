use lunac::syntax::lexer::{Lexer, decode_string_literal};
use lunac::syntax::token_type::TokenType;

#[cfg(test)]
mod tests {
    use super::*;

    fn types(input: &str) -> Vec<TokenType> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|token| token.token_type)
            .collect()
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            types("+-*/%^#&~|<>=(){}[];:,."),
            vec![
                TokenType::Plus,
                TokenType::Minus,
                TokenType::Star,
                TokenType::Slash,
                TokenType::Percent,
                TokenType::Caret,
                TokenType::Hash,
                TokenType::Ampersand,
                TokenType::Tilde,
                TokenType::Bar,
                TokenType::Lt,
                TokenType::Gt,
                TokenType::Assign,
                TokenType::LParen,
                TokenType::RParen,
                TokenType::LBrace,
                TokenType::RBrace,
                TokenType::LBracket,
                TokenType::RBracket,
                TokenType::Semicolon,
                TokenType::Colon,
                TokenType::Comma,
                TokenType::Dot,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn multi_char_tokens() {
        assert_eq!(
            types("== ~= <= >= << >> // .. ... ::"),
            vec![
                TokenType::Eq,
                TokenType::NotEq,
                TokenType::Lte,
                TokenType::Gte,
                TokenType::ShiftLeft,
                TokenType::ShiftRight,
                TokenType::DoubleSlash,
                TokenType::Concat,
                TokenType::Ellipsis,
                TokenType::DoubleColon,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn keywords_and_names() {
        assert_eq!(
            types("local function endx end goto"),
            vec![
                TokenType::Local,
                TokenType::Function,
                TokenType::Name,
                TokenType::End,
                TokenType::Goto,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn numerals_keep_their_text() {
        let tokens = Lexer::new("3 0xFF 1e10 .5 3.0 0x1p4").tokenize();
        let literals: Vec<_> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::Number)
            .map(|t| t.literal.as_str())
            .collect();
        assert_eq!(literals, vec!["3", "0xFF", "1e10", ".5", "3.0", "0x1p4"]);
    }

    #[test]
    fn malformed_numeral() {
        assert_eq!(
            types("3x"),
            vec![TokenType::MalformedNumber, TokenType::Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            types("a -- line\n--[[ long\ncomment ]] b --[==[ x ]==] c"),
            vec![
                TokenType::Name,
                TokenType::Name,
                TokenType::Name,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn unterminated_forms() {
        assert_eq!(types("'abc")[0], TokenType::UnterminatedString);
        assert_eq!(types("[[abc")[0], TokenType::UnterminatedLongString);
        assert_eq!(types("--[[abc")[0], TokenType::UnterminatedComment);
    }

    #[test]
    fn positions_are_line_and_column() {
        let tokens = Lexer::new("local x\n  = 1").tokenize();
        assert_eq!((tokens[0].position.line, tokens[0].position.column), (1, 0));
        assert_eq!((tokens[1].position.line, tokens[1].position.column), (1, 6));
        assert_eq!((tokens[2].position.line, tokens[2].position.column), (2, 2));
    }

    #[test]
    fn shebang_line_is_ignored() {
        assert_eq!(
            types("#!/usr/bin/lua\nreturn"),
            vec![TokenType::Return, TokenType::Eof]
        );
    }

    #[test]
    fn string_literals_decode_escapes() {
        assert_eq!(decode_string_literal(r#""a\tb\65\x41""#).unwrap(), b"a\tbAA");
        assert_eq!(decode_string_literal("[[\nline]]").unwrap(), b"line");
        assert_eq!(decode_string_literal(r#""\u{48}i""#).unwrap(), b"Hi");
        assert!(decode_string_literal(r#""\q""#).is_err());
    }
}
