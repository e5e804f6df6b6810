//! Hand-written scanner over canonical statement text.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes canonical statement text.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position.
    pos: usize,
    /// Byte position where the current token started.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Skips whitespace and `--` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.advance_while(char::is_whitespace);
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.advance_while(|c| c != '\n');
                continue;
            }
            break;
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.token(TokenKind::Error(message.into()))
    }

    fn scan_word(&mut self) -> Token {
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.token(TokenKind::Keyword(keyword)),
            None => self.token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans text delimited by `quote`, where a doubled quote stands for one.
    /// The opening quote has already been consumed.
    fn scan_delimited(&mut self, quote: char) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.advance()? {
                c if c == quote && self.peek() == Some(quote) => {
                    self.advance();
                    text.push(quote);
                }
                c if c == quote => return Some(text),
                c => text.push(c),
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        let mut is_float = false;
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[self.start..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => self.token(TokenKind::Float(f)),
                Err(e) => self.error(format!("invalid float {text}: {e}")),
            }
        } else {
            match text.parse::<u64>() {
                Ok(i) => self.token(TokenKind::Integer(i)),
                Err(e) => self.error(format!("invalid integer {text}: {e}")),
            }
        }
    }

    /// Scans the hex body of `X'..'`; the `X'` prefix has been consumed.
    fn scan_blob(&mut self) -> Token {
        let Some(hex) = self.scan_delimited('\'') else {
            return self.error("unterminated blob literal");
        };
        if hex.len() % 2 != 0 {
            return self.error("odd number of hex digits in blob literal");
        }
        let bytes: Result<Vec<u8>, _> = (0..hex.len())
            .step_by(2)
            .map(|i| {
                hex.get(i..i + 2)
                    .ok_or(())
                    .and_then(|pair| u8::from_str_radix(pair, 16).map_err(|_| ()))
            })
            .collect();
        match bytes {
            Ok(bytes) => self.token(TokenKind::Blob(bytes)),
            Err(()) => self.error("invalid character in blob literal"),
        }
    }

    fn scan_positional(&mut self) -> Token {
        self.advance_while(|c| c.is_ascii_digit());
        let digits = &self.input[self.start + 1..self.pos];
        match digits.parse::<u32>() {
            Ok(n) => self.token(TokenKind::Positional(n)),
            Err(_) => self.error("positional parameter requires an index, e.g. ?1"),
        }
    }

    fn scan_named(&mut self) -> Token {
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let name = &self.input[self.start + 1..self.pos];
        if name.is_empty() {
            self.error("named parameter requires a name, e.g. :id")
        } else {
            self.token(TokenKind::Named(name.to_string()))
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.token(TokenKind::Eof);
        };

        match c {
            '(' => self.token(TokenKind::LeftParen),
            ')' => self.token(TokenKind::RightParen),
            ',' => self.token(TokenKind::Comma),
            '.' => self.token(TokenKind::Dot),
            ';' => self.token(TokenKind::Semicolon),
            '+' => self.token(TokenKind::Plus),
            '-' => self.token(TokenKind::Minus),
            '*' => self.token(TokenKind::Star),
            '/' => self.token(TokenKind::Slash),
            '%' => self.token(TokenKind::Percent),
            '&' => self.token(TokenKind::BitAnd),
            '=' => self.token(TokenKind::Eq),
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.token(TokenKind::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.token(TokenKind::NotEq)
                }
                Some('<') => {
                    self.advance();
                    self.token(TokenKind::LeftShift)
                }
                _ => self.token(TokenKind::Lt),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.token(TokenKind::GtEq)
                }
                Some('>') => {
                    self.advance();
                    self.token(TokenKind::RightShift)
                }
                _ => self.token(TokenKind::Gt),
            },
            '!' if self.peek() == Some('=') => {
                self.advance();
                self.token(TokenKind::NotEq)
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.token(TokenKind::Concat)
                } else {
                    self.token(TokenKind::BitOr)
                }
            }
            '?' => self.scan_positional(),
            ':' => self.scan_named(),
            '\'' => match self.scan_delimited('\'') {
                Some(text) => self.token(TokenKind::String(text)),
                None => self.error("unterminated string literal"),
            },
            '"' => match self.scan_delimited('"') {
                Some(name) if !name.is_empty() => self.token(TokenKind::Identifier(name)),
                Some(_) => self.error("empty quoted identifier"),
                None => self.error("unterminated quoted identifier"),
            },
            'X' | 'x' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_blob()
            }
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            c => self.error(format!("unexpected character '{c}'")),
        }
    }

    /// Tokenizes the entire input, ending with an `Eof` token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_line_comment_is_skipped() {
        assert_eq!(
            kinds("DELETE -- gone\nFROM"),
            vec![
                TokenKind::Keyword(Keyword::Delete),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delete_statement() {
        assert_eq!(
            kinds("DELETE FROM Person p WHERE p.Single = TRUE"),
            vec![
                TokenKind::Keyword(Keyword::Delete),
                TokenKind::Keyword(Keyword::From),
                ident("Person"),
                ident("p"),
                TokenKind::Keyword(Keyword::Where),
                ident("p"),
                TokenKind::Dot,
                ident("Single"),
                TokenKind::Eq,
                TokenKind::Keyword(Keyword::True),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifier_is_never_a_keyword() {
        assert_eq!(
            kinds(r#""order" "say ""hi""""#),
            vec![ident("order"), ident(r#"say "hi""#), TokenKind::Eof]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 9223372036854775808 2.5 1e10 1.5e-3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Integer(9_223_372_036_854_775_808),
                TokenKind::Float(2.5),
                TokenKind::Float(1e10),
                TokenKind::Float(1.5e-3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            kinds("'it''s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_blob() {
        assert_eq!(
            kinds("X'CAFE'"),
            vec![TokenKind::Blob(vec![0xCA, 0xFE]), TokenKind::Eof]
        );
        assert!(matches!(kinds("X'ABC'")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            kinds("?1 :name"),
            vec![
                TokenKind::Positional(1),
                TokenKind::Named("name".to_string()),
                TokenKind::Eof,
            ]
        );
        assert!(matches!(kinds("? ")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= <> != < <= > >= || | & << >>"),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::BitOr,
                TokenKind::BitAnd,
                TokenKind::LeftShift,
                TokenKind::RightShift,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(kinds("'abc")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = Lexer::new("SELECT p").tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 8));
    }
}
