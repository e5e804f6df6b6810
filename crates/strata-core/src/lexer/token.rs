//! Token types for the statement lexer.

/// A half-open byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no input.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Splits `input` around the start of this span into the consumed prefix
    /// and the remaining text, clamping to the input length.
    #[must_use]
    pub fn split<'a>(&self, input: &'a str) -> (&'a str, &'a str) {
        let mut at = self.start.min(input.len());
        while !input.is_char_boundary(at) {
            at -= 1;
        }
        input.split_at(at)
    }
}

/// Reserved words of the canonical statement grammar.
///
/// Only words the grammar actually dispatches on are reserved. Type names and
/// aggregate functions are plain identifiers, so fields named `date` or `count`
/// never need quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statement heads
    Select,
    Insert,
    Upsert,
    Merge,
    Update,
    Delete,
    Create,

    // Clause heads
    From,
    Into,
    Values,
    Set,
    Where,
    Group,
    Having,
    Order,
    By,
    Limit,
    Offset,
    On,

    // Projection
    Distinct,
    New,
    As,

    // Ordering
    Asc,
    Desc,

    // DDL
    Table,
    Index,
    Unique,
    Constraint,
    Primary,
    Key,
    Check,

    // Operators and literals
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Is,
    Null,
    True,
    False,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Self; 41] = [
        Self::Select,
        Self::Insert,
        Self::Upsert,
        Self::Merge,
        Self::Update,
        Self::Delete,
        Self::Create,
        Self::From,
        Self::Into,
        Self::Values,
        Self::Set,
        Self::Where,
        Self::Group,
        Self::Having,
        Self::Order,
        Self::By,
        Self::Limit,
        Self::Offset,
        Self::On,
        Self::Distinct,
        Self::New,
        Self::As,
        Self::Asc,
        Self::Desc,
        Self::Table,
        Self::Index,
        Self::Unique,
        Self::Constraint,
        Self::Primary,
        Self::Key,
        Self::Check,
        Self::And,
        Self::Or,
        Self::Not,
        Self::In,
        Self::Between,
        Self::Like,
        Self::Is,
        Self::Null,
        Self::True,
        Self::False,
    ];

    /// Looks up a keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kw| kw.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns true if `s` would lex as a keyword.
    #[must_use]
    pub fn is_reserved(s: &str) -> bool {
        Self::from_str(s).is_some()
    }

    /// Returns the canonical (upper-case) spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Upsert => "UPSERT",
            Self::Merge => "MERGE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::From => "FROM",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Set => "SET",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::On => "ON",
            Self::Distinct => "DISTINCT",
            Self::New => "NEW",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::Unique => "UNIQUE",
            Self::Constraint => "CONSTRAINT",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Check => "CHECK",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Unsigned integer literal. Negation is applied by the parser so that
    /// `i64::MIN` survives a round trip.
    Integer(u64),
    /// Floating-point literal.
    Float(f64),
    /// String literal with quotes removed and `''` unescaped.
    String(String),
    /// Blob literal (`X'...'`).
    Blob(Vec<u8>),

    /// Identifier, quoted or not.
    Identifier(String),
    /// Reserved word.
    Keyword(Keyword),
    /// Positional parameter (`?1`).
    Positional(u32),
    /// Named parameter (`:name`).
    Named(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Concat,
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Dot,
    Semicolon,

    /// Lexical error with a description.
    Error(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// A short human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Integer(i) => format!("integer {i}"),
            Self::Float(f) => format!("float {f:?}"),
            Self::String(s) => format!("string '{s}'"),
            Self::Blob(_) => "blob".to_string(),
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::Keyword(kw) => format!("keyword {}", kw.as_str()),
            Self::Positional(n) => format!("parameter ?{n}"),
            Self::Named(name) => format!("parameter :{name}"),
            Self::Error(message) => format!("error: {message}"),
            Self::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            _ => "?",
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// Where it was scanned.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("UpSeRt"), Some(Keyword::Upsert));
        assert_eq!(Keyword::from_str("person"), None);
    }

    #[test]
    fn test_type_names_are_not_reserved() {
        for word in ["date", "text", "count", "integer", "timestamp"] {
            assert!(!Keyword::is_reserved(word), "{word} should not be reserved");
        }
    }

    #[test]
    fn test_keyword_spelling_round_trips() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_span_split() {
        let input = "DELETE FROM Person";
        let (done, rest) = Span::new(7, 11).split(input);
        assert_eq!(done, "DELETE ");
        assert_eq!(rest, "FROM Person");
        assert_eq!(Span::new(99, 99).split(input).1, "");
    }
}
