/// Lexical token. Words are never classified into keywords here; the
/// parser matches keywords case-insensitively where the grammar expects
/// them, so identifiers keep their original casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Number(String),
    String(String),

    LeftParen,  // (
    RightParen, // )
    LessThan,   // <
    GreaterThan, // >
    LessThanOrEqual,    // <=
    GreaterThanOrEqual, // >=
    Equal,    // =
    NotEqual, // != or <>
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Slash,    // /
    Percent,  // %
    Comma,    // ,
    Period,   // .
    Semicolon, // ;

    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{s}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LessThan => write!(f, "<"),
            Token::GreaterThan => write!(f, ">"),
            Token::LessThanOrEqual => write!(f, "<="),
            Token::GreaterThanOrEqual => write!(f, ">="),
            Token::Equal => write!(f, "="),
            Token::NotEqual => write!(f, "!="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Comma => write!(f, ","),
            Token::Period => write!(f, "."),
            Token::Semicolon => write!(f, ";"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
