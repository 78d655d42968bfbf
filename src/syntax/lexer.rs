//! Token definitions and the logos lexer.
//!
//! Comments (including ones carrying human-authored "expected warning"
//! hints), preprocessor lines and whitespace are trivia: they never reach
//! the parser and cannot affect parsing.

use logos::{Lexer, Logos, Skip};
use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};

/// Skip a `/* ... */` region. An unterminated comment swallows the rest of
/// the file, which matches what a C preprocessor would do.
fn lex_block_comment<'s>(lex: &mut Lexer<'s, TokenKind>) -> Skip {
    match lex.remainder().find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(lex.remainder().len()),
    }
    Skip
}

#[derive(Logos, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[token("@interface")]
    AtInterface,
    #[token("@implementation")]
    AtImplementation,
    #[token("@protocol")]
    AtProtocol,
    #[token("@class")]
    AtClass,
    #[token("@end")]
    AtEnd,
    #[token("@property")]
    AtProperty,
    #[token("@optional")]
    AtOptional,
    #[token("@required")]
    AtRequired,
    /// Any other `@word` directive (`@synthesize`, `@selector`, ...).
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    AtKeyword,
    /// Objective-C string literal, `@"..."`.
    #[regex(r#"@"([^"\\]|\\.)*""#)]
    ObjCString,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,
    #[regex(r#""([^"\\]|\\.)*""#)]
    StrLit,
    #[regex(r"'([^'\\]|\\.)+'")]
    CharLit,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,

    /// Catch-all for bytes no other pattern claims. Method bodies may
    /// contain arbitrary expression syntax; the parser only balances
    /// brackets there, so unknown characters must still become tokens.
    #[regex(r".", priority = 0)]
    Unknown,
}

impl TokenKind {
    /// Whether this token can start a top-level declaration. Used as the
    /// parser's resynchronization set after an unparsed region.
    pub fn starts_top_level(self) -> bool {
        matches!(
            self,
            TokenKind::AtInterface
                | TokenKind::AtImplementation
                | TokenKind::AtProtocol
                | TokenKind::AtClass
        )
    }
}

/// A lexed token with its text and byte range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub range: TextRange,
}

/// Lex the whole file. Never fails: unrecognized bytes come back as
/// [`TokenKind::Unknown`] tokens for the parser to deal with.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(text);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Unknown);
        let span = lexer.span();
        tokens.push(Token {
            kind,
            text: SmolStr::new(lexer.slice()),
            range: TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        });
    }

    tokens
}
