//! Lexer for location offset tokens using logos

use logos::Logos;

/// Byte range in a location token
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token {
    // Range operator must win over any single-character token
    #[token("..")]
    DotDot,

    #[token("+")]
    Plus,

    #[token("*")]
    Star,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Int(u32),
}

/// Lex an offset token into tokens with spans.
///
/// Unlike a forgiving lexer this stops at the first unrecognised byte and
/// returns its span, so `"1x"` is rejected instead of read as `1`.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, Span> {
    let mut tokens = Vec::new();
    for (tok, span) in Token::lexer(input).spanned() {
        match tok {
            Ok(t) => tokens.push((t, span)),
            Err(()) => return Err(span),
        }
    }
    Ok(tokens)
}
