//! Offset token parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::LocationError;
use crate::location::lexer::{lex, Token};
use crate::location::spec::OffsetRange;

/// Parse one offset token (`"0"`, `"2+"`, `"0..3"`, `"1..*"`) strictly.
pub fn parse_offset_strict(input: &str) -> Result<OffsetRange, LocationError> {
    let len = input.len();

    let tokens = lex(input)
        .map_err(|span| LocationError::malformed(input, span, "unexpected character"))?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    offset_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => rich_to_location_error(input, err),
            None => LocationError::malformed(input, 0..len, "invalid offset"),
        })
}

fn offset_parser<'a, I>() -> impl Parser<'a, I, OffsetRange, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let int = select! {
        Token::Int(n) => n,
    };

    // `*` means no upper bound
    let upper = choice((just(Token::Star).to(None), int.clone().map(Some)));

    let tail = choice((
        just(Token::Plus).to(None),
        just(Token::DotDot).ignore_then(upper),
    ));

    int.then(tail.or_not())
        .try_map(|(min, tail), span| match tail {
            None => Ok(OffsetRange::exact(min)),
            Some(None) => Ok(OffsetRange::at_least(min)),
            Some(Some(max)) if max >= min => Ok(OffsetRange::between(min, max)),
            Some(Some(_)) => Err(Rich::custom(
                span,
                "range upper bound is below its lower bound",
            )),
        })
        .then_ignore(end())
}

fn rich_to_location_error(input: &str, err: Rich<'_, Token>) -> LocationError {
    use chumsky::error::RichReason;

    let reason = match err.reason() {
        RichReason::ExpectedFound { found, .. } => match found {
            Some(tok) => format!("unexpected {}", describe(tok)),
            None => "unexpected end of token".to_string(),
        },
        RichReason::Custom(msg) => msg.to_string(),
    };

    LocationError::malformed(input, err.span().into_range(), reason)
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::DotDot => "'..'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Int(n) => format!("number {}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_integer_is_exact() {
        assert_eq!(parse_offset_strict("3").unwrap(), OffsetRange::exact(3));
    }

    #[test]
    fn test_plus_is_open() {
        assert_eq!(parse_offset_strict("2+").unwrap(), OffsetRange::at_least(2));
    }

    #[test]
    fn test_star_upper_is_open() {
        assert_eq!(parse_offset_strict("0..*").unwrap(), OffsetRange::at_least(0));
    }

    #[test]
    fn test_closed_range() {
        assert_eq!(parse_offset_strict("1..4").unwrap(), OffsetRange::between(1, 4));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = parse_offset_strict("4..1").unwrap_err();
        assert!(err.to_string().contains("below its lower bound"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_offset_strict("").is_err());
        assert!(parse_offset_strict("abc").is_err());
        assert!(parse_offset_strict("1..").is_err());
        assert!(parse_offset_strict("1+2").is_err());
        assert!(parse_offset_strict("+").is_err());
    }
}
