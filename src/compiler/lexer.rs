//! Lexer
//!
//! Splits Ivy source text into tokens. `//` starts a line comment.
//! Byte-string literals are written in hex with a `0x` prefix.

use crate::compiler::parser::ParseError;
use std::fmt;

/// A source token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Bytes(Vec<u8>),
    /// An operator symbol, e.g. `==` or `&&`
    Op(&'static str),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "\"{}\"", name),
            Token::Int(n) => write!(f, "{}", n),
            Token::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Token::Op(op) => write!(f, "\"{}\"", op),
            Token::LParen => write!(f, "\"(\""),
            Token::RParen => write!(f, "\")\""),
            Token::LBrace => write!(f, "\"{{\""),
            Token::RBrace => write!(f, "\"}}\""),
            Token::LBracket => write!(f, "\"[\""),
            Token::RBracket => write!(f, "\"]\""),
            Token::Comma => write!(f, "\",\""),
            Token::Colon => write!(f, "\":\""),
        }
    }
}

/// A token with the byte offset it starts at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

/// Tokenize `source`
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '/' => {
                if bytes.get(i + 1) == Some(&b'/') {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                } else {
                    return Err(ParseError::UnexpectedChar { ch: c, offset: i });
                }
            }
            '(' => {
                tokens.push(SpannedToken { token: Token::LParen, offset: start });
                i += 1;
            }
            ')' => {
                tokens.push(SpannedToken { token: Token::RParen, offset: start });
                i += 1;
            }
            '{' => {
                tokens.push(SpannedToken { token: Token::LBrace, offset: start });
                i += 1;
            }
            '}' => {
                tokens.push(SpannedToken { token: Token::RBrace, offset: start });
                i += 1;
            }
            '[' => {
                tokens.push(SpannedToken { token: Token::LBracket, offset: start });
                i += 1;
            }
            ']' => {
                tokens.push(SpannedToken { token: Token::RBracket, offset: start });
                i += 1;
            }
            ',' => {
                tokens.push(SpannedToken { token: Token::Comma, offset: start });
                i += 1;
            }
            ':' => {
                tokens.push(SpannedToken { token: Token::Colon, offset: start });
                i += 1;
            }
            '+' => {
                tokens.push(SpannedToken { token: Token::Op("+"), offset: start });
                i += 1;
            }
            '-' => {
                tokens.push(SpannedToken { token: Token::Op("-"), offset: start });
                i += 1;
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(SpannedToken { token: Token::Op("||"), offset: start });
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar { ch: c, offset: i });
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(SpannedToken { token: Token::Op("&&"), offset: start });
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar { ch: c, offset: i });
                }
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(SpannedToken { token: Token::Op("=="), offset: start });
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar { ch: c, offset: i });
                }
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(SpannedToken { token: Token::Op("!="), offset: start });
                    i += 2;
                } else {
                    tokens.push(SpannedToken { token: Token::Op("!"), offset: start });
                    i += 1;
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(SpannedToken { token: Token::Op("<="), offset: start });
                    i += 2;
                } else {
                    tokens.push(SpannedToken { token: Token::Op("<"), offset: start });
                    i += 1;
                }
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(SpannedToken { token: Token::Op(">="), offset: start });
                    i += 2;
                } else {
                    tokens.push(SpannedToken { token: Token::Op(">"), offset: start });
                    i += 1;
                }
            }
            '0'..='9' => {
                if c == '0' && bytes.get(i + 1) == Some(&b'x') {
                    i += 2;
                    let hex_start = i;
                    while i < bytes.len() && (bytes[i] as char).is_ascii_hexdigit() {
                        i += 1;
                    }
                    let data = hex::decode(&source[hex_start..i])
                        .map_err(|_| ParseError::InvalidHexLiteral { offset: start })?;
                    tokens.push(SpannedToken { token: Token::Bytes(data), offset: start });
                } else {
                    while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                        i += 1;
                    }
                    let n = source[start..i]
                        .parse::<i64>()
                        .map_err(|_| ParseError::InvalidIntLiteral { offset: start })?;
                    tokens.push(SpannedToken { token: Token::Int(n), offset: start });
                }
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                while i < bytes.len() {
                    let c2 = bytes[i] as char;
                    if c2.is_ascii_alphanumeric() || c2 == '_' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(SpannedToken {
                    token: Token::Ident(source[start..i].to_string()),
                    offset: start,
                });
            }
            _ => return Err(ParseError::UnexpectedChar { ch: c, offset: i }),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        lex(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_lex_statement() {
        assert_eq!(
            kinds("verify a == 0xff"),
            vec![
                Token::Ident("verify".into()),
                Token::Ident("a".into()),
                Token::Op("=="),
                Token::Bytes(vec![0xff]),
            ]
        );
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("|| && != <= >= < > + - !"),
            vec![
                Token::Op("||"),
                Token::Op("&&"),
                Token::Op("!="),
                Token::Op("<="),
                Token::Op(">="),
                Token::Op("<"),
                Token::Op(">"),
                Token::Op("+"),
                Token::Op("-"),
                Token::Op("!"),
            ]
        );
    }

    #[test]
    fn test_lex_comments_and_offsets() {
        let tokens = lex("a // comment\n  b").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].token, Token::Ident("b".into()));
        assert_eq!(tokens[1].offset, 15);
    }

    #[test]
    fn test_lex_rejects_bad_chars() {
        assert!(matches!(
            lex("a $ b").unwrap_err(),
            ParseError::UnexpectedChar { ch: '$', .. }
        ));
        assert!(matches!(
            lex("a = b").unwrap_err(),
            ParseError::UnexpectedChar { ch: '=', .. }
        ));
    }

    #[test]
    fn test_lex_odd_hex_rejected() {
        assert!(matches!(
            lex("0xabc").unwrap_err(),
            ParseError::InvalidHexLiteral { .. }
        ));
    }
}
