//! Parser
//!
//! Recursive descent over the token stream, producing the contract AST.
//! One contract per source text:
//!
//! ```text
//! contract Name(p: Type, ...) locks value {
//!     clause spend(q: Type, ...) requires r: amount of asset {
//!         verify expr
//!         lock expr with expr
//!         unlock expr
//!     }
//! }
//! ```

use crate::compiler::ast::{Clause, Contract, Expression, Param, Requirement, Statement};
use crate::compiler::builtins;
use crate::compiler::lexer::{lex, SpannedToken, Token};
use crate::compiler::types::Type;
use thiserror::Error;

/// Lexer and parser errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("invalid integer literal at offset {offset}")]
    InvalidIntLiteral { offset: usize },
    #[error("invalid hex literal at offset {offset}")]
    InvalidHexLiteral { offset: usize },
    #[error("expected {expected}, found {found} at offset {offset}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("unknown type \"{name}\" at offset {offset}")]
    UnknownType { name: String, offset: usize },
    #[error("trailing input after contract at offset {offset}")]
    TrailingInput { offset: usize },
}

/// Parse a contract from source text
pub fn parse(source: &str) -> Result<Contract, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let contract = parser.parse_contract()?;
    if let Some(extra) = parser.peek_spanned() {
        return Err(ParseError::TrailingInput {
            offset: extra.offset,
        });
    }
    Ok(contract)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_spanned(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self, expected: &str) -> Result<SpannedToken, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn unexpected(&self, expected: &str, found: &SpannedToken) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.token.to_string(),
            offset: found.offset,
        }
    }

    fn expect(&mut self, want: Token, expected: &str) -> Result<(), ParseError> {
        let token = self.next(expected)?;
        if token.token != want {
            return Err(self.unexpected(expected, &token));
        }
        Ok(())
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        let token = self.next(expected)?;
        match token.token {
            Token::Ident(name) => Ok(name),
            _ => Err(self.unexpected(expected, &token)),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        let expected = format!("\"{}\"", keyword);
        let token = self.next(&expected)?;
        match &token.token {
            Token::Ident(name) if name == keyword => Ok(()),
            _ => Err(self.unexpected(&expected, &token)),
        }
    }

    /// Whether the next token is the given bare word, without consuming it
    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(name)) if name == keyword)
    }

    fn parse_contract(&mut self) -> Result<Contract, ParseError> {
        self.expect_keyword("contract")?;
        let name = self.expect_ident("contract name")?;
        let params = self.parse_params()?;
        self.expect_keyword("locks")?;
        let value = self.expect_ident("value name")?;
        self.expect(Token::LBrace, "\"{\"")?;

        let mut clauses = Vec::new();
        while !matches!(self.peek(), Some(Token::RBrace)) {
            clauses.push(self.parse_clause()?);
        }
        self.expect(Token::RBrace, "\"}\"")?;

        Ok(Contract {
            name,
            value,
            params,
            clauses,
        })
    }

    fn parse_clause(&mut self) -> Result<Clause, ParseError> {
        self.expect_keyword("clause")?;
        let name = self.expect_ident("clause name")?;
        let params = self.parse_params()?;

        let mut reqs = Vec::new();
        if self.at_keyword("requires") {
            self.pos += 1;
            loop {
                reqs.push(self.parse_requirement()?);
                if matches!(self.peek(), Some(Token::Comma)) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }

        self.expect(Token::LBrace, "\"{\"")?;
        let mut statements = Vec::new();
        while !matches!(self.peek(), Some(Token::RBrace)) {
            statements.push(self.parse_statement()?);
        }
        self.expect(Token::RBrace, "\"}\"")?;

        Ok(Clause {
            name,
            params,
            reqs,
            statements,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(Token::LParen, "\"(\"")?;
        let mut params = Vec::new();
        if !matches!(self.peek(), Some(Token::RParen)) {
            loop {
                let name = self.expect_ident("parameter name")?;
                self.expect(Token::Colon, "\":\"")?;
                let typ = self.parse_type()?;
                params.push(Param { name, typ });
                if matches!(self.peek(), Some(Token::Comma)) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "\")\"")?;
        Ok(params)
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let token = self.next("type name")?;
        let name = match &token.token {
            Token::Ident(name) => name.clone(),
            _ => return Err(self.unexpected("type name", &token)),
        };
        match name.as_str() {
            "Sha3" | "Sha256" => {
                self.expect(Token::LParen, "\"(\"")?;
                let inner = self.parse_type()?;
                self.expect(Token::RParen, "\")\"")?;
                if name == "Sha3" {
                    Ok(Type::Sha3(Box::new(inner)))
                } else {
                    Ok(Type::Sha256(Box::new(inner)))
                }
            }
            _ => Type::from_name(&name).ok_or(ParseError::UnknownType {
                name,
                offset: token.offset,
            }),
        }
    }

    fn parse_requirement(&mut self) -> Result<Requirement, ParseError> {
        let name = self.expect_ident("requirement name")?;
        self.expect(Token::Colon, "\":\"")?;
        let amount = self.parse_expr(0)?;
        self.expect_keyword("of")?;
        let asset = self.parse_expr(0)?;
        Ok(Requirement {
            name,
            amount,
            asset,
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let token = self.next("statement")?;
        let keyword = match &token.token {
            Token::Ident(name) => name.clone(),
            _ => return Err(self.unexpected("statement", &token)),
        };
        match keyword.as_str() {
            "verify" => Ok(Statement::Verify(self.parse_expr(0)?)),
            "lock" => {
                let locked = self.parse_expr(0)?;
                self.expect_keyword("with")?;
                let program = self.parse_expr(0)?;
                Ok(Statement::Lock {
                    locked,
                    program,
                    index: 0,
                })
            }
            "unlock" => Ok(Statement::Unlock(self.parse_expr(0)?)),
            _ => Err(self.unexpected("\"verify\", \"lock\" or \"unlock\"", &token)),
        }
    }

    /// Precedence climbing over the binary operator table
    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Op(sym)) => match builtins::binary_op(sym) {
                    Some(op) if op.precedence >= min_precedence => op,
                    _ => break,
                },
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_expr(op.precedence + 1)?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if let Some(Token::Op(sym)) = self.peek() {
            if let Some(op) = builtins::unary_op(sym) {
                self.pos += 1;
                let expr = self.parse_unary()?;
                return Ok(Expression::Unary {
                    op,
                    expr: Box::new(expr),
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.next("expression")?;
        match token.token {
            Token::Int(n) => Ok(Expression::Integer(n)),
            Token::Bytes(data) => Ok(Expression::Bytes(data)),
            Token::Ident(name) => match name.as_str() {
                "true" => Ok(Expression::Boolean(true)),
                "false" => Ok(Expression::Boolean(false)),
                _ => {
                    let var = Expression::VarRef(name);
                    if matches!(self.peek(), Some(Token::LParen)) {
                        self.pos += 1;
                        let args = self.parse_call_args()?;
                        Ok(Expression::Call {
                            func: Box::new(var),
                            args,
                        })
                    } else {
                        Ok(var)
                    }
                }
            },
            Token::LParen => {
                let expr = self.parse_expr(0)?;
                self.expect(Token::RParen, "\")\"")?;
                Ok(expr)
            }
            Token::LBracket => {
                let mut items = Vec::new();
                if !matches!(self.peek(), Some(Token::RBracket)) {
                    loop {
                        items.push(self.parse_expr(0)?);
                        if matches!(self.peek(), Some(Token::Comma)) {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(Token::RBracket, "\"]\"")?;
                Ok(Expression::List(items))
            }
            _ => Err(self.unexpected("expression", &token)),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut args = Vec::new();
        if !matches!(self.peek(), Some(Token::RParen)) {
            loop {
                args.push(self.parse_expr(0)?);
                if matches!(self.peek(), Some(Token::Comma)) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "\")\"")?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contract_shape() {
        let src = r#"
            contract LockWithPublicKey(publicKey: PublicKey) locks value {
                clause spend(sig: Signature) {
                    verify checkTxSig(publicKey, sig)
                    unlock value
                }
            }
        "#;
        let c = parse(src).unwrap();
        assert_eq!(c.name, "LockWithPublicKey");
        assert_eq!(c.value, "value");
        assert_eq!(c.params.len(), 1);
        assert_eq!(c.params[0].typ, Type::PublicKey);
        assert_eq!(c.clauses.len(), 1);
        let clause = &c.clauses[0];
        assert_eq!(clause.name, "spend");
        assert_eq!(clause.params[0].typ, Type::Signature);
        assert_eq!(clause.statements.len(), 2);
        assert!(matches!(clause.statements[1], Statement::Unlock(_)));
    }

    #[test]
    fn test_parse_requirements() {
        let src = r#"
            contract CallOption(price: Integer, currency: Asset, seller: Program) locks underlying {
                clause exercise() requires payment: price of currency {
                    lock payment with seller
                    unlock underlying
                }
            }
        "#;
        let c = parse(src).unwrap();
        let clause = &c.clauses[0];
        assert_eq!(clause.reqs.len(), 1);
        assert_eq!(clause.reqs[0].name, "payment");
        assert_eq!(clause.reqs[0].amount.to_string(), "price");
        assert_eq!(clause.reqs[0].asset.to_string(), "currency");
    }

    #[test]
    fn test_parse_hash_subtype_param() {
        let src = r#"
            contract H(expected: Sha3(PublicKey)) locks v {
                clause c(k: PublicKey) {
                    verify sha3(k) == expected
                    unlock v
                }
            }
        "#;
        let c = parse(src).unwrap();
        assert_eq!(c.params[0].typ, Type::Sha3(Box::new(Type::PublicKey)));
    }

    #[test]
    fn test_precedence() {
        let src = r#"
            contract P(a: Integer, b: Integer, ok: Boolean) locks v {
                clause c() {
                    verify ok || a + 1 < b && !ok
                    unlock v
                }
            }
        "#;
        let c = parse(src).unwrap();
        let Statement::Verify(expr) = &c.clauses[0].statements[0] else {
            panic!("expected verify");
        };
        assert_eq!(expr.to_string(), "(ok || (((a + 1) < b) && !ok))");
    }

    #[test]
    fn test_parse_list_and_call() {
        let src = r#"
            contract M(k1: PublicKey, k2: PublicKey) locks v {
                clause c(s: Signature) {
                    verify checkTxMultiSig([k1, k2], [s])
                    unlock v
                }
            }
        "#;
        let c = parse(src).unwrap();
        let Statement::Verify(Expression::Call { args, .. }) = &c.clauses[0].statements[0] else {
            panic!("expected verify of call");
        };
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].to_string(), "[k1, k2]");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("contract C() locks v { }  trailing"),
            Err(ParseError::TrailingInput { .. })
        ));
        assert!(matches!(
            parse("contract C(p: Bogus) locks v { }"),
            Err(ParseError::UnknownType { .. })
        ));
        assert!(matches!(
            parse("contract C() locks v { clause c() { spend v } }"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse("contract C() locks v {"),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }
}
