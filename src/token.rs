use bitflags::bitflags;
use itertools::{peek_nth, Itertools};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use std::fmt::{self, Display};

use crate::regex::{Error, Result};

// Byte values of the operators. CONCAT is never typed by the user, it is only
// emitted by `normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, Display)]
#[repr(u8)]
pub enum Operator {
    Concat = 0x2e,      /* '.' */
    Alternation = 0x7c, /* '|' */
    Optional = 0x3f,    /* '?' */
    Plus = 0x2b,        /* '+' */
    Star = 0x2a,        /* '*' */
}

impl Operator {
    /// Binding strength used by the shunting-yard pass, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Concat => 0,
            Operator::Alternation => 1,
            Operator::Optional | Operator::Plus | Operator::Star => 2,
        }
    }

    pub fn is_repetition(self) -> bool {
        self.precedence() == 2
    }

    /// Number of fragments the operator consumes when building the automaton.
    pub fn arity(self) -> usize {
        match self {
            Operator::Concat | Operator::Alternation => 2,
            Operator::Optional | Operator::Plus | Operator::Star => 1,
        }
    }
}

const OPEN_PAREN: u8 = b'(';
const CLOSE_PAREN: u8 = b')';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(u8),
    Operator(Operator),
    Open,
    Close,
}

bitflags! {
    // where an implicit concatenation may be placed around a token
    pub struct Affinity: u8 {
        const NONE           = 0;
        const ENDS_OPERAND   = 1;   // a marker may follow this token
        const BEGINS_OPERAND = 2;   // a marker may precede this token
    }
}

impl Token {
    pub fn affinity(self) -> Affinity {
        match self {
            Token::Literal(_) => Affinity::ENDS_OPERAND | Affinity::BEGINS_OPERAND,
            Token::Open => Affinity::BEGINS_OPERAND,
            Token::Close => Affinity::ENDS_OPERAND,
            Token::Operator(op) if op.is_repetition() => Affinity::ENDS_OPERAND,
            Token::Operator(_) => Affinity::NONE,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Token::Literal(byte) => byte,
            Token::Operator(op) => op.into(),
            Token::Open => OPEN_PAREN,
            Token::Close => CLOSE_PAREN,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.byte() as char)
    }
}

/// An immutable run of tokens produced by one pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream(Vec<Token>);

impl TokenStream {
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        TokenStream(tokens)
    }
}

impl Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

/// Classifies every byte of `pattern`.
///
/// Any byte is a legal literal except the concatenation marker, which would be
/// indistinguishable from an inserted operator once normalized.
pub fn tokenize(pattern: &[u8]) -> Result<TokenStream> {
    pattern
        .iter()
        .enumerate()
        .map(|(position, &byte)| match byte {
            OPEN_PAREN => Ok(Token::Open),
            CLOSE_PAREN => Ok(Token::Close),
            byte => match Operator::try_from(byte) {
                Ok(Operator::Concat) => Err(Error::InvalidPattern { position, byte }),
                Ok(op) => Ok(Token::Operator(op)),
                Err(_) => Ok(Token::Literal(byte)),
            },
        })
        .collect::<Result<Vec<_>>>()
        .map(TokenStream)
}

/// Makes implicit concatenation explicit, e.g. `ab` becomes `a.b`.
pub fn normalize(tokens: &TokenStream) -> TokenStream {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut iter = peek_nth(tokens.tokens().iter().copied());
    while let Some(token) = iter.next() {
        out.push(token);
        if let Some(next) = iter.peek() {
            if token.affinity().contains(Affinity::ENDS_OPERAND)
                && next.affinity().contains(Affinity::BEGINS_OPERAND)
            {
                out.push(Token::Operator(Operator::Concat));
            }
        }
    }
    let out = TokenStream(out);
    log::trace!("normalized {} into {}", tokens, out);
    out
}
