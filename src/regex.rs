use bitflags::bitflags;
use thiserror::Error;

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::matcher::Matcher;
use crate::nfa::{Builder, Fragment, Nfa};
use crate::postfix::{to_postfix, validate};
use crate::token::{normalize, tokenize, Operator, TokenStream};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("byte {byte:#04x} at position {position} is reserved and cannot be a literal")]
    InvalidPattern { position: usize, byte: u8 },
    #[error("unmatched '{paren}'")]
    UnmatchedParen { paren: char },
    #[error("operator {operator} at postfix position {position} is missing an operand")]
    MissingOperand { operator: Operator, position: usize },
    #[error("{count} sub-expressions are not joined by any operator")]
    DanglingOperand { count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

bitflags! {
    pub struct Flags: u8 {
        const STRICT_PARENS = 1;    // unmatched '(' or ')' is an error instead of being dropped
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

/// A compiled pattern.
///
/// The automaton is built once and only read afterwards, so a `Regex` can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    postfix: TokenStream,
    nfa: Nfa,
    root: Fragment,
}

impl Regex {
    /// Compiles `pattern` with the default, lenient parenthesis handling.
    pub fn new(pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern).build()
    }

    /// Whether the whole of `input` is accepted.
    pub fn is_match(&self, input: &str) -> bool {
        self.is_match_bytes(input.as_bytes())
    }

    pub fn is_match_bytes(&self, input: &[u8]) -> bool {
        Matcher::new(&self.nfa, input).is_match(self.root.start)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The pattern in postfix order, with `.` as explicit concatenation.
    pub fn postfix(&self) -> String {
        self.postfix.to_string()
    }

    pub fn state_count(&self) -> usize {
        self.nfa.len()
    }
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Regex> {
        Regex::new(s)
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} => {}", self.pattern, self.postfix)?;
        writeln!(f, "start({}) out({})", self.root.start, self.root.out)?;
        write!(f, "{}", self.nfa)
    }
}

/// Configures how a pattern is compiled.
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    pattern: String,
    flags: Flags,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> RegexBuilder {
        RegexBuilder {
            pattern: pattern.to_owned(),
            flags: Flags::default(),
        }
    }

    /// Reject unbalanced parentheses rather than silently dropping them.
    pub fn strict_parens(&mut self, yes: bool) -> &mut RegexBuilder {
        self.flags.set(Flags::STRICT_PARENS, yes);
        self
    }

    pub fn flags(&mut self, flags: Flags) -> &mut RegexBuilder {
        self.flags = flags;
        self
    }

    pub fn build(&self) -> Result<Regex> {
        self.compile().map_err(|err| {
            log::debug!("failed to compile {:?}: {}", self.pattern, err);
            err
        })
    }

    fn compile(&self) -> Result<Regex> {
        let tokens = tokenize(self.pattern.as_bytes())?;
        let postfix = to_postfix(&normalize(&tokens), self.flags)?;
        validate(&postfix)?;
        let (nfa, root) = Builder::new().build(&postfix);
        log::debug!(
            "compiled {:?} => {} ({} states)",
            self.pattern,
            postfix,
            nfa.len()
        );
        Ok(Regex {
            pattern: self.pattern.clone(),
            postfix,
            nfa,
            root,
        })
    }
}

#[cfg(test)]
mod props;
