//! thompson-regex - compile a small regular expression language into an NFA
//!
//! ## Usage
//! ```
//! use thompson_regex::Regex;
//!
//! let re = Regex::new("(x|y)*z+").unwrap();
//! assert!(re.is_match("xyzzz"));
//! assert!(!re.is_match("xy"));
//! ```
//!
//! ## Regular Expressions:
//!
//! ```text
//!     char        any byte other than the ones below matches itself.
//!
//!      |          alternation, 'a|b' matches 'a' or 'b'.
//!
//!      ?          zero or one of the preceding expression.
//!
//!      +          one or more of the preceding expression.
//!
//!      *          zero or more of the preceding expression.
//!
//!     ( )         grouping.
//!
//!      .          reserved, used internally as the concatenation operator.
//!                 a pattern containing it is rejected.
//! ```
//!
//! A match always has to consume the whole input.
//!
//! ## Details
//!
//! Compiling is done in three passes over the pattern:
//!
//! 1. explicit concatenation is inserted between adjacent operands,
//! 2. the result is put in postfix order by shunting-yard,
//!    precedence is `* + ?` > `|` > `.`,
//! 3. the postfix stream is turned into an NFA by Thompson's construction.
//!
//! Matching is a backtracking depth first search over the NFA. A state can be
//! entered only once per input position, which keeps epsilon loops such as the
//! ones of `(a*)*` from running forever.
//!
//! An unmatched parenthesis is dropped silently unless
//! [`RegexBuilder::strict_parens`] is set.
//!
//! ## Compile example
//! State list as printed by `Display`, '*' marks the accepting state.
//! ```text
//!     Regex::new("a*")
//!     result :
//!         a* => a*
//!         start(2) out(3)
//!           0 : 'a'(1)
//!           1 : eps(0) eps(3)
//!           2 : eps(0) eps(3)
//!           3*:
//!
//!     Regex::new("ab")
//!     result :
//!         ab => ab.
//!         start(0) out(3)
//!           0 : 'a'(1)
//!           1 : eps(2)
//!           2 : 'b'(3)
//!           3*:
//! ```
#[macro_use]
extern crate enum_display_derive;

mod matcher;
mod nfa;
mod postfix;
mod regex;
mod token;

pub use regex::{Error, Flags, Regex, RegexBuilder, Result};
pub use token::Operator;
