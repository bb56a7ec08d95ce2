use crate::regex::{Error, Flags, Result};
use crate::token::{Token, TokenStream};

/*
 -  to_postfix - shunting-yard translation of a normalized token stream
 *
 *  Operators of equal precedence pop each other, which makes every binary
 *  operator left-associative. A `)` with no matching `(` is dropped unless
 *  STRICT_PARENS is set; the same goes for a `(` that is never closed.
 */
pub fn to_postfix(infix: &TokenStream, flags: Flags) -> Result<TokenStream> {
    let strict = flags.contains(Flags::STRICT_PARENS);
    let mut output = Vec::with_capacity(infix.len() * 2);
    let mut stack: Vec<Token> = Vec::new();

    for &token in infix.tokens() {
        match token {
            Token::Literal(_) => output.push(token),
            Token::Open => stack.push(token),
            Token::Close => loop {
                match stack.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None if strict => return Err(Error::UnmatchedParen { paren: ')' }),
                    None => {
                        log::trace!("ignoring unmatched ')' in {}", infix);
                        break;
                    }
                }
            },
            Token::Operator(op) => {
                while let Some(&Token::Operator(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Token::Operator(top));
                    stack.pop();
                }
                stack.push(token);
            }
        }
    }

    while let Some(token) = stack.pop() {
        match token {
            Token::Open if strict => return Err(Error::UnmatchedParen { paren: '(' }),
            Token::Open => log::trace!("ignoring unclosed '(' in {}", infix),
            token => output.push(token),
        }
    }
    Ok(TokenStream::from(output))
}

/// Checks that a postfix stream reduces to exactly one fragment, so that the
/// automaton builder never runs out of operands.
pub fn validate(postfix: &TokenStream) -> Result<()> {
    let mut depth = 0usize;
    for (position, token) in postfix.tokens().iter().enumerate() {
        match *token {
            Token::Literal(_) => depth += 1,
            Token::Operator(operator) => {
                let arity = operator.arity();
                if depth < arity {
                    return Err(Error::MissingOperand { operator, position });
                }
                depth -= arity - 1;
            }
            Token::Open | Token::Close => {
                unreachable!("parentheses never survive postfix translation")
            }
        }
    }
    if depth > 1 {
        return Err(Error::DanglingOperand { count: depth });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::{normalize, tokenize, Operator};

    fn postfix_with(pattern: &str, flags: Flags) -> Result<String> {
        let infix = normalize(&tokenize(pattern.as_bytes())?);
        to_postfix(&infix, flags).map(|p| p.to_string())
    }

    fn postfix(pattern: &str) -> String {
        postfix_with(pattern, Flags::empty()).unwrap()
    }

    #[test]
    fn test_postfix_literals() {
        assert_eq!(postfix(""), "");
        assert_eq!(postfix("a"), "a");
        assert_eq!(postfix("ab"), "ab.");
        assert_eq!(postfix("abc"), "ab.c.");
    }

    #[test]
    fn test_postfix_precedence() {
        // concatenation binds looser than alternation
        assert_eq!(postfix("ab|c"), "abc|.");
        assert_eq!(postfix("a|b|c"), "ab|c|");
        assert_eq!(postfix("ab*"), "ab*.");
        assert_eq!(postfix("a|b*"), "ab*|");
    }

    #[test]
    fn test_postfix_groups() {
        assert_eq!(postfix("(a|b)*c"), "ab|*c.");
        assert_eq!(postfix("(x|y)*z+"), "xy|*z+.");
        assert_eq!(postfix("(zz)+"), "zz.+");
        assert_eq!(postfix("((a))"), "a");
    }

    #[test]
    fn test_postfix_length_bound() {
        for pattern in ["(1|2|3|4|5|6|7|8|9)+", "hell(a|o)?", "(a*)*", "abc"] {
            let infix = normalize(&tokenize(pattern.as_bytes()).unwrap());
            let out = to_postfix(&infix, Flags::empty()).unwrap();
            assert!(out.len() <= 2 * infix.len());
        }
    }

    #[test]
    fn test_postfix_unmatched_close_ignored() {
        assert_eq!(postfix("a)b"), "ab.");
        assert_eq!(postfix(")"), "");
    }

    #[test]
    fn test_postfix_unclosed_open_ignored() {
        assert_eq!(postfix("(ab"), "ab.");
        assert_eq!(postfix("a(b"), "ab.");
    }

    #[test]
    fn test_postfix_strict_parens() {
        assert_eq!(
            postfix_with("a)b", Flags::STRICT_PARENS),
            Err(Error::UnmatchedParen { paren: ')' })
        );
        assert_eq!(
            postfix_with("(ab", Flags::STRICT_PARENS),
            Err(Error::UnmatchedParen { paren: '(' })
        );
        assert_eq!(
            postfix_with("(a)b", Flags::STRICT_PARENS),
            Ok("ab.".to_string())
        );
    }

    fn validated(pattern: &str) -> Result<()> {
        let infix = normalize(&tokenize(pattern.as_bytes())?);
        validate(&to_postfix(&infix, Flags::empty())?)
    }

    #[test]
    fn test_validate_ok() {
        assert!(validated("").is_ok());
        assert!(validated("a").is_ok());
        assert!(validated("(x|y)*z+").is_ok());
        assert!(validated("a**").is_ok());
    }

    #[test]
    fn test_validate_missing_operand() {
        assert_eq!(
            validated("*"),
            Err(Error::MissingOperand {
                operator: Operator::Star,
                position: 0
            })
        );
        assert_eq!(
            validated("a|"),
            Err(Error::MissingOperand {
                operator: Operator::Alternation,
                position: 1
            })
        );
        // the empty group leaves the concatenation with a single operand
        assert!(matches!(
            validated("()a"),
            Err(Error::MissingOperand {
                operator: Operator::Concat,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_dangling_operand() {
        let stream = TokenStream::from(vec![Token::Literal(b'a'), Token::Literal(b'b')]);
        assert_eq!(validate(&stream), Err(Error::DanglingOperand { count: 2 }));
    }
}
