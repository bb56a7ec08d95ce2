use super::Regex;
use proptest::prelude::*;

const ALPHABET: &str = "[a-c]";

// # Pattern grammar used for generation
//
// ```ebnf
//      expr   ::= branch ('|' branch)?;
//      branch ::= piece+;
//      piece  ::= (LITERAL | '(' expr ')') ('*' | '+' | '?')?;
// ```
fn arb_pattern() -> impl Strategy<Value = String> {
    ALPHABET.prop_recursive(4, 32, 4, |inner| {
        let piece = (
            prop_oneof![inner.clone(), inner.clone().prop_map(|e| format!("({})", e))],
            prop_oneof![Just(""), Just("*"), Just("+"), Just("?")],
        )
            .prop_map(|(atom, rep)| format!("{}{}", atom, rep));
        let branch = prop::collection::vec(piece, 1..4).prop_map(|pieces| pieces.concat());
        (branch.clone(), prop::option::of(branch)).prop_map(|(lhs, rhs)| match rhs {
            Some(rhs) => format!("{}|{}", lhs, rhs),
            None => lhs,
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn literal_pattern_matches_itself(s in "[a-z0-9]{1,12}") {
        let re = Regex::new(&s).unwrap();
        prop_assert!(re.is_match(&s));
    }

    #[test]
    fn literal_pattern_rejects_strict_prefix(s in "[a-z0-9]{2,12}", cut in 0usize..11) {
        let cut = cut % s.len();
        let re = Regex::new(&s).unwrap();
        prop_assert!(!re.is_match(&s[..cut]));
    }

    #[test]
    fn compile_and_match_are_deterministic(pattern in arb_pattern(), input in "[a-c]{0,6}") {
        let first = Regex::new(&pattern).unwrap();
        let second = Regex::new(&pattern).unwrap();
        prop_assert_eq!(first.postfix(), second.postfix());
        prop_assert_eq!(first.is_match(&input), second.is_match(&input));
        prop_assert_eq!(first.is_match(&input), first.is_match(&input));
    }

    #[test]
    fn starred_group_accepts_empty(pattern in arb_pattern()) {
        let re = Regex::new(&format!("({})*", pattern)).unwrap();
        prop_assert!(re.is_match(""));
    }
}
