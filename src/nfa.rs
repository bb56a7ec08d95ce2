use bitflags::bitflags;

use std::fmt::{self, Display};

use crate::token::{Operator, Token, TokenStream};

// use an index into the state arena to simulate a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

impl Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    pub struct StateFlags: u8 {
        const NONE     = 0;
        const TERMINAL = 1;     // accepting state
    }
}

#[derive(Debug, Clone)]
pub struct State {
    flags: StateFlags,
    chars: [Option<StateId>; 256],
    epsilons: Vec<StateId>,
}

impl State {
    fn new(flags: StateFlags) -> State {
        State {
            flags,
            chars: [None; 256],
            epsilons: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.flags.contains(StateFlags::TERMINAL)
    }

    /// Successor on `byte`, if any.
    pub fn on(&self, byte: u8) -> Option<StateId> {
        self.chars[byte as usize]
    }

    pub fn epsilons(&self) -> &[StateId] {
        &self.epsilons
    }

    fn char_transitions(&self) -> impl Iterator<Item = (u8, StateId)> + '_ {
        (0..=u8::MAX).filter_map(move |byte| self.on(byte).map(|to| (byte, to)))
    }
}

/// A sub-automaton with one entry and one exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub out: StateId,
}

/// Arena owning every state of one compiled pattern.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: Vec<State>,
}

impl Nfa {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    fn add_state(&mut self, flags: StateFlags) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State::new(flags));
        id
    }

    // fresh fragment: non-terminal start, terminal out
    fn fragment(&mut self) -> Fragment {
        Fragment {
            start: self.add_state(StateFlags::NONE),
            out: self.add_state(StateFlags::TERMINAL),
        }
    }

    fn add_char(&mut self, from: StateId, to: StateId, byte: u8) {
        self.states[from.0].chars[byte as usize] = Some(to);
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from.0].epsilons.push(to);
    }

    // the output state stops being final once something is hooked after it
    fn splice(&mut self, out: StateId) {
        self.states[out.0].flags.remove(StateFlags::TERMINAL);
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "{:>3}{}:", id, if state.is_terminal() { "*" } else { " " })?;
            for (byte, to) in state.char_transitions() {
                write!(f, " '{}'({})", byte.escape_ascii(), to)?;
            }
            for to in state.epsilons() {
                write!(f, " eps({})", to)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Work-variable struct for Thompson's construction.
pub struct Builder {
    nfa: Nfa,
    stack: Vec<Fragment>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            nfa: Nfa::default(),
            stack: Vec::new(),
        }
    }

    /// Builds the automaton for a postfix stream.
    ///
    /// The stream must reduce to exactly one fragment; anything else is an
    /// internal error of the translator and panics.
    pub fn build(mut self, postfix: &TokenStream) -> (Nfa, Fragment) {
        self.nfa.states.reserve(postfix.len() * 2);
        for &token in postfix.tokens() {
            match token {
                Token::Literal(byte) => self.literal(byte),
                Token::Operator(Operator::Concat) => self.concat(),
                Token::Operator(Operator::Alternation) => self.alternate(),
                Token::Operator(Operator::Optional) => self.optional(),
                Token::Operator(Operator::Plus) => self.plus(),
                Token::Operator(Operator::Star) => self.star(),
                Token::Open | Token::Close => {
                    panic!("internal error: parenthesis in postfix stream {}", postfix)
                }
            }
        }

        let top = match self.stack.len() {
            0 => self.empty(),
            1 => self.pop(),
            n => panic!("internal error: {} fragments left after {}", n, postfix),
        };
        (self.nfa, top)
    }

    fn pop(&mut self) -> Fragment {
        self.stack
            .pop()
            .expect("internal error: operator without operand in postfix stream")
    }

    // matches only the empty string
    fn empty(&mut self) -> Fragment {
        let frag = self.nfa.fragment();
        self.nfa.add_epsilon(frag.start, frag.out);
        frag
    }

    fn literal(&mut self, byte: u8) {
        let frag = self.nfa.fragment();
        self.nfa.add_char(frag.start, frag.out, byte);
        self.stack.push(frag);
    }

    fn concat(&mut self) {
        let right = self.pop();
        let left = self.pop();
        self.nfa.splice(left.out);
        self.nfa.add_epsilon(left.out, right.start);
        self.stack.push(Fragment {
            start: left.start,
            out: right.out,
        });
    }

    fn alternate(&mut self) {
        let right = self.pop();
        let left = self.pop();
        let frag = self.nfa.fragment();
        self.nfa.add_epsilon(frag.start, left.start);
        self.nfa.add_epsilon(frag.start, right.start);
        for branch in [left, right] {
            self.nfa.splice(branch.out);
            self.nfa.add_epsilon(branch.out, frag.out);
        }
        self.stack.push(frag);
    }

    fn optional(&mut self) {
        let op = self.pop();
        let frag = self.nfa.fragment();
        self.nfa.add_epsilon(frag.start, frag.out);
        self.nfa.add_epsilon(frag.start, op.start);
        self.nfa.splice(op.out);
        self.nfa.add_epsilon(op.out, frag.out);
        self.stack.push(frag);
    }

    fn plus(&mut self) {
        let op = self.pop();
        let frag = self.nfa.fragment();
        self.nfa.add_epsilon(frag.start, op.start);
        self.nfa.splice(op.out);
        self.nfa.add_epsilon(op.out, op.start);
        self.nfa.add_epsilon(op.out, frag.out);
        self.stack.push(frag);
    }

    fn star(&mut self) {
        let op = self.pop();
        let frag = self.nfa.fragment();
        self.nfa.add_epsilon(frag.start, op.start);
        self.nfa.add_epsilon(frag.start, frag.out);
        self.nfa.splice(op.out);
        self.nfa.add_epsilon(op.out, op.start);
        self.nfa.add_epsilon(op.out, frag.out);
        self.stack.push(frag);
    }
}
