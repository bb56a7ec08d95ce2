use crate::nfa::{Nfa, StateId};

/// States already entered at each open input position.
///
/// `stamp[state]` is the position the state was last entered at. Every
/// position on the current search path owns a level of the undo log, so the
/// marks of a position survive while a later position is explored and are
/// restored once that later position is abandoned.
struct Visited {
    stamp: Vec<Option<usize>>,
    levels: Vec<Vec<(StateId, Option<usize>)>>,
}

impl Visited {
    fn new(capacity: usize) -> Visited {
        Visited {
            stamp: vec![None; capacity],
            levels: vec![Vec::new()],
        }
    }

    /// Marks `id` at `position`, returning false if it was already marked there.
    fn insert(&mut self, id: StateId, position: usize) -> bool {
        let old = self.stamp[id.0];
        if old == Some(position) {
            return false;
        }
        self.stamp[id.0] = Some(position);
        if let Some(level) = self.levels.last_mut() {
            level.push((id, old));
        }
        true
    }

    // fresh, empty set for the next input position
    fn open(&mut self) {
        self.levels.push(Vec::new());
    }

    fn close(&mut self) {
        if let Some(level) = self.levels.pop() {
            for (id, old) in level.into_iter().rev() {
                self.stamp[id.0] = old;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    // index of the next epsilon successor to try
    Epsilon(usize),
    // waiting on the successor of a consumed byte
    Advance,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    id: StateId,
    consumed: usize,
    step: Step,
}

/*
 * Work-variable struct for matching one input against a compiled automaton.
 *
 * Backtracking depth-first search driven by an explicit frame stack, so the
 * input length is not bounded by the thread's stack. There is no memoization
 * across positions, so ambiguous alternations can take exponential time.
 */
pub struct Matcher<'a> {
    nfa: &'a Nfa,
    input: &'a [u8],
}

impl<'a> Matcher<'a> {
    pub fn new(nfa: &'a Nfa, input: &'a [u8]) -> Matcher<'a> {
        Matcher { nfa, input }
    }

    /// Whether some path from `start` consumes the whole input and ends in a
    /// terminal state.
    pub fn is_match(&self, start: StateId) -> bool {
        let mut visited = Visited::new(self.nfa.len());
        let mut stack: Vec<Frame> = Vec::new();
        let mut pending = Some((start, 0));

        loop {
            if let Some((id, consumed)) = pending.take() {
                if visited.insert(id, consumed) {
                    let state = self.nfa.state(id);
                    match self.input.get(consumed) {
                        None if state.is_terminal() => return true,
                        None => stack.push(Frame {
                            id,
                            consumed,
                            step: Step::Epsilon(0),
                        }),
                        Some(&byte) => match state.on(byte) {
                            // input advanced, the graph may be walked again from scratch
                            Some(next) => {
                                log::trace!(
                                    "state {} --{}--> {} at {}",
                                    id,
                                    byte.escape_ascii(),
                                    next,
                                    consumed
                                );
                                stack.push(Frame {
                                    id,
                                    consumed,
                                    step: Step::Advance,
                                });
                                visited.open();
                                pending = Some((next, consumed + 1));
                                continue;
                            }
                            None => stack.push(Frame {
                                id,
                                consumed,
                                step: Step::Epsilon(0),
                            }),
                        },
                    }
                }
            }

            let frame = match stack.last_mut() {
                Some(frame) => frame,
                None => return false,
            };
            match frame.step {
                Step::Epsilon(index) => match self.nfa.state(frame.id).epsilons().get(index) {
                    Some(&next) => {
                        frame.step = Step::Epsilon(index + 1);
                        pending = Some((next, frame.consumed));
                    }
                    None => {
                        stack.pop();
                    }
                },
                // the byte was consumed but nothing after it matched
                Step::Advance => {
                    stack.pop();
                    visited.close();
                }
            }
        }
    }
}
