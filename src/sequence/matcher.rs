//! Backtracking execution of compiled sequence queries.
//!
//! A query's combinator tree is flattened into a small program of steps.
//! Alternation and repetition compile to `Split` steps; the interpreter
//! keeps an explicit stack of (resume point, context snapshot) pairs, so
//! matching never recurses and slot bindings roll back mechanically when a
//! path is abandoned. Alternatives are tried in declaration order and the
//! first one that completes the whole pattern wins; repetitions consume
//! greedily and back off one iteration at a time.

use std::sync::Arc;

use crate::bytecode::{InstructionStream, Token};

use super::context::{Context, Snapshot};
use super::predicate::Predicate;
use super::query::{CheckFn, Node, QueryParams};

/// One step of a compiled pattern program.
#[derive(Clone)]
enum Step {
    /// Consume one non-ignored token satisfying the predicate.
    Expect(Predicate),
    /// Zero-width assertion over the scan state.
    Assert(Arc<CheckFn>),
    /// Choice point: continue at `primary`, fall back to `alternative`.
    Split { primary: usize, alternative: usize },
    /// Unconditional transfer.
    Jump(usize),
    /// The whole pattern is satisfied.
    Accept,
}

/// An immutable compiled pattern, shareable across scans and threads.
pub struct SequenceMatcher {
    program: Vec<Step>,
    ignoring: Predicate,
    trace: bool,
}

impl SequenceMatcher {
    pub(crate) fn compile(node: Node, params: QueryParams) -> Self {
        let mut program = Vec::new();
        emit(&mut program, node);
        program.push(Step::Accept);
        Self {
            program,
            ignoring: params.ignoring,
            trace: params.trace,
        }
    }

    /// Scan `stream` for an alignment of the whole pattern, starting at the
    /// context's position or later.
    ///
    /// On success the context keeps the final bindings and position of the
    /// matched alignment; on failure it is restored to its initial state.
    pub fn matches(&self, stream: &InstructionStream, context: &mut Context) -> bool {
        if self.trace {
            context.force_trace();
        }
        let initial = context.snapshot();
        for start in initial.position()..=stream.len() {
            context.restore(&initial);
            context.set_position(start);
            if context.is_tracing() {
                context.note(format!("attempt at {start}"));
            }
            if self.attempt(stream, context) {
                return true;
            }
        }
        context.restore(&initial);
        false
    }

    fn attempt(&self, stream: &InstructionStream, ctx: &mut Context) -> bool {
        let mut pending: Vec<(usize, Snapshot)> = Vec::new();
        let mut pc = 0;
        loop {
            let moved = match &self.program[pc] {
                Step::Expect(predicate) => self.expect(predicate, stream, ctx),
                Step::Assert(check) => check(ctx),
                Step::Split {
                    primary,
                    alternative,
                } => {
                    pending.push((*alternative, ctx.snapshot()));
                    pc = *primary;
                    continue;
                }
                Step::Jump(target) => {
                    pc = *target;
                    continue;
                }
                Step::Accept => return true,
            };
            if moved {
                pc += 1;
                continue;
            }
            match pending.pop() {
                Some((resume, saved)) => {
                    ctx.restore(&saved);
                    pc = resume;
                }
                None => return false,
            }
        }
    }

    /// Skip ignored tokens, then test the next real token.
    fn expect(&self, predicate: &Predicate, stream: &InstructionStream, ctx: &mut Context) -> bool {
        let mut index = ctx.position();
        loop {
            let Some(insn) = stream.get(index) else {
                return false;
            };
            let token = Token { index, insn };
            if self.ignoring.test(ctx, token) {
                index += 1;
                continue;
            }
            ctx.set_position(index);
            let matched = predicate.test(ctx, token);
            if ctx.is_tracing() {
                let verdict = if matched { "matched" } else { "rejected" };
                ctx.note(format!("{verdict} {insn:?} at {index}"));
            }
            if matched {
                ctx.set_position(index + 1);
            }
            return matched;
        }
    }
}

fn emit(program: &mut Vec<Step>, node: Node) {
    match node {
        Node::Test(predicate) => program.push(Step::Expect(predicate)),
        Node::Then(first, second) => {
            emit(program, *first);
            emit(program, *second);
        }
        Node::Alternate(first, second) => {
            let split = program.len();
            program.push(Step::Jump(0)); // patched below
            emit(program, *first);
            let jump = program.len();
            program.push(Step::Jump(0)); // patched below
            let alternative = program.len();
            program[split] = Step::Split {
                primary: split + 1,
                alternative,
            };
            emit(program, *second);
            program[jump] = Step::Jump(program.len());
        }
        Node::Repeat { min: 0, body } => {
            let split = program.len();
            program.push(Step::Jump(0)); // patched below
            emit(program, *body);
            program.push(Step::Jump(split));
            let exit = program.len();
            program[split] = Step::Split {
                primary: split + 1,
                alternative: exit,
            };
        }
        Node::Repeat { body, .. } => {
            let start = program.len();
            emit(program, *body);
            let split = program.len();
            program.push(Step::Split {
                primary: start,
                alternative: split + 1,
            });
        }
        Node::Check(check) => program.push(Step::Assert(check)),
    }
}
