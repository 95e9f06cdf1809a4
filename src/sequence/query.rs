//! Declarative pattern builder compiled into an executable matcher.

use std::sync::Arc;

use super::context::Context;
use super::matcher::SequenceMatcher;
use super::predicate::Predicate;

pub(crate) type CheckFn = dyn Fn(&Context) -> bool + Send + Sync;

/// Combinator tree behind a query.
#[derive(Clone)]
pub(crate) enum Node {
    /// Consume one token satisfying the predicate.
    Test(Predicate),
    /// Sequential composition.
    Then(Box<Node>, Box<Node>),
    /// Ordered alternation; the left branch is tried first.
    Alternate(Box<Node>, Box<Node>),
    /// Greedy repetition of the body, at least `min` times.
    Repeat { min: u32, body: Box<Node> },
    /// Zero-width assertion over the scan state.
    Check(Arc<CheckFn>),
}

/// A composable, not-yet-compiled instruction sequence pattern.
///
/// The only way to start a query is [`SequenceQuery::matching`], so every
/// query consumes at least one token. Repetition bodies are therefore
/// always productive and [`SequenceQuery::compile`] is total.
#[derive(Clone)]
pub struct SequenceQuery {
    pub(crate) node: Node,
}

impl SequenceQuery {
    /// Start a query consuming one token that satisfies `predicate`.
    pub fn matching(predicate: Predicate) -> Self {
        Self {
            node: Node::Test(predicate),
        }
    }

    /// Require the next token to satisfy `predicate`.
    pub fn then(self, predicate: Predicate) -> Self {
        Self {
            node: Node::Then(Box::new(self.node), Box::new(Node::Test(predicate))),
        }
    }

    /// Greedily allow any number of repetitions of `body` before the rest
    /// of the pattern continues.
    pub fn zero_or_more(self, body: SequenceQuery) -> Self {
        Self {
            node: Node::Then(
                Box::new(self.node),
                Box::new(Node::Repeat {
                    min: 0,
                    body: Box::new(body.node),
                }),
            ),
        }
    }

    /// Like [`Self::zero_or_more`], but requiring at least one repetition.
    pub fn one_or_more(self, body: SequenceQuery) -> Self {
        Self {
            node: Node::Then(
                Box::new(self.node),
                Box::new(Node::Repeat {
                    min: 1,
                    body: Box::new(body.node),
                }),
            ),
        }
    }

    /// Ordered choice: try this query first, `alternative` on failure.
    pub fn or(self, alternative: SequenceQuery) -> Self {
        Self {
            node: Node::Alternate(Box::new(self.node), Box::new(alternative.node)),
        }
    }

    /// Append a zero-width assertion over the scan state. Consumes no
    /// token, so it can sit at the very end of a stream.
    pub fn require<F>(self, check: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        Self {
            node: Node::Then(Box::new(self.node), Box::new(Node::Check(Arc::new(check)))),
        }
    }

    /// Compile into an immutable matcher.
    pub fn compile(self, params: QueryParams) -> SequenceMatcher {
        SequenceMatcher::compile(self.node, params)
    }
}

/// Matcher-wide configuration applied at compile time.
#[derive(Clone)]
pub struct QueryParams {
    pub(crate) ignoring: Predicate,
    pub(crate) trace: bool,
}

impl QueryParams {
    /// Defaults: nothing ignored, no tracing.
    pub fn new() -> Self {
        Self {
            ignoring: Predicate::never(),
            trace: false,
        }
    }

    /// Tokens accepted by `predicate` become invisible: they are skipped
    /// before every step and can never satisfy a step themselves.
    pub fn with_ignores(mut self, predicate: Predicate) -> Self {
        self.ignoring = predicate;
        self
    }

    /// Force trace accumulation on every scan of the compiled matcher.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new()
    }
}
