//! Atomic token tests and their boolean combinators.

use std::sync::Arc;

use crate::bytecode::Token;

use super::context::Context;

type TestFn = dyn Fn(&mut Context, Token<'_>) -> bool + Send + Sync;

/// A test over one token, with access to the scan's capture slots.
///
/// Predicates are cheap to clone and safe to share across threads; all
/// per-scan state lives in the [`Context`].
#[derive(Clone)]
pub struct Predicate(Arc<TestFn>);

impl Predicate {
    /// Wrap a closure as a predicate.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&mut Context, Token<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    /// Accepts every token.
    pub fn always() -> Self {
        Self::new(|_, _| true)
    }

    /// Accepts no token.
    pub fn never() -> Self {
        Self::new(|_, _| false)
    }

    /// Both this predicate and `other` accept the token. Short-circuits, so
    /// `other` never runs on a token the left side rejected.
    pub fn and(self, other: Predicate) -> Self {
        Self::new(move |ctx, token| self.test(ctx, token) && other.test(ctx, token))
    }

    /// Either predicate accepts the token. Slot writes made by a failed
    /// left side are discarded before the right side runs.
    pub fn or(self, other: Predicate) -> Self {
        Self::new(move |ctx, token| {
            let saved = ctx.snapshot();
            if self.test(ctx, token) {
                return true;
            }
            ctx.restore(&saved);
            other.test(ctx, token)
        })
    }

    /// Invert this predicate. Slot writes made by the inner test are
    /// discarded either way.
    pub fn negate(self) -> Self {
        Self::new(move |ctx, token| {
            let saved = ctx.snapshot();
            let matched = self.test(ctx, token);
            ctx.restore(&saved);
            !matched
        })
    }

    pub(crate) fn test(&self, ctx: &mut Context, token: Token<'_>) -> bool {
        (self.0)(ctx, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::bytecode::{opcodes, InstructionStream};
    use crate::sequence::Slot;

    fn single_token_stream() -> InstructionStream {
        let mut code = InstructionStream::builder();
        code.op(opcodes::NOP);
        code.build()
    }

    fn test_on_first(predicate: &Predicate, ctx: &mut Context, stream: &InstructionStream) -> bool {
        let token = stream.tokens().next().unwrap();
        predicate.test(ctx, token)
    }

    #[test]
    fn test_and_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let right = Predicate::new(move |_, _| {
            counted.fetch_add(1, Ordering::Relaxed);
            true
        });
        let predicate = Predicate::never().and(right);

        let stream = single_token_stream();
        let mut ctx = Context::start();
        assert!(!test_on_first(&predicate, &mut ctx, &stream));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_or_discards_failed_branch_writes() {
        let slot: Slot<usize> = Slot::create();
        let write = slot.write();
        let writing_then_failing = Predicate::new(move |ctx: &mut Context, _| {
            ctx.store(write, 99);
            false
        });
        let predicate = writing_then_failing.or(Predicate::always());

        let stream = single_token_stream();
        let mut ctx = Context::start();
        assert!(test_on_first(&predicate, &mut ctx, &stream));
        assert_eq!(ctx.retrieve(slot.read()), None);
    }

    #[test]
    fn test_negate_discards_inner_writes() {
        let slot: Slot<bool> = Slot::create();
        let write = slot.write();
        let writing_then_failing = Predicate::new(move |ctx: &mut Context, _| {
            ctx.store(write, true);
            false
        });
        let predicate = writing_then_failing.negate();

        let stream = single_token_stream();
        let mut ctx = Context::start();
        assert!(test_on_first(&predicate, &mut ctx, &stream));
        assert_eq!(ctx.retrieve(slot.read()), None);
    }

    #[test]
    fn test_always_and_never() {
        let stream = single_token_stream();
        let mut ctx = Context::start();
        assert!(test_on_first(&Predicate::always(), &mut ctx, &stream));
        assert!(!test_on_first(&Predicate::never(), &mut ctx, &stream));
    }
}
