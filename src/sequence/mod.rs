//! Instruction-sequence pattern matching.
//!
//! The pieces compose in layers: [`Predicate`] tests one token,
//! [`SequenceQuery`] strings predicates into a pattern with sequencing,
//! alternation and repetition, and [`SequenceMatcher`] executes the
//! compiled pattern against a stream with backtracking. Cross-token
//! constraints (the label jumped to earlier must be the label seen later)
//! go through [`Slot`] capture cells whose bindings live in the per-scan
//! [`Context`].

mod context;
mod matcher;
mod predicate;
mod query;
mod slot;

pub use context::Context;
pub use matcher::SequenceMatcher;
pub use predicate::Predicate;
pub use query::{QueryParams, SequenceQuery};
pub use slot::{Slot, SlotRead, SlotType, SlotValue, SlotWrite};
