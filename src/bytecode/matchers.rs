//! Instruction predicates used to build sequence queries.
//!
//! Each function returns a [`Predicate`] over stream tokens. The capture
//! variants (`jumps_to`, `label_node`, `record_target`) thread state
//! through the scan's [`Context`](crate::sequence::Context) via slots.

use crate::bytecode::insn::{ConstValue, Insn, LabelId};
use crate::bytecode::{opcodes, ClassName};
use crate::sequence::{Predicate, SlotRead, SlotWrite};

/// Matches any executable instruction or label; marker tokens never
/// satisfy it.
pub fn any_instruction() -> Predicate {
    not_an_instruction().negate()
}

/// Matches the marker tokens the compiler sprinkles between real
/// instructions: line numbers and stack map frames.
pub fn not_an_instruction() -> Predicate {
    Predicate::new(|_, token| token.insn.is_ignorable())
}

/// Matches an instruction with the given opcode, whatever its operand
/// shape.
pub fn op_code(code: u8) -> Predicate {
    Predicate::new(move |_, token| token.insn.opcode() == Some(code))
}

/// Matches a call to `name` on `owner`. The descriptor is not inspected.
pub fn method_call_to(owner: ClassName, name: &str) -> Predicate {
    let name = name.to_string();
    Predicate::new(move |_, token| {
        matches!(
            token.insn,
            Insn::MethodCall {
                owner: call_owner,
                name: call_name,
                ..
            } if *call_owner == owner && *call_name == name
        )
    })
}

/// Matches any encoding of an integer constant load: the `ICONST_*` fast
/// ops, `BIPUSH`/`SIPUSH`, or an integer constant-pool load.
pub fn an_integer_constant() -> Predicate {
    Predicate::new(|_, token| match token.insn {
        Insn::Op(op) => (opcodes::ICONST_M1..=opcodes::ICONST_5).contains(op),
        Insn::Push { .. } => true,
        Insn::Ldc(ConstValue::Int(_)) => true,
        _ => false,
    })
}

/// Matches any constant push: null, an integer encoding, or any
/// constant-pool load.
pub fn a_constant() -> Predicate {
    op_code(opcodes::ACONST_NULL)
        .or(an_integer_constant())
        .or(a_constant_pool_load())
}

/// Matches any constant-pool load regardless of the pooled value's type.
pub fn a_constant_pool_load() -> Predicate {
    Predicate::new(|_, token| matches!(token.insn, Insn::Ldc(_)))
}

/// Matches any jump and records its target label in `target`.
pub fn jumps_to(target: SlotWrite<LabelId>) -> Predicate {
    Predicate::new(move |ctx, token| match token.insn {
        Insn::Jump { target: label, .. } => {
            ctx.store(target, *label);
            true
        }
        _ => false,
    })
}

/// Matches a label token equal to the label bound in `target` earlier in
/// the same scan. Labels compare by handle identity; an unbound slot
/// matches nothing.
pub fn label_node(target: SlotRead<LabelId>) -> Predicate {
    Predicate::new(move |ctx, token| match token.insn {
        Insn::Label(label) => ctx.retrieve(target) == Some(*label),
        _ => false,
    })
}

/// Always matches; additionally raises `found` when the token under test
/// sits at the index bound in `target`.
///
/// This is how a pattern marks its mutation points: the orchestrator seeds
/// the candidate's index, each marked step calls this, and the pattern's
/// final check demands the flag.
pub fn record_target(target: SlotRead<usize>, found: SlotWrite<bool>) -> Predicate {
    Predicate::new(move |ctx, token| {
        if ctx.retrieve(target) == Some(token.index) {
            ctx.store(found, true);
        }
        true
    })
}
