//! Recognizers for the defensive shapes the Kotlin compiler emits.
//!
//! Each pattern marks the instructions a mutation engine would target
//! inside its shape by raising a shared found flag, and the root pattern
//! only succeeds if the flag was raised at the candidate's own index. The
//! compiled root is a process-wide singleton; all per-scan state lives in
//! the caller's [`Context`].

use regex::Regex;

use crate::bytecode::matchers::{
    a_constant, any_instruction, jumps_to, label_node, method_call_to, not_an_instruction,
    op_code, record_target,
};
use crate::bytecode::{opcodes, ClassName, Insn, LabelId};
use crate::sequence::{
    Context, Predicate, QueryParams, SequenceMatcher, SequenceQuery, Slot, SlotRead,
};

/// Annotation descriptor marking classes produced by the Kotlin compiler.
pub const KOTLIN_METADATA: &str = "Lkotlin/Metadata;";

/// Runtime class hosting Kotlin's intrinsic null checks.
const INTRINSICS: &str = "kotlin/jvm/internal/Intrinsics";

/// Slot seeded with the candidate's instruction index before each scan.
pub(crate) fn mutated_instruction() -> Slot<usize> {
    static MUTATED_INSTRUCTION: std::sync::OnceLock<Slot<usize>> = std::sync::OnceLock::new();
    *MUTATED_INSTRUCTION.get_or_init(Slot::create)
}

/// Slot raised when a marked step lands on the candidate's index.
fn found() -> Slot<bool> {
    static FOUND: std::sync::OnceLock<Slot<bool>> = std::sync::OnceLock::new();
    *FOUND.get_or_init(Slot::create)
}

/// Marks the current step as a mutation point of the enclosing idiom.
fn mutation_point() -> Predicate {
    record_target(mutated_instruction().read(), found().write())
}

/// True once some marked step landed on the candidate's index.
fn contains_mutation(flag: SlotRead<bool>) -> impl Fn(&Context) -> bool + Send + Sync + 'static {
    move |ctx| ctx.retrieve(flag).unwrap_or(false)
}

/// A zero-argument call named `component1`, `component2`, ... as emitted
/// for destructuring declarations.
fn a_component_n_call() -> Predicate {
    static COMPONENT_NAME: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let name_shape =
        COMPONENT_NAME.get_or_init(|| Regex::new(r"^component[0-9]+$").expect("valid regex"));
    Predicate::new(move |_, token| {
        matches!(
            token.insn,
            Insn::MethodCall { name, desc, .. }
                if desc.starts_with("()") && name_shape.is_match(name)
        )
    })
}

/// Destructuring accessor: the `componentN` call itself is the mutation
/// point.
fn destructuring_call() -> SequenceQuery {
    SequenceQuery::matching(a_component_n_call().and(mutation_point()))
}

/// `!!` assertion: `IFNONNULL` over the checked value followed by the
/// intrinsic throw helper. Both instructions are mutation points.
fn null_cast() -> SequenceQuery {
    SequenceQuery::matching(op_code(opcodes::IFNONNULL).and(mutation_point())).then(
        method_call_to(ClassName::new(INTRINSICS), "throwNpe").and(mutation_point()),
    )
}

/// Safe call or elvis: a null test branching to the null arm, the non-null
/// arm, a jump over the null arm, then `POP` and a replacement constant.
/// The null test and the constant are mutation points.
fn safe_null_call_or_elvis() -> SequenceQuery {
    let null_jump: Slot<LabelId> = Slot::create();
    SequenceQuery::matching(
        op_code(opcodes::IFNULL)
            .and(jumps_to(null_jump.write()))
            .and(mutation_point()),
    )
    .one_or_more(SequenceQuery::matching(any_instruction()))
    .then(op_code(opcodes::GOTO))
    .then(label_node(null_jump.read()))
    .then(op_code(opcodes::POP))
    .then(a_constant().and(mutation_point()))
}

/// `as?` cast: `INSTANCEOF`, a branch past the null replacement, `POP` plus
/// `ACONST_NULL`, and the branch target rejoining. The `INSTANCEOF` and the
/// branch are mutation points.
fn safe_cast() -> SequenceQuery {
    let cast_jump: Slot<LabelId> = Slot::create();
    SequenceQuery::matching(op_code(opcodes::INSTANCEOF).and(mutation_point()))
        .then(
            op_code(opcodes::IFNE)
                .and(jumps_to(cast_jump.write()))
                .and(mutation_point()),
        )
        .then(op_code(opcodes::POP))
        .then(op_code(opcodes::ACONST_NULL))
        .then(label_node(cast_jump.read()))
}

/// Compiled recognizer for every junk-producing Kotlin idiom.
///
/// Idioms are tried in declaration order at every stream position; the
/// first shape that both matches and marks the seeded candidate index wins.
pub(crate) fn kotlin_junk() -> &'static SequenceMatcher {
    static KOTLIN_JUNK: std::sync::OnceLock<SequenceMatcher> = std::sync::OnceLock::new();
    KOTLIN_JUNK.get_or_init(|| {
        SequenceQuery::matching(Predicate::never())
            .zero_or_more(SequenceQuery::matching(any_instruction()))
            .or(destructuring_call())
            .or(null_cast())
            .or(safe_null_call_or_elvis())
            .or(safe_cast())
            .require(contains_mutation(found().read()))
            .compile(QueryParams::new().with_ignores(not_an_instruction()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bytecode::InstructionStream;

    fn is_junk(stream: &InstructionStream, index: usize) -> bool {
        let mut ctx = Context::start();
        ctx.store(mutated_instruction().write(), index);
        kotlin_junk().matches(stream, &mut ctx)
    }

    fn junk_indices(stream: &InstructionStream) -> Vec<usize> {
        (0..stream.len()).filter(|&i| is_junk(stream, i)).collect()
    }

    fn null_assertion_stream() -> InstructionStream {
        let mut code = InstructionStream::builder();
        let non_null = code.new_label();
        code.jump(opcodes::IFNONNULL, non_null)
            .invoke(
                opcodes::INVOKESTATIC,
                "kotlin/jvm/internal/Intrinsics",
                "throwNpe",
                "()V",
            )
            .label(non_null)
            .op(opcodes::RETURN);
        code.build()
    }

    #[test]
    fn test_null_assertion_marks_both_instructions() {
        let stream = null_assertion_stream();
        assert_eq!(junk_indices(&stream), vec![0, 1]);
    }

    #[test]
    fn test_intrinsic_call_alone_is_not_junk() {
        let mut code = InstructionStream::builder();
        code.invoke(
            opcodes::INVOKESTATIC,
            "kotlin/jvm/internal/Intrinsics",
            "throwNpe",
            "()V",
        )
        .op(opcodes::RETURN);
        assert_eq!(junk_indices(&code.build()), Vec::<usize>::new());
    }

    #[test]
    fn test_safe_cast_marks_test_and_branch() {
        let mut code = InstructionStream::builder();
        let rejoin = code.new_label();
        code.var(opcodes::ALOAD, 1)
            .type_insn(opcodes::INSTANCEOF, "com/example/Sub")
            .jump(opcodes::IFNE, rejoin)
            .op(opcodes::POP)
            .op(opcodes::ACONST_NULL)
            .label(rejoin);
        assert_eq!(junk_indices(&code.build()), vec![1, 2]);
    }

    #[test]
    fn test_safe_cast_requires_the_rejoin_label() {
        let mut code = InstructionStream::builder();
        let rejoin = code.new_label();
        code.type_insn(opcodes::INSTANCEOF, "com/example/Sub")
            .jump(opcodes::IFNE, rejoin)
            .op(opcodes::POP)
            .op(opcodes::ACONST_NULL);
        assert_eq!(junk_indices(&code.build()), Vec::<usize>::new());
    }

    #[test]
    fn test_component_call_must_take_no_arguments() {
        let mut zero_arg = InstructionStream::builder();
        zero_arg
            .var(opcodes::ALOAD, 1)
            .invoke(opcodes::INVOKEVIRTUAL, "com/example/Pair", "component1", "()I")
            .op(opcodes::POP);
        assert_eq!(junk_indices(&zero_arg.build()), vec![1]);

        let mut with_arg = InstructionStream::builder();
        with_arg
            .var(opcodes::ALOAD, 1)
            .invoke(opcodes::INVOKEVIRTUAL, "com/example/Pair", "component1", "(I)V")
            .op(opcodes::POP);
        assert_eq!(junk_indices(&with_arg.build()), Vec::<usize>::new());
    }

    #[test]
    fn test_component_name_must_be_digits_only() {
        let mut code = InstructionStream::builder();
        code.invoke(
            opcodes::INVOKEVIRTUAL,
            "com/example/Widget",
            "componentX",
            "()I",
        )
        .invoke(
            opcodes::INVOKEVIRTUAL,
            "com/example/Widget",
            "components",
            "()I",
        );
        assert_eq!(junk_indices(&code.build()), Vec::<usize>::new());
    }

    #[test]
    fn test_unseeded_context_never_matches() {
        let stream = null_assertion_stream();
        let mut ctx = Context::start();
        assert!(!kotlin_junk().matches(&stream, &mut ctx));
    }

    #[test]
    fn test_markers_do_not_break_shapes() {
        let mut code = InstructionStream::builder();
        let non_null = code.new_label();
        code.line(7)
            .jump(opcodes::IFNONNULL, non_null)
            .frame()
            .line(8)
            .invoke(
                opcodes::INVOKESTATIC,
                "kotlin/jvm/internal/Intrinsics",
                "throwNpe",
                "()V",
            )
            .label(non_null)
            .op(opcodes::RETURN);
        // Real instructions sit at 1 and 4 once markers are interleaved.
        assert_eq!(junk_indices(&code.build()), vec![1, 4]);
    }
}
