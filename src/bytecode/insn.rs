//! Instruction tokens and the per-method instruction stream.
//!
//! The stream is a read-only, index-addressable view of one method body.
//! Matching never interprets operands beyond what the idiom shapes need:
//! opcodes, call targets, jump targets, and constant kinds.

use std::fmt;

use super::ClassName;

/// Opaque handle identifying a jump target within one method.
///
/// Two label tokens denote the same target iff their handles are equal. The
/// handle carries no structural information, so equality is identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(u32);

impl fmt::Debug for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A constant-pool value pushed by an `LDC`-family instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

/// One token in a method's linear instruction stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Insn {
    /// Operand-free instruction (`POP`, `ICONST_0`, `RETURN`, ...).
    Op(u8),
    /// Local-variable load or store. The slot number is never inspected by
    /// matching and is carried only so streams read like real bytecode.
    Var { opcode: u8, var: u16 },
    /// `BIPUSH` or `SIPUSH` with an immediate operand.
    Push { opcode: u8, value: i32 },
    /// Constant-pool load.
    Ldc(ConstValue),
    /// `INSTANCEOF`/`CHECKCAST` with a class operand.
    Type { opcode: u8, class: ClassName },
    /// Conditional or unconditional jump.
    Jump { opcode: u8, target: LabelId },
    /// `INVOKE*` call site.
    MethodCall {
        opcode: u8,
        owner: ClassName,
        name: String,
        desc: String,
    },
    /// Jump target marker.
    Label(LabelId),
    /// Source line marker emitted by the compiler.
    LineNumber(u16),
    /// Stack map frame marker.
    Frame,
}

impl Insn {
    /// JVM opcode of this token, if it is an executable instruction.
    ///
    /// Labels and debug markers have no opcode.
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Insn::Op(opcode)
            | Insn::Var { opcode, .. }
            | Insn::Push { opcode, .. }
            | Insn::Type { opcode, .. }
            | Insn::Jump { opcode, .. }
            | Insn::MethodCall { opcode, .. } => Some(*opcode),
            Insn::Ldc(_) => Some(super::opcodes::LDC),
            Insn::Label(_) | Insn::LineNumber(_) | Insn::Frame => None,
        }
    }

    /// True for marker tokens that matching must skip over.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Insn::LineNumber(_) | Insn::Frame)
    }
}

/// A borrowed view of one stream position, handed to predicates.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    /// Position of the token in its stream.
    pub index: usize,
    /// The token itself.
    pub insn: &'a Insn,
}

/// Ordered instruction list of one method body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionStream {
    insns: Vec<Insn>,
}

impl InstructionStream {
    /// Start assembling a stream.
    pub fn builder() -> StreamBuilder {
        StreamBuilder::default()
    }

    /// Number of tokens, markers included.
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// True if the stream holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    /// Token at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Candidate indexes are produced
    /// against this same stream, so an out-of-range index is a caller bug,
    /// not a recoverable condition.
    pub fn token_at(&self, index: usize) -> &Insn {
        &self.insns[index]
    }

    /// Token at `index`, or `None` past the end of the stream.
    pub fn get(&self, index: usize) -> Option<&Insn> {
        self.insns.get(index)
    }

    /// Iterate over tokens with their positions.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'_>> {
        self.insns
            .iter()
            .enumerate()
            .map(|(index, insn)| Token { index, insn })
    }
}

/// Assembles an [`InstructionStream`], allocating fresh labels on demand.
#[derive(Debug, Default)]
pub struct StreamBuilder {
    insns: Vec<Insn>,
    next_label: u32,
}

impl StreamBuilder {
    /// Allocate a label distinct from every other label of this builder.
    pub fn new_label(&mut self) -> LabelId {
        let label = LabelId(self.next_label);
        self.next_label += 1;
        label
    }

    /// Append an operand-free instruction.
    pub fn op(&mut self, opcode: u8) -> &mut Self {
        self.insns.push(Insn::Op(opcode));
        self
    }

    /// Append a local-variable load or store.
    pub fn var(&mut self, opcode: u8, var: u16) -> &mut Self {
        self.insns.push(Insn::Var { opcode, var });
        self
    }

    /// Append a `BIPUSH`/`SIPUSH` immediate push.
    pub fn int_push(&mut self, opcode: u8, value: i32) -> &mut Self {
        self.insns.push(Insn::Push { opcode, value });
        self
    }

    /// Append a constant-pool load.
    pub fn ldc(&mut self, value: ConstValue) -> &mut Self {
        self.insns.push(Insn::Ldc(value));
        self
    }

    /// Append a type-operand instruction such as `INSTANCEOF`.
    pub fn type_insn(&mut self, opcode: u8, class: &str) -> &mut Self {
        self.insns.push(Insn::Type {
            opcode,
            class: ClassName::new(class),
        });
        self
    }

    /// Append a jump to `target`.
    pub fn jump(&mut self, opcode: u8, target: LabelId) -> &mut Self {
        self.insns.push(Insn::Jump { opcode, target });
        self
    }

    /// Append a call site.
    pub fn invoke(&mut self, opcode: u8, owner: &str, name: &str, desc: &str) -> &mut Self {
        self.insns.push(Insn::MethodCall {
            opcode,
            owner: ClassName::new(owner),
            name: name.to_string(),
            desc: desc.to_string(),
        });
        self
    }

    /// Mark `label` at the current position.
    pub fn label(&mut self, label: LabelId) -> &mut Self {
        self.insns.push(Insn::Label(label));
        self
    }

    /// Append a source line marker.
    pub fn line(&mut self, line: u16) -> &mut Self {
        self.insns.push(Insn::LineNumber(line));
        self
    }

    /// Append a stack map frame marker.
    pub fn frame(&mut self) -> &mut Self {
        self.insns.push(Insn::Frame);
        self
    }

    /// Finish the stream.
    pub fn build(self) -> InstructionStream {
        InstructionStream { insns: self.insns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bytecode::opcodes;

    #[test]
    fn test_opcode_across_variants() {
        let mut code = InstructionStream::builder();
        let target = code.new_label();
        code.op(opcodes::POP)
            .var(opcodes::ALOAD, 0)
            .int_push(opcodes::SIPUSH, 10_000)
            .ldc(ConstValue::Str("x".to_string()))
            .type_insn(opcodes::INSTANCEOF, "com/example/Sub")
            .jump(opcodes::IFNONNULL, target)
            .invoke(opcodes::INVOKESTATIC, "com/example/Util", "helper", "()V")
            .label(target)
            .line(14)
            .frame();
        let stream = code.build();

        assert_eq!(stream.token_at(0).opcode(), Some(opcodes::POP));
        assert_eq!(stream.token_at(1).opcode(), Some(opcodes::ALOAD));
        assert_eq!(stream.token_at(2).opcode(), Some(opcodes::SIPUSH));
        assert_eq!(stream.token_at(3).opcode(), Some(opcodes::LDC));
        assert_eq!(stream.token_at(4).opcode(), Some(opcodes::INSTANCEOF));
        assert_eq!(stream.token_at(5).opcode(), Some(opcodes::IFNONNULL));
        assert_eq!(stream.token_at(6).opcode(), Some(opcodes::INVOKESTATIC));
        assert_eq!(stream.token_at(7).opcode(), None);
        assert_eq!(stream.token_at(8).opcode(), None);
        assert_eq!(stream.token_at(9).opcode(), None);
    }

    #[test]
    fn test_only_markers_are_ignorable() {
        let mut code = InstructionStream::builder();
        let target = code.new_label();
        code.op(opcodes::NOP).label(target).line(3).frame();
        let stream = code.build();

        assert!(!stream.token_at(0).is_ignorable());
        assert!(!stream.token_at(1).is_ignorable());
        assert!(stream.token_at(2).is_ignorable());
        assert!(stream.token_at(3).is_ignorable());
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut code = InstructionStream::builder();
        let first = code.new_label();
        let second = code.new_label();
        assert_ne!(first, second);
        assert_eq!(first, first);
    }

    #[test]
    fn test_tokens_carry_positions() {
        let mut code = InstructionStream::builder();
        code.op(opcodes::ICONST_0).op(opcodes::IRETURN);
        let stream = code.build();

        let indexes: Vec<usize> = stream.tokens().map(|t| t.index).collect();
        assert_eq!(indexes, vec![0, 1]);
        assert_eq!(stream.len(), 2);
        assert!(!stream.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_token_at_rejects_out_of_range() {
        let stream = InstructionStream::builder().build();
        stream.token_at(0);
    }

    #[test]
    fn test_get_past_end_is_none() {
        let mut code = InstructionStream::builder();
        code.op(opcodes::RETURN);
        let stream = code.build();
        assert!(stream.get(0).is_some());
        assert!(stream.get(1).is_none());
    }
}
