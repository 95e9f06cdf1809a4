//! JVM opcode constants used by the idiom patterns and tests.
//!
//! Values follow the JVM class file format. Only the subset this crate
//! inspects or assembles in tests is listed; this is not a complete table.

// Constants
pub const NOP: u8 = 0;
pub const ACONST_NULL: u8 = 1;
pub const ICONST_M1: u8 = 2;
pub const ICONST_0: u8 = 3;
pub const ICONST_1: u8 = 4;
pub const ICONST_2: u8 = 5;
pub const ICONST_3: u8 = 6;
pub const ICONST_4: u8 = 7;
pub const ICONST_5: u8 = 8;
pub const LCONST_0: u8 = 9;
pub const LCONST_1: u8 = 10;
pub const BIPUSH: u8 = 16;
pub const SIPUSH: u8 = 17;
pub const LDC: u8 = 18;

// Local variable loads and stores
pub const ILOAD: u8 = 21;
pub const ALOAD: u8 = 25;
pub const ISTORE: u8 = 54;
pub const ASTORE: u8 = 58;

// Stack manipulation
pub const POP: u8 = 87;
pub const POP2: u8 = 88;
pub const DUP: u8 = 89;

// Arithmetic
pub const IADD: u8 = 96;
pub const ISUB: u8 = 100;

// Conditional and unconditional branches
pub const IFEQ: u8 = 153;
pub const IFNE: u8 = 154;
pub const IFLT: u8 = 155;
pub const IFGE: u8 = 156;
pub const IFGT: u8 = 157;
pub const IFLE: u8 = 158;
pub const GOTO: u8 = 167;

// Returns
pub const IRETURN: u8 = 172;
pub const ARETURN: u8 = 176;
pub const RETURN: u8 = 177;

// Method invocation
pub const INVOKEVIRTUAL: u8 = 182;
pub const INVOKESPECIAL: u8 = 183;
pub const INVOKESTATIC: u8 = 184;
pub const INVOKEINTERFACE: u8 = 185;

// Type checks
pub const CHECKCAST: u8 = 192;
pub const INSTANCEOF: u8 = 193;

// Null tests
pub const IFNULL: u8 = 198;
pub const IFNONNULL: u8 = 199;
