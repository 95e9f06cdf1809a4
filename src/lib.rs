//! Chaff - Kotlin junk mutation filtering for JVM mutation testing.
//!
//! The Kotlin compiler emits defensive bytecode with no counterpart in the
//! source: intrinsic null assertions, safe casts, destructuring accessors
//! and elvis defaults. Mutations landing inside those shapes survive every
//! test run and pollute the report. Chaff scans each mutated method for the
//! known shapes and drops the candidates that land inside one.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chaff::bytecode::{opcodes, ClassName, ClassTree, InstructionStream, Location, MethodTree};
//! use chaff::core::{MutationCandidate, MutationInterceptor};
//! use chaff::filter::{KotlinFilter, KOTLIN_METADATA};
//!
//! let mut code = InstructionStream::builder();
//! code.var(opcodes::ALOAD, 0)
//!     .invoke(opcodes::INVOKEVIRTUAL, "com/example/Pair", "component1", "()I")
//!     .op(opcodes::IRETURN);
//! let location = Location::new(ClassName::new("com/example/Widget"), "first", "()I");
//! let class = ClassTree::new(ClassName::new("com/example/Widget"))
//!     .with_annotation(KOTLIN_METADATA)
//!     .with_method(MethodTree::new(location.clone(), code.build()));
//!
//! let mut filter = KotlinFilter::new();
//! filter.begin(Arc::new(class));
//! let kept = filter
//!     .intercept(vec![
//!         MutationCandidate::new(location.clone(), 1, "VOID_METHOD_CALLS", "removed call"),
//!         MutationCandidate::new(location, 2, "RETURN_VALS", "mutated return"),
//!     ])
//!     .unwrap();
//! filter.end();
//!
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].instruction_index, 2);
//! ```

pub mod bytecode;
pub mod core;
pub mod filter;
pub mod sequence;

pub use crate::core::{Error, Result};
pub use crate::filter::{KotlinFilter, KotlinFilterFactory};
