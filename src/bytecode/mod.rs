//! Read-only model of the classes under analysis.
//!
//! This is the surface the filter consumes from the host's classfile
//! parser: class names and annotations, method identities, and per-method
//! instruction streams. Nothing here rewrites bytecode.

pub mod insn;
pub mod matchers;
pub mod opcodes;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use insn::{ConstValue, Insn, InstructionStream, LabelId, StreamBuilder, Token};

/// Internal (slash-separated) JVM class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    /// Create a class name from its internal form, e.g. `com/example/Widget`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The internal form of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a method within a class by name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Owning class.
    pub class: ClassName,
    /// Method name.
    pub method: String,
    /// JVM method descriptor, e.g. `()V`.
    pub desc: String,
}

impl Location {
    /// Create a method location.
    pub fn new(class: ClassName, method: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            class,
            method: method.into(),
            desc: desc.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}{}", self.class, self.method, self.desc)
    }
}

/// One parsed method: its identity plus the linear instruction stream.
#[derive(Debug, Clone)]
pub struct MethodTree {
    location: Location,
    stream: InstructionStream,
}

impl MethodTree {
    /// Pair a method identity with its instruction stream.
    pub fn new(location: Location, stream: InstructionStream) -> Self {
        Self { location, stream }
    }

    /// Identity of this method.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The method body as an instruction stream.
    pub fn instructions(&self) -> &InstructionStream {
        &self.stream
    }
}

/// Parsed class surface the filter consumes: annotations and methods.
#[derive(Debug, Clone)]
pub struct ClassTree {
    name: ClassName,
    annotations: Vec<String>,
    methods: Vec<MethodTree>,
}

impl ClassTree {
    /// Create an empty class model.
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a class-level annotation by descriptor, e.g. `Lkotlin/Metadata;`.
    pub fn with_annotation(mut self, desc: impl Into<String>) -> Self {
        self.annotations.push(desc.into());
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodTree) -> Self {
        self.methods.push(method);
        self
    }

    /// Name of the class.
    pub fn name(&self) -> &ClassName {
        &self.name
    }

    /// True if the class declares an annotation with the given descriptor.
    pub fn has_annotation(&self, desc: &str) -> bool {
        self.annotations.iter().any(|a| a == desc)
    }

    /// Find the method at `location`, if it belongs to this class.
    pub fn method(&self, location: &Location) -> Option<&MethodTree> {
        if location.class != self.name {
            return None;
        }
        self.methods.iter().find(|m| {
            m.location.method == location.method && m.location.desc == location.desc
        })
    }

    /// All methods of the class.
    pub fn methods(&self) -> &[MethodTree] {
        &self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_method(name: &str, desc: &str) -> MethodTree {
        let location = Location::new(ClassName::new("com/example/Widget"), name, desc);
        let mut code = InstructionStream::builder();
        code.op(opcodes::RETURN);
        MethodTree::new(location, code.build())
    }

    #[test]
    fn test_annotation_lookup() {
        let class = ClassTree::new(ClassName::new("com/example/Widget"))
            .with_annotation("Lkotlin/Metadata;");
        assert!(class.has_annotation("Lkotlin/Metadata;"));
        assert!(!class.has_annotation("Ljava/lang/Deprecated;"));
    }

    #[test]
    fn test_method_lookup_by_location() {
        let class = ClassTree::new(ClassName::new("com/example/Widget"))
            .with_method(widget_method("apply", "()V"))
            .with_method(widget_method("apply", "(I)V"));

        let found = class
            .method(&Location::new(
                ClassName::new("com/example/Widget"),
                "apply",
                "(I)V",
            ))
            .unwrap();
        assert_eq!(found.location().desc, "(I)V");
    }

    #[test]
    fn test_method_lookup_misses() {
        let class = ClassTree::new(ClassName::new("com/example/Widget"))
            .with_method(widget_method("apply", "()V"));

        // Wrong descriptor.
        assert!(class
            .method(&Location::new(
                ClassName::new("com/example/Widget"),
                "apply",
                "(J)V",
            ))
            .is_none());
        // Wrong class.
        assert!(class
            .method(&Location::new(
                ClassName::new("com/example/Other"),
                "apply",
                "()V",
            ))
            .is_none());
    }

    #[test]
    fn test_builder_registers_methods_in_order() {
        let class = ClassTree::new(ClassName::new("com/example/Widget"))
            .with_method(widget_method("apply", "()V"))
            .with_method(widget_method("render", "()V"));

        let names: Vec<&str> = class
            .methods()
            .iter()
            .map(|m| m.location().method.as_str())
            .collect();
        assert_eq!(names, ["apply", "render"]);
    }

    #[test]
    fn test_location_display() {
        let location = Location::new(ClassName::new("com/example/Widget"), "apply", "()V");
        assert_eq!(location.to_string(), "com/example/Widget::apply()V");
    }
}
