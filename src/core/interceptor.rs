//! Contracts binding a filter stage into a mutation testing pipeline.
//!
//! The host pipeline drives each interceptor through a strict call sequence
//! per analyzed class: one `begin`, any number of `intercept` calls, one
//! `end`. No state survives `end`. Factories advertise a feature flag the
//! host registry uses to enable or disable the stage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bytecode::{ClassTree, Location};
use crate::core::Result;

/// Where an interceptor runs in the mutation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptorType {
    /// No declared role.
    Other,
    /// Rewrites candidates before analysis.
    Modify,
    /// Drops candidates from the result set.
    Filter,
    /// Observes the final candidate set.
    Report,
}

/// A single proposed mutation, identified by method and instruction index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationCandidate {
    /// Method the mutation lives in.
    pub location: Location,
    /// Zero-based index of the targeted instruction in the method's stream.
    pub instruction_index: usize,
    /// Identifier of the mutation operator that produced this candidate.
    pub mutator: String,
    /// Human-readable summary of the proposed change.
    pub description: String,
}

impl MutationCandidate {
    /// Create a candidate for the given method and instruction index.
    pub fn new(
        location: Location,
        instruction_index: usize,
        mutator: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            location,
            instruction_index,
            mutator: mutator.into(),
            description: description.into(),
        }
    }
}

/// A pipeline stage consuming and returning mutation candidates.
///
/// Implementations hold per-class state between `begin` and `end` and are
/// not safe for concurrent use; give each analysis task its own instance.
pub trait MutationInterceptor {
    /// Role of this interceptor in the pipeline.
    fn interceptor_type(&self) -> InterceptorType;

    /// Start processing `class`. Decides whether later calls act on it.
    fn begin(&mut self, class: Arc<ClassTree>);

    /// Return the subset of `mutations` to keep, preserving input order.
    fn intercept(&mut self, mutations: Vec<MutationCandidate>) -> Result<Vec<MutationCandidate>>;

    /// Finish the current class and drop per-class state.
    fn end(&mut self);
}

/// Feature flag advertised to the host's plugin registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    name: &'static str,
    description: &'static str,
    on_by_default: bool,
}

impl Feature {
    /// Create a feature with the given registry name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            on_by_default: false,
        }
    }

    /// Set the human-readable description.
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set whether the feature is enabled without explicit configuration.
    pub fn with_on_by_default(mut self, on_by_default: bool) -> Self {
        self.on_by_default = on_by_default;
        self
    }

    /// Registry name of the feature.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// True if the feature is enabled without explicit configuration.
    pub fn is_on_by_default(&self) -> bool {
        self.on_by_default
    }
}

/// Creates interceptor instances and advertises their feature flag.
pub trait InterceptorFactory {
    /// Build a fresh interceptor for one analysis task.
    fn create(&self) -> Box<dyn MutationInterceptor>;

    /// Feature flag governing this interceptor.
    fn provides(&self) -> Feature;

    /// Short description shown in plugin listings.
    fn description(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bytecode::ClassName;

    #[test]
    fn test_feature_builder() {
        let feature = Feature::named("KOTLIN")
            .with_description("Kotlin junk mutation filtering")
            .with_on_by_default(true);
        assert_eq!(feature.name(), "KOTLIN");
        assert_eq!(feature.description(), "Kotlin junk mutation filtering");
        assert!(feature.is_on_by_default());
    }

    #[test]
    fn test_feature_defaults_off() {
        let feature = Feature::named("EXPERIMENTAL");
        assert!(!feature.is_on_by_default());
        assert_eq!(feature.description(), "");
    }

    #[test]
    fn test_candidate_serialization_round_trip() {
        let candidate = MutationCandidate::new(
            Location::new(ClassName::new("com/example/Widget"), "apply", "()V"),
            3,
            "VOID_METHOD_CALLS",
            "removed call to apply",
        );
        let json = serde_json::to_string(&candidate).unwrap();
        let back: MutationCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, candidate);
    }
}
