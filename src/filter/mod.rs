//! The mutation filter stage for Kotlin-compiled classes.
//!
//! `KotlinFilter` plugs into the host pipeline's interceptor contract. Per
//! class it checks for the Kotlin metadata annotation; while active, each
//! candidate's method stream is scanned by the compiled idiom library with
//! the candidate's index seeded into the scan, and matching candidates are
//! dropped from the result set.

mod idioms;

use std::sync::Arc;

use crate::bytecode::ClassTree;
use crate::core::{
    Error, Feature, InterceptorFactory, InterceptorType, MutationCandidate, MutationInterceptor,
    Result,
};
use crate::sequence::Context;

use idioms::{kotlin_junk, mutated_instruction};
pub use idioms::KOTLIN_METADATA;

/// Filter stage dropping mutations inside Kotlin compiler idioms.
///
/// One instance serves one analysis task: `begin`, `intercept` and `end`
/// are not safe to call concurrently on a shared instance.
pub struct KotlinFilter {
    class: Option<Arc<ClassTree>>,
}

impl KotlinFilter {
    /// Create a filter in the inactive state.
    pub fn new() -> Self {
        Self { class: None }
    }

    /// True between `begin` on a Kotlin class and the matching `end`.
    pub fn is_active(&self) -> bool {
        self.class.is_some()
    }

    fn is_junk(&self, class: &ClassTree, candidate: &MutationCandidate) -> Result<bool> {
        let method = class
            .method(&candidate.location)
            .ok_or_else(|| Error::method_not_found(candidate.location.clone()))?;
        let mut context = Context::start();
        context.store(mutated_instruction().write(), candidate.instruction_index);
        Ok(kotlin_junk().matches(method.instructions(), &mut context))
    }
}

impl Default for KotlinFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationInterceptor for KotlinFilter {
    fn interceptor_type(&self) -> InterceptorType {
        InterceptorType::Filter
    }

    fn begin(&mut self, class: Arc<ClassTree>) {
        if class.has_annotation(KOTLIN_METADATA) {
            tracing::debug!("filtering kotlin junk mutations in {}", class.name());
            self.class = Some(class);
        } else {
            self.class = None;
        }
    }

    fn intercept(&mut self, mutations: Vec<MutationCandidate>) -> Result<Vec<MutationCandidate>> {
        let Some(class) = self.class.clone() else {
            return Ok(mutations);
        };
        let mut kept = Vec::with_capacity(mutations.len());
        for candidate in mutations {
            if self.is_junk(&class, &candidate)? {
                tracing::debug!(
                    "dropping junk mutation at {} index {}",
                    candidate.location,
                    candidate.instruction_index
                );
            } else {
                kept.push(candidate);
            }
        }
        Ok(kept)
    }

    fn end(&mut self) {
        self.class = None;
    }
}

/// Factory registered with the host's plugin system.
pub struct KotlinFilterFactory;

impl InterceptorFactory for KotlinFilterFactory {
    fn create(&self) -> Box<dyn MutationInterceptor> {
        Box::new(KotlinFilter::new())
    }

    fn provides(&self) -> Feature {
        Feature::named("KOTLIN")
            .with_on_by_default(true)
            .with_description("Improves support of kotlin language")
    }

    fn description(&self) -> &'static str {
        "Kotlin language support"
    }
}
