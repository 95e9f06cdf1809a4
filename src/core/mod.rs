//! Core types and traits for mutation filtering.

mod error;
mod interceptor;

pub use error::{Error, Result};
pub use interceptor::{
    Feature, InterceptorFactory, InterceptorType, MutationCandidate, MutationInterceptor,
};
