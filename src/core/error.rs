//! Error types for the chaff library.

use thiserror::Error;

use crate::bytecode::Location;

/// Result type alias using chaff's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while filtering mutation candidates.
#[derive(Error, Debug)]
pub enum Error {
    /// A candidate referenced a method the class model does not contain.
    #[error("no method matching {location} in the current class")]
    MethodNotFound { location: Location },
}

impl Error {
    /// Create a method lookup error for the given location.
    pub fn method_not_found(location: Location) -> Self {
        Self::MethodNotFound { location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bytecode::ClassName;

    #[test]
    fn test_error_display() {
        let location = Location::new(ClassName::new("com/example/Widget"), "apply", "()V");
        let err = Error::method_not_found(location);
        assert_eq!(
            err.to_string(),
            "no method matching com/example/Widget::apply()V in the current class"
        );
    }
}
