use thiserror::Error;

/// Errors surfaced by the term layer and the unification service.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The unification service failed; callers treat this as "no match"
    #[error("Unification service error: {0}")]
    Unification(String),
}

/// Convenience Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
