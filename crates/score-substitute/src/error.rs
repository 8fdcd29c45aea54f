use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubstituteError {
    #[error("unknown reference root '{0}'")]
    UnknownRoot(String),

    #[error("metadata root requires a subkey")]
    BareMetadata,

    #[error("key '{0}' not found")]
    KeyNotFound(String),

    #[error("cannot lookup key '{0}', context is not a map")]
    NotAMap(String),

    #[error("resources root requires a resource name")]
    MissingResourceName,

    #[error("resource '{0}' not found")]
    UnknownResource(String),

    #[error("{0}")]
    Lookup(String),

    #[error("{}", .0.join("; "))]
    Multiple(Vec<String>),
}

/// Fold a list of per-item error strings (already path-prefixed by the
/// caller) into a single accumulated error, or `None` if the list is empty.
pub fn join_errors(errors: Vec<String>) -> Option<SubstituteError> {
    match errors.len() {
        0 => None,
        1 => Some(SubstituteError::Lookup(errors.into_iter().next().unwrap())),
        _ => Some(SubstituteError::Multiple(errors)),
    }
}
