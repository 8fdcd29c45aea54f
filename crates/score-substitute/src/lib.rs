mod engine;
mod error;
mod resolver;

pub use engine::{
    scan_tokens, split_ref, substitute, substitute_string, substitute_string_preserving_escapes,
    Resolver,
};
pub use error::SubstituteError;
pub use resolver::{OutputLookupFn, StandardResolver};
