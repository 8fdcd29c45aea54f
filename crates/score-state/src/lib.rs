mod error;
mod persist;
mod prime;
mod types;
mod version;

pub use error::StateError;
pub use persist::{load, persist};
pub use prime::prime_resources;
pub use types::{OutputLookupFn, ScoreResourceState, ScoreWorkloadState, State};
pub use version::check_version;
