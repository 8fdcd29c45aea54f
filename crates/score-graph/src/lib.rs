mod error;
mod schedule;

pub use error::GraphError;
pub use schedule::{sort_resources, ResourceNode};
