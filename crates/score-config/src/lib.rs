mod error;
mod loader;

pub use error::ConfigError;
pub use loader::{load_workload_file, load_workloads_dir};
