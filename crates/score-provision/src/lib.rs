mod error;
mod provision;

pub use error::ProvisionError;
pub use provision::provision_all;
