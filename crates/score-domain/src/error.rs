use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("workload is missing required metadata field 'name'")]
    MissingMetadataName,

    #[error("workload '{0}' has no containers")]
    NoContainers(String),

    #[error("invalid resource uid: {0}")]
    InvalidResourceUid(String),
}
