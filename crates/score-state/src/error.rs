use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("resource '{0}': multiple definitions with different params")]
    ParamsConflict(String),

    #[error("resource '{0}': multiple definitions with different metadata")]
    MetadataConflict(String),

    #[error("cannot provision shared resource '{0}': there are multiple definitions with different params")]
    ProvisionParamsConflict(String),

    #[error("workload '{0}' is already present in this state")]
    DuplicateWorkload(String),

    #[error(transparent)]
    Domain(#[from] score_domain::DomainError),

    #[error("failed to read state file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {0} is not present")]
    NotPresent(String),

    #[error("failed to decode state file {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_yaml::Error),

    #[error("current version {current} does not match requested constraint {constraint}")]
    VersionMismatch { current: String, constraint: String },

    #[error("invalid version string '{0}'")]
    InvalidVersion(String),

    #[error("invalid version constraint '{0}'")]
    InvalidConstraint(String),
}
