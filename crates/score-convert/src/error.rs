use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("workload '{0}' has no containers")]
    NoContainers(String),

    #[error("{0}")]
    Domain(#[from] score_domain::DomainError),

    #[error("containers.{container}.volumes[{target}]: sub-path is not supported by this provider")]
    SubPathUnsupported { container: String, target: String },

    #[error("containers.{container}.volumes[{target}]: resolved source '{resolved}' is not a declared volume resource")]
    VolumeNotDeclared {
        container: String,
        target: String,
        resolved: String,
    },

    #[error("containers.{container}.files[{target}]: missing 'content', 'binaryContent', or 'source'")]
    MissingFileContent { container: String, target: String },

    #[error("containers.{container}.files[{target}]: failed to substitute in content: {inner}")]
    FileSubstitution {
        container: String,
        target: String,
        inner: String,
    },

    #[error("containers.{container}.{field}[{target}]: failed to substitute: {inner}")]
    Substitution {
        container: String,
        field: &'static str,
        target: String,
        inner: String,
    },

    #[error("files are not supported")]
    FilesNotSupported,

    #[error("file collision: targets {0} and {1} both expand to the on-disk name '{2}'")]
    FileNameCollision(String, String, String),

    #[error("containers.{container}.files[{target}]: invalid octal mode '{mode}'")]
    InvalidMode {
        container: String,
        target: String,
        mode: String,
    },

    #[error("containers.{container}.files[{target}]: {source}")]
    Io {
        container: String,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("base64 decode failed for containers.{container}.files[{target}]: {source}")]
    Base64 {
        container: String,
        target: String,
        #[source]
        source: base64::DecodeError,
    },
}
