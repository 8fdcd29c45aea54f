use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no provider matches resource type '{res_type}', class '{class}', id '{id}'")]
    NoMatch {
        res_type: String,
        class: String,
        id: String,
    },

    #[error("the resource was previous provisioned by a different provider - please reset all state and generate again")]
    ProviderMismatch,

    #[error("provision failed: {0}")]
    ProvisionFailed(String),
}
