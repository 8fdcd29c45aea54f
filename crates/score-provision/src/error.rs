use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    State(#[from] score_state::StateError),

    #[error(transparent)]
    Graph(#[from] score_graph::GraphError),

    #[error("failed to provision resource '{uid}': {source}")]
    Provider {
        uid: String,
        #[source]
        source: score_provider::ProviderError,
    },
}
