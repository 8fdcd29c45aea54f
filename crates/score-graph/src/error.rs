use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("a cycle exists involving resource param placeholders")]
    Cycle,
}
