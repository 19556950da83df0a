#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no graph attached; call attach() before initialize/step")]
    MissingGraph,
    #[error("failed to build layout worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("repulsion worker for range [{from}, {to}) produced a non-finite force at node {node}")]
    Worker { from: usize, to: usize, node: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
