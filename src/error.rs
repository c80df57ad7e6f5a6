use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to build the worker thread pool")]
    BuildThreadPool(#[source] rayon::ThreadPoolBuildError),

    #[error("Expected exactly two parents, got {0}")]
    ParentCount(usize),
}
