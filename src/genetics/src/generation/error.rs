use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Cannot aggregate an empty offspring population")]
    EmptyPopulation,
}
