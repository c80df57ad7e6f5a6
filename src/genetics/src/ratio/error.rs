use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RatioError {
    #[error("Cannot compute the ratio of an empty population")]
    EmptyPopulation,

    #[error("Offspring multiplicity overflowed. Consider crossing fewer loci or generations")]
    Overflow,
}
