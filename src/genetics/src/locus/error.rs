use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocusError {
    #[error("Invalid locus genotype '{0}': a locus genotype must contain exactly two allele symbols")]
    InvalidLength(String),
}
