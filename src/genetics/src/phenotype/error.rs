use thiserror::Error;

use crate::locus::LocusError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PhenotypeError {
    #[error("Unrecognized genotype '{0}': neither symbol order is registered within the phenotype table")]
    UnknownGenotype(String),

    #[error("Invalid phenotype table key")]
    InvalidKey(#[from] LocusError),

    #[error("Phenotype description of genotype '{0}' is empty")]
    EmptyDescription(String),
}
