use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenotypeError {
    #[error("Malformed genotype string '{0}': expected an even number of allele symbols")]
    MalformedGenotypeString(String),
}
