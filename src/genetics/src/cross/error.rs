use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CrossError {
    #[error("Cannot cross genotypes with differing locus counts ({left} vs. {right} loci)")]
    LocusCountMismatch{left: usize, right: usize},

    #[error("Genotype '{genotype}' holds {loci} loci, which exceeds the maximum of {max} loci")]
    TooManyLoci{genotype: String, loci: usize, max: usize},
}
