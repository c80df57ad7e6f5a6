//! Mendelian inheritance engine.
//!
//! Genotypes are parsed into ordered sequences of loci, whose phenotypes are resolved against an
//! externally supplied [`PhenotypeTable`]. Crossing two [`Specimen`]s enumerates the full Punnett
//! square of their gametes, and a [`Generation`] aggregates the resulting offspring into phenotype and
//! genotype distributions, from which further filial generations can be derived.

pub mod locus;
pub use locus::{Allele, LocusGenotype};

pub mod genotype;
pub use genotype::{Genotype, OddLength};

mod gamete;
pub use gamete::Gamete;

pub mod phenotype;
pub use phenotype::{Phenotype, PhenotypeTable};

pub mod specimen;
pub use specimen::Specimen;

pub mod cross;
pub use cross::{Hybridizer, hybridize};

pub mod ratio;
pub use ratio::{Population, reduce_ratio};

pub mod generation;
pub use generation::{Generation, PhenotypeClass, GenotypeShare};

#[cfg(test)]
pub(crate) mod common {
    use super::PhenotypeTable;

    /// Single-locus table with complete dominance of `A` over `a`.
    pub fn monohybrid_table() -> PhenotypeTable {
        PhenotypeTable::from_entries([("AA", "red"), ("Aa", "red"), ("aa", "white")])
            .expect("Valid phenotype table")
    }

    /// Two-loci table: color (`A`/`a`) and shape (`B`/`b`), both completely dominant.
    pub fn dihybrid_table() -> PhenotypeTable {
        PhenotypeTable::from_entries([
            ("AA", "red"),   ("Aa", "red"),   ("aa", "white"),
            ("BB", "round"), ("Bb", "round"), ("bb", "wrinkled"),
        ]).expect("Valid phenotype table")
    }
}
