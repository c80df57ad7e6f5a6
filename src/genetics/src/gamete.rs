use std::{
    fmt::{self, Display, Formatter},
    ops::Deref,
};

use itertools::Itertools;
use log::trace;
use located_error::prelude::*;

use crate::{
    cross::CrossError,
    genotype::Genotype,
    locus::{Allele, LocusGenotype},
    phenotype::{PhenotypeError, PhenotypeTable},
};

/// Haploid contribution of a parent: one allele symbol per locus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gamete(Vec<Allele>);

impl Deref for Gamete {
    type Target = [Allele];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Allele>> for Gamete {
    fn from(alleles: Vec<Allele>) -> Self {
        Self(alleles)
    }
}

impl Gamete {
    /// Enumerate all gametes of `genotype` under independent assortment, i.e. the full cartesian product
    /// over loci of `{first symbol, second symbol}`.
    ///
    /// Exactly `2^n` gametes are returned for a genotype of `n` loci, in binary counting order (the first
    /// locus varies the slowest). Homozygous loci yield repeated gametes: these are kept, since
    /// multiplicity encodes the allele frequencies of the Punnett square. An empty genotype yields a single
    /// empty gamete.
    #[must_use]
    pub fn enumerate(genotype: &Genotype) -> Vec<Gamete> {
        if genotype.is_empty() {
            return vec![Gamete::default()]
        }
        genotype.iter()
            .map(|locus| locus.alleles().into_iter())
            .multi_cartesian_product()
            .map(Gamete)
            .collect()
    }

    /// Combine two gametes into a diploid genotype, locus per locus.
    ///
    /// Each locus is resolved as `self[i] + other[i]`, falling back to `other[i] + self[i]` if the
    /// phenotype table only registers the swapped ordering.
    ///
    /// # Errors
    /// - `CrossError::LocusCountMismatch` if both gametes do not share the same number of loci.
    /// - `PhenotypeError::UnknownGenotype` if neither ordering of a locus is found within `table`
    pub fn fertilize(&self, other: &Self, table: &PhenotypeTable) -> Result<Genotype> {
        if self.len() != other.len() {
            return Err(CrossError::LocusCountMismatch{left: self.len(), right: other.len()})
                .loc("While fertilizing gametes")
        }

        self.iter().zip(other.iter())
            .map(|(&allele1, &allele2)| -> Result<LocusGenotype, PhenotypeError> {
                let locus = table.resolve(allele1, allele2)?;
                trace!("{allele1} x {allele2} -> {locus}");
                Ok(locus)
            })
            .collect::<Result<Genotype, _>>()
            .with_loc(|| format!("While fertilizing gametes {self} x {other}"))
    }
}

impl Display for Gamete {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|allele| write!(f, "{allele}"))
    }
}
