use std::fmt::{self, Display, Formatter};

use genetics::generation::{Generation, GenotypeShare, PhenotypeClass};

/// Column names of a distribution table.
pub struct DistributionHeader;

impl Display for DistributionHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{: <10} - {: <20} - {: >11} - {: <12} - {: >10}", "generation", "phenotype", "phenotype_%", "genotype", "genotype_%")
    }
}

/// A single `(generation, phenotype, genotype)` line of a distribution table.
///
/// Fields are padded and separated by ` - `, which [`crate::write::GenericWriter`] turns into tabs.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow<'a> {
    generation: usize,
    class     : &'a PhenotypeClass,
    genotype  : &'a GenotypeShare,
}

impl<'a> DistributionRow<'a> {
    /// One row per genotype of `generation`, in distribution order.
    pub fn from_generation(generation: &'a Generation) -> impl Iterator<Item = DistributionRow<'a>> + 'a {
        let index = generation.index();
        generation.distribution().iter()
            .flat_map(move |class| class.genotypes.iter().map(move |genotype| DistributionRow{generation: index, class, genotype}))
    }
}

impl Display for DistributionRow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let generation = format!("F{}", self.generation);
        write!(f, "{generation: <10} - {: <20} - {: >11?} - {: <12} - {: >10?}",
            self.class.phenotype.to_string(),
            self.class.percentage,
            self.genotype.genotype.to_string(),
            self.genotype.percentage,
        )
    }
}
