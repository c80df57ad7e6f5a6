use ahash::AHashMap;
use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::*;

use located_error::prelude::*;

use crate::{
    genotype::Genotype,
    phenotype::PhenotypeTable,
    ratio::{Population, RatioError},
    specimen::Specimen,
};

mod error;
pub use error::CrossError;

/// Offspring genotype counts of a single cross.
type PunnettCounts = AHashMap<Genotype, u64>;

/// Crosses specimens against a shared, read-only phenotype table.
///
/// # Fields:
/// - `table`   : phenotype table used to resolve every offspring locus.
/// - `max_loci`: optional upper bound on the number of loci of crossed specimens. Crossing cost grows
///               exponentially with the number of loci, so callers requiring bounded latency should set it.
#[derive(Debug, Clone, Copy)]
pub struct Hybridizer<'table> {
    table   : &'table PhenotypeTable,
    max_loci: Option<usize>,
}

impl<'table> Hybridizer<'table> {
    #[must_use]
    pub fn new(table: &'table PhenotypeTable) -> Self {
        Self{table, max_loci: None}
    }

    #[must_use]
    pub fn with_max_loci(mut self, max_loci: usize) -> Self {
        self.max_loci = Some(max_loci);
        self
    }

    #[must_use]
    pub fn table(&self) -> &'table PhenotypeTable {
        self.table
    }

    /// Ensure `specimen` does not exceed the configured maximum number of loci.
    ///
    /// # Errors
    /// - `CrossError::TooManyLoci`
    pub fn check_loci(&self, specimen: &Specimen) -> Result<()> {
        match self.max_loci {
            Some(max) if specimen.n_loci() > max => {
                let genotype = specimen.genotype().to_string();
                Err(CrossError::TooManyLoci{genotype, loci: specimen.n_loci(), max})
                    .loc("While checking the size of a parent genotype")
            },
            _ => Ok(())
        }
    }

    fn check_parents(&self, parent1: &Specimen, parent2: &Specimen) -> Result<()> {
        if parent1.n_loci() != parent2.n_loci() {
            return Err(CrossError::LocusCountMismatch{left: parent1.n_loci(), right: parent2.n_loci()})
                .with_loc(|| format!("While crossing {parent1} x {parent2}"))
        }
        self.check_loci(parent1)?;
        self.check_loci(parent2)
    }

    /// Cross two parents through the full Punnett square of their gametes.
    ///
    /// Returns the flat offspring multiset: one specimen per `(gamete1, gamete2)` pair, i.e.
    /// `|G1| x |G2|` specimens, in `parent1`-gamete-major order. Repetitions encode the offspring ratio.
    ///
    /// # Errors
    /// - `CrossError::LocusCountMismatch` if both parents do not share the same number of loci.
    /// - `CrossError::TooManyLoci` if a parent exceeds the configured maximum number of loci.
    /// - `PhenotypeError::UnknownGenotype` if an offspring locus is absent from the table, in either order.
    pub fn cross(&self, parent1: &Specimen, parent2: &Specimen) -> Result<Vec<Specimen>> {
        self.check_parents(parent1, parent2)?;

        let mut known: AHashMap<Genotype, Specimen> = AHashMap::new();
        let mut offspring = Vec::with_capacity(parent1.gametes().len() * parent2.gametes().len());
        for (gamete1, gamete2) in parent1.gametes().iter().cartesian_product(parent2.gametes()) {
            let genotype = gamete1.fertilize(gamete2, self.table)?;
            let child = match known.get(&genotype) {
                Some(child) => child.clone(),
                None => {
                    let child = Specimen::from_genotype(genotype.clone(), self.table)?;
                    known.insert(genotype, child.clone());
                    child
                }
            };
            offspring.push(child);
        }
        debug!("{parent1} x {parent2}: {} offspring, {} distinct genotypes", offspring.len(), known.len());
        Ok(offspring)
    }

    /// Weighted variant of [`Hybridizer::cross`]: offspring are directly aggregated into a [`Population`].
    ///
    /// # Errors
    /// - see [`Hybridizer::cross`]
    pub fn cross_weighted(&self, parent1: &Specimen, parent2: &Specimen) -> Result<Population> {
        let counts = self.punnett_counts(parent1, parent2)?;
        self.populate(counts)
    }

    /// Cross every ordered pair of individuals of `population` (self-crosses included), and aggregate the
    /// resulting offspring.
    ///
    /// This is equivalent to expanding `population` into its `k` individuals, crossing all `k x k` pairs
    /// and concatenating their offspring, but only the `d` distinct genotypes are crossed, each pair
    /// weighted by the product of both multiplicities. Work is thus `O(d^2 . 4^n)` for `n` loci, instead of
    /// `O(k^2 . 4^n)`. Pairs are crossed in parallel, within the current `rayon` thread pool.
    ///
    /// The returned population is NOT ratio-reduced.
    ///
    /// # Errors
    /// - see [`Hybridizer::cross`]
    /// - `RatioError::Overflow` if an offspring multiplicity does not fit within a `u64`
    pub fn cross_population(&self, population: &Population) -> Result<Population> {
        let entries = population.iter().collect::<Vec<(&Specimen, u64)>>();
        debug!("Crossing {} distinct genotypes ({} individuals)", entries.len(), population.total());

        let counts = entries.iter()
            .cartesian_product(entries.iter())
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(&(parent1, weight1), &(parent2, weight2))| -> Result<PunnettCounts> {
                let weight = weight1.checked_mul(weight2)
                    .ok_or(RatioError::Overflow)
                    .loc("While weighting a pair of parents")?;
                let mut counts = self.punnett_counts(parent1, parent2)?;
                for count in counts.values_mut() {
                    *count = count.checked_mul(weight)
                        .ok_or(RatioError::Overflow)
                        .with_loc(|| format!("While weighting the offspring of {parent1} x {parent2}"))?;
                }
                Ok(counts)
            })
            .try_reduce(PunnettCounts::new, merge_counts)?;

        self.populate(counts)
    }

    /// Count the offspring genotypes of a single cross.
    fn punnett_counts(&self, parent1: &Specimen, parent2: &Specimen) -> Result<PunnettCounts> {
        self.check_parents(parent1, parent2)?;
        let mut counts = PunnettCounts::new();
        for (gamete1, gamete2) in parent1.gametes().iter().cartesian_product(parent2.gametes()) {
            let genotype = gamete1.fertilize(gamete2, self.table)?;
            *counts.entry(genotype).or_insert(0) += 1;
        }
        trace!("{parent1} x {parent2}: {counts:?}");
        Ok(counts)
    }

    /// Turn offspring genotype counts into a population of specimens.
    fn populate(&self, counts: PunnettCounts) -> Result<Population> {
        let mut population = Population::new();
        for (genotype, count) in counts {
            population.add(Specimen::from_genotype(genotype, self.table)?, count)?;
        }
        Ok(population)
    }
}

/// Sum two sets of offspring genotype counts.
fn merge_counts(mut acc: PunnettCounts, other: PunnettCounts) -> Result<PunnettCounts> {
    for (genotype, count) in other {
        let entry = acc.entry(genotype).or_insert(0);
        *entry = entry.checked_add(count).ok_or(RatioError::Overflow).loc("While merging offspring counts")?;
    }
    Ok(acc)
}

/// Cross two parents through the full Punnett square of their gametes. See [`Hybridizer::cross`]
///
/// # Errors
/// - see [`Hybridizer::cross`]
pub fn hybridize(parent1: &Specimen, parent2: &Specimen, table: &PhenotypeTable) -> Result<Vec<Specimen>> {
    Hybridizer::new(table).cross(parent1, parent2)
}
