use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use itertools::Itertools;
use log::info;
use located_error::prelude::*;

use crate::{
    cross::Hybridizer,
    genotype::Genotype,
    phenotype::Phenotype,
    ratio::Population,
    specimen::Specimen,
};

mod error;
pub use error::GenerationError;

/// Filial index of the direct offspring of two parents (F1)
pub const FIRST_FILIAL: usize = 1;

/// `count / total`, expressed as a percentage rounded to two decimals. Ties are rounded to even, since
/// power-of-two totals routinely land on them (e.g. 1/32 = 3.125% -> 3.12%).
fn percentage(count: u64, total: u64) -> f64 {
    let percent = count as f64 / total as f64 * 100.0;
    (percent * 100.0).round_ties_even() / 100.0
}

/// Share of a single genotype within a generation.
///
/// NOTE: `percentage` is computed against the whole generation, not against the phenotype class this
/// genotype belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeShare {
    pub genotype  : Genotype,
    pub count     : u64,
    pub percentage: f64,
}

/// e.g. `Aa_50.0%`
impl Display for GenotypeShare {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:?}%", self.genotype, self.percentage)
    }
}

/// Every specimen of a generation sharing the same phenotype.
#[derive(Debug, Clone, PartialEq)]
pub struct PhenotypeClass {
    pub phenotype : Phenotype,
    pub count     : u64,
    pub percentage: f64,
    pub genotypes : Vec<GenotypeShare>,
}

impl PhenotypeClass {
    /// e.g. `red round 56.25%`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {:?}%", self.phenotype, self.percentage)
    }

    /// e.g. `(AaBb_25.0%, AABb_12.5%)`
    #[must_use]
    pub fn genotype_labels(&self) -> String {
        format!("({})", self.genotypes.iter().join(", "))
    }
}

impl Display for PhenotypeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.genotype_labels())
    }
}

/// A filial generation, along with its phenotype and genotype distributions.
///
/// # Fields:
/// - `index`       : filial index (1 for F1, 2 for F2, etc.)
/// - `population`  : offspring of this generation, with their multiplicities.
/// - `distribution`: phenotype classes, sorted by decreasing share, then by phenotype. Genotypes within a
///                   class are sorted by decreasing share, then by genotype.
#[derive(Debug, Clone)]
pub struct Generation {
    index       : usize,
    population  : Population,
    distribution: Vec<PhenotypeClass>,
}

impl Generation {
    /// Aggregate the flat offspring multiset of a cross into the first filial generation (F1).
    ///
    /// # Errors
    /// - `GenerationError::EmptyPopulation` if `offspring` is empty.
    pub fn new(offspring: Vec<Specimen>) -> Result<Self> {
        Self::from_population(offspring.into_iter().collect(), FIRST_FILIAL)
    }

    /// Aggregate a weighted population into the generation of filial index `index`.
    ///
    /// # Errors
    /// - `GenerationError::EmptyPopulation` if `population` is empty.
    pub fn from_population(population: Population, index: usize) -> Result<Self> {
        if population.is_empty() {
            return Err(GenerationError::EmptyPopulation).with_loc(|| format!("While aggregating generation F{index}"))
        }
        let distribution = Self::distribute(&population);
        Ok(Self{index, population, distribution})
    }

    fn distribute(population: &Population) -> Vec<PhenotypeClass> {
        let total = population.total();

        let mut classes: BTreeMap<&Phenotype, Vec<(&Specimen, u64)>> = BTreeMap::new();
        for (specimen, count) in population.iter() {
            classes.entry(specimen.phenotype()).or_default().push((specimen, count));
        }

        classes.into_iter()
            .map(|(phenotype, members)| {
                let count = members.iter().map(|(_, count)| count).sum::<u64>();
                let genotypes = members.into_iter()
                    .sorted_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)))
                    .map(|(specimen, count)| GenotypeShare{
                        genotype  : specimen.genotype().clone(),
                        count,
                        percentage: percentage(count, total)
                    })
                    .collect();
                PhenotypeClass{phenotype: phenotype.clone(), count, percentage: percentage(count, total), genotypes}
            })
            .sorted_by_cached_key(|class| (std::cmp::Reverse(class.count), class.label()))
            .collect()
    }

    /// Cross every individual of this generation with every other (self-crosses included), reduce the
    /// resulting offspring to their simplest ratio, and aggregate them into the next filial generation.
    ///
    /// # Errors
    /// - see [`Hybridizer::cross_population`]
    pub fn next_generation(&self, hybridizer: &Hybridizer) -> Result<Generation> {
        let offspring = hybridizer.cross_population(&self.population)
            .with_loc(|| format!("While crossing generation F{}", self.index))?;
        let reduced = offspring.reduced().loc("While reducing offspring ratios")?;
        info!(
            "F{} -> F{}: {} distinct genotypes. Reduced {} offspring to {} individuals",
            self.index, self.index + 1, reduced.distinct(), offspring.total(), reduced.total()
        );
        Self::from_population(reduced, self.index + 1)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Flat offspring multiset of this generation.
    #[must_use]
    pub fn offspring(&self) -> Vec<Specimen> {
        self.population.to_offspring()
    }

    #[must_use]
    pub fn distribution(&self) -> &[PhenotypeClass] {
        &self.distribution
    }

    /// Phenotype label -> genotype labels. e.g. `{"red 75.0%": "(Aa_50.0%, AA_25.0%)", "white 25.0%": "(aa_25.0%)"}`
    #[must_use]
    pub fn to_labels(&self) -> BTreeMap<String, String> {
        self.distribution.iter()
            .map(|class| (class.label(), class.genotype_labels()))
            .collect()
    }
}

/// e.g.
/// ```text
/// F2:
/// red 75.0%: (Aa_50.0%, AA_25.0%)
/// white 25.0%: (aa_25.0%)
/// ```
impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "F{}:", self.index)?;
        self.distribution.iter().try_for_each(|class| writeln!(f, "{class}"))
    }
}
