use std::{collections::BTreeMap, hash::Hash};

use indexmap::IndexMap;
use log::debug;

use crate::specimen::Specimen;

mod error;
pub use error::RatioError;

/// Greatest common divisor of two integers (Euclid)
#[must_use]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Collapse a flat multiset to its simplest equivalent integer ratio.
///
/// Each distinct element is emitted `count / gcd(counts)` times, grouped together, in order of first
/// appearance. e.g. `[x, x, x, x, y, y]` -> `[x, x, y]`
///
/// # Errors
/// - `RatioError::EmptyPopulation` if `items` is empty.
pub fn reduce_ratio<T>(items: &[T]) -> Result<Vec<T>, RatioError>
where   T: Clone + Eq + Hash
{
    let mut counts: IndexMap<&T, u64> = IndexMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }

    let divisor = counts.values().copied().reduce(gcd).ok_or(RatioError::EmptyPopulation)?;
    Ok(counts.into_iter()
        .flat_map(|(item, count)| std::iter::repeat(item).take((count / divisor) as usize))
        .cloned()
        .collect())
}

/// Weighted multiset of specimens: each distinct genotype is mapped to its integer multiplicity.
///
/// Multiplicities encode relative frequencies, not absolute probabilities. Specimens are kept sorted by
/// genotype.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population(BTreeMap<Specimen, u64>);

impl Population {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` individuals of `specimen`'s genotype.
    ///
    /// # Errors
    /// - `RatioError::Overflow` if the resulting multiplicity does not fit within a `u64`
    pub fn add(&mut self, specimen: Specimen, count: u64) -> Result<(), RatioError> {
        if count == 0 {
            return Ok(())
        }
        let entry = self.0.entry(specimen).or_insert(0);
        *entry = entry.checked_add(count).ok_or(RatioError::Overflow)?;
        Ok(())
    }

    /// Multiplicity of `specimen`'s genotype (`0` if absent).
    #[must_use]
    pub fn count(&self, specimen: &Specimen) -> u64 {
        self.0.get(specimen).copied().unwrap_or(0)
    }

    /// Total number of individuals, repetitions included. Saturates at `u64::MAX`
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    /// Number of distinct genotypes
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Specimen, u64)> {
        self.0.iter().map(|(specimen, count)| (specimen, *count))
    }

    /// Greatest common divisor of all multiplicities. `None` if the population is empty.
    #[must_use]
    pub fn gcd(&self) -> Option<u64> {
        self.0.values().copied().reduce(gcd)
    }

    /// Divide every multiplicity by their greatest common divisor, preserving relative proportions.
    ///
    /// # Errors
    /// - `RatioError::EmptyPopulation` if the population is empty.
    pub fn reduced(&self) -> Result<Population, RatioError> {
        let divisor = self.gcd().ok_or(RatioError::EmptyPopulation)?;
        debug!("Reducing population of {} individuals by a factor of {divisor}", self.total());
        Ok(Self(self.0.iter().map(|(specimen, count)| (specimen.clone(), count / divisor)).collect()))
    }

    /// Expand into a flat multiset, where each specimen is repeated according to its multiplicity.
    #[must_use]
    pub fn to_offspring(&self) -> Vec<Specimen> {
        self.0.iter()
            .flat_map(|(specimen, count)| std::iter::repeat(specimen).take(*count as usize))
            .cloned()
            .collect()
    }
}

impl FromIterator<Specimen> for Population {
    fn from_iter<I: IntoIterator<Item = Specimen>>(iter: I) -> Self {
        let mut population = BTreeMap::new();
        for specimen in iter {
            *population.entry(specimen).or_insert(0) += 1;
        }
        Self(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common;
    use anyhow::Result;

    #[test]
    fn greatest_common_divisor() {
        assert_eq!(gcd(4, 2), 2);
        assert_eq!(gcd(9, 6), 3);
        assert_eq!(gcd(7, 5), 1);
        assert_eq!(gcd(0, 5), 5);
    }

    #[test]
    fn reduce_flat_multiset() -> Result<()> {
        assert_eq!(reduce_ratio(&["x", "x", "x", "x", "y", "y"])?, ["x", "x", "y"]);
        assert_eq!(reduce_ratio(&["y", "x", "y", "x", "x", "x"])?, ["y", "x", "x"]);
        assert_eq!(reduce_ratio(&[1, 2, 2, 3, 3, 3])?, [1, 2, 2, 3, 3, 3]);
        Ok(())
    }

    #[test]
    fn reduce_is_idempotent() -> Result<()> {
        let items = [3, 3, 3, 3, 3, 3, 1, 1, 1, 7, 7, 7, 7, 7, 7, 7, 7, 7];
        let once = reduce_ratio(&items)?;
        assert_eq!(once, [3, 3, 1, 7, 7, 7]);
        assert_eq!(reduce_ratio(&once)?, once);
        Ok(())
    }

    #[test]
    fn reduce_empty() {
        assert_eq!(reduce_ratio::<u8>(&[]), Err(RatioError::EmptyPopulation));
        assert_eq!(Population::new().reduced(), Err(RatioError::EmptyPopulation));
    }

    #[test]
    fn reduce_population() -> Result<()> {
        let table = common::monohybrid_table();
        let (dominant, hybrid, recessive) = (Specimen::new("AA", &table)?, Specimen::new("Aa", &table)?, Specimen::new("aa", &table)?);

        let mut population = Population::new();
        population.add(dominant.clone(), 4)?;
        population.add(hybrid.clone(), 8)?;
        population.add(recessive.clone(), 4)?;
        assert_eq!(population.total(), 16);
        assert_eq!(population.gcd(), Some(4));

        let reduced = population.reduced()?;
        assert_eq!((reduced.count(&dominant), reduced.count(&hybrid), reduced.count(&recessive)), (1, 2, 1));
        assert_eq!(reduced.reduced()?, reduced);
        assert_eq!(reduced.to_offspring().len(), 4);
        Ok(())
    }

    #[test]
    fn flat_and_weighted_agree() -> Result<()> {
        let table = common::monohybrid_table();
        let offspring = ["AA", "Aa", "Aa", "AA", "Aa", "Aa"].into_iter()
            .map(|genotype| Specimen::new(genotype, &table))
            .collect::<Result<Vec<_>>>()?;

        let flat     = Population::from_iter(reduce_ratio(&offspring)?);
        let weighted = Population::from_iter(offspring).reduced()?;
        assert_eq!(flat, weighted);
        assert_eq!(weighted.total(), 3);
        Ok(())
    }

    #[test]
    fn overflow() -> Result<()> {
        let table = common::monohybrid_table();
        let mut population = Population::new();
        population.add(Specimen::new("Aa", &table)?, u64::MAX)?;
        assert_eq!(population.add(Specimen::new("Aa", &table)?, 1), Err(RatioError::Overflow));
        Ok(())
    }
}
