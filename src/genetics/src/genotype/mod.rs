use std::{
    fmt::{self, Display, Formatter},
    ops::Deref,
    str::FromStr,
};

use itertools::Itertools;
use log::warn;

use crate::{gamete::Gamete, locus::LocusGenotype};

mod error;
pub use error::GenotypeError;

/// Behavior of the parser when a genotype string holds an odd number of allele symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OddLength {
    /// Silently discard the trailing symbol (a warning is still logged).
    #[default]
    Truncate,
    /// Return a [`GenotypeError::MalformedGenotypeString`]
    Reject,
}

/// Full genotype of an individual: an ordered sequence of locus genotypes.
///
/// Locus order is caller-defined, and must match the one used when building the phenotype table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Genotype(Vec<LocusGenotype>);

impl Deref for Genotype {
    type Target = [LocusGenotype];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<LocusGenotype>> for Genotype {
    fn from(loci: Vec<LocusGenotype>) -> Self {
        Self(loci)
    }
}

impl FromIterator<LocusGenotype> for Genotype {
    fn from_iter<I: IntoIterator<Item = LocusGenotype>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Genotype {
    /// Split `s` into consecutive two-symbol chunks, from left to right. No validation of the allele
    /// symbols is performed here: invalid symbols only surface during phenotype resolution.
    ///
    /// # Errors
    /// - `GenotypeError::MalformedGenotypeString` if `s` holds an odd number of symbols, and `policy` is
    ///   set to [`OddLength::Reject`]
    pub fn parse(s: &str, policy: OddLength) -> Result<Self, GenotypeError> {
        let mut chunks = s.chars().tuples::<(char, char)>();
        let loci = chunks.by_ref()
            .map(|(first, second)| LocusGenotype::new(first, second))
            .collect::<Vec<_>>();

        if let Some(dangling) = chunks.into_buffer().next() {
            match policy {
                OddLength::Truncate => warn!("Genotype '{s}' holds an odd number of symbols. Discarding trailing allele '{dangling}'"),
                OddLength::Reject   => return Err(GenotypeError::MalformedGenotypeString(s.to_string())),
            }
        }
        Ok(Self(loci))
    }

    /// Number of loci within this genotype
    #[must_use]
    pub fn n_loci(&self) -> usize {
        self.0.len()
    }

    /// Enumerate every haploid gamete this genotype can produce. See [`Gamete::enumerate`]
    #[must_use]
    pub fn gametes(&self) -> Vec<Gamete> {
        Gamete::enumerate(self)
    }
}

/// Lenient parsing: odd-length strings are truncated. See [`OddLength::Truncate`]
impl FromStr for Genotype {
    type Err = GenotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, OddLength::default())
    }
}

impl Display for Genotype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|locus| write!(f, "{locus}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_into_loci() -> Result<(), GenotypeError> {
        let genotype = Genotype::parse("AaBbcc", OddLength::Reject)?;
        assert_eq!(genotype.n_loci(), 3);
        let loci = genotype.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(loci, ["Aa", "Bb", "cc"]);
        assert_eq!(genotype.to_string(), "AaBbcc");
        Ok(())
    }

    #[test]
    fn odd_length_is_truncated() -> Result<(), GenotypeError> {
        let genotype = Genotype::parse("AaB", OddLength::Truncate)?;
        assert_eq!(genotype.to_string(), "Aa");
        let lenient: Genotype = "AaB".parse()?;
        assert_eq!(genotype, lenient);
        assert_eq!("AaBbC".parse::<Genotype>()?.to_string(), "AaBb");
        Ok(())
    }

    #[test]
    fn odd_length_is_rejected() {
        assert_eq!(
            Genotype::parse("AaB", OddLength::Reject),
            Err(GenotypeError::MalformedGenotypeString("AaB".to_string()))
        );
    }

    #[test]
    fn empty_genotype() -> Result<(), GenotypeError> {
        let genotype = Genotype::parse("", OddLength::Reject)?;
        assert_eq!(genotype.n_loci(), 0);
        assert_eq!(genotype.to_string(), "");
        Ok(())
    }

    #[test]
    fn symbols_are_not_validated() -> Result<(), GenotypeError> {
        let genotype = Genotype::parse("%?Zz", OddLength::Reject)?;
        assert_eq!(genotype.to_string(), "%?Zz");
        Ok(())
    }
}
