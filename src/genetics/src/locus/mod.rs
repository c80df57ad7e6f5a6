use std::{fmt::{self, Display, Formatter}, str::FromStr};

mod error;
pub use error::LocusError;

/// A single allele symbol (e.g. `'A'`, `'a'`).
pub type Allele = char;

/// Diploid genotype of a single locus, i.e. an ordered pair of allele symbols (e.g. "Aa").
///
/// Symbol order is kept as-is: "Aa" and "aA" are distinct values, even though they may denote the same
/// biological genotype. See [`crate::PhenotypeTable::resolve`] for order-insensitive lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocusGenotype([Allele; 2]);

impl LocusGenotype {
    #[must_use]
    pub fn new(first: Allele, second: Allele) -> Self {
        Self([first, second])
    }

    /// Both allele symbols, in order of appearance.
    #[must_use]
    pub fn alleles(&self) -> [Allele; 2] {
        self.0
    }

    /// Same alleles, in swapped order ("Aa" -> "aA")
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self([self.0[1], self.0[0]])
    }

    #[must_use]
    pub fn is_homozygous(&self) -> bool {
        self.0[0] == self.0[1]
    }
}

impl FromStr for LocusGenotype {
    type Err = LocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Ok(Self::new(first, second)),
            _ => Err(LocusError::InvalidLength(s.to_string())),
        }
    }
}

impl Display for LocusGenotype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}
