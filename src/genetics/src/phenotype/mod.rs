use std::{
    fmt::{self, Display, Formatter},
    ops::Deref,
};

use ahash::AHashMap;
use log::warn;

use crate::{
    genotype::Genotype,
    locus::{Allele, LocusGenotype},
};

mod error;
pub use error::PhenotypeError;

/// Phenotype descriptions exceeding this number of characters are accepted, but reported.
pub const MAX_DESCRIPTION_LEN: usize = 15;

/// Immutable mapping of a locus genotype to a human-readable phenotype description.
///
/// The table is flat: keys of every locus share the same namespace (e.g. `AA`, `Aa`, `aa`, `BB`, `Bb`, `bb`).
/// A table may register a single ordering per unordered allele pair: see [`PhenotypeTable::resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhenotypeTable(AHashMap<LocusGenotype, String>);

impl PhenotypeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(genotype, description)` pairs.
    ///
    /// # Errors
    /// - see [`PhenotypeTable::insert`]
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, PhenotypeError>
    where   I: IntoIterator<Item = (K, V)>,
            K: AsRef<str>,
            V: AsRef<str>,
    {
        let mut table = Self::new();
        for (genotype, description) in entries {
            table.insert(genotype.as_ref(), description.as_ref())?;
        }
        Ok(table)
    }

    /// Register a new genotype -> phenotype association. Returns the previous description, if any.
    ///
    /// # Errors
    /// - `PhenotypeError::InvalidKey` if `genotype` does not contain exactly two symbols.
    /// - `PhenotypeError::EmptyDescription` if `description` is empty, or only contains whitespace.
    pub fn insert(&mut self, genotype: &str, description: &str) -> Result<Option<String>, PhenotypeError> {
        let locus = genotype.trim().parse::<LocusGenotype>()?;
        let description = description.trim();
        if description.is_empty() {
            return Err(PhenotypeError::EmptyDescription(locus.to_string()))
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            warn!("Phenotype description of '{locus}' is longer than {MAX_DESCRIPTION_LEN} characters: '{description}'");
        }
        Ok(self.0.insert(locus, description.to_string()))
    }

    #[must_use]
    pub fn get(&self, locus: &LocusGenotype) -> Option<&str> {
        self.0.get(locus).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, locus: &LocusGenotype) -> bool {
        self.0.contains_key(locus)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocusGenotype, &str)> {
        self.0.iter().map(|(locus, description)| (locus, description.as_str()))
    }

    /// Exact lookup of a locus genotype's phenotype description.
    ///
    /// # Errors
    /// - `PhenotypeError::UnknownGenotype` if `locus` is absent from the table.
    pub fn describe(&self, locus: &LocusGenotype) -> Result<&str, PhenotypeError> {
        self.get(locus).ok_or_else(|| PhenotypeError::UnknownGenotype(locus.to_string()))
    }

    /// Two-probe resolution of an unordered allele pair: `first + second` if registered, `second + first`
    /// otherwise.
    ///
    /// # Errors
    /// - `PhenotypeError::UnknownGenotype` if neither ordering is registered.
    pub fn resolve(&self, first: Allele, second: Allele) -> Result<LocusGenotype, PhenotypeError> {
        let locus = LocusGenotype::new(first, second);
        if self.contains(&locus) {
            return Ok(locus)
        }
        let swapped = locus.reversed();
        match self.contains(&swapped) {
            true  => Ok(swapped),
            false => Err(PhenotypeError::UnknownGenotype(locus.to_string())),
        }
    }

    /// Phenotype of a full genotype: one exact lookup per locus, in locus order.
    ///
    /// # Errors
    /// - `PhenotypeError::UnknownGenotype` on the first locus that is absent from the table.
    pub fn phenotype_of(&self, genotype: &Genotype) -> Result<Phenotype, PhenotypeError> {
        genotype.iter()
            .map(|locus| self.describe(locus).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()
            .map(Phenotype)
    }
}

/// Ordered tuple of phenotype descriptions, one per locus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phenotype(Vec<String>);

impl Deref for Phenotype {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Phenotype {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Descriptions joined by a single space (e.g. "red round")
impl Display for Phenotype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common, locus::LocusError};

    #[test]
    fn describe() -> Result<(), PhenotypeError> {
        let table = common::monohybrid_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.describe(&"aa".parse()?)?, "white");
        assert_eq!(table.describe(&"aA".parse()?), Err(PhenotypeError::UnknownGenotype("aA".to_string())));
        Ok(())
    }

    #[test]
    fn resolve_prefers_given_order() -> Result<(), PhenotypeError> {
        let table = PhenotypeTable::from_entries([("Aa", "red"), ("aA", "pink")])?;
        assert_eq!(table.resolve('A', 'a')?.to_string(), "Aa");
        assert_eq!(table.resolve('a', 'A')?.to_string(), "aA");
        Ok(())
    }

    #[test]
    fn resolve_falls_back_to_swapped_order() -> Result<(), PhenotypeError> {
        let table = common::monohybrid_table();
        assert_eq!(table.resolve('a', 'A')?.to_string(), "Aa");
        assert_eq!(table.resolve('A', 'z'), Err(PhenotypeError::UnknownGenotype("Az".to_string())));
        Ok(())
    }

    #[test]
    fn invalid_entries() {
        assert_eq!(
            PhenotypeTable::from_entries([("AAa", "red")]),
            Err(PhenotypeError::InvalidKey(LocusError::InvalidLength("AAa".to_string())))
        );
        assert_eq!(
            PhenotypeTable::from_entries([("Aa", "  ")]),
            Err(PhenotypeError::EmptyDescription("Aa".to_string()))
        );
    }

    #[test]
    fn phenotype_of_genotype() -> Result<(), PhenotypeError> {
        let table = common::dihybrid_table();
        let genotype: Genotype = "aaBb".parse().expect("lenient parsing");
        let phenotype = table.phenotype_of(&genotype)?;
        assert_eq!(&*phenotype, ["white", "round"]);
        assert_eq!(phenotype.to_string(), "white round");

        let unknown: Genotype = "bBaa".parse().expect("lenient parsing");
        assert_eq!(table.phenotype_of(&unknown), Err(PhenotypeError::UnknownGenotype("bB".to_string())));
        Ok(())
    }
}
