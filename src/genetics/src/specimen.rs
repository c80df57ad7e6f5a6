use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

use log::debug;
use located_error::prelude::*;

use crate::{
    gamete::Gamete,
    genotype::{Genotype, OddLength},
    phenotype::{Phenotype, PhenotypeTable},
};

/// An individual of known genotype.
///
/// # Fields:
/// - `genotype` : ordered sequence of locus genotypes.
/// - `phenotype`: phenotype description of each locus, resolved at construction.
/// - `gametes`  : every haploid gamete this specimen can produce (`2^n` for `n` loci).
///
/// Equality, hashing and ordering only depend on `genotype`: two specimens sharing the same genotype are
/// interchangeable, regardless of their phenotype.
#[derive(Debug, Clone)]
pub struct Specimen {
    genotype : Genotype,
    phenotype: Phenotype,
    gametes  : Vec<Gamete>,
}

impl PartialEq for Specimen {
    fn eq(&self, other: &Self) -> bool {
        self.genotype == other.genotype
    }
}

impl Eq for Specimen {}

impl Hash for Specimen {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.genotype.hash(state);
    }
}

impl Ord for Specimen {
    fn cmp(&self, other: &Self) -> Ordering {
        self.genotype.cmp(&other.genotype)
    }
}

impl PartialOrd for Specimen {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Specimen {
    /// Parse `genotype` (leniently: see [`OddLength::Truncate`]) and build a new specimen.
    ///
    /// # Errors
    /// - `PhenotypeError::UnknownGenotype` if any locus is absent from `table`
    pub fn new(genotype: &str, table: &PhenotypeTable) -> Result<Self> {
        Self::parse(genotype, OddLength::Truncate, table)
    }

    /// Parse `genotype` according to `policy` and build a new specimen.
    ///
    /// # Errors
    /// - `GenotypeError::MalformedGenotypeString` if `genotype` has an odd length and `policy` rejects it.
    /// - `PhenotypeError::UnknownGenotype` if any locus is absent from `table`
    pub fn parse(genotype: &str, policy: OddLength, table: &PhenotypeTable) -> Result<Self> {
        let parsed = Genotype::parse(genotype, policy)
            .with_loc(|| format!("While parsing genotype '{genotype}'"))?;
        Self::from_genotype(parsed, table)
    }

    /// Build a specimen from an already parsed genotype. Phenotype and gametes are eagerly resolved.
    ///
    /// # Errors
    /// - `PhenotypeError::UnknownGenotype` if any locus is absent from `table`
    pub fn from_genotype(genotype: Genotype, table: &PhenotypeTable) -> Result<Self> {
        let phenotype = table.phenotype_of(&genotype)
            .with_loc(|| format!("While resolving the phenotype of '{genotype}'"))?;
        let gametes = genotype.gametes();
        debug!("New specimen {genotype}: {} loci, {} gametes", genotype.n_loci(), gametes.len());
        Ok(Self{genotype, phenotype, gametes})
    }

    #[must_use]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    #[must_use]
    pub fn phenotype(&self) -> &Phenotype {
        &self.phenotype
    }

    #[must_use]
    pub fn gametes(&self) -> &[Gamete] {
        &self.gametes
    }

    #[must_use]
    pub fn n_loci(&self) -> usize {
        self.genotype.n_loci()
    }
}

/// e.g. `AaBb(red, round)`
impl Display for Specimen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.genotype, self.phenotype.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common, genotype::GenotypeError, phenotype::PhenotypeError};
    use ahash::AHashSet;

    #[test]
    fn display() -> Result<()> {
        let specimen = Specimen::new("AaBb", &common::dihybrid_table())?;
        assert_eq!(specimen.to_string(), "AaBb(red, round)");
        assert_eq!(specimen.gametes().len(), 4);
        assert_eq!(specimen.n_loci(), 2);
        Ok(())
    }

    #[test]
    fn identity_depends_on_genotype_only() -> Result<()> {
        let red   = Specimen::new("Aa", &common::monohybrid_table())?;
        let other = PhenotypeTable::from_entries([("Aa", "pink")])?;
        let pink  = Specimen::new("Aa", &other)?;
        assert_ne!(red.phenotype(), pink.phenotype());
        assert_eq!(red, pink);
        assert_eq!([red, pink].into_iter().collect::<AHashSet<_>>().len(), 1);
        Ok(())
    }

    #[test]
    fn unknown_genotype() {
        let err = Specimen::new("AaZz", &common::dihybrid_table()).expect_err("'Zz' is unknown");
        assert_eq!(err.downcast_ref::<PhenotypeError>(), Some(&PhenotypeError::UnknownGenotype("Zz".to_string())));
    }

    #[test]
    fn phenotype_lookup_is_exact() {
        // Phenotype resolution of a parsed specimen does not fall back to the swapped order.
        let err = Specimen::new("aA", &common::monohybrid_table()).expect_err("'aA' is unregistered");
        assert!(err.downcast_ref::<PhenotypeError>().is_some());
    }

    #[test]
    fn strict_parsing() -> Result<()> {
        let table = common::dihybrid_table();
        assert_eq!(Specimen::new("AaB", &table)?.genotype().to_string(), "Aa");
        let err = Specimen::parse("AaB", OddLength::Reject, &table).expect_err("Odd length genotype");
        assert!(matches!(err.downcast_ref::<GenotypeError>(), Some(GenotypeError::MalformedGenotypeString(_))));
        Ok(())
    }
}
