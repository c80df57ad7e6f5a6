extern crate parser;
extern crate logger;

use std::path::Path;

use parser::{Cli, Commands, Common, Cross};
use genetics::{
    phenotype::PhenotypeError,
    Generation, Hybridizer, OddLength, PhenotypeTable, Specimen,
};
use mendel_io::{
    parse::{can_write_file, create_parent_directory},
    read::TableReader,
    write::{DistributionHeader, DistributionRow, GenericWriter},
};
use located_error::prelude::*;

#[macro_use]
extern crate log;

mod error;
pub use error::RunError;

/// Printed in place of a phenotype, whenever a genotype holds a locus absent from the phenotype table.
pub const UNRECOGNIZED_GENOTYPE: &str = "unrecognized genotype";

/// Load and validate the phenotype table of `common`
///
/// # Errors
/// - see [`TableReader::read_table`]
pub fn load_table(common: &Common) -> Result<PhenotypeTable> {
    info!("Loading phenotype table {}...", common.table.display());
    TableReader::new(&common.table)?.read_table()
}

fn odd_length_policy(common: &Common) -> OddLength {
    match common.strict {
        true  => OddLength::Reject,
        false => OddLength::Truncate,
    }
}

/// Cross both parents into F1, then derive every subsequent generation up to `F{generations}`.
///
/// # Errors
/// - if either parent cannot be parsed, or holds a locus absent from `table`
/// - if the cross itself fails: see [`Hybridizer::cross`]
pub fn filial_generations(
    parents    : [&str; 2],
    table      : &PhenotypeTable,
    policy     : OddLength,
    generations: usize,
    max_loci   : usize,
) -> Result<Vec<Generation>> {
    let [parent1, parent2] = parents.map(|genotype| {
        Specimen::parse(genotype, policy, table).with_loc(|| format!("While parsing parent '{genotype}'"))
    });
    let (parent1, parent2) = (parent1?, parent2?);
    info!("Crossing {parent1} x {parent2}");

    let hybridizer = Hybridizer::new(table).with_max_loci(max_loci);
    let f1 = Generation::new(hybridizer.cross(&parent1, &parent2)?)?;

    let progress = logger::Logger::progress_bar(generations as u64, "generations");
    progress.inc(1);
    let mut filials = Vec::with_capacity(generations);
    filials.push(f1);
    while filials.len() < generations {
        let next = filials.last().loc("F1 is always present")?.next_generation(&hybridizer)?;
        filials.push(next);
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(filials)
}

/// Write every generation into a tab-separated file, or print them to the console if no output file was
/// requested.
fn write_generations(generations: &[Generation], output: Option<&Path>, overwrite: bool) -> Result<()> {
    let Some(path) = output else {
        generations.iter().for_each(|generation| println!("{generation}"));
        return Ok(())
    };

    create_parent_directory(path)?;
    can_write_file(overwrite, path)?;
    info!("Writing distributions into {}", path.display());
    let mut writer = GenericWriter::new(Some(path))?;
    writer.write_iter([DistributionHeader])?;
    for generation in generations {
        writer.write_iter(DistributionRow::from_generation(generation))?;
    }
    Ok(())
}

fn run_cross(common: &Common, cross: &Cross) -> Result<Vec<Generation>> {
    let [parent1, parent2] = cross.parents.as_slice() else {
        return Err(RunError::ParentCount(cross.parents.len())).loc("While parsing parents")
    };
    let table = load_table(common)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cross.threads)
        .build()
        .map_err(RunError::BuildThreadPool)
        .loc("While initializing worker threads")?;

    let generations = pool.install(|| {
        filial_generations([parent1.as_str(), parent2.as_str()], &table, odd_length_policy(common), cross.generations, cross.max_loci)
    })?;

    write_generations(&generations, cross.output_file().as_deref(), cross.overwrite)?;
    Ok(generations)
}

/// Describe each genotype as `Genotype(phenotype, ...)`, or flag it as [`UNRECOGNIZED_GENOTYPE`].
///
/// # Errors
/// - on any failure other than an unknown locus genotype, e.g. an odd-length genotype under
///   [`OddLength::Reject`]
pub fn describe_genotypes<S: AsRef<str>>(genotypes: &[S], table: &PhenotypeTable, policy: OddLength) -> Result<Vec<String>> {
    genotypes.iter()
        .map(|genotype| {
            let genotype = genotype.as_ref();
            match Specimen::parse(genotype, policy, table) {
                Ok(specimen) => Ok(specimen.to_string()),
                Err(e) if matches!(e.downcast_ref::<PhenotypeError>(), Some(PhenotypeError::UnknownGenotype(_))) => {
                    warn!("{e:?}");
                    Ok(format!("{genotype}: {UNRECOGNIZED_GENOTYPE}"))
                },
                Err(e) => Err(e),
            }
        })
        .collect()
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Commands::Cross {common, cross} => {
            run_cross(&common, &cross)?;
        },

        Commands::Phenotype {common, genotypes} => {
            let table = load_table(&common)?;
            describe_genotypes(&genotypes, &table, odd_length_policy(&common))?
                .iter()
                .for_each(|line| println!("{line}"));
        },

        Commands::FromYaml {yaml} => {
            let cli = Cli::deserialize(&yaml)?;
            self::run(cli)?;
        },
    };
    Ok(())
}
