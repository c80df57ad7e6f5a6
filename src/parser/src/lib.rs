use std::{
    fs::File,
    path::{Path, PathBuf},
    fmt::{self, Display, Formatter}, ffi::OsStr
};

use located_error::*;

use clap::{Parser, Subcommand, Args};
use serde::{Serialize, Deserialize};
use log::{debug, info};
use anyhow::Result;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="mendel-rs", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// mendel-rs: Mendelian inheritance calculator across an arbitrary number of loci
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emitted and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Serialize command line arguments within a `.yaml` file, so that the run may be replayed
    /// through `mendel-rs from-yaml`.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder.
    /// - Only `cross` runs are serialized. Returns the path of the written file, if any.
    ///
    /// # Errors
    /// - if `serde_yaml` fails to parse `Self` to a string.
    /// - if the output file cannot be written.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let output_dir = match &self.commands {
            Commands::Cross{cross, ..}                    => &cross.output_dir,
            Commands::Phenotype{..} | Commands::FromYaml{..} => return Ok(None),
        };

        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::Serialize)
            .loc("While serializing command line arguments")?;
        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S");
        let output_file  = output_dir.join(format!("{current_time}-cross.yaml"));

        std::fs::write(&output_file, serialized)
            .map_err(|e| ParserError::WriteArgs(output_file.clone(), e))
            .loc("While serializing command line arguments")?;
        info!("Command line arguments written to {}", output_file.display());
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    /// - Returns `FileNotFound` or `PermissionDenied` if the provided `.yaml` is invalid,
    ///   or does not carry read permissions
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let loc_msg = || format!("While replaying arguments from {}", yaml.display());
        let file = File::open(yaml).map_err(|e| ParserError::OpenYaml(yaml.to_path_buf(), e)).with_loc(loc_msg)?;
        serde_yaml::from_reader(file).map_err(|e| ParserError::Deserialize(yaml.to_path_buf(), e)).with_loc(loc_msg)
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Cross two parents, and compute the phenotype and genotype distributions of their filial generations.
    ///
    /// F1 is the direct offspring of both parents. Every subsequent generation is obtained by crossing
    /// every individual of the previous generation with every other (self-crosses included).
    Cross {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        cross: Cross,
    },

    /// Print the phenotype of one or more genotypes.
    Phenotype {
        #[clap(flatten)]
        common: Common,

        /// Genotypes to describe, e.g. 'AaBb'
        #[clap(required(true))]
        genotypes: Vec<String>,
    },

    /// Run mendel-rs using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a mendel-rs command using the exact same parameters
    /// and arguments.
    FromYaml {
        yaml: PathBuf,
    },
}

#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Common {
    /// Phenotype table, mapping every locus genotype to its phenotype description.
    ///
    /// Accepted file formats:{n}
    ///   '.json'        : '{"AA": "red", "Aa": "red", "aa": "white"}'{n}
    ///   '.yaml', '.yml': one 'AA: red' mapping per line{n}
    ///   '.tsv', '.txt' : tab-separated 'GENOTYPE PHENOTYPE' lines. Lines starting with '#' are skipped.{n}
    ///
    /// Heterozygous genotypes may be registered in a single ordering (e.g. 'Aa'): 'aA' is then resolved as 'Aa'.
    #[clap(short='t', long, parse(try_from_os_str=valid_input_file))]
    pub table: PathBuf,

    /// Reject genotype strings holding an odd number of allele symbols.
    ///
    /// By default, a trailing unpaired symbol is dropped, and a warning is emitted.
    #[clap(short='s', long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct Cross {
    /// Genotypes of both parents, e.g. '--parents AaBb AaBb'
    #[clap(short='p', long, number_of_values(2), value_names(&["P1", "P2"]), required(true))]
    pub parents: Vec<String>,

    /// Number of filial generations to compute (1 = F1 only).
    #[clap(short='g', long, default_value("1"), parse(try_from_str=positive_usize))]
    pub generations: usize,

    /// Maximum number of loci per genotype.
    ///
    /// Crossing costs grow as 4^n with the number of loci: parents carrying more loci are rejected.
    #[clap(short='m', long, default_value("8"))]
    pub max_loci: usize,

    /// Number of worker threads used when crossing generations.
    #[clap(short='j', long, default_value("1"), parse(try_from_str=positive_usize))]
    pub threads: usize,

    /// Write distributions into a tab-separated file instead of printing them.
    ///
    /// Relative paths are resolved against '--output-dir'
    #[clap(short='O', long)]
    pub output: Option<PathBuf>,

    /// Output directory where results and replayable run configurations are written.
    #[clap(short='o', long, default_value("mendel-output"), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: PathBuf,

    /// Overwrite existing output files.
    ///
    /// By default, mendel-rs does not allow itself from overwriting existing results files. Use this flag
    /// to force this behaviour.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

impl Cross {
    /// Location of the distribution table, if any. Relative paths are resolved against `--output-dir`.
    #[must_use]
    pub fn output_file(&self) -> Option<PathBuf> {
        self.output.as_ref().map(|output| self.output_dir.join(output))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir(s)
            .map_err(|e| ParserError::CreateOutputDir(Path::new(s).display().to_string(), e))
            .loc("While creating output directory")?;
    }
    assert_filesystem_entity_is_valid(s, FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

fn positive_usize(s: &str) -> Result<usize> {
    let value = s.parse::<usize>().with_loc(|| format!("While parsing '{s}'"))?;
    match value {
        0 => Err(ParserError::NonPositive).loc("While parsing arguments."),
        n => Ok(n),
    }
}
