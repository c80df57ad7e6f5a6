use thiserror::Error;

use super::TABLE_VALID_FILE_FORMATS;

fn common_help_msg() -> String {
    format!("Please provide '--table' with either one of the accepted file formats: {TABLE_VALID_FILE_FORMATS:?}")
}

#[derive(Error, Debug)]
pub enum TableReaderError {
    #[error("Cannot handle phenotype table file format: {0}, {}", common_help_msg())]
    InvalidFileFormat(String),

    #[error("The provided phenotype table is missing a file extension. {}", common_help_msg())]
    MissingExtension,

    #[error("Failed to open file {0}")]
    OpenFile(String, #[source] std::io::Error),

    #[error("Failed to read line {0} of the phenotype table")]
    ReadLine(usize, #[source] std::io::Error),

    #[error("Line {0} of the phenotype table is not of the form 'GENOTYPE<TAB>PHENOTYPE': '{1}'")]
    MissingField(usize, String),

    #[error("Invalid entry at line {0} of the phenotype table")]
    InvalidEntry(usize, #[source] genetics::phenotype::PhenotypeError),

    #[error("Failed to deserialize JSON phenotype table")]
    Json(#[from] serde_json::Error),

    #[error("Failed to deserialize YAML phenotype table")]
    Yaml(#[from] serde_yaml::Error),
}
