use std::path::PathBuf;

use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("Failed to create output directory {0}")]
    CreateOutputDir(String, #[source] std::io::Error),

    #[error("Value must be greater than 0")]
    NonPositive,

    #[error("Failed to serialize command line arguments")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Unable to write command line arguments into {}", .0.display())]
    WriteArgs(PathBuf, #[source] std::io::Error),

    #[error("Failed to open configuration file {}", .0.display())]
    OpenYaml(PathBuf, #[source] std::io::Error),

    #[error("Failed to deserialize configuration file {}", .0.display())]
    Deserialize(PathBuf, #[source] serde_yaml::Error),
}
