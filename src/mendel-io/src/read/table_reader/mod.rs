use std::{collections::BTreeMap, fs::File, io::{BufRead, BufReader, Read}, path::Path, str::FromStr};

use anyhow::Result;
use log::{debug, info};

use genetics::phenotype::PhenotypeTable;
use located_error::LocatedError;

pub mod error;
pub use error::TableReaderError;

pub const TABLE_VALID_FILE_FORMATS: [&str; 5] = ["json", "yaml", "yml", "tsv", "txt"];

/// Serialization format of a phenotype table, inferred from its file extension.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TableFormat {Json, Yaml, Tsv}

impl FromStr for TableFormat {
    type Err = TableReaderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json"        => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "tsv" | "txt"  => Ok(Self::Tsv),
            other          => Err(Self::Err::InvalidFileFormat(other.to_string()))
        }
    }
}

impl TableFormat {
    /// # Errors
    /// - `TableReaderError::MissingExtension` if `path` has no extension
    /// - `TableReaderError::InvalidFileFormat` if the extension is not one of [`TABLE_VALID_FILE_FORMATS`]
    pub fn from_path(path: &Path) -> Result<Self, TableReaderError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or(TableReaderError::MissingExtension)?
            .to_ascii_lowercase()
            .parse()
    }
}

/// Phenotype table reader.
///
/// ## Accepted file formats:
///    EXT          LAYOUT
/// - .json       `{"AA": "red", "Aa": "red", "aa": "white"}`
/// - .yaml/.yml  one `AA: red` mapping per line
/// - .tsv/.txt   one `AA<TAB>red` entry per line. Blank lines and lines starting with '#' are skipped.
pub struct TableReader<'a> {
    source: Box<dyn BufRead + 'a>,
    format: TableFormat,
}

impl<'a> TableReader<'a> {
    /// Open a phenotype table, and infer its format from the file extension.
    ///
    /// # Errors
    /// - if `path` carries an unsupported (or no) file extension.
    /// - if `path` targets an invalid location (`FileNotFound` or `PermissionDenied`)
    pub fn new(path: &Path) -> Result<TableReader<'a>> {
        use TableReaderError::OpenFile;
        let loc_msg = || format!("While attempting to open phenotype table '{}'", path.display());
        let format  = TableFormat::from_path(path).with_loc(loc_msg)?;
        let file    = File::open(path).map_err(|e| OpenFile(path.display().to_string(), e)).with_loc(loc_msg)?;
        info!("Opened phenotype table {} ({format:?})", path.display());
        Ok(Self::from_reader(BufReader::new(file), format))
    }

    pub fn from_reader(source: impl BufRead + 'a, format: TableFormat) -> Self {
        Self{source: Box::new(source), format}
    }

    /// Deserialize the contents of this reader into a validated [`PhenotypeTable`].
    ///
    /// # Errors
    /// - if the file contents cannot be deserialized into a flat `genotype -> phenotype` mapping.
    /// - if any entry is invalid: see [`PhenotypeTable::insert`]
    pub fn read_table(self) -> Result<PhenotypeTable> {
        let format = self.format;
        let table = match format {
            TableFormat::Json => Self::from_entries(serde_json::from_reader(self.source).map_err(TableReaderError::Json)),
            TableFormat::Yaml => Self::from_entries(serde_yaml::from_reader(self.source).map_err(TableReaderError::Yaml)),
            TableFormat::Tsv  => Self::read_tsv(self.source),
        }.with_loc(|| format!("While parsing {format:?} phenotype table"))?;
        debug!("Parsed {} phenotype table entries", table.len());
        Ok(table)
    }

    fn from_entries(entries: Result<BTreeMap<String, String>, TableReaderError>) -> Result<PhenotypeTable, TableReaderError> {
        let mut table = PhenotypeTable::new();
        for (i, (genotype, description)) in entries?.iter().enumerate() {
            table.insert(genotype, description).map_err(|e| TableReaderError::InvalidEntry(i + 1, e))?;
        }
        Ok(table)
    }

    fn read_tsv(source: impl Read) -> Result<PhenotypeTable, TableReaderError> {
        let mut table = PhenotypeTable::new();
        for (i, line) in BufReader::new(source).lines().enumerate() {
            let lineno = i + 1;
            let line = line.map_err(|e| TableReaderError::ReadLine(lineno, e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue
            }
            let (genotype, description) = line.split_once('\t')
                .ok_or_else(|| TableReaderError::MissingField(lineno, line.to_string()))?;
            table.insert(genotype, description).map_err(|e| TableReaderError::InvalidEntry(lineno, e))?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genetics::phenotype::PhenotypeError;
    use std::io::Write;

    fn expected() -> PhenotypeTable {
        PhenotypeTable::from_entries([("AA", "red"), ("Aa", "red"), ("aa", "white")]).expect("valid table")
    }

    #[test]
    fn format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("table.json")).ok(), Some(TableFormat::Json));
        assert_eq!(TableFormat::from_path(Path::new("table.YML")).ok(), Some(TableFormat::Yaml));
        assert_eq!(TableFormat::from_path(Path::new("dir/table.txt")).ok(), Some(TableFormat::Tsv));
        assert!(matches!(TableFormat::from_path(Path::new("table")), Err(TableReaderError::MissingExtension)));
        assert!(matches!(TableFormat::from_path(Path::new("table.csv")), Err(TableReaderError::InvalidFileFormat(ext)) if ext == "csv"));
    }

    #[test]
    fn read_json() -> Result<()> {
        let json = r#"{"AA": "red", "Aa": "red", "aa": "white"}"#;
        let table = TableReader::from_reader(json.as_bytes(), TableFormat::Json).read_table()?;
        assert_eq!(table, expected());
        Ok(())
    }

    #[test]
    fn read_yaml() -> Result<()> {
        let yaml = "---\nAA: red\nAa: red\naa: white\n";
        let table = TableReader::from_reader(yaml.as_bytes(), TableFormat::Yaml).read_table()?;
        assert_eq!(table, expected());
        Ok(())
    }

    #[test]
    fn read_tsv() -> Result<()> {
        let tsv = "# genotype\tphenotype\nAA\tred\n\nAa\tred\naa\twhite\n";
        let table = TableReader::from_reader(tsv.as_bytes(), TableFormat::Tsv).read_table()?;
        assert_eq!(table, expected());
        Ok(())
    }

    #[test]
    fn tsv_errors_carry_line_numbers() {
        let err = TableReader::from_reader("AA\tred\nAa red\n".as_bytes(), TableFormat::Tsv).read_table()
            .expect_err("Second line is not tab separated");
        assert!(matches!(err.downcast_ref::<TableReaderError>(), Some(TableReaderError::MissingField(2, _))));

        let err = TableReader::from_reader("AA\tred\n\nAAa\tred\n".as_bytes(), TableFormat::Tsv).read_table()
            .expect_err("Third line holds an invalid genotype key");
        assert!(matches!(
            err.downcast_ref::<TableReaderError>(),
            Some(TableReaderError::InvalidEntry(3, PhenotypeError::InvalidKey(_)))
        ));
    }

    #[test]
    fn invalid_json() {
        let err = TableReader::from_reader(r#"["AA", "red"]"#.as_bytes(), TableFormat::Json).read_table()
            .expect_err("A JSON array is not a phenotype table");
        assert!(matches!(err.downcast_ref::<TableReaderError>(), Some(TableReaderError::Json(_))));
    }

    #[test]
    fn open_file() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("table.yaml");
        assert!(TableReader::new(&path).is_err_and(|e| {
            matches!(e.downcast_ref::<TableReaderError>(), Some(TableReaderError::OpenFile(..)))
        }));

        writeln!(File::create(&path)?, "AA: red\nAa: red\naa: white")?;
        assert_eq!(TableReader::new(&path)?.read_table()?, expected());
        Ok(())
    }
}
