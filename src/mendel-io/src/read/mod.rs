mod table_reader;
pub use table_reader::{TableReader, TableFormat, TableReaderError, TABLE_VALID_FILE_FORMATS};
