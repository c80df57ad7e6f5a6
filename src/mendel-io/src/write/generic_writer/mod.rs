use std::{fs::File, io::{Write, BufWriter}, path::Path};
use anyhow::Result;
use regex::Regex;
use lazy_static::lazy_static;

use located_error::LocatedError;

pub mod error;
pub use error::WriterError;

/// Field separator of every file written by [`GenericWriter`].
pub const WRITER_SEPARATOR: &str = "\t";

lazy_static! {
    // Pretty-print field separators: at least one space on both sides of a dash.
    static ref PRETTY_SEPARATOR: Regex = Regex::new(r"[ ]+-[ ]+").expect("Failed to parse regex.");
}

/// Line-oriented writer, targeting either a file or stdout.
/// - source: Boxed `BufWriter`
pub struct GenericWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>
}

impl<'a> GenericWriter<'a>{
    /// Instantiate a new `GenericWriter`. Writes to stdout if `path` is `None`
    ///
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper
    /// UNIX permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<GenericWriter<'a>>{
        use WriterError::IOError;
        Ok(GenericWriter{ source: match path {
            Some(path) => {
                let path = path.as_ref();
                let file = File::create(path).map_err(IOError)
                    .with_loc(|| format!("While creating file '{}'", path.display()))?;
                BufWriter::new(Box::new(file))
            },
            None => {
                BufWriter::new(Box::new(std::io::stdout()))
            }
        }})
    }

    /// Write every item of `iter` on its own line.
    ///
    /// Pretty-print separators (`[ ]+-[ ]+`) are replaced by [`WRITER_SEPARATOR`], so that padded `Display`
    /// implementations end up as plain tab-separated fields.
    ///
    /// # Errors
    /// - If any of the Items within `iter` fails to get written within the file.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: std::fmt::Display,
    {
        iter.into_iter()
            .try_for_each(|obj| {
                let line = format!("{obj}\n");
                self.source.write_all(PRETTY_SEPARATOR.replace_all(&line, WRITER_SEPARATOR).as_bytes())
            })
            .map_err(WriterError::IOError)
            .loc("While writing contents into file")?;

        self.source.flush().map_err(WriterError::IOError).loc("While flushing buffer contents of Writer")
    }
}
