use std::{fs, path::Path};

use located_error::LocatedError;

use anyhow::Result;

mod error;
pub use error::ParseError;

/// Attempt to create the parent directories of a path (if needed) and return an error if it failed.
pub fn create_parent_directory(path: &Path) -> Result<()> {
    use ParseError::CreateParentDirectory;
    let Some(parent_dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(())
    };
    let loc_msg = || format!("While attempting to create output directory '{}'", parent_dir.display());
    fs::create_dir_all(parent_dir).map_err(CreateParentDirectory).with_loc(loc_msg)?;
    Ok(())
}

/// Check if a given file already exists ; raise an error if such is the case, and the user did not explicitly
/// allow file overwriting.
/// # Errors
/// - If the provided `path` already exists and the user did not specifically allow for file
///   overwrite using the `--overwrite` argument
pub fn can_write_file(overwrite: bool, path: &Path) -> Result<bool> {
    let loc_msg = "While ensuring that file permissions were appropriate";
    if !overwrite && path.exists() {   // Check if this file already exists and/or if overwrite is allowed.
        return Err(ParseError::OverwriteDisallowed{path: path.to_path_buf()}).loc(loc_msg)
    }
    Ok(true)
}
