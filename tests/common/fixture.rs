use std::{env, fs, path::{Path, PathBuf}, ops::Deref, fmt::{self, Formatter, Display}};
use tempfile::TempDir;

pub const TEST_DATA_DIR: &str = "tests/test-data";

/// A path within its own temporary directory, removed once the fixture is dropped.
pub struct Fixture {
    path    : PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    /// Reserve `name` within a fresh temporary directory. Nothing is created.
    pub fn blank(name: &str) -> Self {
        let tempdir = tempfile::tempdir().expect("Failed to create temporary directory");
        Fixture { path: tempdir.path().join(name), _tempdir: tempdir }
    }

    /// Copy `tests/test-data/{name}` into a fresh temporary directory, keeping its relative path.
    pub fn copy(name: &str) -> Self {
        let source = Path::new(&env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR"))
            .join(TEST_DATA_DIR)
            .join(name);
        let fixture = Fixture::blank(name);
        if let Some(parent) = fixture.path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::copy(&source, &fixture.path)
            .unwrap_or_else(|e| panic!("Failed to copy {}: {e}", source.display()));
        fixture
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
