use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    #[error("cannot access '{}'", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Argument(#[from] clap::Error),
}

/// A member whose metadata could not be read; it is skipped, not fatal.
#[derive(Debug, Error)]
#[error("cannot access '{name}': {source}")]
pub struct EntryWarning {
    pub name: String,
    pub source: io::Error,
}
