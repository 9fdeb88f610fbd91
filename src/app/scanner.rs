use crate::app::error::{EntryWarning, ListError};
use crate::app::models::{FileEntry, FileKind};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata for one path, as returned by a `DirectoryReader`.
#[derive(Debug, Clone)]
pub struct RawMetadata {
    pub size: u64,
    pub modified: SystemTime,
    pub mode: u32,
    pub kind: FileKind,
}

/// Filesystem capability the scanner depends on.
pub trait DirectoryReader {
    fn read_names(&self, dir: &Path) -> io::Result<Vec<OsString>>;
    fn stat(&self, path: &Path) -> io::Result<RawMetadata>;
}

/// Reads the real filesystem. Symlinks are not followed.
pub struct FsReader;

impl DirectoryReader for FsReader {
    fn read_names(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn stat(&self, path: &Path) -> io::Result<RawMetadata> {
        let metadata = fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();

        Ok(RawMetadata {
            size: metadata.len(),
            modified: metadata.modified()?,
            mode: permission_bits(&metadata),
            kind: FileKind {
                is_dir: file_type.is_dir(),
                is_symlink: file_type.is_symlink(),
                is_socket: is_socket(&file_type),
                is_fifo: is_fifo(&file_type),
            },
        })
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

#[cfg(unix)]
fn is_socket(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_socket()
}

#[cfg(not(unix))]
fn is_socket(_: &fs::FileType) -> bool {
    false
}

#[cfg(unix)]
fn is_fifo(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_fifo()
}

#[cfg(not(unix))]
fn is_fifo(_: &fs::FileType) -> bool {
    false
}

pub struct Scanner<'a> {
    root: PathBuf,
    show_hidden: bool,
    reader: &'a dyn DirectoryReader,
}

impl<'a> Scanner<'a> {
    pub fn new(root: PathBuf, show_hidden: bool, reader: &'a dyn DirectoryReader) -> Self {
        Self {
            root,
            show_hidden,
            reader,
        }
    }

    /// Collects the directory members. Only a failure to read the directory
    /// itself is an error; members that cannot be stat'ed come back as warnings.
    /// The returned entries are in no particular order.
    pub fn scan(&self) -> Result<(Vec<FileEntry>, Vec<EntryWarning>), ListError> {
        let names = self
            .reader
            .read_names(&self.root)
            .map_err(|source| ListError::DirectoryAccess {
                path: self.root.clone(),
                source,
            })?;

        let mut entries = Vec::with_capacity(names.len());
        let mut warnings = Vec::new();

        for name in names {
            if !self.show_hidden && name.as_encoded_bytes().starts_with(b".") {
                continue;
            }

            match self.process_entry(name) {
                Ok(entry) => entries.push(entry),
                Err(warning) => warnings.push(warning),
            }
        }

        Ok((entries, warnings))
    }

    /// The raw name is used for the stat; only the displayed name is lossy.
    fn process_entry(&self, raw_name: OsString) -> Result<FileEntry, EntryWarning> {
        let path = self.root.join(&raw_name);
        let name = raw_name.to_string_lossy().into_owned();
        match self.reader.stat(&path) {
            Ok(meta) => Ok(FileEntry {
                name,
                path,
                size: meta.size,
                modified: meta.modified,
                mode: meta.mode,
                kind: meta.kind,
            }),
            Err(source) => Err(EntryWarning { name, source }),
        }
    }
}
