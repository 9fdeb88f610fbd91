use std::path::PathBuf;
use std::time::SystemTime;

use crate::app::terminal::OutputTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    Never,
    Auto,
}

impl ColorMode {
    /// Decides once per run whether escape sequences are emitted.
    pub fn resolve(self, target: &dyn OutputTarget) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => target.is_interactive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Size,
    Time,
}

/// Represents the final configuration after merging settings, LS_OPTIONS and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub directory: PathBuf,
    pub show_hidden: bool,
    pub long_format: bool,
    pub classify: bool,
    pub color_mode: ColorMode,
    pub sort_key: SortKey,
    pub reverse: bool,
    pub human_readable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            show_hidden: false,
            long_format: false,
            classify: false,
            color_mode: ColorMode::Auto,
            sort_key: SortKey::Name,
            reverse: false,
            human_readable: false,
        }
    }
}

/// Type flags as reported by the filesystem, without following symlinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileKind {
    pub is_dir: bool,
    pub is_symlink: bool,
    pub is_socket: bool,
    pub is_fifo: bool,
}

/// Represents a single directory member discovered by the scanner.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    /// Lower nine permission bits (owner/group/other rwx).
    pub mode: u32,
    pub kind: FileKind,
}

impl FileEntry {
    pub fn has_exec_bits(&self) -> bool {
        self.mode & 0o111 != 0
    }
}
