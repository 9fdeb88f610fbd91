use crate::app::models::FileEntry;
use anyhow::{Context, Result};
use colored::Color;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Extensions treated as executable regardless of mode bits.
pub const DEFAULT_EXECUTABLE_EXTENSIONS: &[&str] =
    &[".exe", ".cmd", ".bat", ".ps1", ".com", ".scr", ".msi"];

/// Display class of an entry. Variants are listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Directory,
    Symlink,
    Socket,
    Fifo,
    Executable,
    Regular,
}

impl FileClass {
    pub fn indicator(self) -> Option<char> {
        match self {
            FileClass::Directory => Some('/'),
            FileClass::Symlink => Some('@'),
            FileClass::Socket => Some('='),
            FileClass::Fifo => Some('|'),
            FileClass::Executable => Some('*'),
            FileClass::Regular => None,
        }
    }
}

pub struct Classifier {
    executable_set: GlobSet,
}

impl Classifier {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        Ok(Self {
            executable_set: build_extension_set(extensions)?,
        })
    }

    /// Matches the allowlist against the on-disk file name, not the lossy display name.
    pub fn is_executable(&self, entry: &FileEntry) -> bool {
        entry.has_exec_bits()
            || entry
                .path
                .file_name()
                .is_some_and(|name| self.executable_set.is_match(name))
    }

    pub fn classify(&self, entry: &FileEntry) -> FileClass {
        let kind = &entry.kind;
        if kind.is_dir {
            FileClass::Directory
        } else if kind.is_symlink {
            FileClass::Symlink
        } else if kind.is_socket {
            FileClass::Socket
        } else if kind.is_fifo {
            FileClass::Fifo
        } else if self.is_executable(entry) {
            FileClass::Executable
        } else {
            FileClass::Regular
        }
    }
}

/// Builds a case-insensitive `*.ext` glob set from extensions given with or without the dot.
fn build_extension_set<S: AsRef<str>>(extensions: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let ext = ext.as_ref().trim_start_matches('.');
        let pattern = format!("*.{}", ext);
        let glob = GlobBuilder::new(&pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .context(format!("Invalid executable extension: {}", ext))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Foreground color per display class. `Regular` entries are never colored.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub directory: Color,
    pub symlink: Color,
    pub socket: Color,
    pub fifo: Color,
    pub executable: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            directory: Color::Blue,
            symlink: Color::Cyan,
            socket: Color::Magenta,
            fifo: Color::Yellow,
            executable: Color::Green,
        }
    }
}

impl Palette {
    pub fn color_for(&self, class: FileClass) -> Option<Color> {
        match class {
            FileClass::Directory => Some(self.directory),
            FileClass::Symlink => Some(self.symlink),
            FileClass::Socket => Some(self.socket),
            FileClass::Fifo => Some(self.fifo),
            FileClass::Executable => Some(self.executable),
            FileClass::Regular => None,
        }
    }

    /// Wraps `text` in the class color's start and reset sequences.
    pub fn paint(&self, class: FileClass, text: &str) -> String {
        match self.color_for(class) {
            Some(color) => format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text),
            None => text.to_string(),
        }
    }
}
