use crate::app::classify::{Classifier, Palette};
use crate::app::models::{FileEntry, RuntimeConfig, SortKey};
use crate::app::terminal::OutputTarget;
use chrono::{DateTime, Local};
use std::cmp::Ordering;

pub const DEFAULT_TIME_FORMAT: &str = "%-m/%-d/%Y %I:%M %p";

const SIZE_UNITS: [&str; 4] = ["K", "M", "G", "T"];
const PERMISSION_GROUPS: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];

/// Renders collected entries. Holds the palette, executable allowlist and
/// timestamp pattern so alternate ones can be swapped in.
pub struct OutputGenerator {
    classifier: Classifier,
    palette: Palette,
    time_format: String,
}

impl OutputGenerator {
    pub fn new(classifier: Classifier, palette: Palette, time_format: impl Into<String>) -> Self {
        Self {
            classifier,
            palette,
            time_format: time_format.into(),
        }
    }

    pub fn render(
        &self,
        entries: &[FileEntry],
        config: &RuntimeConfig,
        target: &dyn OutputTarget,
    ) -> String {
        let use_color = config.color_mode.resolve(target);
        let sorted = sort_entries(entries, config.sort_key, config.reverse);

        if config.long_format {
            sorted
                .iter()
                .map(|entry| self.long_line(entry, config, use_color))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            sorted
                .iter()
                .map(|entry| self.display_name(entry, config.classify, use_color))
                .collect::<Vec<_>>()
                .join("  ")
        }
    }

    fn long_line(&self, entry: &FileEntry, config: &RuntimeConfig, use_color: bool) -> String {
        format!(
            "{} {:>8} {} {}",
            permission_string(entry.kind.is_dir, entry.mode),
            format_size(entry.size, config.human_readable),
            self.format_time(entry),
            self.display_name(entry, config.classify, use_color)
        )
    }

    fn display_name(&self, entry: &FileEntry, classify: bool, use_color: bool) -> String {
        let class = self.classifier.classify(entry);

        let mut name = entry.name.clone();
        if classify {
            if let Some(indicator) = class.indicator() {
                name.push(indicator);
            }
        }

        if use_color {
            self.palette.paint(class, &name)
        } else {
            name
        }
    }

    fn format_time(&self, entry: &FileEntry) -> String {
        let datetime: DateTime<Local> = entry.modified.into();
        datetime.format(&self.time_format).to_string()
    }
}

/// Stable sort by key, then a full reversal when requested. Size and time
/// sort largest/newest first, so reversing them yields ascending order.
pub fn sort_entries(entries: &[FileEntry], key: SortKey, reverse: bool) -> Vec<&FileEntry> {
    let mut sorted: Vec<&FileEntry> = entries.iter().collect();
    match key {
        SortKey::Name => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Size => sorted.sort_by(|a, b| b.size.cmp(&a.size)),
        SortKey::Time => sorted.sort_by(|a, b| b.modified.cmp(&a.modified)),
    }
    if reverse {
        sorted.reverse();
    }
    sorted
}

/// Dictionary-style ordering: case folded first, lowercase ahead of uppercase on ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold_case(a).cmp(fold_case(b)).then_with(|| b.cmp(a))
}

fn fold_case(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

pub fn format_size(size: u64, human_readable: bool) -> String {
    if !human_readable || size < 1024 {
        return size.to_string();
    }

    let mut scaled = size as f64 / 1024.0;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{}{}", scaled.round() as u64, SIZE_UNITS[unit])
}

pub fn permission_string(is_dir: bool, mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(if is_dir { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        perms.push_str(PERMISSION_GROUPS[((mode >> shift) & 0o7) as usize]);
    }
    perms
}
