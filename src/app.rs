// Declare modules
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod terminal;

use anyhow::Result;
use std::env;

use self::config::{
    build_config, build_generator, check_args, env_options, load_settings, Settings,
};
use self::error::ListError;
use self::formatter::OutputGenerator;
use self::models::RuntimeConfig;
use self::scanner::{DirectoryReader, FsReader, Scanner};
use self::terminal::{OutputTarget, Stdout};

/// Result of argument handling, before any listing work.
pub enum Startup {
    /// `--help` / `--version` text; printing it ends the run successfully.
    Display(clap::Error),
    Ready(RuntimeConfig, Settings),
}

/// Validates LS_OPTIONS and argv first, then loads settings via `load` and
/// folds all three layers.
pub fn prepare<F>(env_args: &[String], cli_args: &[String], load: F) -> Result<Startup>
where
    F: FnOnce() -> Result<Settings>,
{
    if let Err(err) = check_args(env_args, cli_args) {
        return display_or_fail(err);
    }

    let settings = load()?;
    match build_config(&settings.options, env_args, cli_args) {
        Ok(config) => Ok(Startup::Ready(config, settings)),
        Err(err) => display_or_fail(err),
    }
}

fn display_or_fail(err: ListError) -> Result<Startup> {
    match err {
        ListError::Argument(err) if !err.use_stderr() => Ok(Startup::Display(err)),
        err => Err(err.into()),
    }
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Resolve Configuration (argv and LS_OPTIONS first, then the settings file)
    let cli_args: Vec<String> = env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let (config, settings) = match prepare(&env_options(), &cli_args, load_settings)? {
        Startup::Display(err) => {
            err.print()?;
            return Ok(());
        }
        Startup::Ready(config, settings) => (config, settings),
    };

    // 2. Build the presentation pipeline
    let generator = build_generator(&settings)?;

    // 3. Scan and render
    let output = list(&config, &FsReader, &generator, &Stdout)?;

    // 4. Print to Stdout
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

/// Collects the configured directory and renders it. Per-entry failures are
/// logged as warnings and left out of the listing.
pub fn list(
    config: &RuntimeConfig,
    reader: &dyn DirectoryReader,
    generator: &OutputGenerator,
    target: &dyn OutputTarget,
) -> Result<String, ListError> {
    let scanner = Scanner::new(config.directory.clone(), config.show_hidden, reader);
    let (entries, warnings) = scanner.scan()?;

    for warning in &warnings {
        log::warn!("{}", warning);
    }
    log::debug!(
        "collected {} entries from {:?} ({} skipped)",
        entries.len(),
        config.directory,
        warnings.len()
    );

    Ok(generator.render(&entries, config, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::{load_settings_from, split_options};
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;

    struct NotATerminal;

    impl OutputTarget for NotATerminal {
        fn is_interactive(&self) -> bool {
            false
        }
    }

    fn listing(dir: &Path, cli: &str) -> Result<String, ListError> {
        let mut cli_args = split_options(cli);
        cli_args.push(dir.to_string_lossy().into_owned());
        let config = build_config(&[], &[], &cli_args)?;
        let generator = build_generator(&Settings::default()).unwrap();
        list(&config, &FsReader, &generator, &NotATerminal)
    }

    fn scenario_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), vec![b'a'; 500]).unwrap();
        fs::write(dir.path().join("b.txt"), vec![b'b'; 2_000_000]).unwrap();
        fs::write(dir.path().join(".hidden"), vec![b'h'; 10]).unwrap();
        dir
    }

    #[test]
    fn test_default_listing_hides_dotfiles() {
        let dir = scenario_dir();
        let out = listing(dir.path(), "").unwrap();
        assert_eq!(out, "a.txt  b.txt");
    }

    #[test]
    fn test_all_includes_hidden() {
        let dir = scenario_dir();
        let out = listing(dir.path(), "-a").unwrap();
        assert_eq!(out, ".hidden  a.txt  b.txt");
    }

    #[test]
    fn test_size_sort_and_reverse() {
        let dir = scenario_dir();
        assert_eq!(listing(dir.path(), "-S").unwrap(), "b.txt  a.txt");
        assert_eq!(listing(dir.path(), "-Sr").unwrap(), "a.txt  b.txt");
    }

    #[test]
    fn test_exe_without_exec_bit_is_green() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run.exe"), b"MZ").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir.path().join("run.exe"), fs::Permissions::from_mode(0o644))
                .unwrap();
        }

        // bare invocation forces classify and color
        let out = listing(dir.path(), "").unwrap();
        assert_eq!(out, "\x1b[32mrun.exe*\x1b[0m");
    }

    #[test]
    fn test_long_listing_lines() {
        let dir = scenario_dir();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let out = listing(dir.path(), "-l --color=never").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" a.txt"));
        assert!(lines[1].contains("  2000000 "));
        assert!(lines[2].starts_with('d'));
        assert!(lines[2].ends_with(" sub"));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = listing(&missing, "").unwrap_err();
        assert!(matches!(err, ListError::DirectoryAccess { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_help_ignores_malformed_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "options = 3").unwrap();
        assert!(load_settings_from(&path).is_err());

        let startup = prepare(&[], &split_options("--help"), || load_settings_from(&path)).unwrap();
        match startup {
            Startup::Display(err) => {
                assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp)
            }
            Startup::Ready(..) => panic!("--help must not produce a listing"),
        }
    }

    #[test]
    fn test_bad_flag_reported_before_settings_load() {
        let loaded = Cell::new(false);
        let result = prepare(&[], &split_options("--bogus"), || {
            loaded.set(true);
            Ok(Settings::default())
        });

        let err = result.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ListError>(),
            Some(ListError::Argument(_))
        ));
        assert!(!loaded.get());
    }

    #[test]
    fn test_settings_error_surfaces_for_listing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "options = 3").unwrap();

        let result = prepare(&[], &split_options("-l"), || load_settings_from(&path));
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_options_fold_under_cli() {
        let settings = Settings {
            options: split_options("-a --color=always"),
            ..Default::default()
        };
        let startup = prepare(&[], &split_options("--color=never"), || Ok(settings)).unwrap();
        match startup {
            Startup::Ready(config, _) => {
                assert!(config.show_hidden);
                assert_eq!(config.color_mode, crate::app::models::ColorMode::Never);
            }
            Startup::Display(_) => panic!("unexpected display output"),
        }
    }
}
