use crate::app::classify::{Classifier, Palette, DEFAULT_EXECUTABLE_EXTENSIONS};
use crate::app::cli::{Cli, ColorWhen};
use crate::app::error::ListError;
use crate::app::formatter::{OutputGenerator, DEFAULT_TIME_FORMAT};
use crate::app::models::{ColorMode, RuntimeConfig, SortKey};
use anyhow::{anyhow, bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Color;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const OPTIONS_ENV: &str = "LS_OPTIONS";

/// Contents of `~/.config/lsx/config.toml`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub options: Vec<String>,
    pub executable_extensions: Vec<String>,
    pub time_format: Option<String>,
    pub colors: ColorSettings,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ColorSettings {
    pub directory: Option<String>,
    pub symlink: Option<String>,
    pub socket: Option<String>,
    pub fifo: Option<String>,
    pub executable: Option<String>,
}

pub fn settings_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("lsx").join("config.toml"))
}

/// Missing file yields defaults; an unreadable or malformed one is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content =
        fs::read_to_string(path).context(format!("Failed to read config at {:?}", path))?;
    let settings: Settings =
        toml::from_str(&content).context(format!("Failed to parse {:?}", path))?;

    log::debug!("loaded settings from {:?}", path);
    Ok(settings)
}

pub fn load_settings() -> Result<Settings> {
    match settings_path() {
        Ok(path) => load_settings_from(&path),
        Err(err) => {
            log::debug!("skipping settings file: {}", err);
            Ok(Settings::default())
        }
    }
}

/// Splits a whitespace-separated option string such as `LS_OPTIONS`.
pub fn split_options(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

pub fn env_options() -> Vec<String> {
    env::var(OPTIONS_ENV)
        .map(|raw| split_options(&raw))
        .unwrap_or_default()
}

/// True when the command line carries no option tokens, or only `-l`/`--long`.
/// Everything after `--` is positional.
pub fn is_default_invocation(cli_args: &[String]) -> bool {
    let flags: Vec<&str> = cli_args
        .iter()
        .map(String::as_str)
        .take_while(|arg| *arg != "--")
        .filter(|arg| arg.starts_with('-') && *arg != "-")
        .collect();

    match flags.as_slice() {
        [] => true,
        [only] => *only == "-l" || *only == "--long",
        _ => false,
    }
}

fn with_program_name(layers: &[&[String]]) -> Vec<String> {
    std::iter::once("lsx".to_string())
        .chain(layers.iter().flat_map(|layer| layer.iter().cloned()))
        .collect()
}

/// Parses the `LS_OPTIONS` and command-line layers on their own, before any
/// settings file is read. The command line may name at most one directory;
/// a directory from `LS_OPTIONS` is replaced by it.
pub fn check_args(env_args: &[String], cli_args: &[String]) -> Result<(), ListError> {
    Cli::try_parse_from(with_program_name(&[env_args, cli_args]))?;

    let own = Cli::try_parse_from(with_program_name(&[cli_args]))?;
    if own.directories.len() > 1 {
        return Err(Cli::command()
            .error(ErrorKind::TooManyValues, "only one DIRECTORY may be given")
            .into());
    }
    Ok(())
}

/// Folds option layers left to right into one configuration. Later layers win
/// on conflicting flags; only the command-line layer decides the default override.
pub fn build_config(
    settings_args: &[String],
    env_args: &[String],
    cli_args: &[String],
) -> Result<RuntimeConfig, ListError> {
    let cli = Cli::try_parse_from(with_program_name(&[settings_args, env_args, cli_args]))?;

    let mut config = resolve_config(cli);
    if is_default_invocation(cli_args) {
        config.classify = true;
        if config.color_mode == ColorMode::Auto {
            config.color_mode = ColorMode::Always;
        }
    }

    log::debug!("effective configuration: {:?}", config);
    Ok(config)
}

pub fn resolve_config(cli: Cli) -> RuntimeConfig {
    let sort_key = if cli.size {
        SortKey::Size
    } else if cli.time {
        SortKey::Time
    } else {
        SortKey::Name
    };

    RuntimeConfig {
        directory: cli
            .directories
            .last()
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        show_hidden: cli.all,
        long_format: cli.long,
        classify: cli.classify,
        color_mode: match cli.color {
            ColorWhen::Always => ColorMode::Always,
            ColorWhen::Auto => ColorMode::Auto,
            ColorWhen::Never => ColorMode::Never,
        },
        sort_key,
        reverse: cli.reverse,
        human_readable: cli.human_readable,
    }
}

/// Builds the presentation pipeline from the settings file.
pub fn build_generator(settings: &Settings) -> Result<OutputGenerator> {
    let mut extensions: Vec<String> = DEFAULT_EXECUTABLE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect();
    extensions.extend(settings.executable_extensions.iter().cloned());
    let classifier = Classifier::new(extensions.as_slice())?;

    let time_format = settings
        .time_format
        .clone()
        .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string());
    if StrftimeItems::new(&time_format).any(|item| matches!(item, Item::Error)) {
        bail!("Invalid time_format: {}", time_format);
    }

    Ok(OutputGenerator::new(
        classifier,
        resolve_palette(&settings.colors)?,
        time_format,
    ))
}

fn resolve_palette(colors: &ColorSettings) -> Result<Palette> {
    let defaults = Palette::default();
    Ok(Palette {
        directory: parse_color(colors.directory.as_deref(), defaults.directory)?,
        symlink: parse_color(colors.symlink.as_deref(), defaults.symlink)?,
        socket: parse_color(colors.socket.as_deref(), defaults.socket)?,
        fifo: parse_color(colors.fifo.as_deref(), defaults.fifo)?,
        executable: parse_color(colors.executable.as_deref(), defaults.executable)?,
    })
}

fn parse_color(name: Option<&str>, fallback: Color) -> Result<Color> {
    match name {
        Some(name) => name
            .parse::<Color>()
            .map_err(|_| anyhow!("Unknown color: {}", name)),
        None => Ok(fallback),
    }
}
