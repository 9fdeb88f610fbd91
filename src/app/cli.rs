use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorWhen {
    Always,
    Auto,
    Never,
}

#[derive(Parser, Debug)]
#[command(
    name = "lsx",
    version,
    about = "List directory contents",
    disable_help_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// Use a long listing format
    #[arg(short, long)]
    pub long: bool,

    /// Do not ignore entries starting with .
    #[arg(short, long)]
    pub all: bool,

    /// Append indicator (one of */=@|) to entries
    #[arg(short = 'F', long)]
    pub classify: bool,

    /// Colorize the output
    #[arg(
        long,
        value_enum,
        value_name = "WHEN",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "always",
        default_value_t = ColorWhen::Auto
    )]
    pub color: ColorWhen,

    /// Sort by file size, largest first
    #[arg(short = 'S', long, overrides_with = "time")]
    pub size: bool,

    /// Sort by modification time, newest first
    #[arg(short = 't', long, overrides_with = "size")]
    pub time: bool,

    /// Reverse order while sorting
    #[arg(short, long)]
    pub reverse: bool,

    /// Print sizes like 1K 234M 2G
    #[arg(short = 'h', long)]
    pub human_readable: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Directory to list (defaults to the current directory)
    #[arg(value_name = "DIRECTORY", num_args = 0..)]
    pub directories: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_color_value_forms() {
        let cli = Cli::try_parse_from(["lsx"]).unwrap();
        assert_eq!(cli.color, ColorWhen::Auto);

        let cli = Cli::try_parse_from(["lsx", "--color"]).unwrap();
        assert_eq!(cli.color, ColorWhen::Always);

        let cli = Cli::try_parse_from(["lsx", "--color=never"]).unwrap();
        assert_eq!(cli.color, ColorWhen::Never);
    }

    #[test]
    fn test_combined_short_flags() {
        let cli = Cli::try_parse_from(["lsx", "-lah", "some/dir"]).unwrap();
        assert!(cli.long && cli.all && cli.human_readable);
        assert_eq!(cli.directories, vec![PathBuf::from("some/dir")]);
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Cli::try_parse_from(["lsx", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = Cli::try_parse_from(["lsx", "--bogus"]).unwrap_err();
        assert!(err.use_stderr());
    }
}
