use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "azdo-dash", version, about = "Azure DevOps builds, releases and pull requests in the terminal")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: PathBuf,

    /// Write debug logs to the state directory
    #[arg(short, long)]
    pub verbose: bool,
}

/// Process exit code for a failed parse. Help and version output are not failures.
pub fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_config_and_verbose() {
        let cli = Cli::try_parse_from(["azdo-dash", "-c", "dash.toml", "--verbose"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("dash.toml"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let err = Cli::try_parse_from(["azdo-dash"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(exit_code(err.kind()), 1);
    }

    #[test]
    fn test_version_exits_cleanly() {
        let err = Cli::try_parse_from(["azdo-dash", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert_eq!(exit_code(err.kind()), 0);
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = Cli::try_parse_from(["azdo-dash", "-c", "x.toml", "--bogus"]).unwrap_err();
        assert_eq!(exit_code(err.kind()), 1);
    }
}
