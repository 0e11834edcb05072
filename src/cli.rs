use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pipup",
    about = "Upgrade installed Python packages through pip",
    version,
    author
)]
pub struct Cli {
    /// Do not upgrade pip itself before upgrading packages
    #[arg(long = "skip-pip-update")]
    pub skip_pip_update: bool,

    /// Upgrade packages one at a time and report failures per package
    #[arg(long = "one-by-one")]
    pub one_by_one: bool,

    /// Packages that are never upgraded
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Only upgrade these packages (ignored when not installed)
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub only: Vec<String>,

    /// Only consider packages that pip reports as outdated
    #[arg(long)]
    pub outdated: bool,

    /// Show which packages would be upgraded without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Python interpreter used to run pip (defaults to python3, or python on Windows)
    #[arg(long, value_name = "PATH", env = "PIPUP_PYTHON")]
    pub python: Option<String>,

    /// TOML file with default excludes and options
    #[arg(long, value_name = "PATH", env = "PIPUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_value_lists() {
        let cli = Cli::try_parse_from([
            "pipup",
            "--exclude",
            "numpy",
            "Flask",
            "--only",
            "requests",
            "--one-by-one",
        ])
        .unwrap();

        assert_eq!(cli.exclude, vec!["numpy", "Flask"]);
        assert_eq!(cli.only, vec!["requests"]);
        assert!(cli.one_by_one);
        assert!(!cli.skip_pip_update);
    }

    #[test]
    fn repeated_exclude_flags_accumulate() {
        let cli = Cli::try_parse_from(["pipup", "--exclude", "a", "--exclude", "b"]).unwrap();
        assert_eq!(cli.exclude, vec!["a", "b"]);
    }

    #[test]
    fn exclude_requires_a_value() {
        assert!(Cli::try_parse_from(["pipup", "--exclude"]).is_err());
    }
}
