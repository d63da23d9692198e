use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use config::{Config, JailId, OutputFormat, ProcSelector, UserSpec};
use std::path::{Path, PathBuf};

/// checkrestart: find processes running deleted code
///
/// Lists processes whose executable, or one of whose mapped shared libraries,
/// was removed or replaced on disk while they kept running. Such processes
/// still run the old code and need a restart to pick up an upgrade.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Only check these processes.
    ///
    /// A positive number is a process id, a negative number a process group
    /// id, anything else a command name.
    #[arg(value_name = "PROC", allow_negative_numbers = true)]
    pub procs: Vec<ProcSelector>,

    /// Only look for missing executables, do not scan memory maps.
    #[arg(short, long)]
    pub binary_only: bool,

    /// Do not print the header line.
    #[arg(short = 'H', long)]
    pub no_header: bool,

    /// Only check processes in this container.
    ///
    /// `none` selects processes on the host.
    #[arg(short, long, value_name = "ID")]
    pub jail: Option<JailId>,

    /// Only check processes owned by this user (name or uid).
    #[arg(short, long)]
    pub user: Option<UserSpec>,

    /// Do not truncate the arguments column to the terminal width.
    #[arg(short, long)]
    pub wide: bool,

    /// Output style.
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Path to configuration file.
    #[arg(short, long, value_parser = validate_file)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub dump_config: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => Self::Text,
            Format::Json => Self::Json,
        }
    }
}

impl Cli {
    /// Override `config` with whatever was given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if self.binary_only {
            config.detect.binary_only = true;
        }
        if self.no_header {
            config.output.header = false;
        }
        if self.wide {
            config.output.wide = true;
        }
        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        if let Some(jail) = self.jail {
            config.filter.jail = Some(jail);
        }
        if let Some(user) = &self.user {
            config.filter.user = Some(user.clone());
        }
        if !self.procs.is_empty() {
            config.filter.procs = self.procs.clone();
        }
    }
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.is_file() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "checkrestart",
            "-bHw",
            "-j",
            "none",
            "-u",
            "www",
            "--format",
            "json",
            "nginx",
            "-42",
            "4200",
        ])
        .unwrap();

        let mut config = Config::new();
        cli.apply(&mut config);

        assert!(config.detect.binary_only);
        assert!(!config.output.header);
        assert!(config.output.wide);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.filter.jail, Some(JailId(0)));
        assert_eq!(config.filter.user, Some(UserSpec::Name("www".into())));
        assert_eq!(
            config.filter.procs,
            vec![
                ProcSelector::Name("nginx".into()),
                ProcSelector::Group(42),
                ProcSelector::Pid(4200),
            ]
        );
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["checkrestart"]).unwrap();
        let mut config = Config::new();
        config.filter.procs = vec![ProcSelector::Pid(1)];
        config.detect.binary_only = true;

        cli.apply(&mut config);

        assert_eq!(config.filter.procs, vec![ProcSelector::Pid(1)]);
        assert!(config.detect.binary_only);
    }

    #[test]
    fn zero_pid_is_rejected() {
        assert!(Cli::try_parse_from(["checkrestart", "0"]).is_err());
    }
}
