#![forbid(unsafe_code)]

mod detect;
mod error;
mod filter;
mod output;
mod selector;

pub use detect::Detect;
pub use error::{Error, ParseError};
pub use filter::{Filter, JailId, UserSpec};
pub use output::{Output, OutputFormat};
pub use selector::ProcSelector;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a single checkrestart run.
///
/// Built once (defaults, then an optional TOML file, then command line
/// overrides) and never mutated while processes are being checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub detect: Detect,
    pub filter: Filter,
    pub output: Output,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer the TOML file at `path` over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()?;
        Ok(config)
    }

    /// Render the configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_check_everything() {
        let config = Config::new();
        assert!(!config.detect.binary_only);
        assert!(config.filter.procs.is_empty());
        assert!(config.output.header);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_config(
            r#"
            [detect]
            binary_only = true

            [filter]
            jail = 0
            user = "www"
            procs = ["nginx", "-12", "4200"]

            [output]
            format = "json"
            width = 120
            "#,
        );

        let config = Config::load(file.path()).unwrap();

        assert!(config.detect.binary_only);
        assert_eq!(config.filter.jail, Some(JailId(0)));
        assert_eq!(config.filter.user, Some(UserSpec::Name("www".into())));
        assert_eq!(
            config.filter.procs,
            vec![
                ProcSelector::Name("nginx".into()),
                ProcSelector::Group(12),
                ProcSelector::Pid(4200),
            ]
        );
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.width, Some(120));
        // untouched keys keep their defaults
        assert!(config.output.header);
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn bad_selector_fails_to_load() {
        let file = write_config("[filter]\nprocs = [\"0\"]\n");
        assert!(matches!(Config::load(file.path()), Err(Error::Figment(_))));
    }

    #[test]
    fn rendered_toml_loads_back() {
        let mut config = Config::new();
        config.filter.procs = vec![ProcSelector::Group(7)];
        config.filter.user = Some(UserSpec::Id(0));
        config.output.format = OutputFormat::Json;

        let file = write_config(&config.to_toml().unwrap());
        assert_eq!(Config::load(file.path()).unwrap(), config);
    }
}
