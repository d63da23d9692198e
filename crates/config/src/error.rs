#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config: {0}")]
    Figment(#[from] figment::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSer(#[from] toml_edit::ser::Error),

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),
}

/// Rejected value for a selector or filter given as text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("`0` is not a valid process id")]
    ZeroPid,

    #[error("empty process selector")]
    EmptySelector,

    #[error("`{0}` is not a valid jail id")]
    InvalidJail(String),

    #[error("empty user name")]
    EmptyUser,
}
