#![forbid(unsafe_code)]

use crate::{error::ParseError, selector::ProcSelector};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::{fmt, str::FromStr};

/// Which processes are candidates for checking.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Filter {
    /// Only check processes inside this container. `0` is the host.
    pub jail: Option<JailId>,

    /// Only check processes owned by this user.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub user: Option<UserSpec>,

    /// Explicit process list. Empty means every process.
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub procs: Vec<ProcSelector>,
}

/// Container identifier. The literal `none` stands for the host (`0`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JailId(pub u64);

impl FromStr for JailId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(Self(0));
        }
        s.parse()
            .map(Self)
            .map_err(|_| ParseError::InvalidJail(s.to_owned()))
    }
}

impl fmt::Display for JailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user given either as a numeric id or as a login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserSpec {
    Id(u32),
    Name(String),
}

impl FromStr for UserSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::EmptyUser);
        }
        Ok(s.parse()
            .map_or_else(|_| Self::Name(s.to_owned()), Self::Id))
    }
}

impl fmt::Display for UserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(uid) => write!(f, "{uid}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
