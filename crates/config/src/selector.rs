#![forbid(unsafe_code)]

use crate::error::ParseError;
use std::{fmt, str::FromStr};

/// One entry of an explicit process list.
///
/// Positive numbers select a process id, negative numbers select a process
/// group, anything else is compared against the command name.
///
/// ```
/// # use config::ProcSelector;
/// assert_eq!("4200".parse(), Ok(ProcSelector::Pid(4200)));
/// assert_eq!("-17".parse(), Ok(ProcSelector::Group(17)));
/// assert_eq!("nginx".parse(), Ok(ProcSelector::Name("nginx".into())));
/// assert!("0".parse::<ProcSelector>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProcSelector {
    Pid(u32),
    Group(u32),
    Name(String),
}

impl ProcSelector {
    /// Check whether a process with the given identity is selected.
    #[inline]
    pub fn matches(&self, pid: u32, pgid: u32, comm: &str) -> bool {
        match self {
            Self::Pid(want) => *want == pid,
            Self::Group(want) => *want == pgid,
            Self::Name(want) => want == comm,
        }
    }

    pub fn as_pid(&self) -> Option<u32> {
        match self {
            Self::Pid(pid) => Some(*pid),
            _ => None,
        }
    }
}

impl FromStr for ProcSelector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::EmptySelector);
        }
        // Only an exact integer counts as an id, "12abc" is a command name.
        match s.parse::<i64>() {
            Ok(0) => Err(ParseError::ZeroPid),
            Ok(n) if n > 0 => Ok(u32::try_from(n)
                .map_or_else(|_| Self::Name(s.to_owned()), Self::Pid)),
            Ok(n) => Ok(u32::try_from(n.unsigned_abs())
                .map_or_else(|_| Self::Name(s.to_owned()), Self::Group)),
            Err(_) => Ok(Self::Name(s.to_owned())),
        }
    }
}

impl fmt::Display for ProcSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pid(pid) => write!(f, "{pid}"),
            Self::Group(pgid) => write!(f, "-{pgid}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
