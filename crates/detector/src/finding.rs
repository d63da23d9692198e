#![forbid(unsafe_code)]

use serde::Serialize;
use std::fmt;

/// Why a process needs a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reason {
    /// The executable image itself was removed.
    #[serde(rename = "executable")]
    MissingExecutable,
    /// A mapped shared object was removed.
    #[serde(rename = "library")]
    MissingLibrary,
}

impl Reason {
    /// Three character label used in the text table.
    pub fn short(self) -> &'static str {
        match self {
            Self::MissingExecutable => "bin",
            Self::MissingLibrary => ".so",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingExecutable => "executable",
            Self::MissingLibrary => "library",
        })
    }
}

/// A process that should be restarted.
///
/// `evidence` holds the argument vector for a missing executable and the
/// resolved executable path for a missing library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub pid: u32,
    pub jid: u64,
    pub uid: u32,
    pub user: String,
    pub command: String,
    #[serde(rename = "why")]
    pub reason: Reason,
    #[serde(rename = "arguments")]
    pub evidence: String,
}

/// Receives findings as they are produced.
pub trait FindingSink {
    fn accept(&mut self, finding: Finding) -> std::io::Result<()>;
}

impl FindingSink for Vec<Finding> {
    fn accept(&mut self, finding: Finding) -> std::io::Result<()> {
        self.push(finding);
        Ok(())
    }
}
