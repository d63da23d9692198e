#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Detect {
    /// Only look for missing executables, skip the memory map scan.
    pub binary_only: bool,
}
