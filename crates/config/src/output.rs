#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Output {
    pub format: OutputFormat,

    /// Print the column header before the first finding.
    pub header: bool,

    /// Never truncate the arguments column.
    pub wide: bool,

    /// Display width in columns. Detected from the environment when unset.
    pub width: Option<usize>,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            header: true,
            wide: false,
            width: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
