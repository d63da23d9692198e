#![forbid(unsafe_code)]

mod detector;
mod error;
mod finding;
pub mod resolver;
pub mod scanner;
mod settings;

pub use detector::{Exclusion, Outcome, RestartDetector, RunReport, ScanWarning};
pub use error::Error;
pub use finding::{Finding, FindingSink, Reason};
pub use settings::Settings;
