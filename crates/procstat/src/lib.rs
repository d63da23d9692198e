mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
mod introspect;
mod linux;
mod record;
mod region;
pub mod utils;

pub use error::Error;
pub use introspect::Introspector;
pub use linux::Procfs;
pub use record::{ProcessRecord, ProcessSnapshot};
pub use region::{Backing, MemoryRegion, Protection};
