#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("procstat error: {0}")]
    Procstat(#[from] procstat::Error),

    #[error("user \"{0}\" not found")]
    UnknownUser(String),

    #[error("failed to emit finding: {0}")]
    Sink(#[from] std::io::Error),
}
