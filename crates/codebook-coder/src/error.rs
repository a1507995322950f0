//! Error types for the coder crate

use thiserror::Error;

/// Errors raised while setting up a coder agent.
///
/// Note that `CoderAgent::code_chunk` itself does not return these: call
/// failures and malformed model output are absorbed into empty results so
/// one bad chunk cannot abort a batch.
#[derive(Error, Debug)]
pub enum CoderError {
    /// Identity configuration is missing, malformed, or inconsistent
    #[error("identity configuration error: {0}")]
    Identity(String),

    /// Agent configuration failed validation
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
