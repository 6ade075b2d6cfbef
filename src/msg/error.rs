//! Error types for MSG writing.
//!
//! The CFB layer keeps its own [`CfbError`](crate::cfb::CfbError); this
//! module wraps it into the unified error surface for the MSG API.

use thiserror::Error;

/// Main error type for MSG operations.
#[derive(Error, Debug)]
pub enum MsgError {
    /// A required field is missing or a supplied value is out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A property uses a MAPI type the codec does not implement
    #[error("Unsupported MAPI property type 0x{0:04X}")]
    UnsupportedType(u16),

    /// Strict STRING8 encoding failed for the chosen codepage
    #[error("String not encodable in codepage {codepage}")]
    Encoding {
        /// The codepage that could not represent the value
        codepage: u16,
    },

    /// Container serialization failed (capacity, naming, or sink I/O)
    #[error("Compound file error: {0}")]
    Cfb(#[from] crate::cfb::CfbError),

    /// I/O error outside the container writer (e.g. creating the output file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for MSG operations.
pub type Result<T> = std::result::Result<T, MsgError>;
