//! Error types for checksum calculation and repair

use thiserror::Error;

/// Error raised while identifying, checksumming or repairing a ROM image
#[derive(Error, Debug)]
pub enum ChecksumError {
    /// The boot chip is not one of the known CIC variants.
    ///
    /// `code` is the rejected CIC number when one was given explicitly, or
    /// `None` when the boot code fingerprint matched nothing and no fallback
    /// was allowed.
    #[error("unsupported boot chip{}", code_suffix(.code))]
    UnsupportedBootChip { code: Option<u32> },

    #[error("truncated image: {len} bytes, at least {required} required")]
    TruncatedImage { len: usize, required: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChecksumError {
    pub fn unsupported(code: Option<u32>) -> Self {
        Self::UnsupportedBootChip { code }
    }

    pub fn truncated(len: usize, required: usize) -> Self {
        Self::TruncatedImage { len, required }
    }
}

pub type ChecksumResult<T> = Result<T, ChecksumError>;

fn code_suffix(code: &Option<u32>) -> String {
    match code {
        Some(code) => format!(" {code}"),
        None => " (unrecognised boot code and no fallback)".to_string(),
    }
}
