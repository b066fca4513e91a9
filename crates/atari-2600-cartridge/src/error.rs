//! Cartridge errors.

use crate::scheme::Scheme;
use thiserror::Error;

/// Why a cartridge image could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("cartridge image is empty")]
    Empty,

    #[error("no bankswitching scheme matches a {size}-byte image")]
    Undetected { size: usize },

    #[error("unknown bankswitching scheme {0:?}")]
    UnknownScheme(String),

    #[error("scheme {scheme} does not fit a {size}-byte image")]
    SizeMismatch { scheme: Scheme, size: usize },
}
