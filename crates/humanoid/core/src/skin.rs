//! Skin payload validation.

use crate::config::HumanoidConfig;
use crate::error::{ErrorSeverity, SubsystemError};

/// Errors raised when a humanoid lacks a usable skin.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkinError {
    #[error("humanoid must have a skin set")]
    Missing,

    #[error("skin payload of {len} bytes is not valid, must be 8KiB or 16KiB")]
    InvalidLength { len: usize },
}

impl SubsystemError for SkinError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing => "SKIN_MISSING",
            Self::InvalidLength { .. } => "SKIN_INVALID_LENGTH",
        }
    }
}

/// Raw skin bytes plus the skin identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skin {
    data: Vec<u8>,
    id: String,
}

impl Skin {
    /// Accepts `data` only when its length is a supported skin size.
    pub fn new(data: Vec<u8>, id: impl Into<String>) -> Result<Self, SkinError> {
        validate(&data)?;
        Ok(Self {
            data,
            id: id.into(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Checks a skin payload against the supported lengths.
pub fn validate(data: &[u8]) -> Result<(), SkinError> {
    if HumanoidConfig::SUPPORTED_SKIN_LENGTHS.contains(&data.len()) {
        Ok(())
    } else {
        Err(SkinError::InvalidLength { len: data.len() })
    }
}
