use thiserror::Error;

use crate::client::InferenceError;
use crate::config::ConfigError;
use crate::encoder::EncodeError;

/// Errors that abort a cleanliness check.
///
/// A reply that does not parse as a verdict is not one of these; it is
/// reported through [`crate::CheckReport::outcome`].
#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    FileAccess(#[from] EncodeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub type Result<T> = std::result::Result<T, CheckError>;
