use thiserror::Error;

use crate::step::Step;

/// Errors raised by the wizard and the analysis client
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid age '{0}': expected a whole number between 1 and 120")]
    InvalidAge(String),

    #[error("'{action}' is not available on the {step} step")]
    InvalidTransition { step: Step, action: &'static str },

    #[error("No image has been uploaded")]
    NoImage,

    #[error("Image is empty")]
    EmptyImage,

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("Analysis request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Analysis endpoint returned status {0}")]
    Status(u16),
}

pub type Result<T> = std::result::Result<T, FlowError>;
