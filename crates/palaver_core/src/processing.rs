//! How an uploaded file is handed to the model.

use palaver_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

/// Delivery path for an uploaded file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    /// Bytes are embedded directly in the request
    #[display("inline")]
    Inline,
    /// File is uploaded to the Gemini Files API and referenced by id
    #[display("files_api")]
    FilesApi,
}

impl ProcessingMethod {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMethod::Inline => "inline",
            ProcessingMethod::FilesApi => "files_api",
        }
    }
}

impl std::str::FromStr for ProcessingMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(ProcessingMethod::Inline),
            "files_api" => Ok(ProcessingMethod::FilesApi),
            _ => Err(ValidationError::new(
                ValidationErrorKind::InvalidProcessingMethod(s.to_string()),
            )),
        }
    }
}
