// Error handling for the audio API
//
// This module defines error types and handling for the audio API.
// It centralizes error definitions and maps every failure to a structured
// JSON body with the status code the API contract assigns to it.

use std::io;

use actix_web::error::BlockingError;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can occur in the audio API handlers
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Authorization header missing or not carrying a Bearer scheme
    #[error("Missing or invalid Authorization header. Use 'Bearer <api_key>'")]
    InvalidAuthHeader,

    /// Bearer prefix present but the token after it is empty
    #[error("API key not provided")]
    ApiKeyMissing,

    /// Token did not verify against the configured hash
    #[error("Invalid API key")]
    InvalidApiKey,

    /// No multipart field named "file" in the request
    #[error("No file provided")]
    NoFile,

    /// The uploaded file has an empty filename
    #[error("No file selected")]
    NoFileSelected,

    /// The uploaded file has an unsupported extension
    #[error("File must be MP3 or WAV format")]
    UnsupportedFormat,

    /// The file passed the extension check but could not be parsed
    #[error("Could not read audio file")]
    UnreadableAudio,

    /// Error when a file is too large
    #[error("File too large: {0} bytes exceeds limit of {1} bytes")]
    FileTooLarge(usize, usize),

    /// Error when processing multipart form data
    #[error("Form error: {0}")]
    FormError(String),

    /// Error when staging or reading file data
    #[error("File error: {0}")]
    FileError(#[from] io::Error),

    /// Error from the transcription command
    #[error("Transcription failed: {0}")]
    TranscriptionError(String),

    /// A blocking worker task was canceled before completing
    #[error("Worker error: blocking task was canceled")]
    WorkerCanceled,
}

impl HandlerError {
    /// Create a new FormError
    pub fn form_error<S: Into<String>>(msg: S) -> Self {
        Self::FormError(msg.into())
    }
}

impl ResponseError for HandlerError {
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            error: self.to_string(),
        };

        match self {
            HandlerError::InvalidAuthHeader
            | HandlerError::ApiKeyMissing
            | HandlerError::InvalidApiKey => HttpResponse::Unauthorized().json(error_response),
            HandlerError::NoFile
            | HandlerError::NoFileSelected
            | HandlerError::UnsupportedFormat
            | HandlerError::UnreadableAudio
            | HandlerError::FormError(_) => HttpResponse::BadRequest().json(error_response),
            HandlerError::FileTooLarge(_, _) => {
                HttpResponse::PayloadTooLarge().json(error_response)
            }
            _ => HttpResponse::InternalServerError().json(error_response),
        }
    }
}

/// Convert BlockingError to HandlerError
impl From<BlockingError> for HandlerError {
    fn from(_: BlockingError) -> Self {
        HandlerError::WorkerCanceled
    }
}
