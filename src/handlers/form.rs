// Form data processing for the audio API
//
// This module handles the extraction of the uploaded file from multipart
// form data. Validation failures are reported in a fixed order: missing
// field, empty filename, unsupported extension, oversized payload.

use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};

use crate::config::AppConfig;
use crate::error::HandlerError;

/// An uploaded file held in memory before staging
#[derive(Debug)]
pub struct UploadedFile {
    /// Filename supplied by the client
    pub filename: String,
    /// Raw file bytes
    pub data: Vec<u8>,
}

/// Extract and validate the uploaded file from multipart form data
///
/// # Arguments
///
/// * `form` - The multipart form from the HTTP request
/// * `config` - Handler configuration, for the upload size limit
///
/// # Returns
///
/// * `Result<UploadedFile, HandlerError>` - The validated upload, or the first applicable error
pub async fn extract_upload(
    mut form: Multipart,
    config: &AppConfig,
) -> Result<UploadedFile, HandlerError> {
    let mut upload: Option<UploadedFile> = None;

    while let Ok(Some(mut field)) = form.try_next().await {
        let (field_name, filename) = {
            let content_disposition = field.content_disposition();
            (
                content_disposition
                    .and_then(|cd| cd.get_name().map(|name| name.to_string()))
                    .unwrap_or_default(),
                content_disposition
                    .and_then(|cd| cd.get_filename().map(|name| name.to_string()))
                    .unwrap_or_default(),
            )
        };

        if field_name != "file" {
            // Skip unknown fields
            while let Some(_) = field.next().await {}
            continue;
        }

        if filename.is_empty() {
            return Err(HandlerError::NoFileSelected);
        }

        if !AppConfig::validate_extension(&filename) {
            return Err(HandlerError::UnsupportedFormat);
        }

        let mut file_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                HandlerError::form_error(format!("Error processing file upload: {}", e))
            })?;

            if file_data.len() + data.len() > config.max_file_size {
                return Err(HandlerError::FileTooLarge(
                    file_data.len() + data.len(),
                    config.max_file_size,
                ));
            }

            file_data.extend_from_slice(&data);
        }

        upload = Some(UploadedFile {
            filename,
            data: file_data,
        });
    }

    upload.ok_or(HandlerError::NoFile)
}
