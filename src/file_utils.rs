// File utilities for the audio API
//
// This module contains utility functions for staged upload files.
// Every upload gets its own uniquely named folder so concurrent requests
// can never collide, and a guard removes the folder on all exit paths.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{error, info};
use uuid::Uuid;

/// A staged upload on disk
///
/// The folder and everything inside it are removed when the value is
/// dropped, whether the request succeeded or failed.
#[derive(Debug)]
pub struct StagedUpload {
    /// Unique folder for this request
    pub folder: PathBuf,
    /// Path of the staged audio file inside the folder
    pub audio_file: PathBuf,
    /// Request ID (UUID)
    pub id: String,
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.folder.exists() {
            cleanup_folder(&self.folder);
        }
    }
}

/// Stage uploaded file data under a unique path
///
/// # Arguments
///
/// * `base_dir` - Base directory for temporary files
/// * `original_name` - Filename supplied by the client, used only for its extension
/// * `data` - Bytes to write to the staged file
///
/// # Errors
///
/// Returns an IO error if directory creation or the write fails
pub fn stage_upload(base_dir: &str, original_name: &str, data: &[u8]) -> io::Result<StagedUpload> {
    let uuid = Uuid::new_v4();
    let id = uuid.to_string();

    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| String::from("bin"));
    let filename = format!("upload_{}.{}", uuid, extension);

    // One folder per request, so identical client filenames never collide
    let folder = Path::new(base_dir).join(&id);
    fs::create_dir_all(&folder)?;

    let audio_file = folder.join(&filename);
    let staged = StagedUpload {
        folder,
        audio_file,
        id,
    };

    save_file_data(data, &staged.audio_file)?;
    info!("Staged upload file: {}", staged.audio_file.display());

    Ok(staged)
}

/// Save uploaded file data to the filesystem
fn save_file_data(data: &[u8], file_path: &Path) -> io::Result<()> {
    let mut file = File::create(file_path)?;
    file.write_all(data)?;
    Ok(())
}

/// Clean up a folder and its contents
///
/// This function logs errors but doesn't return them to the caller
pub fn cleanup_folder(folder_path: &Path) {
    if let Err(e) = fs::remove_dir_all(folder_path) {
        error!("Failed to clean up folder {}: {}", folder_path.display(), e);
    } else {
        info!("Successfully cleaned up folder: {}", folder_path.display());
    }
}
