// Audio API configuration
//
// This module contains configuration structures and constants for the audio API.
// It centralizes all configuration parameters and provides defaults from environment variables.
// Configuration is read once at startup and injected into the server; handlers
// never reach back into the process environment.

use std::env;

/// Default values for configuration
pub mod defaults {
    // Bind address for the HTTP server
    pub const HOST: &str = "0.0.0.0";

    // TCP port for the HTTP server
    pub const PORT: u16 = 5000;

    // Temporary directory for staged uploads
    pub const TEMP_DIR: &str = "/tmp/audio_api";

    // Maximum accepted upload size in bytes (512MB)
    pub const MAX_FILE_SIZE: usize = 536_870_912;

    // Transcription command invoked for /transcribe requests
    pub const WHISPER_COMMAND: &str = "whisperx";

    // Default transcription model
    pub const WHISPER_MODEL: &str = "large-v3";

    // Default transcription language
    pub const WHISPER_LANGUAGE: &str = "en";

    // File extensions accepted for upload
    pub const ALLOWED_EXTENSIONS: [&str; 2] = [".mp3", ".wav"];
}

/// Configuration for the HTTP service and upload handlers
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Address the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Debug mode, lowers the default log filter
    pub debug: bool,
    /// Directory where uploads are staged
    pub temp_dir: String,
    /// Maximum accepted upload size in bytes
    pub max_file_size: usize,
    /// bcrypt hash of the API key, from API_KEY_HASH
    pub api_key_hash: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: env::var("AUDIO_API_HOST").unwrap_or_else(|_| String::from(defaults::HOST)),
            port: env::var("AUDIO_API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PORT),
            debug: env::var("AUDIO_API_DEBUG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            temp_dir: env::var("AUDIO_API_TMP_FILES")
                .unwrap_or_else(|_| String::from(defaults::TEMP_DIR)),
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::MAX_FILE_SIZE),
            api_key_hash: env::var("API_KEY_HASH").ok().filter(|hash| !hash.is_empty()),
        }
    }
}

impl AppConfig {
    /// Validates that a filename carries an accepted audio extension
    ///
    /// The match is a case-insensitive suffix check, so "CLIP.WAV" passes.
    pub fn validate_extension(filename: &str) -> bool {
        let filename = filename.to_lowercase();
        defaults::ALLOWED_EXTENSIONS
            .iter()
            .any(|ext| filename.ends_with(ext))
    }

    /// Ensures the temporary directory exists
    pub fn ensure_temp_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.temp_dir)
    }
}

/// Configuration for the external transcription command
#[derive(Clone, Debug)]
pub struct TranscriberConfig {
    /// Path to the whisper-style executable
    pub command_path: String,
    /// Model passed to the command
    pub model: String,
    /// Language passed to the command
    pub language: String,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            command_path: env::var("WHISPER_COMMAND")
                .unwrap_or_else(|_| String::from(defaults::WHISPER_COMMAND)),
            model: env::var("WHISPER_MODEL")
                .unwrap_or_else(|_| String::from(defaults::WHISPER_MODEL)),
            language: env::var("WHISPER_LANGUAGE")
                .unwrap_or_else(|_| String::from(defaults::WHISPER_LANGUAGE)),
        }
    }
}
