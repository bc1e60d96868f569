// Transcription command integration
//
// This module runs the external whisper-style command for /transcribe
// requests and parses the JSON transcript it writes. The command is treated
// as a black box: audio file in, ordered segment list out.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::info;
use serde::Deserialize;

use crate::config::TranscriberConfig;
use crate::error::HandlerError;

/// A single timestamped chunk of transcript, as emitted by the command
#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    /// Segment start time in seconds
    pub start: f64,
    /// Segment end time in seconds
    pub end: f64,
    /// Text content for this segment
    pub text: String,
}

/// JSON document written by the transcription command
#[derive(Debug, Deserialize)]
struct TranscriptFile {
    segments: Vec<RawSegment>,
}

/// Runs the configured transcription command over staged audio files
#[derive(Clone, Debug)]
pub struct Transcriber {
    config: TranscriberConfig,
}

impl Transcriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    /// Transcribe a staged audio file
    ///
    /// The command writes its JSON output next to the audio file inside the
    /// request's work folder, so transcript files are removed together with
    /// the staged upload.
    pub fn transcribe(
        &self,
        audio_file: &Path,
        work_dir: &Path,
    ) -> Result<Vec<RawSegment>, HandlerError> {
        info!(
            "Running transcription command {} on {}",
            self.config.command_path,
            audio_file.display()
        );

        let output = Command::new(&self.config.command_path)
            .arg(audio_file)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--language")
            .arg(&self.config.language)
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(work_dir)
            .output()
            .map_err(|e| {
                HandlerError::TranscriptionError(format!("Failed to run command: {}", e))
            })?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(HandlerError::TranscriptionError(error));
        }

        // The command names its output after the input audio filename,
        // e.g. "upload_<uuid>.wav" becomes "upload_<uuid>.json"
        let audio_file_name = audio_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("audio");
        let transcript_path = work_dir.join(format!("{}.json", audio_file_name));

        let content = fs::read_to_string(&transcript_path).map_err(|e| {
            HandlerError::TranscriptionError(format!("Failed to read output file: {}", e))
        })?;
        let transcript: TranscriptFile = serde_json::from_str(&content).map_err(|e| {
            HandlerError::TranscriptionError(format!("Failed to parse output file: {}", e))
        })?;

        Ok(transcript.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_for(command: &str) -> TranscriberConfig {
        TranscriberConfig {
            command_path: String::from(command),
            model: String::from("base"),
            language: String::from("en"),
        }
    }

    #[test]
    fn test_missing_command_is_a_transcription_error() {
        let dir = tempdir().unwrap();
        let audio = dir.path().join("upload.wav");
        std::fs::write(&audio, b"x").unwrap();

        let transcriber = Transcriber::new(config_for("/nonexistent/whisper"));
        match transcriber.transcribe(&audio, dir.path()) {
            Err(HandlerError::TranscriptionError(msg)) => {
                assert!(msg.contains("Failed to run command"));
            }
            other => panic!("expected TranscriptionError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_output_file_is_a_transcription_error() {
        let dir = tempdir().unwrap();
        let audio = dir.path().join("upload.wav");
        std::fs::write(&audio, b"x").unwrap();

        // "true" exits successfully without writing a transcript
        let transcriber = Transcriber::new(config_for("true"));
        match transcriber.transcribe(&audio, dir.path()) {
            Err(HandlerError::TranscriptionError(msg)) => {
                assert!(msg.contains("Failed to read output file"));
            }
            other => panic!("expected TranscriptionError, got {:?}", other),
        }
    }

    #[test]
    fn test_transcript_json_is_parsed_into_segments() {
        let json = r#"{"segments": [
            {"start": 0.0, "end": 1.5, "text": " Hello"},
            {"start": 1.5, "end": 3.0, "text": " world. "}
        ]}"#;

        let transcript: TranscriptFile = serde_json::from_str(json).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[1].text, " world. ");
    }
}
