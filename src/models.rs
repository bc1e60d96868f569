// Audio API data models
//
// This module contains the data models used for the audio API.
// It includes the response types returned across the API.

use serde::Serialize;

/// Response for duration requests
#[derive(Serialize)]
pub struct DurationResponse {
    /// Original filename supplied by the client
    pub filename: String,
    /// Duration in seconds, rounded to 2 decimal places
    pub duration_seconds: f64,
    /// Human readable duration
    pub duration_formatted: String,
}

/// A single transcript segment in a transcription response
#[derive(Serialize)]
pub struct Segment {
    /// Segment start time in seconds, rounded to 2 decimal places
    pub start: f64,
    /// Segment end time in seconds, rounded to 2 decimal places
    pub end: f64,
    /// Trimmed text content for this segment
    pub text: String,
}

/// Response for transcription requests
#[derive(Serialize)]
pub struct TranscribeResponse {
    /// Original filename supplied by the client
    pub filename: String,
    /// Ordered transcript segments
    pub segments: Vec<Segment>,
    /// Full transcript text, segment texts joined with single spaces
    pub text: String,
}

/// Response for health checks
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process is serving
    pub status: &'static str,
}

/// Error response for API
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
