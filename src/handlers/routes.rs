// API route handlers for the audio API
//
// This module contains the route handlers for the audio API.
// It implements the actual HTTP endpoints for the API.

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use log::info;

use crate::audio;
use crate::config::AppConfig;
use crate::error::HandlerError;
use crate::file_utils::stage_upload;
use crate::handlers::form::extract_upload;
use crate::models::{DurationResponse, HealthResponse, Segment, TranscribeResponse};
use crate::transcriber::{RawSegment, Transcriber};

/// Round a seconds value to 2 decimal places for response payloads
fn round_seconds(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Shape raw transcript segments into the response form
///
/// Timestamps are rounded to 2 decimal places, segment texts trimmed, and
/// the full text built by joining the trimmed texts with single spaces.
fn shape_segments(raw: Vec<RawSegment>) -> (Vec<Segment>, String) {
    let mut segments = Vec::with_capacity(raw.len());
    let mut full_text = String::new();

    for segment in raw {
        let text = segment.text.trim().to_string();
        full_text.push_str(&text);
        full_text.push(' ');
        segments.push(Segment {
            start: round_seconds(segment.start),
            end: round_seconds(segment.end),
            text,
        });
    }

    (segments, full_text.trim().to_string())
}

/// Greeting endpoint
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hello, World!")
}

/// Health check endpoint
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "healthy" })
}

/// Handler for duration requests
///
/// This endpoint receives an MP3 or WAV file and returns its duration in
/// seconds. The upload is staged under a unique path, probed, and removed
/// again whatever the outcome.
#[post("/duration")]
pub async fn duration(
    form: Multipart,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, HandlerError> {
    let upload = extract_upload(form, &config).await?;

    config.ensure_temp_dir()?;
    let staged = stage_upload(&config.temp_dir, &upload.filename, &upload.data)?;
    info!("Reading duration for request {}", staged.id);

    let audio_file = staged.audio_file.clone();
    let duration = web::block(move || audio::read_duration(&audio_file)).await??;

    Ok(HttpResponse::Ok().json(DurationResponse {
        filename: upload.filename,
        duration_seconds: round_seconds(duration),
        duration_formatted: audio::format_duration(duration),
    }))
}

/// Handler for transcription requests
///
/// This endpoint receives an MP3 or WAV file, runs the transcription
/// command over it, and returns the timestamped segments together with the
/// joined transcript text. The staged file and any transcript the command
/// wrote are removed on success and failure alike.
#[post("/transcribe")]
pub async fn transcribe(
    form: Multipart,
    config: web::Data<AppConfig>,
    transcriber: web::Data<Transcriber>,
) -> Result<HttpResponse, HandlerError> {
    let upload = extract_upload(form, &config).await?;

    config.ensure_temp_dir()?;
    let staged = stage_upload(&config.temp_dir, &upload.filename, &upload.data)?;
    info!("Transcribing request {}", staged.id);

    let audio_file = staged.audio_file.clone();
    let work_dir = staged.folder.clone();
    let transcriber = transcriber.into_inner();
    let raw = web::block(move || transcriber.transcribe(&audio_file, &work_dir)).await??;

    let (segments, text) = shape_segments(raw);

    Ok(HttpResponse::Ok().json(TranscribeResponse {
        filename: upload.filename,
        segments,
        text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::test_support::wav_bytes;
    use crate::config::TranscriberConfig;
    use actix_web::http::header;
    use actix_web::{test, App};
    use tempfile::tempdir;

    const BOUNDARY: &str = "----audio-api-test-boundary";

    fn multipart_file(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn test_config(temp_dir: &std::path::Path) -> AppConfig {
        AppConfig {
            host: String::from("127.0.0.1"),
            port: 0,
            debug: false,
            temp_dir: temp_dir.to_str().unwrap().to_string(),
            max_file_size: 10 * 1024 * 1024,
            api_key_hash: None,
        }
    }

    fn post_file(uri: &str, field: &str, filename: &str, data: &[u8]) -> actix_web::test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_file(field, filename, data))
    }

    #[actix_web::test]
    async fn test_index_greets() {
        let app = test::init_service(App::new().service(index)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, "Hello, World!");
    }

    #[actix_web::test]
    async fn test_health_reports_healthy() {
        let app = test::init_service(App::new().service(health)).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_duration_requires_a_file_field() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(dir.path())))
                .service(duration),
        )
        .await;

        let req = post_file("/duration", "attachment", "clip.wav", b"data").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No file provided");
    }

    #[actix_web::test]
    async fn test_duration_rejects_empty_filename() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(dir.path())))
                .service(duration),
        )
        .await;

        let req = post_file("/duration", "file", "", b"data").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No file selected");
    }

    #[actix_web::test]
    async fn test_duration_rejects_unsupported_extension() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(dir.path())))
                .service(duration),
        )
        .await;

        let req = post_file("/duration", "file", "clip.mp4", b"data").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "File must be MP3 or WAV format");
    }

    #[actix_web::test]
    async fn test_duration_of_a_wav_upload() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(dir.path())))
                .service(duration),
        )
        .await;

        let req = post_file("/duration", "file", "tone.wav", &wav_bytes(3.0, 8000)).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["filename"], "tone.wav");
        let seconds = body["duration_seconds"].as_f64().unwrap();
        assert!((seconds - 3.0).abs() < 0.01, "got {}", seconds);
        assert_eq!(body["duration_formatted"], "0:03");

        // Staged files are gone once the response is produced
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_duration_of_garbage_bytes_is_a_bad_request() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(dir.path())))
                .service(duration),
        )
        .await;

        let req = post_file("/duration", "file", "noise.wav", b"not really audio").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Could not read audio file");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_transcribe_failure_cleans_up_staged_files() {
        let dir = tempdir().unwrap();
        let transcriber = Transcriber::new(TranscriberConfig {
            command_path: String::from("/nonexistent/whisper"),
            model: String::from("base"),
            language: String::from("en"),
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(dir.path())))
                .app_data(web::Data::new(transcriber))
                .service(transcribe),
        )
        .await;

        let req = post_file("/transcribe", "file", "talk.wav", &wav_bytes(1.0, 8000)).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 500);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Failed to run command"));

        // The staged upload must not survive the failure
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[actix_web::test]
    async fn test_transcribe_returns_shaped_segments() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();

        // Fake whisper command: writes a transcript next to the audio file.
        // Argument order matches Transcriber::transcribe, so $9 is the
        // output directory.
        let script_path = dir.path().join("fake_whisper.sh");
        let script = "#!/bin/sh\n\
                      stem=$(basename \"$1\")\n\
                      stem=\"${stem%.*}\"\n\
                      printf '%s' '{\"segments\": [\
                      {\"start\": 0.004, \"end\": 1.519, \"text\": \" Hello there.\"}, \
                      {\"start\": 1.519, \"end\": 3.0, \"text\": \" General Kenobi. \"}]}' \
                      > \"$9/$stem.json\"\n";
        std::fs::write(&script_path, script).unwrap();
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let staging = tempdir().unwrap();
        let transcriber = Transcriber::new(TranscriberConfig {
            command_path: script_path.to_str().unwrap().to_string(),
            model: String::from("base"),
            language: String::from("en"),
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config(staging.path())))
                .app_data(web::Data::new(transcriber))
                .service(transcribe),
        )
        .await;

        let req = post_file("/transcribe", "file", "talk.wav", &wav_bytes(1.0, 8000)).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["filename"], "talk.wav");
        assert_eq!(body["text"], "Hello there. General Kenobi.");
        assert_eq!(body["segments"][0]["text"], "Hello there.");
        assert_eq!(body["segments"][0]["start"], 0.0);
        assert_eq!(body["segments"][0]["end"], 1.52);

        // Both the staged audio and the transcript the command wrote are gone
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[::std::prelude::v1::test]
    fn test_round_seconds() {
        assert_eq!(round_seconds(0.0), 0.0);
        assert!((round_seconds(3.004) - 3.0).abs() < 1e-9);
        assert!((round_seconds(1.519) - 1.52).abs() < 1e-9);
        assert!((round_seconds(59.999) - 60.0).abs() < 1e-9);
    }

    #[::std::prelude::v1::test]
    fn test_shape_segments_trims_and_joins() {
        let raw = vec![
            RawSegment {
                start: 0.004,
                end: 1.519,
                text: String::from(" Hello there."),
            },
            RawSegment {
                start: 1.519,
                end: 3.0,
                text: String::from(" General Kenobi. "),
            },
        ];

        let (segments, text) = shape_segments(raw);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start, 0.0);
        assert!((segments[0].end - 1.52).abs() < 1e-9);
        assert_eq!(segments[0].text, "Hello there.");
        assert_eq!(text, "Hello there. General Kenobi.");
    }

    #[::std::prelude::v1::test]
    fn test_shape_segments_empty() {
        let (segments, text) = shape_segments(Vec::new());
        assert!(segments.is_empty());
        assert_eq!(text, "");
    }
}
