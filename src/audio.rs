// Audio metadata reading for the audio API
//
// This module reads the duration of an uploaded audio file through symphonia
// and renders it in a human readable form. Files that pass the extension
// check but cannot be parsed are reported as unreadable rather than as
// internal errors.

use std::fs::File;
use std::path::Path;

use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::HandlerError;

/// Read the duration of an audio file in seconds
///
/// Duration comes from the codec parameters when the container declares a
/// frame count. MP3 streams without a header frame count fall back to
/// walking the packet timestamps.
pub fn read_duration(path: &Path) -> Result<f64, HandlerError> {
    let file = File::open(path)?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|_| HandlerError::UnreadableAudio)?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or(HandlerError::UnreadableAudio)?;
    let track_id = track.id;
    let time_base = track
        .codec_params
        .time_base
        .ok_or(HandlerError::UnreadableAudio)?;

    if let Some(n_frames) = track.codec_params.n_frames {
        let time = time_base.calc_time(n_frames);
        return Ok(time.seconds as f64 + time.frac);
    }

    // No declared frame count; keep the furthest end timestamp seen
    let mut end_ts = 0u64;
    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() == track_id {
                    end_ts = end_ts.max(packet.ts() + packet.dur());
                }
            }
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(_) => return Err(HandlerError::UnreadableAudio),
        }
    }

    let time = time_base.calc_time(end_ts);
    Ok(time.seconds as f64 + time.frac)
}

/// Format a duration in seconds as "m:ss", or "h:mm:ss" from one hour up
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
