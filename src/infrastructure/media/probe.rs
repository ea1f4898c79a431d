//! Stream-parameter probing for the concat demuxer path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::ProcessError;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<StreamSignature>,
}

/// The stream parameters that must agree across inputs for a
/// stream-copy-compatible concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamSignature {
    pub codec_type: String,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub pix_fmt: Option<String>,
    pub sample_rate: Option<String>,
    pub channels: Option<u32>,
}

pub async fn probe_streams(ffprobe: &str, path: &Path) -> Result<Vec<StreamSignature>, ProcessError> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_entries",
            "stream=codec_type,codec_name,width,height,pix_fmt,sample_rate,channels",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            program: ffprobe.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program: ffprobe.to_string(),
            status: output.status.to_string(),
            diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    parse_streams(&output.stdout).map_err(|e| ProcessError::Probe {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_streams(stdout: &[u8]) -> Result<Vec<StreamSignature>, serde_json::Error> {
    let parsed: FfprobeOutput = serde_json::from_slice(stdout)?;
    Ok(parsed.streams)
}

/// Every input must carry the same stream layout as the first one.
pub fn ensure_compatible(probed: &[(PathBuf, Vec<StreamSignature>)]) -> Result<(), ProcessError> {
    let Some((first_path, reference)) = probed.first() else {
        return Ok(());
    };

    if reference.is_empty() {
        return Err(ProcessError::IncompatibleInputs(format!(
            "input 0 ({}) has no media streams",
            first_path.display()
        )));
    }

    for (index, (path, streams)) in probed.iter().enumerate().skip(1) {
        if streams != reference {
            return Err(ProcessError::IncompatibleInputs(format!(
                "input {} ({}) differs from input 0: {} vs {}",
                index,
                path.display(),
                describe(streams),
                describe(reference)
            )));
        }
    }

    Ok(())
}

fn describe(streams: &[StreamSignature]) -> String {
    if streams.is_empty() {
        return "no streams".to_string();
    }

    streams
        .iter()
        .map(|s| {
            let codec = s.codec_name.as_deref().unwrap_or("?");
            match s.codec_type.as_str() {
                "video" => format!(
                    "video {} {}x{} {}",
                    codec,
                    s.width.unwrap_or(0),
                    s.height.unwrap_or(0),
                    s.pix_fmt.as_deref().unwrap_or("?")
                ),
                "audio" => format!(
                    "audio {} {}Hz {}ch",
                    codec,
                    s.sample_rate.as_deref().unwrap_or("?"),
                    s.channels.unwrap_or(0)
                ),
                other => format!("{} {}", other, codec),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(codec: &str, width: u32, height: u32) -> StreamSignature {
        StreamSignature {
            codec_type: "video".into(),
            codec_name: Some(codec.into()),
            width: Some(width),
            height: Some(height),
            pix_fmt: Some("yuv420p".into()),
            sample_rate: None,
            channels: None,
        }
    }

    fn audio(rate: &str) -> StreamSignature {
        StreamSignature {
            codec_type: "audio".into(),
            codec_name: Some("aac".into()),
            width: None,
            height: None,
            pix_fmt: None,
            sample_rate: Some(rate.into()),
            channels: Some(2),
        }
    }

    #[test]
    fn parses_ffprobe_json() {
        let json = br#"{
            "programs": [],
            "streams": [
                {"codec_name": "h264", "codec_type": "video", "width": 1280, "height": 720, "pix_fmt": "yuv420p"},
                {"codec_name": "aac", "codec_type": "audio", "sample_rate": "48000", "channels": 2}
            ]
        }"#;

        let streams = parse_streams(json).unwrap();

        assert_eq!(streams, vec![video("h264", 1280, 720), audio("48000")]);
    }

    #[test]
    fn rejects_garbage_probe_output() {
        assert!(parse_streams(b"").is_err());
        assert!(parse_streams(b"not json").is_err());
    }

    #[test]
    fn matching_inputs_are_compatible() {
        let sig = vec![video("h264", 1920, 1080), audio("44100")];
        let probed = vec![
            (PathBuf::from("video_0.mp4"), sig.clone()),
            (PathBuf::from("video_1.mp4"), sig.clone()),
            (PathBuf::from("video_2.mp4"), sig),
        ];

        assert!(ensure_compatible(&probed).is_ok());
    }

    #[test]
    fn mismatched_resolution_names_offending_input() {
        let probed = vec![
            (PathBuf::from("video_0.mp4"), vec![video("h264", 1920, 1080), audio("44100")]),
            (PathBuf::from("video_1.mp4"), vec![video("h264", 1920, 1080), audio("44100")]),
            (PathBuf::from("video_2.mp4"), vec![video("h264", 1280, 720), audio("44100")]),
        ];

        let err = ensure_compatible(&probed).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("input 2"), "{}", message);
        assert!(message.contains("1280x720"), "{}", message);
    }

    #[test]
    fn missing_audio_track_is_incompatible() {
        let probed = vec![
            (PathBuf::from("video_0.mp4"), vec![video("h264", 640, 360), audio("48000")]),
            (PathBuf::from("video_1.mp4"), vec![video("h264", 640, 360)]),
        ];

        assert!(matches!(
            ensure_compatible(&probed),
            Err(ProcessError::IncompatibleInputs(_))
        ));
    }

    #[test]
    fn streamless_first_input_is_rejected() {
        let probed = vec![(PathBuf::from("video_0.mp4"), vec![])];

        assert!(ensure_compatible(&probed).is_err());
    }
}
