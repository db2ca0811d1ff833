use super::*;

const AVATAR: &str = r#"{
  "streams": [
    { "codec_type": "video", "width": 720, "height": 1280,
      "r_frame_rate": "25/1", "avg_frame_rate": "25/1", "nb_frames": "250", "duration": "10.000000" },
    { "codec_type": "audio", "nb_frames": "469" }
  ],
  "format": { "duration": "10.010000" }
}"#;

#[test]
fn parses_video_and_audio_streams() {
    let info = parse_probe_json(Path::new("avatar.mp4"), AVATAR.as_bytes()).unwrap();
    assert_eq!((info.width, info.height), (720, 1280));
    assert_eq!(info.fps, Fps::new(25, 1).unwrap());
    assert_eq!(info.frame_count, 250);
    assert!(info.has_audio);
    assert_eq!(info.duration_secs(), 10.0);
}

#[test]
fn frame_count_falls_back_to_duration() {
    let json = r#"{
      "streams": [ { "codec_type": "video", "width": 640, "height": 360,
                     "avg_frame_rate": "30000/1001" } ],
      "format": { "duration": "2.002000" }
    }"#;
    let info = parse_probe_json(Path::new("bg.mkv"), json.as_bytes()).unwrap();
    assert_eq!(info.frame_count, 60);
    assert!(!info.has_audio);
}

#[test]
fn zero_avg_rate_falls_back_to_r_frame_rate() {
    let json = r#"{
      "streams": [ { "codec_type": "video", "width": 2, "height": 2,
                     "avg_frame_rate": "0/0", "r_frame_rate": "24/1", "nb_frames": "5" } ]
    }"#;
    let info = parse_probe_json(Path::new("x.mp4"), json.as_bytes()).unwrap();
    assert_eq!(info.fps, Fps::new(24, 1).unwrap());
}

#[test]
fn audio_only_input_is_a_decode_error() {
    let json = r#"{ "streams": [ { "codec_type": "audio" } ] }"#;
    let err = parse_probe_json(Path::new("a.m4a"), json.as_bytes()).unwrap_err();
    assert!(matches!(err, ReelError::Decode(_)));
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = probe_video(&dir.path().join("missing.mp4"), "foreground video").unwrap_err();
    assert!(matches!(
        err,
        ReelError::NotFound {
            what: "foreground video",
            ..
        }
    ));
}
