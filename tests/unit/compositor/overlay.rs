use super::*;
use crate::encode::sink::InMemorySink;
use crate::media::source::MemoryFrameSource;

fn fps(n: u32) -> Fps {
    Fps::new(n, 1).unwrap()
}

#[test]
fn white_avatar_backdrop_is_replaced_by_background() {
    let mut fg = MemoryFrameSource::solid(4, 4, fps(25), 5, [255, 255, 255]).unwrap();
    let mut bg = MemoryFrameSource::solid(8, 2, fps(25), 5, [20, 40, 60]).unwrap();
    let mut sink = InMemorySink::new();

    let report = composite_frames(&mut fg, &mut bg, &mut sink, WHITE_KEY_THRESHOLD).unwrap();
    assert_eq!(report.frames_written, 5);
    assert!(!report.stopped_early);
    assert_eq!((report.width, report.height), (4, 4));
    assert!(sink.is_ended());
    for (_, frame) in sink.frames() {
        assert_eq!(frame.data, [20, 40, 60].repeat(16));
    }
}

#[test]
fn dark_avatar_pixels_survive() {
    let mut fg = MemoryFrameSource::solid(4, 4, fps(25), 2, [5, 5, 5]).unwrap();
    let mut bg = MemoryFrameSource::solid(4, 4, fps(25), 2, [200, 0, 0]).unwrap();
    let mut sink = InMemorySink::new();
    composite_frames(&mut fg, &mut bg, &mut sink, WHITE_KEY_THRESHOLD).unwrap();
    assert_eq!(sink.frames()[0].1.data, [5, 5, 5].repeat(16));
}

#[test]
fn output_uses_longer_source_rate_and_shorter_count() {
    let mut fg = MemoryFrameSource::solid(2, 2, fps(25), 50, [0, 0, 0]).unwrap();
    let mut bg = MemoryFrameSource::solid(2, 2, fps(30), 90, [0, 0, 0]).unwrap();
    let mut sink = InMemorySink::new();
    let report = composite_frames(&mut fg, &mut bg, &mut sink, WHITE_KEY_THRESHOLD).unwrap();
    assert_eq!(report.fps, fps(30));
    assert_eq!(report.total_frames, 50);
    assert_eq!(sink.config().unwrap().fps, fps(30));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..50).collect::<Vec<_>>());
}

#[test]
fn overstated_frame_count_stops_early_with_partial_output() {
    let mut fg = MemoryFrameSource::solid(2, 2, fps(25), 3, [0, 0, 0])
        .unwrap()
        .with_declared_frame_count(6);
    let mut bg = MemoryFrameSource::solid(2, 2, fps(25), 6, [0, 0, 0]).unwrap();
    let mut sink = InMemorySink::new();
    let report = composite_frames(&mut fg, &mut bg, &mut sink, WHITE_KEY_THRESHOLD).unwrap();
    assert!(report.stopped_early);
    assert_eq!(report.frames_written, 3);
    assert_eq!(sink.frames().len(), 3);
    assert!(sink.is_ended());
}

#[test]
fn scratch_dir_defaults_to_output_directory() {
    assert_eq!(
        scratch_dir_for(Path::new("out/final.mp4"), None),
        PathBuf::from("out")
    );
    assert_eq!(
        scratch_dir_for(Path::new("final.mp4"), None),
        PathBuf::from(".")
    );
    assert_eq!(
        scratch_dir_for(Path::new("out/final.mp4"), Some(Path::new("/tmp/x"))),
        PathBuf::from("/tmp/x")
    );
}

#[test]
fn missing_foreground_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = compose(
        &dir.path().join("avatar.mp4"),
        &dir.path().join("bg.mp4"),
        &dir.path().join("out.mp4"),
        &ComposeOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ReelError::NotFound {
            what: "foreground video",
            ..
        }
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
