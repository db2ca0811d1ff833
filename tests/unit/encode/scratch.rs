use super::*;

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn dropped_scratch_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = ScratchFile::new_in(dir.path(), ".reelsmith-", ".mp4").unwrap();
    assert!(scratch.path().exists());
    assert!(scratch.path().to_string_lossy().ends_with(".mp4"));
    drop(scratch);
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn persisted_scratch_moves_to_target() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = ScratchFile::new_in(dir.path(), ".reelsmith-", ".mp4").unwrap();
    std::fs::write(scratch.path(), b"frames").unwrap();
    let target = dir.path().join("final.mp4");
    std::fs::write(&target, b"old").unwrap();

    scratch.persist(&target).unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"frames");
    assert_eq!(entries(dir.path()), 1);
}

#[test]
fn persist_crosses_filesystems() {
    // /dev/shm is tmpfs on Linux, so the target dir is usually another filesystem.
    let shm = Path::new("/dev/shm");
    if !shm.is_dir() {
        eprintln!("/dev/shm not available; skipping");
        return;
    }
    let scratch = match ScratchFile::new_in(shm, ".reelsmith-test-", ".mp4") {
        Ok(s) => s,
        Err(_) => return,
    };
    let src = scratch.path().to_path_buf();
    std::fs::write(&src, b"muxed").unwrap();

    let dir = tempfile::tempdir_in(env!("CARGO_MANIFEST_DIR")).unwrap();
    let target = dir.path().join("out.mp4");
    let out = scratch.persist(&target).unwrap();

    assert_eq!(out, target);
    assert_eq!(std::fs::read(&target).unwrap(), b"muxed");
    assert!(!src.exists());
    assert_eq!(entries(dir.path()), 1);
}

#[test]
fn missing_dir_is_encode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ScratchFile::new_in(&dir.path().join("nope"), "x", ".tmp").unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}
