use super::*;
use crate::encode::sink::InMemorySink;

const CANDIDATE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];

fn system_font_path() -> Option<&'static str> {
    CANDIDATE_FONTS
        .iter()
        .copied()
        .find(|p| Path::new(p).is_file())
}

fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
    image::RgbaImage::from_pixel(w, h, image::Rgba([0, 0, 255, 255]))
        .save(dir.join(name))
        .unwrap();
}

fn coordinator(json: &str, dir: &Path) -> Coordinator {
    Coordinator::new(CompositeManifest::from_json_str(json, dir).unwrap())
}

#[test]
fn image_is_fit_and_centered_in_the_lower_half() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "wide.png", 80, 20);
    let json = r#"{ "width": 40, "height": 80, "fps": 10,
        "images": [ { "start_time": 0, "end_time": 2, "image_path": "wide.png" } ] }"#;
    let assembly = coordinator(json, dir.path()).build().unwrap();

    assert_eq!(assembly.layers.len(), 2);
    assert_eq!(assembly.layers[0].kind, LayerKind::Background);
    let img = &assembly.layers[1];
    assert_eq!(img.kind, LayerKind::Image { index: 0 });
    assert_eq!(img.paint.size(), (40, 10));
    assert_eq!((img.x, img.y), (0, 40 + 15));
    assert_eq!(img.fade, Fade::symmetric(0.5));
    assert_eq!(assembly.frame_count(), 20);
}

#[test]
fn missing_image_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 4, 4);
    let json = r#"{ "width": 40, "height": 80,
        "images": [
          { "start_time": 0, "end_time": 2, "image_path": "a.png" },
          { "start_time": 2, "end_time": 4, "image_path": "gone.png" }
        ] }"#;
    let assembly = coordinator(json, dir.path()).build().unwrap();
    assert_eq!(assembly.layers.len(), 2);
    assert_eq!(assembly.skipped.len(), 1);
    assert_eq!(assembly.skipped[0].item, "images[1]");
    assert!(assembly.skipped[0].reason.contains("gone.png"));
    assert_eq!(assembly.duration, 4.0);
}

#[test]
fn plan_serializes_layers_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 4, 4);
    let json = r#"{ "width": 40, "height": 80, "fps": 10,
        "images": [ { "start_time": 1, "end_time": 3, "image_path": "a.png" } ] }"#;
    let plan = coordinator(json, dir.path()).build().unwrap().plan();
    let value = serde_json::to_value(&plan).unwrap();
    assert_eq!(value["frame_count"], 30);
    assert_eq!(value["layers"][0]["kind"], "background");
    assert_eq!(value["layers"][1]["kind"], "image");
    assert_eq!(value["layers"][1]["index"], 0);
    assert_eq!(value["layers"][1]["window"]["start"], 1.0);
    assert_eq!(value["layers"][1]["width"], 40);
    assert!(value["layers"][1].get("text").is_none());
}

#[test]
fn render_pushes_every_frame_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 4, 4);
    let json = r#"{ "width": 8, "height": 8, "fps": 10, "background_color": [255, 0, 0],
        "images": [ { "start_time": 0.5, "end_time": 1, "image_path": "a.png" } ] }"#;
    let assembly = coordinator(json, dir.path()).build().unwrap();
    let mut sink = InMemorySink::new();
    let stats = assembly.render(&mut sink).unwrap();

    assert_eq!(stats.frames, 10);
    assert_eq!(stats.rendered + stats.reused, 10);
    assert!(stats.reused >= 4);
    assert!(sink.is_ended());
    let frames = sink.frames();
    assert_eq!(frames.len(), 10);
    assert!(frames.iter().enumerate().all(|(i, (idx, _))| idx.0 == i as u64));
    assert_eq!(&frames[0].1.data[..3], &[255, 0, 0]);
    // The image zone is rows 4..8; by t = 0.9 the image is still fading out.
    let last = &frames[9].1;
    let px = (6 * 8 + 4) * 3;
    assert!(last.data[px + 2] > 0);
}

#[test]
fn zero_duration_refuses_to_encode() {
    let dir = tempfile::tempdir().unwrap();
    let c = coordinator(r#"{ "width": 8, "height": 8 }"#, dir.path());
    let err = c
        .create_video(&dir.path().join("out.mp4"), &AssembleOpts::default())
        .unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn captions_are_wrapped_placed_and_timed() {
    let Some(font) = system_font_path() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let json = format!(
        r#"{{ "header": "Aneurysms",
            "fonts": {{ "regular": "{font}", "bold": "{font}" }},
            "slides": [
              {{ "start_times": [0, 2], "end_time": 6,
                 "lines": ["• vessel wall weakening over time", "balloon bulge"] }},
              {{ "start_times": [6], "end_time": 9, "lines": ["burst risk"], "fade_out": true }}
            ] }}"#
    );
    let dir = tempfile::tempdir().unwrap();
    let assembly = coordinator(&json, dir.path()).build().unwrap();
    let geometry = SplitScreen::for_canvas(assembly.canvas).unwrap();

    let header = &assembly.layers[1];
    assert_eq!(header.kind, LayerKind::Header);
    assert_eq!(header.y, 100);
    assert_eq!(header.window.end, 9.0);

    let captions: Vec<&Layer> = assembly
        .layers
        .iter()
        .filter(|l| matches!(l.kind, LayerKind::Caption { .. }))
        .collect();
    // 3 wrapped parts for the bullet, 1 for each of the others.
    assert_eq!(captions.len(), 5);
    assert_eq!(captions[0].text.as_deref(), Some("• vessel wall"));
    assert_eq!(captions[1].text.as_deref(), Some("   weakening over"));
    for c in &captions {
        assert!(c.y >= geometry.body.top && c.y < geometry.body.bottom);
    }
    assert!(captions[1].y > captions[0].y);
    assert_eq!(captions[3].window, TimeWindow::new(2.0, 6.0).unwrap());
    assert_eq!(captions[3].fade, Fade::fade_in(0.5));
    assert_eq!(captions[4].fade, Fade::symmetric(0.5));
    assert!(assembly.skipped.is_empty());
}
