use super::*;

const CANDIDATE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<Vec<u8>> {
    CANDIDATE_FONTS
        .iter()
        .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn missing_font_file_is_not_found() {
    let err = TextRasterizer::from_paths(
        Path::new("does/not/exist.ttf"),
        Path::new("does/not/exist-bold.ttf"),
    )
    .err()
    .unwrap();
    assert!(matches!(err, ReelError::NotFound { what: "font", .. }));
}

#[test]
fn garbage_bytes_are_rejected() {
    assert!(TextRasterizer::from_bytes(vec![0u8; 16], vec![0u8; 16]).is_err());
}

#[test]
fn rasterized_line_has_ink_and_grows_with_text() {
    let Some(font) = system_font() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let mut raster = TextRasterizer::from_bytes(font.clone(), font).unwrap();

    let short = raster
        .rasterize_line("mailbox", FontRole::Regular, 54.0, Rgb8::BLACK)
        .unwrap();
    let long = raster
        .rasterize_line("mailbox signals", FontRole::Regular, 54.0, Rgb8::BLACK)
        .unwrap();

    assert!(long.width > short.width);
    assert_eq!(short.height, long.height);
    assert_eq!(
        short.rgba8_premul.len(),
        (short.width * short.height * 4) as usize
    );
    let inked = short.rgba8_premul.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(inked > 0);
}

#[test]
fn invalid_size_is_rejected() {
    let Some(font) = system_font() else {
        return;
    };
    let mut raster = TextRasterizer::from_bytes(font.clone(), font).unwrap();
    assert!(
        raster
            .rasterize_line("x", FontRole::Bold, 0.0, Rgb8::BLACK)
            .is_err()
    );
}
