use super::*;

#[test]
fn portrait_hd_geometry() {
    let split = SplitScreen::for_canvas(Canvas {
        width: 1080,
        height: 1920,
    })
    .unwrap();
    assert_eq!(split.font_size, 54);
    assert_eq!(split.header_font_size, 64);
    assert_eq!(split.line_spacing, 81.0);
    assert_eq!(split.header, Zone::new(100, 228, 0, 1080).unwrap());
    assert_eq!(split.body, Zone::new(248, 960, 0, 1080).unwrap());
    assert_eq!(split.image, Zone::new(960, 1920, 0, 1080).unwrap());
    assert_eq!(split.caption_bottom_bound(), 960);
}

#[test]
fn zones_stack_without_vertical_overlap() {
    for (w, h) in [(1080, 1920), (720, 1280), (64, 64), (1920, 1080)] {
        let split = SplitScreen::for_canvas(Canvas {
            width: w,
            height: h,
        })
        .unwrap();
        assert!(split.header.bottom <= split.body.top, "{w}x{h}");
        assert!(split.body.top <= split.body.bottom, "{w}x{h}");
        assert!(split.body.bottom <= split.image.top, "{w}x{h}");
        assert_eq!(split.image.bottom, h as i32);
    }
}

#[test]
fn zero_sized_canvas_is_rejected() {
    assert!(
        SplitScreen::for_canvas(Canvas {
            width: 0,
            height: 1920
        })
        .is_err()
    );
}

#[test]
fn invalid_zone_is_rejected() {
    assert!(Zone::new(300, 100, 0, 10).is_err());
    assert!(Zone::new(0, 10, 20, 10).is_err());
}

#[test]
fn fit_within_preserves_aspect() {
    assert_eq!(fit_within(2000, 1000, 1080, 960), Some((1080, 540)));
    assert_eq!(fit_within(500, 1000, 1080, 960), Some((480, 960)));
    // Upscales small images.
    assert_eq!(fit_within(108, 96, 1080, 960), Some((1080, 960)));
    assert_eq!(fit_within(0, 10, 1080, 960), None);
    assert_eq!(fit_within(10, 10, 0, 960), None);
}
