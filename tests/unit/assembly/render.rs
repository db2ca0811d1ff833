use super::*;
use crate::assembly::layers::LayerKind;
use crate::timeline::window::{Fade, TimeWindow};

fn canvas() -> Canvas {
    Canvas {
        width: 4,
        height: 2,
    }
}

fn background(duration: f64) -> Layer {
    Layer {
        kind: LayerKind::Background,
        paint: Paint::Solid {
            color: Rgb8::new(240, 240, 240),
            width: 4,
            height: 2,
        },
        text: None,
        x: 0,
        y: 0,
        window: TimeWindow::new(0.0, duration).unwrap(),
        fade: Fade::NONE,
    }
}

fn black_square(start: f64, end: f64) -> Layer {
    Layer {
        kind: LayerKind::Image { index: 0 },
        paint: Paint::Raster(RasterImage::solid(1, 1, [0, 0, 0, 255])),
        text: None,
        x: 3,
        y: 1,
        window: TimeWindow::new(start, end).unwrap(),
        fade: Fade::fade_in(1.0),
    }
}

fn px(frame: &FrameSample, x: usize, y: usize) -> [u8; 3] {
    let i = (y * frame.width as usize + x) * 3;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2]]
}

#[test]
fn background_fills_the_frame() {
    let mut r = FrameRenderer::new(canvas(), Rgb8::BLACK);
    let f = r.render(&[background(10.0)], 0.0).unwrap();
    assert_eq!(f.data, [240, 240, 240].repeat(8));
}

#[test]
fn layer_fades_in_then_holds() {
    let layers = [background(10.0), black_square(2.0, 5.0)];
    let mut r = FrameRenderer::new(canvas(), Rgb8::BLACK);
    assert_eq!(px(&r.render(&layers, 1.0).unwrap(), 3, 1), [240, 240, 240]);
    let mid = px(&r.render(&layers, 2.5).unwrap(), 3, 1);
    assert!(mid[0] > 100 && mid[0] < 140, "{mid:?}");
    assert_eq!(px(&r.render(&layers, 4.0).unwrap(), 3, 1), [0, 0, 0]);
    assert_eq!(px(&r.render(&layers, 5.0).unwrap(), 3, 1), [240, 240, 240]);
}

#[test]
fn static_stretches_reuse_the_previous_raster() {
    let layers = [background(10.0), black_square(2.0, 5.0)];
    let mut r = FrameRenderer::new(canvas(), Rgb8::BLACK);
    for i in 0..30 {
        r.render(&layers, f64::from(i) / 10.0).unwrap();
    }
    // t < 2.0 is one static stretch; 2.0..=2.9 ramps.
    assert_eq!(r.rendered() + r.reused(), 30);
    assert!(r.reused() >= 19);
    let a = r.render(&layers, 3.5).unwrap();
    let b = r.render(&layers, 4.5).unwrap();
    assert_eq!(a.data, b.data);
    assert_eq!(b.timestamp_secs, 4.5);
}

#[test]
fn empty_stack_shows_matte() {
    let mut r = FrameRenderer::new(canvas(), Rgb8::new(1, 2, 3));
    let f = r.render(&[], 0.0).unwrap();
    assert_eq!(f.data, [1, 2, 3].repeat(8));
}

#[test]
fn fading_or_partial_solids_blend_with_the_matte() {
    let mut fading = background(10.0);
    fading.fade = Fade::fade_in(1.0);
    let mut r = FrameRenderer::new(canvas(), Rgb8::BLACK);
    let half = px(&r.render(&[fading], 0.5).unwrap(), 0, 0);
    assert!(half[0] > 110 && half[0] < 130, "{half:?}");

    let mut strip = background(10.0);
    strip.paint = Paint::Solid {
        color: Rgb8::WHITE,
        width: 2,
        height: 1,
    };
    strip.x = 1;
    let f = r.render(&[strip], 0.0).unwrap();
    assert_eq!(px(&f, 0, 0), [0, 0, 0]);
    assert_eq!(px(&f, 1, 0), [255, 255, 255]);
    assert_eq!(px(&f, 2, 0), [255, 255, 255]);
    assert_eq!(px(&f, 1, 1), [0, 0, 0]);
}
