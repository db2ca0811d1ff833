use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over([0, 0, 0, 255], src, 1.0), src);
}

#[test]
fn half_opacity_black_over_white_is_mid_grey() {
    let out = over([255, 255, 255, 255], [0, 0, 0, 255], 0.5);
    assert_eq!(out, [127, 127, 127, 255]);
}

#[test]
fn blit_clips_to_canvas() {
    let canvas = Canvas {
        width: 4,
        height: 4,
    };
    let mut dst = vec![0u8; 4 * 4 * 4];
    let img = RasterImage::solid(3, 3, [9, 9, 9, 255]);
    blit_over(&mut dst, canvas, &img, 2, -1, 1.0).unwrap();

    let px = |x: usize, y: usize| &dst[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(2, 0), &[9, 9, 9, 255]);
    assert_eq!(px(3, 1), &[9, 9, 9, 255]);
    assert_eq!(px(1, 0), &[0, 0, 0, 0]);
    assert_eq!(px(2, 2), &[0, 0, 0, 0]);
}

#[test]
fn blit_fully_outside_is_noop() {
    let canvas = Canvas {
        width: 2,
        height: 2,
    };
    let mut dst = vec![7u8; 16];
    let img = RasterImage::solid(2, 2, [0, 0, 0, 255]);
    blit_over(&mut dst, canvas, &img, 5, 5, 1.0).unwrap();
    assert!(dst.iter().all(|&v| v == 7));
}

#[test]
fn blit_rejects_wrong_buffer_size() {
    let canvas = Canvas {
        width: 2,
        height: 2,
    };
    let mut dst = vec![0u8; 3];
    let img = RasterImage::solid(1, 1, [0, 0, 0, 255]);
    assert!(blit_over(&mut dst, canvas, &img, 0, 0, 1.0).is_err());
}

#[test]
fn flatten_composites_over_background() {
    let src = [0, 0, 0, 0, 100, 50, 0, 255];
    let out = flatten_to_rgb24(&src, Rgb8::WHITE).unwrap();
    assert_eq!(out, vec![255, 255, 255, 100, 50, 0]);
}

#[test]
fn fill_solid_is_opaque() {
    let mut dst = vec![0u8; 8];
    fill_solid(&mut dst, Rgb8::new(1, 2, 3));
    assert_eq!(dst, vec![1, 2, 3, 255, 1, 2, 3, 255]);
}
