use super::*;

fn line(text: &str, width: u32, height: u32) -> MeasuredLine {
    MeasuredLine {
        text: text.to_string(),
        width,
        height,
    }
}

#[test]
fn single_line_block_is_centered_with_floor_division() {
    let zone = Zone::new(100, 300, 0, 1080).unwrap();
    assert_eq!(block_start_y(&zone, &[40.0]), 180);
    assert_eq!(block_start_y(&zone, &[41.0]), 179);
}

#[test]
fn oversized_block_is_clamped_to_zone_top() {
    let zone = Zone::new(100, 300, 0, 1080).unwrap();
    assert_eq!(block_start_y(&zone, &[150.0, 150.0]), 100);
}

#[test]
fn empty_block_sits_at_zone_middle() {
    let zone = Zone::new(100, 300, 0, 1080).unwrap();
    assert_eq!(block_start_y(&zone, &[]), 200);
}

#[test]
fn horizontal_centering_uses_floor_division() {
    assert_eq!(center_x(1080, 200), 440);
    assert_eq!(center_x(1080, 201), 439);
    assert_eq!(center_x(100, 101), -1);
}

#[test]
fn center_in_zone_offsets_by_zone_origin() {
    let zone = Zone::new(960, 1920, 0, 1080).unwrap();
    assert_eq!(center_in_zone(&zone, 1080, 607), (0, 1136));
    assert_eq!(center_in_zone(&zone, 480, 960), (300, 960));
}

#[test]
fn slide_items_are_separated_by_one_point_eight_line_spacings() {
    let params = SlideLayoutParams {
        zone: Zone::new(248, 960, 0, 1080).unwrap(),
        frame_width: 1080,
        line_spacing: 81.0,
        bottom_bound: 960,
    };
    let items = vec![
        vec![line("systemic", 210, 63)],
        vec![line("dysfunctional", 330, 63)],
    ];
    let out = place_slide(&params, &items);

    assert!(out.skipped.is_empty());
    assert_eq!(out.placed.len(), 2);
    assert_eq!(out.placed[0].y, 523);
    assert_eq!(out.placed[0].x, 435);
    // 523 + 81 + 64.8 = 668.8
    assert_eq!(out.placed[1].y, 668);
    assert_eq!(out.placed[1].x, 375);
}

#[test]
fn wrapped_parts_advance_by_one_line_spacing() {
    let params = SlideLayoutParams {
        zone: Zone::new(0, 1000, 0, 1000).unwrap(),
        frame_width: 1000,
        line_spacing: 50.0,
        bottom_bound: 1000,
    };
    let items = vec![vec![line("• vessel wall", 100, 40), line("   weakening", 100, 40)]];
    let out = place_slide(&params, &items);
    assert_eq!(out.placed[1].y - out.placed[0].y, 50);
    assert_eq!((out.placed[1].item, out.placed[1].part), (0, 1));
}

#[test]
fn lines_crossing_the_bottom_bound_are_skipped_not_clipped() {
    let params = SlideLayoutParams {
        zone: Zone::new(0, 100, 0, 200).unwrap(),
        frame_width: 200,
        line_spacing: 40.0,
        bottom_bound: 100,
    };
    let items = vec![
        vec![line("a", 10, 40)],
        vec![line("b", 10, 40)],
        vec![line("c", 10, 40)],
    ];
    let out = place_slide(&params, &items);
    assert_eq!(out.placed.len(), 1);
    assert_eq!(out.placed[0].y, 0);
    assert_eq!(out.skipped, vec![(1, 0), (2, 0)]);
}
