use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
}

#[test]
fn opacity_maps_to_full_range() {
    assert_eq!(opacity_to_u8(0.0), 0);
    assert_eq!(opacity_to_u8(1.0), 255);
    assert_eq!(opacity_to_u8(0.5), 128);
    assert_eq!(opacity_to_u8(2.0), 255);
}

#[test]
fn floor_half_rounds_towards_negative_infinity() {
    assert_eq!(floor_half(880), 440);
    assert_eq!(floor_half(7), 3);
    assert_eq!(floor_half(-7), -4);
}
