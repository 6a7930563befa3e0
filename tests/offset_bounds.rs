use annotated_price_chart::domain::controls::{ControlState, Offset, OffsetBounds};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn offset_always_within_bounds(value: i32) -> bool {
    let bounds = OffsetBounds::default();
    let offset = Offset::new(value, bounds);
    bounds.contains(offset.value())
}

#[quickcheck]
fn in_range_values_are_kept(value: i8) -> bool {
    let value = value as i32 % 31;
    let mut controls = ControlState::default();
    controls.set_dx(value);
    controls.set_dy(value);
    controls.dx() == value && controls.dy() == value
}

#[quickcheck]
fn custom_bounds_clamp(a: i16, b: i16, value: i32) -> bool {
    let (min, max) = (a.min(b) as i32, a.max(b) as i32);
    let bounds = OffsetBounds::new(min, max).unwrap();
    let clamped = bounds.clamp(value);
    clamped >= min && clamped <= max && (!bounds.contains(value) || clamped == value)
}

#[test]
fn set_reports_change_only_when_stored_value_moves() {
    let mut controls = ControlState::default();
    assert!(!controls.set_dx(0));
    assert!(controls.set_dx(30));
    assert!(!controls.set_dx(99));
    assert_eq!(controls.dx(), 30);
    assert!(!controls.set_text("Analysis"));
    assert!(controls.set_text(""));
    assert_eq!(controls.text(), "");
}
