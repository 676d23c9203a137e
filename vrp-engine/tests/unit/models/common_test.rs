use super::*;

#[test]
fn can_calculate_haversine_distance() {
    let berlin = Location::new(13.404954, 52.520008);
    let paris = Location::new(2.352222, 48.856613);

    let distance = berlin.haversine_distance(&paris);

    assert!((distance - 877_464.).abs() < 1000., "unexpected distance: {distance}");
    assert_eq!(paris.haversine_distance(&berlin), distance);
}

#[test]
fn can_return_zero_distance_for_same_location() {
    let location = Location::new(10., 20.);

    assert_eq!(location.haversine_distance(&location), 0.);
}

parameterized_test! {can_detect_valid_location, (lon, lat, expected), {
    assert_eq!(Location::new(lon, lat).is_valid(), expected);
}}

can_detect_valid_location! {
    case01: (0., 0., true),
    case02: (180., 90., true),
    case03: (-180., -90., true),
    case04: (180.1, 0., false),
    case05: (0., -90.1, false),
    case06: (f64::NAN, 0., false),
}

#[test]
fn can_return_zero_distance_for_invalid_location() {
    let valid = Location::new(13., 52.);

    assert_eq!(Location::invalid().haversine_distance(&valid), 0.);
    assert_eq!(valid.haversine_distance(&Location::invalid()), 0.);
}

parameterized_test! {can_check_time_window_contains, (time, expected), {
    assert_eq!(TimeWindow::new(10., 20.).contains(time), expected);
}}

can_check_time_window_contains! {
    case01: (9.9, false),
    case02: (10., true),
    case03: (15., true),
    case04: (20., true),
    case05: (20.1, false),
}
