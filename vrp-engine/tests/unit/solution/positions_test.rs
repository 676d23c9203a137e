use super::*;
use crate::helpers::models::TestModelBuilder;
use crate::helpers::solution::*;

/// Creates a solution with two vehicles where `s2` is planned on the first and `s3` on the second.
fn create_solution() -> (Solution, Vec<usize>) {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[1., 2., 3., 4.]);
    builder.add_vehicle("v1");
    builder.add_vehicle("v2");
    let model = builder.model_mut();
    let units =
        stops.iter().map(|&stop| model.new_plan_single_stop(stop).expect("cannot create unit")).collect::<Vec<_>>();
    let mut solution = create_test_solution(builder.build());

    for (vehicle, idx) in [(0, 2), (1, 3)] {
        let first = solution.vehicle(vehicle).first().index();
        assert!(plan_after(&mut solution, units[idx], stops[idx], first));
    }

    (solution, stops)
}

#[test]
fn can_create_stop_position_between_adjacent_stops() {
    let (solution, stops) = create_solution();
    let first = solution.vehicle(0).first().index();

    let position = StopPosition::new(&solution, first, stops[0], stops[2]).expect("cannot create position");

    assert_eq!(position, StopPosition { previous: first, stop: stops[0], next: stops[2] });
}

#[test]
fn can_create_chained_stop_position() {
    let (solution, stops) = create_solution();

    assert!(StopPosition::new(&solution, stops[1], stops[0], stops[2]).is_ok());
}

parameterized_test! {can_validate_stop_position, (position_fn, expected), {
    let (solution, stops) = create_solution();
    let (first, last) = (solution.vehicle(0).first().index(), solution.vehicle(0).last().index());
    let other_last = solution.vehicle(1).last().index();
    let (previous, stop, next) = position_fn((first, last, other_last), stops.as_slice());

    let result = StopPosition::new(&solution, previous, stop, next);

    assert!(result.is_err_and(|err| err.message().contains(expected)), "expected: {expected}");
}}

type Anchors = (usize, usize, usize);

can_validate_stop_position! {
    case01_planned_stop: (|(first, last, _): Anchors, stops: &[usize]| (first, stops[2], last), "is already planned"),
    case02_not_adjacent: (|(first, last, _): Anchors, stops: &[usize]| (first, stops[0], last), "are not adjacent"),
    case03_reversed: (|(first, _, _): Anchors, stops: &[usize]| (stops[2], stops[0], first), "are not adjacent"),
    case04_other_vehicle: (
        |(_, _, other_last): Anchors, stops: &[usize]| (stops[2], stops[0], other_last),
        "are not on the same vehicle",
    ),
    case05_unknown_stop: (|(first, last, _): Anchors, _: &[usize]| (first, 100, last), "references unknown stop"),
}
