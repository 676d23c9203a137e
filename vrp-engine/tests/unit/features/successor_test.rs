use super::*;
use crate::helpers::models::TestModelBuilder;
use crate::helpers::solution::*;

struct TestContext {
    solution: Solution,
    stops: Vec<usize>,
    units: Vec<usize>,
}

/// Creates a solution where `s0` cannot be directly followed by `s1` and `s0` is planned.
fn create_context() -> TestContext {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[1., 2.]);
    let vehicle = builder.add_vehicle("v1");
    let model = builder.model_mut();
    let units =
        stops.iter().map(|&stop| model.new_plan_single_stop(stop).expect("cannot create unit")).collect::<Vec<_>>();
    model.disallow_successors(stops[0], &[stops[1]]).expect("cannot disallow");
    model.add_constraint(create_successor_constraint("successor").expect("cannot create")).expect("cannot add");

    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(vehicle).first().index();
    assert!(plan_after(&mut solution, units[0], stops[0], first));

    TestContext { solution, stops, units }
}

parameterized_test! {can_estimate_disallowed_successor, (is_after, expected), {
    let TestContext { solution, stops, units } = create_context();
    let (first, last) = (solution.vehicle(0).first().index(), solution.vehicle(0).last().index());
    let position = if is_after {
        StopPosition { previous: stops[0], stop: stops[1], next: last }
    } else {
        StopPosition { previous: first, stop: stops[1], next: stops[0] }
    };

    let move_stops = solution.new_move_stops(units[1], vec![position]).expect("cannot create move");

    assert_eq!(move_stops.is_allowed(), expected);
}}

can_estimate_disallowed_successor! {
    case01_after: (true, false),
    case02_before: (false, true),
}

#[test]
fn can_estimate_disallowed_successor_of_moved_stop() {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[1., 2.]);
    builder.add_vehicle("v1");
    let model = builder.model_mut();
    let units =
        stops.iter().map(|&stop| model.new_plan_single_stop(stop).expect("cannot create unit")).collect::<Vec<_>>();
    model.disallow_successors(stops[0], &[stops[1]]).expect("cannot disallow");
    model.add_constraint(create_successor_constraint("successor").expect("cannot create")).expect("cannot add");
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(0).first().index();
    assert!(plan_after(&mut solution, units[1], stops[1], first));

    let position = StopPosition { previous: first, stop: stops[0], next: stops[1] };
    let move_stops = solution.new_move_stops(units[0], vec![position]).expect("cannot create move");

    assert!(!move_stops.is_allowed());
}

#[test]
fn can_reject_disallowed_successor_on_propagation() {
    let TestContext { mut solution, stops, units } = create_context();
    let last = solution.vehicle(0).last().index();
    let position = StopPosition { previous: stops[0], stop: stops[1], next: last };

    let move_stops = solution.new_unchecked_move_stops(units[1], vec![position]).expect("cannot create move");

    assert!(!move_stops.execute(&mut solution).expect("cannot execute"));
    assert_eq!(get_route_ids(&solution, 0), vec!["s0"]);
    assert_solution_consistency(&solution);
}

#[test]
fn can_plan_stop_at_allowed_position() {
    let TestContext { mut solution, units, .. } = create_context();

    let best = solution.best_move(units[1]).expect("cannot find move");

    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert_eq!(get_route_ids(&solution, 0), vec!["s1", "s0"]);
}
