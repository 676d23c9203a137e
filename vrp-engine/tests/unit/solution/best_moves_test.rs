use super::*;
use crate::features::{create_successor_constraint, create_travel_duration_objective};
use crate::helpers::models::TestModelBuilder;
use crate::helpers::solution::*;
use crate::models::*;
use crate::utils::{DefaultRandom, Environment, TimeQuota};
use std::sync::Arc;

/// A constraint which asks to skip the given vehicle.
struct SkipVehicleConstraint(usize);

impl ConstraintEstimate for SkipVehicleConstraint {
    fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint) {
        if move_stops.vehicle(solution) == Some(self.0) {
            (true, StopPositionsHint::skip_vehicle())
        } else {
            (false, StopPositionsHint::none())
        }
    }
}

fn add_travel_objective(model: &mut Model) {
    model
        .add_objective(create_travel_duration_objective("travel").expect("cannot create objective"), 1.)
        .expect("cannot add objective");
}

fn add_skip_vehicle_constraint(model: &mut Model, vehicle: usize) {
    let constraint = ConstraintBuilder::default()
        .with_name("skip")
        .with_estimate(Arc::new(SkipVehicleConstraint(vehicle)))
        .build()
        .expect("cannot build constraint");
    model.add_constraint(constraint).expect("cannot add constraint");
}

fn get_positions(best: &Move) -> Vec<StopPosition> {
    match best {
        Move::Stops(move_stops) => move_stops.positions().to_vec(),
        _ => unreachable!("expected a move of stops"),
    }
}

#[test]
fn can_find_best_position_of_single_stop() {
    let mut builder = TestModelBuilder::default();
    let [x, s] = [builder.add_stop("x", 5.), builder.add_stop("s", 2.)];
    let vehicle = builder.add_vehicle_between("v1", 0., 0., 10.);
    let model = builder.model_mut();
    let [x_unit, s_unit] = [x, s].map(|stop| model.new_plan_single_stop(stop).expect("cannot create unit"));
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(vehicle).first().index();
    assert!(plan_after(&mut solution, x_unit, x, first));

    let best = solution.best_move(s_unit).expect("cannot find move");

    assert!(best.is_executable());
    assert_eq!(best.plan_unit(), Some(s_unit));
    assert_eq!(best.value(), 0.);
    assert_eq!(get_positions(&best), vec![StopPosition { previous: first, stop: s, next: x }]);
    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert_eq!(get_route_ids(&solution, vehicle), vec!["s", "x"]);
    assert_eq!(solution.score(), 10.);
    assert_solution_consistency(&solution);
}

#[test]
fn can_find_best_vehicle() {
    let mut builder = TestModelBuilder::default();
    let s = builder.add_stop("s", 2.);
    builder.add_vehicle_between("v1", 0., 0., 10.);
    builder.add_vehicle_at("v2", 0., 20.);
    let model = builder.model_mut();
    let unit = model.new_plan_single_stop(s).expect("cannot create unit");
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());

    let best = solution.best_move(unit).expect("cannot find move");

    assert_eq!(best.value(), 0.);
    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert_eq!(solution.stop(s).vehicle(), Some(0));
}

#[test]
fn can_find_best_positions_of_sequence() {
    let mut builder = TestModelBuilder::default();
    let x = builder.add_stop("x", 5.);
    let stops = builder.add_stops(&[3., 1.]);
    let vehicle = builder.add_vehicle_between("v1", 0., 0., 10.);
    let model = builder.model_mut();
    let x_unit = model.new_plan_single_stop(x).expect("cannot create unit");
    let unit = model.new_plan_sequence(&stops).expect("cannot create unit");
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(vehicle).first().index();
    assert!(plan_after(&mut solution, x_unit, x, first));

    let best = solution.vehicle_best_move(vehicle, unit).expect("cannot find move");

    assert_eq!(best.value(), 4.);
    assert_eq!(
        get_positions(&best),
        vec![
            StopPosition { previous: first, stop: stops[0], next: stops[1] },
            StopPosition { previous: stops[0], stop: stops[1], next: x },
        ]
    );
    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert_eq!(get_route_ids(&solution, vehicle), vec!["s0", "s1", "x"]);
    assert_solution_consistency(&solution);
}

#[test]
fn can_fall_back_to_next_position_when_best_is_infeasible() {
    let mut builder = TestModelBuilder::default();
    let [x, y, s] = [builder.add_stop("x", 2.), builder.add_stop("y", 6.), builder.add_stop("s", 4.)];
    let vehicle = builder.add_vehicle_between("v1", 0., 0., 10.);
    let model = builder.model_mut();
    let [x_unit, y_unit, s_unit] = [x, y, s].map(|stop| model.new_plan_single_stop(stop).expect("cannot create unit"));
    model.disallow_successors(x, &[s]).expect("cannot disallow");
    model.add_constraint(create_successor_constraint("successor").expect("cannot create")).expect("cannot add");
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(vehicle).first().index();
    assert!(plan_after(&mut solution, x_unit, x, first));
    assert!(plan_after(&mut solution, y_unit, y, x));

    let best = solution.best_move(s_unit).expect("cannot find move");

    assert!(best.is_executable());
    assert_eq!(best.value(), 4.);
    assert_ne!(get_positions(&best)[0].previous, x);
    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert_solution_consistency(&solution);
}

parameterized_test! {can_skip_vehicle_by_hint, lons, {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(lons);
    builder.add_vehicle("v1");
    builder.add_vehicle_at("v2", 0., 100.);
    let model = builder.model_mut();
    let unit = model.new_plan_sequence(&stops).expect("cannot create unit");
    add_skip_vehicle_constraint(model, 0);
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());

    assert!(!solution.vehicle_best_move(0, unit).expect("cannot find move").is_executable());

    let best = solution.best_move(unit).expect("cannot find move");
    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert!(stops.iter().all(|&stop| solution.stop(stop).vehicle() == Some(1)));
}}

can_skip_vehicle_by_hint! {
    case01_single: &[1.],
    case02_multiple: &[1., 2.],
}

#[test]
fn can_find_best_move_of_one_of() {
    let mut builder = TestModelBuilder::default();
    let [s, t] = [builder.add_stop("s", 2.), builder.add_stop("t", 9.)];
    builder.add_vehicle_between("v1", 0., 0., 5.);
    let model = builder.model_mut();
    let children = [s, t].map(|stop| model.new_plan_single_stop(stop).expect("cannot create unit"));
    let one_of = model.new_plan_one_of(&children).expect("cannot create unit");
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());

    let best = solution.best_move(one_of).expect("cannot find move");

    assert_eq!(best.plan_unit(), Some(children[0]));
    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert!(solution.planned_plan_units().contains(one_of));
    assert!(!solution.best_move(children[1]).expect("cannot find move").is_executable());
    assert!(!solution.best_move(one_of).expect("cannot find move").is_executable());
    assert_solution_consistency(&solution);
}

#[test]
fn can_find_best_move_of_all_without_changing_solution() {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[2., 3.]);
    let vehicle = builder.add_vehicle_between("v1", 0., 0., 10.);
    let model = builder.model_mut();
    let children =
        stops.iter().map(|&stop| model.new_plan_single_stop(stop).expect("cannot create unit")).collect::<Vec<_>>();
    let all = model.new_plan_all(true, &children).expect("cannot create unit");
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());

    let best = solution.best_move(all).expect("cannot find move");

    assert!(best.is_executable());
    assert_eq!(best.plan_unit(), Some(all));
    match &best {
        Move::Units(move_units) => assert_eq!(move_units.moves().len(), 2),
        _ => unreachable!("expected a move of units"),
    }
    assert!(get_route_ids(&solution, vehicle).is_empty());
    assert!(solution.unplanned_plan_units().contains(all));

    assert!(best.execute(&mut solution).expect("cannot execute"));
    assert_eq!(get_route_ids(&solution, vehicle), vec!["s0", "s1"]);
    assert!(solution.planned_plan_units().contains(all));
    assert_solution_consistency(&solution);
}

#[test]
fn can_find_first_move() {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[1., 2., 3.]);
    let vehicle = builder.add_vehicle("v1");
    let model = builder.model_mut();
    let unit = model.new_plan_sequence(&stops).expect("cannot create unit");
    add_travel_objective(model);
    let mut solution = create_test_solution(builder.build());

    let first = solution.vehicle_first_move(vehicle, unit).expect("cannot find move");

    assert!(first.is_executable());
    assert!(first.execute(&mut solution).expect("cannot execute"));
    assert_eq!(get_route_ids(&solution, vehicle), vec!["s0", "s1", "s2"]);
}

#[test]
fn can_return_not_executable_for_planned_unit() {
    let mut builder = TestModelBuilder::default();
    let s = builder.add_stop("s", 1.);
    let vehicle = builder.add_vehicle("v1");
    let unit = builder.model_mut().new_plan_single_stop(s).expect("cannot create unit");
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(vehicle).first().index();
    assert!(plan_after(&mut solution, unit, s, first));

    assert!(!solution.best_move(unit).expect("cannot find move").is_executable());
    assert!(!solution.vehicle_first_move(vehicle, unit).expect("cannot find move").is_executable());
}

#[test]
fn can_stop_search_when_quota_is_reached() {
    let mut builder = TestModelBuilder::default();
    let s = builder.add_stop("s", 1.);
    builder.add_vehicle("v1");
    let unit = builder.model_mut().new_plan_single_stop(s).expect("cannot create unit");
    let environment = Environment::new(
        Arc::new(DefaultRandom::new_repeatable(0)),
        Some(Arc::new(TimeQuota::new(0.))),
        Arc::new(|_: &str| {}),
    );
    let mut solution = Solution::new(Arc::new(builder.build()), Arc::new(environment)).expect("cannot create");

    assert!(solution.is_quota_reached());
    assert!(!solution.best_move(unit).expect("cannot find move").is_executable());
}

#[test]
fn can_select_equal_moves_with_similar_frequency() {
    let mut builder = TestModelBuilder::default();
    let s = builder.add_stop("s", 0.);
    builder.add_vehicle("v1");
    builder.add_vehicle("v2");
    let unit = builder.model_mut().new_plan_single_stop(s).expect("cannot create unit");
    let mut solution = create_test_solution(builder.build());

    let amount = 1000;
    let moves = (0..amount).map(|_| solution.best_move(unit).expect("cannot find move")).collect::<Vec<_>>();
    let on_first = moves
        .iter()
        .filter(|best| matches!(best, Move::Stops(move_stops) if move_stops.vehicle(&solution) == Some(0)))
        .count();

    let ratio = on_first as f64 / amount as f64;
    assert!(ratio > 0.4 && ratio < 0.6, "ratio: {ratio}");
}
