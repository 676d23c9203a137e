use super::*;
use crate::features::{TemporalReference, create_latest_constraint, create_travel_duration_objective};
use crate::helpers::models::{TestModelBuilder, test_environment};
use crate::helpers::solution::*;
use crate::models::expressions::{ConstantExpression, StopExpression};

fn create_model(lons: &[f64]) -> (Model, Vec<usize>) {
    let mut builder = TestModelBuilder::with_process_duration(1.);
    let stops = builder.add_stops(lons);
    builder.add_vehicle("v1");
    let model = builder.model_mut();
    let units = stops.iter().map(|&stop| model.new_plan_single_stop(stop).expect("cannot create unit")).collect();
    model
        .add_objective(create_travel_duration_objective("travel").expect("cannot create objective"), 1.)
        .expect("cannot add objective");

    (builder.build(), units)
}

#[test]
fn can_create_empty_solution() {
    let (model, units) = create_model(&[1., 2.]);
    let solution = create_test_solution(model);

    let vehicle = solution.vehicle(0);

    assert!(vehicle.is_empty());
    assert_eq!(vehicle.first().next(), vehicle.last().index());
    assert_eq!(vehicle.last().position(), 1);
    assert_eq!(solution.unplanned_plan_units().size(), units.len());
    assert!(solution.planned_plan_units().is_empty());
    assert_eq!(solution.score(), 0.);
    assert_solution_consistency(&solution);
}

#[test]
fn can_propagate_timing_after_planning() {
    let (model, units) = create_model(&[1., 3.]);
    let mut solution = create_test_solution(model);
    let (s0, s1) = (get_stop(&solution, "s0"), get_stop(&solution, "s1"));
    let first = solution.vehicle(0).first().index();

    assert!(plan_after(&mut solution, units[0], s0, first));
    assert!(plan_after(&mut solution, units[1], s1, s0));

    let stop = solution.stop(s1);
    assert_eq!(get_route_ids(&solution, 0), vec!["s0", "s1"]);
    assert_eq!((stop.arrival(), stop.start(), stop.end()), (4., 4., 5.));
    assert_eq!(stop.position(), 2);
    assert_eq!(stop.travel_duration(), 2.);
    assert_eq!(solution.vehicle(0).last().arrival(), 8.);
    assert_eq!(solution.vehicle(0).duration(), 9.);
    assert_eq!(solution.score(), 6.);
    assert_eq!(solution.objective_value("travel"), 6.);
    assert_eq!(solution.objective_value("unknown"), 0.);
    assert_eq!(solution.planned_plan_units().size(), 2);
    assert_solution_consistency(&solution);
}

#[test]
fn can_wait_for_earliest_start_and_keep_slack() {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[1.]);
    builder.add_vehicle("v1");
    let model = builder.model_mut();
    let unit = model.new_plan_single_stop(stops[0]).expect("cannot create unit");
    model.set_stop_earliest_start(stops[0], 5.).expect("cannot set earliest start");
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(0).first().index();

    assert!(plan_after(&mut solution, unit, stops[0], first));

    let stop = solution.stop(stops[0]);
    assert_eq!((stop.arrival(), stop.start()), (1., 5.));
    assert_eq!(stop.slack(), 4.);
    assert_eq!(solution.vehicle(0).last().arrival(), 6.);
    assert_eq!(solution.vehicle(0).last().slack(), 0.);
}

#[test]
fn can_keep_propagation_idempotent() {
    let (model, units) = create_model(&[1., 2., 3.]);
    let mut solution = create_test_solution(model);
    let first = solution.vehicle(0).first().index();
    let s2 = get_stop(&solution, "s2");
    assert!(plan_after(&mut solution, units[2], s2, first));

    let slots = solution.slots.clone();
    let values = solution.cumulative_values.clone();
    let score = solution.score();

    assert_eq!(solution.propagate(first, true).ok(), Some(None));
    assert_eq!(solution.propagate(first, true).ok(), Some(None));

    assert_eq!(solution.slots, slots);
    assert_eq!(solution.cumulative_values, values);
    assert_eq!(solution.score(), score);
}

#[test]
fn can_maintain_expression_values() {
    let mut builder = TestModelBuilder::default();
    let stops = builder.add_stops(&[1., 2.]);
    builder.add_vehicle("v1");
    let model = builder.model_mut();
    let units =
        stops.iter().map(|&stop| model.new_plan_single_stop(stop).expect("cannot create unit")).collect::<Vec<_>>();
    let demand = model.add_expression(Arc::new(ConstantExpression::new("demand", 2.))).expect("cannot add expression");
    let mut solution = create_test_solution(builder.build());
    let first = solution.vehicle(0).first().index();

    assert!(plan_after(&mut solution, units[0], stops[0], first));
    assert!(plan_after(&mut solution, units[1], stops[1], stops[0]));

    assert_eq!(solution.stop(first).cumulative_value(demand), 2.);
    assert_eq!(solution.stop(stops[1]).value(demand), 2.);
    assert_eq!(solution.stop(stops[1]).cumulative_value(demand), 6.);
    assert_eq!(solution.vehicle(0).last().cumulative_value(demand), 8.);
}

#[test]
fn can_reset_stop_state_on_detach() {
    let (model, units) = create_model(&[1.]);
    let mut solution = create_test_solution(model);
    let first = solution.vehicle(0).first().index();
    let s0 = get_stop(&solution, "s0");
    assert!(plan_after(&mut solution, units[0], s0, first));

    solution.detach(s0);

    let stop = solution.stop(s0);
    assert!(!stop.is_planned());
    assert_eq!((stop.previous(), stop.next(), stop.vehicle()), (s0, s0, None));
    assert_eq!(stop.cumulative_travel_duration(), 0.);
    assert_eq!(solution.stop(first).next(), solution.vehicle(0).last().index());
}

#[test]
fn can_reject_attaching_planned_stop() {
    let (model, units) = create_model(&[1.]);
    let mut solution = create_test_solution(model);
    let vehicle = solution.vehicle(0);
    let (first, last) = (vehicle.first().index(), vehicle.last().index());
    let s0 = get_stop(&solution, "s0");
    assert!(plan_after(&mut solution, units[0], s0, first));

    assert!(solution.attach_positions(&[StopPosition { previous: first, stop: s0, next: last }]).is_err());
    assert!(solution.attach_positions(&[]).is_err());
}

#[test]
fn can_copy_solution_independently() {
    let (model, units) = create_model(&[1., 2.]);
    let mut original = create_test_solution(model);
    let first = original.vehicle(0).first().index();
    let s0 = get_stop(&original, "s0");
    assert!(plan_after(&mut original, units[0], s0, first));

    let mut copy = original.copy();
    let s1 = get_stop(&copy, "s1");
    assert!(plan_after(&mut copy, units[1], s1, s0));

    assert_eq!(get_route_ids(&original, 0), vec!["s0"]);
    assert_eq!(get_route_ids(&copy, 0), vec!["s0", "s1"]);
    assert!(original.unplanned_plan_units().contains(units[1]));
    assert!(copy.planned_plan_units().contains(units[1]));
    assert!(Arc::ptr_eq(original.model(), copy.model()));
    assert_solution_consistency(&original);
    assert_solution_consistency(&copy);
}

#[test]
fn can_iterate_vehicle_stops_and_views() {
    let (model, units) = create_model(&[1., 2.]);
    let mut solution = create_test_solution(model);
    let first = solution.vehicle(0).first().index();
    let s0 = get_stop(&solution, "s0");
    assert!(plan_after(&mut solution, units[0], s0, first));

    let vehicle = solution.vehicle(0);
    let stop = solution.stop(s0);

    assert_eq!(vehicle.stop_indices(), vec![first, s0, vehicle.last().index()]);
    assert_eq!(vehicle.number_of_stops(), 1);
    assert_eq!(solution.vehicles().count(), 1);
    assert_eq!(stop.previous_stop(), vehicle.first());
    assert_eq!(stop.solution_vehicle().map(|vehicle| vehicle.index()), Some(0));
    assert_eq!(stop.plan_unit(), Some(units[0]));
    assert!(vehicle.first().is_first() && vehicle.first().is_fixed());
    assert!(vehicle.last().is_last() && !stop.is_last());
}

#[test]
fn can_fail_solution_when_empty_vehicle_is_infeasible() {
    let mut builder = TestModelBuilder::default();
    builder.add_vehicle_at("v1", 10., 10.);
    let model = builder.model_mut();
    let latest = Arc::new(StopExpression::new("latest", 0.));
    let constraint =
        create_latest_constraint("latest", TemporalReference::Arrival, latest).expect("cannot create constraint");
    model.add_constraint(constraint).expect("cannot add constraint");

    let result = Solution::new(Arc::new(builder.build()), test_environment());

    assert!(result.is_err_and(|err| err.message().contains("failed creating new vehicle `v1`")));
}
