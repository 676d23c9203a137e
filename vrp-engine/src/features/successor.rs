//! A feature to forbid stops to be visited directly after some other stops.

#[cfg(test)]
#[path = "../../tests/unit/features/successor_test.rs"]
mod successor_test;

use super::*;

/// Creates a constraint which enforces successors disallowed with [`Model::disallow_successors`].
pub fn create_successor_constraint(name: &str) -> GenericResult<ModelConstraint> {
    let constraint = Arc::new(SuccessorConstraint);

    ConstraintBuilder::default()
        .with_name(name)
        .with_estimate(constraint.clone())
        .with_stop_check(constraint)
        .with_estimation_cost(EstimationCost::LinearStop)
        .build()
}

struct SuccessorConstraint;

impl ConstraintEstimate for SuccessorConstraint {
    fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint) {
        let state = solution.state.as_ref();

        let is_violated = move_stops.positions().iter().any(|position| {
            state.is_disallowed_successor(position.previous, position.stop)
                || state.is_disallowed_successor(position.stop, position.next)
        });

        (is_violated, StopPositionsHint::none())
    }
}

impl StopViolationCheck for SuccessorConstraint {
    fn does_stop_have_violations(&self, stop: SolutionStop<'_>) -> bool {
        stop.solution().state.is_disallowed_successor(stop.previous(), stop.index())
    }
}
