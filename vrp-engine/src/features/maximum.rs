//! A feature to limit a cumulative value of an expression along a route.

#[cfg(test)]
#[path = "../../tests/unit/features/maximum_test.rs"]
mod maximum_test;

use super::*;

/// A function which returns a limit for the given vehicle type.
pub type VehicleTypeLimitFn = Arc<dyn Fn(&ModelVehicleType) -> f64 + Send + Sync>;

/// Creates a constraint which keeps a cumulative value of the registered expression with index
/// `expression` within `[0, maximum]` at every stop of a route.
pub fn create_maximum_constraint(
    name: &str,
    expression: usize,
    maximum: VehicleTypeLimitFn,
) -> GenericResult<ModelConstraint> {
    let constraint = Arc::new(MaximumConstraint { expression, maximum });

    ConstraintBuilder::default()
        .with_name(name)
        .with_estimate(constraint.clone())
        .with_stop_check(constraint)
        .with_estimation_cost(EstimationCost::LinearStop)
        .build()
}

struct MaximumConstraint {
    expression: usize,
    maximum: VehicleTypeLimitFn,
}

impl MaximumConstraint {
    fn is_out_of_range(level: f64, maximum: f64) -> bool {
        level < 0. || level > maximum
    }
}

impl ConstraintEstimate for MaximumConstraint {
    fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint) {
        let Some(vehicle) = move_stops.vehicle(solution) else { return (false, StopPositionsHint::none()) };

        let model = solution.model();
        let Some(expression) = model.expressions().get(self.expression) else {
            return (false, StopPositionsHint::none());
        };
        let vehicle_type = model.vehicle_type_of(vehicle);
        let maximum = (self.maximum)(vehicle_type);

        if expression.as_constant().is_some_and(|value| Self::is_out_of_range(value, maximum)) {
            return (true, StopPositionsHint::skip_vehicle());
        }

        let mut stops = move_stops.stops(solution, false, false);
        let Some(start) = stops.next() else { return (false, StopPositionsHint::none()) };

        let mut level = start.cumulative_value(self.expression);
        let mut from = start.model_stop();
        let mut end = start;

        for stop in stops {
            level += expression.value(vehicle_type, from, stop.model_stop());
            if Self::is_out_of_range(level, maximum) {
                return (true, StopPositionsHint::none());
            }

            from = stop.model_stop();
            end = stop;
        }

        // stops after the move are shifted by the same delta
        let delta = level - end.cumulative_value(self.expression);
        if delta == 0. {
            return (false, StopPositionsHint::none());
        }

        let mut stop = end;
        while !stop.is_last() {
            stop = stop.next_stop();
            if Self::is_out_of_range(stop.cumulative_value(self.expression) + delta, maximum) {
                return (true, StopPositionsHint::none());
            }
        }

        (false, StopPositionsHint::none())
    }
}

impl StopViolationCheck for MaximumConstraint {
    fn does_stop_have_violations(&self, stop: SolutionStop<'_>) -> bool {
        let Some(vehicle) = stop.vehicle() else { return false };
        let maximum = (self.maximum)(stop.solution().model().vehicle_type_of(vehicle));

        Self::is_out_of_range(stop.cumulative_value(self.expression), maximum)
    }
}
