//! A feature to minimize total travel duration.

#[cfg(test)]
#[path = "../../tests/unit/features/travel_duration_test.rs"]
mod travel_duration_test;

use super::*;

/// Creates an objective which minimizes the sum of travel durations of all vehicles.
pub fn create_travel_duration_objective(name: &str) -> GenericResult<ModelObjective> {
    ObjectiveBuilder::default().with_name(name).with_function(Arc::new(TravelDurationObjective)).build()
}

struct TravelDurationObjective;

impl ObjectiveFunction for TravelDurationObjective {
    fn estimate_delta_value(&self, move_stops: &MoveStops, solution: &Solution) -> f64 {
        let (Some(vehicle), Some(previous), Some(next)) =
            (move_stops.vehicle(solution), move_stops.previous(), move_stops.next())
        else {
            return 0.;
        };
        let vehicle_type = solution.model().vehicle_type_of(vehicle);

        let (travel, _) = move_stops.stops(solution, false, false).fold((0., None::<&ModelStop>), |(acc, from), stop| {
            let to = stop.model_stop();
            (acc + from.map_or(0., |from| vehicle_type.travel_duration_value(from, to)), Some(to))
        });

        let current =
            solution.stop(next).cumulative_travel_duration() - solution.stop(previous).cumulative_travel_duration();

        travel - current
    }

    fn value(&self, solution: &Solution) -> f64 {
        solution.vehicles().map(|vehicle| vehicle.last().cumulative_travel_duration()).sum()
    }
}
