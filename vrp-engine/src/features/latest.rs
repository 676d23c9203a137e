//! A feature to penalize or forbid late visits of stops.

#[cfg(test)]
#[path = "../../tests/unit/features/latest_test.rs"]
mod latest_test;

use super::*;
use crate::models::common::Timestamp;
use crate::models::expressions::StopExpression;
use crate::utils::compare_floats;
use std::cmp::Ordering;
use std::ops::ControlFlow;

/// Specifies which time of a stop visit is compared against its latest time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemporalReference {
    /// Arrival at the stop.
    Arrival,
    /// Start of the stop service.
    Start,
    /// End of the stop service.
    End,
}

/// Creates a temporal constraint which forbids the reference time of a stop to exceed its latest
/// time defined by `latest`.
pub fn create_latest_constraint(
    name: &str,
    reference: TemporalReference,
    latest: Arc<StopExpression>,
) -> GenericResult<ModelConstraint> {
    let latest = Arc::new(Latest { name: name.to_string(), reference, latest, factor: None });

    ConstraintBuilder::default()
        .with_name(name)
        .with_estimate(latest.clone())
        .with_stop_check(latest)
        .with_temporal(true)
        .with_estimation_cost(EstimationCost::LinearStop)
        .build()
}

/// Creates an objective which minimizes lateness: the amount of time the reference time exceeds
/// the latest time of a stop, multiplied by a per stop `factor`.
pub fn create_latest_objective(
    name: &str,
    reference: TemporalReference,
    latest: Arc<StopExpression>,
    factor: Arc<StopExpression>,
) -> GenericResult<ModelObjective> {
    let latest = Arc::new(Latest { name: name.to_string(), reference, latest, factor: Some(factor) });

    ObjectiveBuilder::default()
        .with_name(name)
        .with_function(latest.clone())
        .with_stop_data(latest.clone())
        .with_solution_data(latest)
        .build()
}

struct Latest {
    name: String,
    reference: TemporalReference,
    latest: Arc<StopExpression>,
    factor: Option<Arc<StopExpression>>,
}

impl Latest {
    fn reference_time(&self, arrival: Timestamp, start: Timestamp, end: Timestamp) -> Timestamp {
        match self.reference {
            TemporalReference::Arrival => arrival,
            TemporalReference::Start => start,
            TemporalReference::End => end,
        }
    }

    fn lateness(&self, stop: usize, reference: Timestamp) -> f64 {
        let factor = self.factor.as_ref().map_or(1., |factor| factor.stop_value(stop));
        (reference - self.latest.stop_value(stop)).max(0.) * factor
    }

    fn cumulative_lateness(&self, stop: SolutionStop<'_>) -> f64 {
        stop.objective_data::<f64>(self.name.as_str()).copied().unwrap_or_default()
    }

    /// Walks the route as it would look like after the move and calls `visitor` with every stop
    /// and its new reference time. Stops once the times are not changed anymore.
    fn walk_move<'a>(
        &self,
        move_stops: &'a MoveStops,
        solution: &'a Solution,
        mut visitor: impl FnMut(SolutionStop<'a>, Timestamp) -> ControlFlow<()>,
    ) {
        let Some(vehicle) = move_stops.vehicle(solution) else { return };
        let vehicle_type = solution.model().vehicle_type_of(vehicle);

        let mut stops = move_stops.stops(solution, false, true);
        let Some(start) = stops.next() else { return };

        let (mut from, mut departure) = (start.model_stop(), start.end());

        for stop in stops {
            let (_, arrival, start, end) = vehicle_type.temporal_values(departure, from, stop.model_stop());

            if visitor(stop, self.reference_time(arrival, start, end)).is_break() {
                return;
            }

            if stop.is_planned() && compare_floats(end, stop.end()) == Ordering::Equal {
                return;
            }

            from = stop.model_stop();
            departure = end;
        }
    }
}

impl ConstraintEstimate for Latest {
    fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint) {
        let mut is_violated = false;

        self.walk_move(move_stops, solution, |stop, reference| {
            is_violated = reference > self.latest.stop_value(stop.index());
            if is_violated { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });

        (is_violated, StopPositionsHint::none())
    }
}

impl StopViolationCheck for Latest {
    fn does_stop_have_violations(&self, stop: SolutionStop<'_>) -> bool {
        self.reference_time(stop.arrival(), stop.start(), stop.end()) > self.latest.stop_value(stop.index())
    }
}

impl StopDataUpdater for Latest {
    fn update_stop_data(&self, stop: SolutionStop<'_>) -> GenericResult<Option<StopData>> {
        let lateness = if stop.is_first() {
            0.
        } else {
            let reference = self.reference_time(stop.arrival(), stop.start(), stop.end());
            self.cumulative_lateness(stop.previous_stop()) + self.lateness(stop.index(), reference)
        };

        Ok(Some(Arc::new(lateness)))
    }
}

impl SolutionDataUpdater for Latest {
    fn update_solution_data(&self, solution: &Solution) -> GenericResult<Option<StopData>> {
        let total = solution.vehicles().map(|vehicle| self.cumulative_lateness(vehicle.last())).sum::<f64>();

        Ok(Some(Arc::new(total)))
    }
}

impl ObjectiveFunction for Latest {
    fn estimate_delta_value(&self, move_stops: &MoveStops, solution: &Solution) -> f64 {
        let Some(previous) = move_stops.previous() else { return 0. };
        let previous = solution.stop(previous);
        let Some(last) = previous.solution_vehicle().map(|vehicle| vehicle.last()) else { return 0. };

        let mut lateness = self.cumulative_lateness(previous);
        let mut tail = self.cumulative_lateness(last) - self.cumulative_lateness(previous);

        self.walk_move(move_stops, solution, |stop, reference| {
            lateness += self.lateness(stop.index(), reference);
            // lateness of stops after a planned one is known already
            tail = if stop.is_planned() {
                self.cumulative_lateness(last) - self.cumulative_lateness(stop)
            } else {
                tail
            };
            ControlFlow::Continue(())
        });

        lateness + tail - self.cumulative_lateness(last)
    }

    fn value(&self, solution: &Solution) -> f64 {
        solution.objective_data::<f64>(self.name.as_str()).copied().unwrap_or_default()
    }
}
