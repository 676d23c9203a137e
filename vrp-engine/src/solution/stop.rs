use crate::models::ModelStop;
use crate::models::common::{Duration, Timestamp};
use crate::solution::{Solution, SolutionVehicle};

/// A read-only view on a stop of a solution.
#[derive(Clone, Copy)]
pub struct SolutionStop<'a> {
    solution: &'a Solution,
    index: usize,
}

impl<'a> SolutionStop<'a> {
    pub(crate) fn new(solution: &'a Solution, index: usize) -> Self {
        Self { solution, index }
    }

    /// Returns stop index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the solution the stop belongs to.
    pub fn solution(&self) -> &'a Solution {
        self.solution
    }

    /// Returns the model stop.
    pub fn model_stop(&self) -> &'a ModelStop {
        self.solution.model.stop(self.index)
    }

    /// Returns index of the plan unit of the stop.
    pub fn plan_unit(&self) -> Option<usize> {
        self.model_stop().plan_unit()
    }

    /// Returns index of the previous stop. An unplanned stop, and the first stop of a vehicle,
    /// return themselves.
    pub fn previous(&self) -> usize {
        self.solution.slots[self.index].previous
    }

    /// Returns index of the next stop. An unplanned stop, and the last stop of a vehicle, return
    /// themselves.
    pub fn next(&self) -> usize {
        self.solution.slots[self.index].next
    }

    /// Returns a view on the previous stop.
    pub fn previous_stop(&self) -> SolutionStop<'a> {
        Self::new(self.solution, self.previous())
    }

    /// Returns a view on the next stop.
    pub fn next_stop(&self) -> SolutionStop<'a> {
        Self::new(self.solution, self.next())
    }

    /// Returns true if the stop is on a route.
    pub fn is_planned(&self) -> bool {
        let slot = &self.solution.slots[self.index];
        slot.next != slot.previous
    }

    /// Returns true if the stop is the first stop of a vehicle.
    pub fn is_first(&self) -> bool {
        self.is_planned() && self.previous() == self.index
    }

    /// Returns true if the stop is the last stop of a vehicle.
    pub fn is_last(&self) -> bool {
        self.is_planned() && self.next() == self.index
    }

    /// Returns true if the stop cannot be moved.
    pub fn is_fixed(&self) -> bool {
        self.model_stop().is_fixed()
    }

    /// Returns index of the vehicle the stop is planned on.
    pub fn vehicle(&self) -> Option<usize> {
        self.solution.slots[self.index].vehicle
    }

    /// Returns a view on the vehicle the stop is planned on.
    pub fn solution_vehicle(&self) -> Option<SolutionVehicle<'a>> {
        self.vehicle().map(|vehicle| self.solution.vehicle(vehicle))
    }

    /// Returns a position of the stop in its route, the first stop has position zero.
    pub fn position(&self) -> usize {
        self.solution.slots[self.index].position
    }

    /// Returns arrival time.
    pub fn arrival(&self) -> Timestamp {
        self.solution.slots[self.index].arrival
    }

    /// Returns service start time.
    pub fn start(&self) -> Timestamp {
        self.solution.slots[self.index].start
    }

    /// Returns service end time.
    pub fn end(&self) -> Timestamp {
        self.solution.slots[self.index].end
    }

    /// Returns time the start can be delayed without delaying the end of the route.
    pub fn slack(&self) -> Duration {
        self.solution.slots[self.index].slack
    }

    /// Returns travel duration from the previous stop.
    pub fn travel_duration(&self) -> Duration {
        if !self.is_planned() || self.is_first() {
            return 0.;
        }

        self.cumulative_travel_duration() - self.previous_stop().cumulative_travel_duration()
    }

    /// Returns travel duration from the start of the route.
    pub fn cumulative_travel_duration(&self) -> Duration {
        if !self.is_planned() {
            return 0.;
        }

        self.solution.slots[self.index].cumulative_travel_duration
    }

    /// Returns a value of the registered expression for the leg ending at this stop.
    pub fn value(&self, expression: usize) -> f64 {
        self.solution.values[expression][self.index]
    }

    /// Returns a cumulative value of the registered expression from the start of the route.
    pub fn cumulative_value(&self, expression: usize) -> f64 {
        self.solution.cumulative_values[expression][self.index]
    }

    /// Returns stop data of the constraint with the given name.
    pub fn constraint_data<T: 'static>(&self, name: &str) -> Option<&'a T> {
        let slot = *self.solution.state.constraint_stop_data_keys.get(name)?;
        self.solution.constraint_stop_data[slot][self.index].as_ref()?.downcast_ref::<T>()
    }

    /// Returns stop data of the objective with the given name.
    pub fn objective_data<T: 'static>(&self, name: &str) -> Option<&'a T> {
        let slot = *self.solution.state.objective_stop_data_keys.get(name)?;
        self.solution.objective_stop_data[slot][self.index].as_ref()?.downcast_ref::<T>()
    }
}

impl PartialEq for SolutionStop<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.solution, other.solution)
    }
}

impl std::fmt::Debug for SolutionStop<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolutionStop")
            .field("id", &self.model_stop().id())
            .field("previous", &self.previous())
            .field("next", &self.next())
            .field("vehicle", &self.vehicle())
            .finish()
    }
}
