use crate::models::ModelVehicle;
use crate::models::common::{Duration, Timestamp};
use crate::solution::{Solution, SolutionStop};

/// A read-only view on a vehicle of a solution.
#[derive(Clone, Copy)]
pub struct SolutionVehicle<'a> {
    solution: &'a Solution,
    index: usize,
}

impl<'a> SolutionVehicle<'a> {
    pub(crate) fn new(solution: &'a Solution, index: usize) -> Self {
        Self { solution, index }
    }

    /// Returns vehicle index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the model vehicle.
    pub fn model_vehicle(&self) -> &'a ModelVehicle {
        self.solution.model.vehicle(self.index)
    }

    /// Returns the first stop.
    pub fn first(&self) -> SolutionStop<'a> {
        self.solution.stop(self.model_vehicle().first())
    }

    /// Returns the last stop.
    pub fn last(&self) -> SolutionStop<'a> {
        self.solution.stop(self.model_vehicle().last())
    }

    /// Returns amount of stops between the anchors.
    pub fn number_of_stops(&self) -> usize {
        self.last().position() - 1
    }

    /// Returns true if there are no stops between the anchors.
    pub fn is_empty(&self) -> bool {
        self.number_of_stops() == 0
    }

    /// Iterates over stops in route order, anchors included.
    pub fn stops(self) -> impl Iterator<Item = SolutionStop<'a>> + 'a {
        let solution = self.solution;
        std::iter::successors(Some(self.first()), move |stop| {
            (!stop.is_last()).then(|| solution.stop(stop.next()))
        })
    }

    /// Returns stop indices in route order, anchors included.
    pub fn stop_indices(&self) -> Vec<usize> {
        self.stops().map(|stop| stop.index()).collect()
    }

    /// Returns departure time from the first stop.
    pub fn start(&self) -> Timestamp {
        self.first().start()
    }

    /// Returns end time at the last stop.
    pub fn end(&self) -> Timestamp {
        self.last().end()
    }

    /// Returns the route duration.
    pub fn duration(&self) -> Duration {
        self.end() - self.start()
    }
}

impl std::fmt::Debug for SolutionVehicle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids = self.stops().map(|stop| stop.model_stop().id().to_string()).collect::<Vec<_>>();
        f.debug_struct("SolutionVehicle").field("id", &self.model_vehicle().id()).field("stops", &ids).finish()
    }
}
