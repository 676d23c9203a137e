#[cfg(test)]
#[path = "../../tests/unit/solution/positions_test.rs"]
mod positions_test;

use crate::solution::Solution;
use crate::utils::GenericResult;

/// Describes a placement of an unplanned `stop` between `previous` and `next`. Either neighbour
/// may be another unplanned stop of the same move, which chains placements together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StopPosition {
    /// Stop index of the previous stop.
    pub previous: usize,
    /// Stop index of the placed stop.
    pub stop: usize,
    /// Stop index of the next stop.
    pub next: usize,
}

impl StopPosition {
    /// Creates a validated stop position.
    pub fn new(solution: &Solution, previous: usize, stop: usize, next: usize) -> GenericResult<Self> {
        let size = solution.model().stops().len();
        if [previous, stop, next].iter().any(|&idx| idx >= size) {
            return Err(format!("stop position ({previous}, {stop}, {next}) references unknown stop").into());
        }

        let (previous_stop, placed, next_stop) = (solution.stop(previous), solution.stop(stop), solution.stop(next));

        if placed.is_planned() {
            return Err(format!("stop `{}` is already planned", placed.model_stop().id()).into());
        }

        if previous_stop.is_planned() && next_stop.is_planned() {
            if previous_stop.vehicle() != next_stop.vehicle() {
                return Err(format!(
                    "stops `{}` and `{}` are not on the same vehicle",
                    previous_stop.model_stop().id(),
                    next_stop.model_stop().id()
                )
                .into());
            }

            if previous_stop.next() != next || previous_stop.position() >= next_stop.position() {
                return Err(format!(
                    "stops `{}` and `{}` are not adjacent",
                    previous_stop.model_stop().id(),
                    next_stop.model_stop().id()
                )
                .into());
            }
        }

        Ok(Self { previous, stop, next })
    }
}
