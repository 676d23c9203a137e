#[cfg(test)]
#[path = "../../tests/unit/solution/generators_test.rs"]
mod generators_test;

use crate::solution::*;
use std::ops::ControlFlow;
use tinyvec::TinyVec;

/// Gap indices of placed stops.
pub(crate) type Combination = TinyVec<[usize; 8]>;

/// Yields all non-decreasing sequences of `n` numbers taken from `1..=m` into `combination`.
/// A sequence `[l1, .., ln]` encodes a placement of `n` stops where the i-th stop is inserted
/// before the `li`-th stop of a route.
pub(crate) fn combine_ascending(
    combination: &mut Combination,
    n: usize,
    m: usize,
    consumer: &mut dyn FnMut(&[usize]) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if combination.len() == n {
        return consumer(combination.as_slice());
    }

    let start = combination.last().map_or(0, |&last| last - 1);
    for i in start..m {
        combination.push(i + 1);
        let flow = combine_ascending(combination, n, m, consumer);
        combination.pop();
        flow?;
    }

    ControlFlow::Continue(())
}

/// Generates candidate moves which place `stops` of the plan unit, in the given order, into the
/// route of the vehicle. The same move instance is updated in place between candidates, so the
/// consumer has to clone it to keep it.
pub(crate) fn generate_moves(
    solution: &Solution,
    vehicle: usize,
    plan_unit: usize,
    stops: &[usize],
    consumer: &mut dyn FnMut(&MoveStops) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if stops.is_empty() {
        return ControlFlow::Continue(());
    }

    let target = solution.vehicle(vehicle).stop_indices();
    let positions = stops.iter().map(|&stop| StopPosition { previous: stop, stop, next: stop }).collect();
    let mut move_stops = MoveStops::new(plan_unit, positions);
    let mut combination = Combination::default();

    if solution.state.has_disallowed_successors() || solution.state.has_direct_successors() {
        return generate_pruned(solution, &target, &mut combination, &mut move_stops, consumer);
    }

    combine_ascending(&mut combination, stops.len(), target.len() - 1, &mut |locations| {
        for (idx, &location) in locations.iter().enumerate() {
            let position = &mut move_stops.positions[idx];
            position.previous = target[location - 1];
            position.next = target[location];

            if idx > 0 && locations[idx - 1] == location {
                position.previous = stops[idx - 1];
            }
            if locations.get(idx + 1) == Some(&location) {
                position.next = stops[idx + 1];
            }
        }

        consumer(&move_stops)
    })
}

/// Same as [`combine_ascending`], but builds positions while descending and skips branches which
/// place stops after a disallowed predecessor or split stops joined by a direct arc.
fn generate_pruned(
    solution: &Solution,
    target: &[usize],
    combination: &mut Combination,
    move_stops: &mut MoveStops,
    consumer: &mut dyn FnMut(&MoveStops) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let depth = combination.len();
    if depth == move_stops.positions.len() {
        let positions = move_stops.positions();
        if positions.last().is_some_and(|last| is_disallowed(solution, last.stop, last.next)) {
            return ControlFlow::Continue(());
        }

        return consumer(move_stops);
    }

    let start = combination.last().map_or(0, |&last| last - 1);
    for i in start..target.len() - 1 {
        if i > 0 && must_be_neighbours(solution, target[i], target[i + 1]) {
            continue;
        }

        combination.push(i + 1);

        let positions = &mut move_stops.positions;
        positions[depth].previous = target[i];
        positions[depth].next = target[i + 1];

        if depth > 0 {
            let is_same_gap = combination[depth] == combination[depth - 1];

            if is_same_gap {
                positions[depth].previous = positions[depth - 1].stop;
                positions[depth - 1].next = positions[depth].stop;
            } else {
                positions[depth - 1].next = target[combination[depth - 1]];

                // all following gaps split the pair as well
                if must_be_neighbours(solution, positions[depth - 1].stop, positions[depth].stop) {
                    combination.pop();
                    break;
                }
            }

            if is_disallowed(solution, positions[depth - 1].stop, positions[depth - 1].next) {
                combination.pop();
                if is_same_gap {
                    continue;
                }
                break;
            }
        }

        if is_disallowed(solution, positions[depth].previous, positions[depth].stop) {
            combination.pop();
            continue;
        }

        let flow = generate_pruned(solution, target, combination, move_stops, consumer);
        combination.pop();
        flow?;
    }

    ControlFlow::Continue(())
}

fn must_be_neighbours(solution: &Solution, from: usize, to: usize) -> bool {
    solution.state.has_direct_successors()
        && solution
            .model
            .stop(from)
            .plan_unit()
            .and_then(|unit| solution.model.plan_unit(unit).as_stops())
            .is_some_and(|unit| unit.dag().has_direct_arc(from, to))
}

fn is_disallowed(solution: &Solution, from: usize, to: usize) -> bool {
    solution.state.is_disallowed_successor(from, to)
}

/// Iterates over stops of a route as it would look like after executing a move, without
/// modifying the solution.
pub struct MoveStopsGenerator<'a> {
    solution: &'a Solution,
    positions: &'a [StopPosition],
    current: Option<usize>,
    end: usize,
}

impl<'a> MoveStopsGenerator<'a> {
    /// Creates a new generator. By default it walks from the stop before the first inserted stop
    /// to the stop after the last inserted one, `start_at_first` and `end_at_last` extend the walk
    /// to the vehicle anchors.
    pub fn new(solution: &'a Solution, move_stops: &'a MoveStops, start_at_first: bool, end_at_last: bool) -> Self {
        let positions = move_stops.positions();

        let (Some(first), Some(last)) = (positions.first(), positions.last()) else {
            return Self { solution, positions, current: None, end: 0 };
        };

        let vehicle = solution.stop(first.previous).solution_vehicle();
        let start = match vehicle {
            Some(vehicle) if start_at_first => vehicle.first().index(),
            _ => first.previous,
        };
        let end = match vehicle {
            Some(vehicle) if end_at_last => vehicle.last().index(),
            _ => last.next,
        };

        Self { solution, positions, current: Some(start), end }
    }

    fn successor(&self, stop: usize) -> usize {
        if let Some(position) = self.positions.iter().find(|position| position.stop == stop) {
            return position.next;
        }

        if let Some(position) = self.positions.iter().find(|position| position.previous == stop) {
            return position.stop;
        }

        self.solution.stop(stop).next()
    }
}

impl<'a> Iterator for MoveStopsGenerator<'a> {
    type Item = SolutionStop<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        let successor = self.successor(current);
        self.current = (current != self.end && successor != current).then_some(successor);

        Some(self.solution.stop(current))
    }
}
