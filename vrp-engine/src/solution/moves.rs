#[cfg(test)]
#[path = "../../tests/unit/solution/moves_test.rs"]
mod moves_test;

use crate::solution::*;
use crate::utils::{GenericResult, Random};

/// A move which plans all stops of a stops plan unit at the given positions.
#[derive(Clone, Debug)]
pub struct MoveStops {
    pub(crate) plan_unit: usize,
    pub(crate) positions: Vec<StopPosition>,
    pub(crate) value: f64,
    pub(crate) value_seen: usize,
    pub(crate) allowed: bool,
}

impl MoveStops {
    pub(crate) fn new(plan_unit: usize, positions: Vec<StopPosition>) -> Self {
        Self { plan_unit, positions, value: 0., value_seen: 1, allowed: false }
    }

    /// Returns index of the plan unit.
    pub fn plan_unit(&self) -> usize {
        self.plan_unit
    }

    /// Returns stop positions ordered as the stops would appear on the route.
    pub fn positions(&self) -> &[StopPosition] {
        self.positions.as_slice()
    }

    /// Returns estimated change of the score.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns how many equally valued moves were seen when this one was selected.
    pub fn value_seen(&self) -> usize {
        self.value_seen
    }

    /// Returns true if the move passed constraint estimates.
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Returns true if the move can be executed.
    pub fn is_executable(&self) -> bool {
        self.allowed && !self.positions.is_empty()
    }

    /// Returns the planned stop the first stop is placed after.
    pub fn previous(&self) -> Option<usize> {
        self.positions.first().map(|position| position.previous)
    }

    /// Returns the planned stop the last stop is placed before.
    pub fn next(&self) -> Option<usize> {
        self.positions.last().map(|position| position.next)
    }

    /// Returns the vehicle the move plans on.
    pub fn vehicle(&self, solution: &Solution) -> Option<usize> {
        self.previous().and_then(|previous| solution.stop(previous).vehicle())
    }

    /// Returns an iterator over stops of the route as it would look like after the move.
    pub fn stops<'a>(
        &'a self,
        solution: &'a Solution,
        start_at_first: bool,
        end_at_last: bool,
    ) -> MoveStopsGenerator<'a> {
        MoveStopsGenerator::new(solution, self, start_at_first, end_at_last)
    }

    /// Executes the move. Returns false, leaving the solution unchanged, if the plan unit cannot
    /// be planned or planning it violates a constraint.
    pub fn execute(&self, solution: &mut Solution) -> GenericResult<bool> {
        if !self.is_executable() || !solution.is_plan_unit_plannable(self.plan_unit) {
            return Ok(false);
        }

        // neighbours might have been changed since the move was created
        if solution.validate_positions(self.plan_unit, &self.positions).is_err() {
            return Ok(false);
        }

        let start = solution.attach_positions(&self.positions)?;
        solution.sync_root(self.plan_unit);

        if solution.propagate(start, true)?.is_none() {
            return Ok(true);
        }

        self.positions.iter().for_each(|position| solution.detach(position.stop));
        solution.sync_root(self.plan_unit);

        if let Some(violation) = solution.propagate(start, true)? {
            return Err(format!(
                "undoing failed move of plan unit {} failed: constraint `{}` is violated",
                self.plan_unit,
                solution.model.constraints()[violation.constraint].name()
            )
            .into());
        }

        Ok(false)
    }
}

/// A move which plans all children of a composite plan unit.
#[derive(Clone, Debug)]
pub struct MoveUnits {
    pub(crate) plan_unit: usize,
    pub(crate) moves: Vec<Move>,
    pub(crate) value: f64,
    pub(crate) value_seen: usize,
}

impl MoveUnits {
    pub(crate) fn new(plan_unit: usize, moves: Vec<Move>) -> Self {
        let value = moves.iter().map(|m| m.value()).sum();
        Self { plan_unit, moves, value, value_seen: 1 }
    }

    /// Returns index of the plan unit.
    pub fn plan_unit(&self) -> usize {
        self.plan_unit
    }

    /// Returns moves of children.
    pub fn moves(&self) -> &[Move] {
        self.moves.as_slice()
    }

    /// Returns estimated change of the score: a sum of children moves values.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Executes children moves in order. If one fails, already planned children are unplanned.
    pub fn execute(&self, solution: &mut Solution) -> GenericResult<bool> {
        if self.moves.is_empty() || !solution.is_plan_unit_plannable(self.plan_unit) {
            return Ok(false);
        }

        for (idx, child) in self.moves.iter().enumerate() {
            if child.execute(solution)? {
                continue;
            }

            revert_moves(solution, &self.moves[..idx])?;
            solution.sync_root(self.plan_unit);

            return Ok(false);
        }

        Ok(true)
    }
}

/// A move proposed for a plan unit.
#[derive(Clone, Debug, Default)]
pub enum Move {
    /// Plans stops of a stops plan unit.
    Stops(MoveStops),
    /// Plans children of a composite plan unit.
    Units(MoveUnits),
    /// No executable move exists.
    #[default]
    NotExecutable,
}

impl Move {
    /// Returns index of the plan unit the move is for.
    pub fn plan_unit(&self) -> Option<usize> {
        match self {
            Move::Stops(m) => Some(m.plan_unit),
            Move::Units(m) => Some(m.plan_unit),
            Move::NotExecutable => None,
        }
    }

    /// Returns estimated change of the score, infinity for a non executable move.
    pub fn value(&self) -> f64 {
        match self {
            Move::Stops(m) => m.value,
            Move::Units(m) => m.value,
            Move::NotExecutable => f64::INFINITY,
        }
    }

    /// Returns how many equally valued moves were seen when this one was selected.
    pub fn value_seen(&self) -> usize {
        match self {
            Move::Stops(m) => m.value_seen,
            Move::Units(m) => m.value_seen,
            Move::NotExecutable => 0,
        }
    }

    /// Returns true if the move can be executed.
    pub fn is_executable(&self) -> bool {
        match self {
            Move::Stops(m) => m.is_executable(),
            Move::Units(m) => !m.moves.is_empty(),
            Move::NotExecutable => false,
        }
    }

    /// Returns true if the move is executable and is estimated to decrease the score.
    pub fn is_improvement(&self) -> bool {
        self.is_executable() && self.value() < 0.
    }

    /// Executes the move. Returns true if the plan unit got planned.
    pub fn execute(&self, solution: &mut Solution) -> GenericResult<bool> {
        match self {
            Move::Stops(m) => m.execute(solution),
            Move::Units(m) => m.execute(solution),
            Move::NotExecutable => Ok(false),
        }
    }

    /// Returns the better of two moves: the executable one, otherwise the one with lower value.
    /// Ties are resolved by reservoir sampling, so that each of equally valued moves seen during
    /// a scan is selected with the same probability.
    pub fn take_best(self, that: Move, random: &(dyn Random + Send + Sync)) -> Move {
        if !that.is_executable() {
            return self;
        }
        if !self.is_executable() {
            return that;
        }

        match self.value().total_cmp(&that.value()) {
            std::cmp::Ordering::Less => self,
            std::cmp::Ordering::Greater => that,
            std::cmp::Ordering::Equal => {
                let (seen, challenger) = (self.value_seen(), that.value_seen());
                let total = seen + challenger;

                if random.uniform_int(1, total as i32) <= challenger as i32 {
                    that.with_value_seen(total)
                } else {
                    self.with_value_seen(total)
                }
            }
        }
    }

    fn with_value_seen(mut self, value_seen: usize) -> Self {
        match &mut self {
            Move::Stops(m) => m.value_seen = value_seen,
            Move::Units(m) => m.value_seen = value_seen,
            Move::NotExecutable => {}
        }

        self
    }
}

impl From<MoveStops> for Move {
    fn from(move_stops: MoveStops) -> Self {
        Move::Stops(move_stops)
    }
}

/// Unplans plan units of already executed moves in reverse order.
pub(crate) fn revert_moves(solution: &mut Solution, moves: &[Move]) -> GenericResult<()> {
    for executed in moves.iter().rev() {
        let Some(unit) = executed.plan_unit() else { continue };

        if !solution.unplan(unit)? {
            return Err(format!("undoing failed move: plan unit {unit} cannot be unplanned").into());
        }
    }

    Ok(())
}

impl Solution {
    /// Creates a validated move of a stops plan unit which is estimated against constraints and
    /// objectives.
    pub fn new_move_stops(&self, plan_unit: usize, positions: Vec<StopPosition>) -> GenericResult<MoveStops> {
        let mut move_stops = self.new_unchecked_move_stops(plan_unit, positions)?;

        let (value, allowed, _) = self.check_constraints_and_estimate(&move_stops);
        move_stops.value = value;
        move_stops.allowed = allowed;

        Ok(move_stops)
    }

    /// Creates a validated move which is not estimated: it is considered allowed.
    pub(crate) fn new_unchecked_move_stops(
        &self,
        plan_unit: usize,
        positions: Vec<StopPosition>,
    ) -> GenericResult<MoveStops> {
        self.validate_positions(plan_unit, &positions)?;

        Ok(MoveStops { plan_unit, positions, value: 0., value_seen: 1, allowed: true })
    }

    /// Checks that the positions place all stops of the plan unit into the current routes: the
    /// chain starts and ends at planned stops which are adjacent on one vehicle and the order of
    /// stops is allowed by the sequencing graph.
    pub(crate) fn validate_positions(&self, plan_unit: usize, positions: &[StopPosition]) -> GenericResult<()> {
        let unit = self
            .model
            .plan_units()
            .get(plan_unit)
            .and_then(|unit| unit.as_stops())
            .ok_or_else(|| format!("plan unit {plan_unit} is not a plan unit of stops"))?;

        if positions.len() != unit.stops().len() {
            return Err(format!(
                "stop positions length {} must be equal to amount of stops {} of the plan unit",
                positions.len(),
                unit.stops().len()
            )
            .into());
        }

        for position in positions.iter() {
            StopPosition::new(self, position.previous, position.stop, position.next)?;
        }

        let id = |stop: usize| self.model.stop(stop).id().to_string();

        let (first, last) = (positions[0], positions[positions.len() - 1]);
        if !self.stop(first.previous).is_planned() {
            let previous = id(first.previous);
            return Err(format!("previous stop `{previous}` of the first stop position must be planned").into());
        }
        if !self.stop(last.next).is_planned() {
            return Err(format!("next stop `{}` of the last stop position must be planned", id(last.next)).into());
        }

        let stops = positions.iter().map(|position| position.stop).collect::<Vec<_>>();
        if stops.iter().any(|stop| !unit.stops().contains(stop)) {
            return Err(format!("stop positions do not match stops of plan unit {plan_unit}").into());
        }
        if !unit.dag().is_allowed(&stops)? {
            return Err("stops are in a sequence violating the sequencing graph of the plan unit".into());
        }

        let vehicle = self.stop(first.previous).vehicle();
        let mut last_planned_previous = first.previous;
        let mut position = self.stop(first.previous).position();

        for (index, stop_position) in positions.iter().enumerate() {
            let (previous, next) = (self.stop(stop_position.previous), self.stop(stop_position.next));

            if previous.is_planned() {
                if previous.position() < position {
                    return Err(format!(
                        "previous stop `{}` of stop position {index} is planned before stop `{}`",
                        id(previous.index()),
                        id(last_planned_previous)
                    )
                    .into());
                }
                position = previous.position();
                last_planned_previous = previous.index();
            } else if index == 0 || positions[index - 1].stop != previous.index() {
                return Err(format!(
                    "unplanned previous stop `{}` of stop position {index} must be the stop of the previous position",
                    id(previous.index())
                )
                .into());
            }

            if next.is_planned() {
                if next.position() < position {
                    return Err(format!(
                        "next stop `{}` of stop position {index} is planned before stop `{}`",
                        id(next.index()),
                        id(last_planned_previous)
                    )
                    .into());
                }
                if self.stop(last_planned_previous).position() + 1 != next.position() {
                    return Err(format!(
                        "planned stops `{}` and `{}` of stop position {index} are not adjacent",
                        id(last_planned_previous),
                        id(next.index())
                    )
                    .into());
                }
                position = next.position();
            } else if positions.get(index + 1).is_none_or(|following| following.stop != next.index()) {
                return Err(format!(
                    "unplanned next stop `{}` of stop position {index} must be the stop of the next position",
                    id(next.index())
                )
                .into());
            }

            for stop in [previous, next] {
                if stop.is_planned() && stop.vehicle() != vehicle {
                    let stop = id(stop.index());
                    return Err(format!("planned stop `{stop}` of stop position {index} is on another vehicle").into());
                }
            }
        }

        Ok(())
    }
}
