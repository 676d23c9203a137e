#[cfg(test)]
#[path = "../../tests/unit/solution/solution_test.rs"]
mod solution_test;

use crate::models::common::{Duration, Timestamp};
use crate::models::{LockedState, Model, StopData, StopPositionsHint};
use crate::solution::*;
use crate::utils::{DefaultRandom, Environment, GenericResult, InfoLogger, Quota, Random};
use std::sync::Arc;

/// A mutable state of one stop in a solution. A stop is planned iff `next != previous`; an
/// unplanned stop points to itself in both directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StopSlot {
    pub(crate) previous: usize,
    pub(crate) next: usize,
    pub(crate) vehicle: Option<usize>,
    pub(crate) position: usize,
    pub(crate) arrival: Timestamp,
    pub(crate) start: Timestamp,
    pub(crate) end: Timestamp,
    pub(crate) slack: Duration,
    pub(crate) cumulative_travel_duration: Duration,
}

impl StopSlot {
    pub(crate) fn unplanned(index: usize) -> Self {
        Self {
            previous: index,
            next: index,
            vehicle: None,
            position: 0,
            arrival: 0.,
            start: 0.,
            end: 0.,
            slack: 0.,
            cumulative_travel_duration: 0.,
        }
    }
}

/// A constraint violation found by propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Violation {
    /// Index of the violated constraint.
    pub(crate) constraint: usize,
    /// Index of the stop where the violation was detected.
    pub(crate) stop: usize,
}

/// A solution: the assignment of stops to vehicle routes together with timing, cached expression
/// values, constraint and objective data, and plan unit collections.
///
/// A solution is not meant to be mutated concurrently: use [`Solution::copy`] to get an independent
/// instance per thread.
pub struct Solution {
    pub(crate) model: Arc<Model>,
    pub(crate) state: Arc<LockedState>,
    pub(crate) random: Arc<dyn Random + Send + Sync>,
    pub(crate) quota: Option<Arc<dyn Quota + Send + Sync>>,
    pub(crate) logger: InfoLogger,

    pub(crate) slots: Vec<StopSlot>,
    pub(crate) values: Vec<Vec<f64>>,
    pub(crate) cumulative_values: Vec<Vec<f64>>,

    pub(crate) constraint_stop_data: Vec<Vec<Option<StopData>>>,
    pub(crate) objective_stop_data: Vec<Vec<Option<StopData>>>,
    pub(crate) constraint_solution_data: Vec<Option<StopData>>,
    pub(crate) objective_solution_data: Vec<Option<StopData>>,

    pub(crate) scores: Vec<f64>,
    pub(crate) score: f64,

    pub(crate) fixed: PlanUnitCollection,
    pub(crate) planned: PlanUnitCollection,
    pub(crate) unplanned: PlanUnitCollection,
    pub(crate) proposition: PlanUnitCollection,
}

impl Solution {
    /// Creates a new solution of the model: locks the model, initializes vehicles and plans
    /// the pre-assigned stops.
    pub fn new(model: Arc<Model>, environment: Arc<Environment>) -> GenericResult<Self> {
        let state = model.lock(environment.as_ref())?;

        let size = model.stops().len();
        let expressions = model.expressions().len();

        let mut solution = Self {
            slots: (0..size).map(StopSlot::unplanned).collect(),
            values: vec![vec![0.; size]; expressions],
            cumulative_values: vec![vec![0.; size]; expressions],
            constraint_stop_data: vec![vec![None; size]; state.constraint_stop_data.len()],
            objective_stop_data: vec![vec![None; size]; state.objective_stop_data.len()],
            constraint_solution_data: vec![None; state.constraint_solution_data.len()],
            objective_solution_data: vec![None; state.objective_solution_data.len()],
            scores: vec![0.; model.objective().terms().len()],
            score: 0.,
            fixed: PlanUnitCollection::default(),
            planned: PlanUnitCollection::default(),
            unplanned: PlanUnitCollection::default(),
            proposition: PlanUnitCollection::default(),
            random: environment.random.clone(),
            quota: environment.quota.clone(),
            logger: environment.logger.clone(),
            model,
            state,
        };

        for unit in solution.model.plan_units() {
            if unit.parent().is_some() {
                solution.proposition.add(unit.index());
            } else {
                solution.unplanned.add(unit.index());
            }
        }

        for vehicle in 0..solution.model.vehicles().len() {
            solution.initialize_vehicle(vehicle)?;
        }

        solution.add_initial_solution()?;

        Ok(solution)
    }

    /// Creates a deep copy which owns its state and a derived random source.
    pub fn copy(&self) -> Self {
        Self {
            model: self.model.clone(),
            state: self.state.clone(),
            random: Arc::new(DefaultRandom::new_repeatable(self.random.next_seed())),
            quota: self.quota.clone(),
            logger: self.logger.clone(),
            slots: self.slots.clone(),
            values: self.values.clone(),
            cumulative_values: self.cumulative_values.clone(),
            constraint_stop_data: self.constraint_stop_data.clone(),
            objective_stop_data: self.objective_stop_data.clone(),
            constraint_solution_data: self.constraint_solution_data.clone(),
            objective_solution_data: self.objective_solution_data.clone(),
            scores: self.scores.clone(),
            score: self.score,
            fixed: self.fixed.clone(),
            planned: self.planned.clone(),
            unplanned: self.unplanned.clone(),
            proposition: self.proposition.clone(),
        }
    }

    /// Returns the model.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Returns the random source of the solution.
    pub fn random(&self) -> &(dyn Random + Send + Sync) {
        self.random.as_ref()
    }

    /// Returns true if the execution quota is reached.
    pub fn is_quota_reached(&self) -> bool {
        self.quota.as_ref().is_some_and(|quota| quota.is_reached())
    }

    /// Returns a view on the stop with the given index.
    pub fn stop(&self, index: usize) -> SolutionStop<'_> {
        SolutionStop::new(self, index)
    }

    /// Returns a view on the vehicle with the given index.
    pub fn vehicle(&self, index: usize) -> SolutionVehicle<'_> {
        SolutionVehicle::new(self, index)
    }

    /// Iterates over all vehicles.
    pub fn vehicles(&self) -> impl Iterator<Item = SolutionVehicle<'_>> + '_ {
        (0..self.model.vehicles().len()).map(move |index| self.vehicle(index))
    }

    /// Returns the weighted sum of objective values.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the unweighted value of the objective with the given name, zero when there is no
    /// such objective.
    pub fn objective_value(&self, name: &str) -> f64 {
        self.model
            .objective()
            .terms()
            .iter()
            .position(|term| term.objective().name() == name)
            .map_or(0., |idx| self.scores[idx])
    }

    /// Returns solution data of the constraint with the given name.
    pub fn constraint_data<T: 'static>(&self, name: &str) -> Option<&T> {
        let slot = *self.state.constraint_solution_data_keys.get(name)?;
        self.constraint_solution_data[slot].as_ref()?.downcast_ref::<T>()
    }

    /// Returns solution data of the objective with the given name.
    pub fn objective_data<T: 'static>(&self, name: &str) -> Option<&T> {
        let slot = *self.state.objective_solution_data_keys.get(name)?;
        self.objective_solution_data[slot].as_ref()?.downcast_ref::<T>()
    }

    /// Returns root plan units which are fixed.
    pub fn fixed_plan_units(&self) -> &PlanUnitCollection {
        &self.fixed
    }

    /// Returns root plan units which are planned and not fixed.
    pub fn planned_plan_units(&self) -> &PlanUnitCollection {
        &self.planned
    }

    /// Returns root plan units which are not planned.
    pub fn unplanned_plan_units(&self) -> &PlanUnitCollection {
        &self.unplanned
    }

    /// Returns plan units which are members of a composite plan unit.
    pub fn proposition_plan_units(&self) -> &PlanUnitCollection {
        &self.proposition
    }

    /// Splices an unplanned `stop` right after the planned `after` stop. Returns `after`.
    pub(crate) fn attach(&mut self, stop: usize, after: usize) -> usize {
        let next = self.slots[after].next;

        self.slots[stop].previous = after;
        self.slots[stop].next = next;
        self.slots[next].previous = stop;
        self.slots[after].next = stop;
        self.slots[stop].vehicle = self.slots[after].vehicle;

        after
    }

    /// Removes a planned stop from its route and resets its state.
    pub(crate) fn detach(&mut self, stop: usize) {
        let StopSlot { previous, next, .. } = self.slots[stop];

        self.slots[previous].next = next;
        self.slots[next].previous = previous;
        self.slots[stop] = StopSlot::unplanned(stop);

        self.values.iter_mut().chain(self.cumulative_values.iter_mut()).for_each(|values| values[stop] = 0.);
        self.constraint_stop_data
            .iter_mut()
            .chain(self.objective_stop_data.iter_mut())
            .for_each(|data| data[stop] = None);
    }

    /// Attaches stops of the positions in reverse order, so every stop is attached before the
    /// stop chained in front of it. Returns the index propagation has to start from.
    pub(crate) fn attach_positions(&mut self, positions: &[StopPosition]) -> GenericResult<usize> {
        if positions.is_empty() {
            return Err("cannot attach empty stop positions".into());
        }

        for position in positions.iter() {
            if self.stop(position.stop).is_planned() {
                return Err(format!("stop `{}` is already planned", self.model.stop(position.stop).id()).into());
            }

            let next = self.stop(position.next);
            if next.is_first() {
                return Err(format!("next stop `{}` is the first stop of a vehicle", next.model_stop().id()).into());
            }
        }

        let mut start = positions[0].previous;
        for position in positions.iter().rev() {
            let after = self.slots[position.next].previous;
            start = self.attach(position.stop, after);
        }

        Ok(start)
    }

    /// Recomputes the route of the vehicle the `index` stop is on, starting from `index`, and
    /// checks constraints. Returns the first violation. Temporal constraints are skipped when
    /// `include_temporal` is false.
    pub(crate) fn propagate(&mut self, index: usize, include_temporal: bool) -> GenericResult<Option<Violation>> {
        let model = self.model.clone();
        let state = self.state.clone();

        self.update_stop_data(&state, index)?;

        let mut current = index;
        let vehicle = self.slots[index].vehicle;

        if let Some(vehicle) = vehicle {
            let vehicle_type = model.vehicle_type_of(vehicle);

            while self.slots[current].next != current {
                let next = self.slots[current].next;
                let (from, to) = (model.stop(current), model.stop(next));

                for (expression_idx, expression) in model.expressions().iter().enumerate() {
                    let value = expression.value(vehicle_type, from, to);
                    self.values[expression_idx][next] = value;
                    let cumulative = self.cumulative_values[expression_idx][current] + value;
                    self.cumulative_values[expression_idx][next] = cumulative;
                }

                let previous = self.slots[current];
                let (travel, arrival, start, end) = vehicle_type.temporal_values(previous.end, from, to);
                let slot = &mut self.slots[next];
                slot.arrival = arrival;
                slot.start = start;
                slot.end = end;
                slot.cumulative_travel_duration = previous.cumulative_travel_duration + travel;
                slot.position = previous.position + 1;
                slot.vehicle = Some(vehicle);

                self.update_stop_data(&state, next)?;

                let stop_violation = state
                    .stop_checks
                    .iter()
                    .filter(|check| include_temporal || !check.is_temporal)
                    .find(|check| check.inner.does_stop_have_violations(self.stop(next)));
                if let Some(check) = stop_violation {
                    return Ok(Some(Violation { constraint: check.owner, stop: next }));
                }

                if self.slots[next].next == next {
                    let vehicle_violation = state
                        .vehicle_checks
                        .iter()
                        .filter(|check| include_temporal || !check.is_temporal)
                        .find(|check| check.inner.does_vehicle_have_violations(self.vehicle(vehicle)));
                    if let Some(check) = vehicle_violation {
                        return Ok(Some(Violation { constraint: check.owner, stop: next }));
                    }
                }

                current = next;
            }
        }

        let solution_violation = state
            .solution_checks
            .iter()
            .filter(|check| include_temporal || !check.is_temporal)
            .find(|check| check.inner.does_solution_have_violations(self));
        if let Some(check) = solution_violation {
            return Ok(Some(Violation { constraint: check.owner, stop: current }));
        }

        for (slot, updater) in state.constraint_solution_data.iter().enumerate() {
            self.constraint_solution_data[slot] = updater.inner.update_solution_data(self)?;
        }
        for (slot, updater) in state.objective_solution_data.iter().enumerate() {
            self.objective_solution_data[slot] = updater.inner.update_solution_data(self)?;
        }

        if vehicle.is_some() {
            self.update_slack(current);
        }

        self.update_scores();

        Ok(None)
    }

    /// Estimates constraints in their estimate order. Returns the first violated constraint
    /// together with its hint.
    pub(crate) fn estimate_violation(
        &self,
        move_stops: &MoveStops,
        include_temporal: bool,
    ) -> Option<(usize, StopPositionsHint)> {
        self.state.estimate_order.iter().find_map(|&idx| {
            let constraint = &self.model.constraints()[idx];
            if !include_temporal && constraint.is_temporal() {
                return None;
            }

            let (is_violated, hint) = constraint.estimate_is_violated(move_stops, self);
            is_violated.then_some((idx, hint))
        })
    }

    /// Returns true if no constraint estimates the move as violated.
    pub(crate) fn check_constraints(&self, move_stops: &MoveStops) -> (bool, StopPositionsHint) {
        match self.estimate_violation(move_stops, true) {
            Some((_, hint)) => (false, hint),
            None => (true, StopPositionsHint::none()),
        }
    }

    /// Estimates the change of the score if the move is executed.
    pub(crate) fn estimate_delta_score(&self, move_stops: &MoveStops) -> f64 {
        self.model.objective().estimate_delta_value(move_stops, self)
    }

    /// Checks constraints and, if the move is allowed, estimates the change of the score.
    pub(crate) fn check_constraints_and_estimate(&self, move_stops: &MoveStops) -> (f64, bool, StopPositionsHint) {
        match self.check_constraints(move_stops) {
            (false, hint) => (0., false, hint),
            (true, hint) => (self.estimate_delta_score(move_stops), true, hint),
        }
    }

    fn initialize_vehicle(&mut self, vehicle: usize) -> GenericResult<()> {
        let model = self.model.clone();
        let model_vehicle = model.vehicle(vehicle);
        let vehicle_type = model.vehicle_type_of(vehicle);
        let (first, last) = (model_vehicle.first(), model_vehicle.last());

        self.slots[first] = StopSlot {
            previous: first,
            next: last,
            vehicle: Some(vehicle),
            position: 0,
            arrival: model_vehicle.start(),
            start: model_vehicle.start(),
            end: model_vehicle.start(),
            slack: 0.,
            cumulative_travel_duration: 0.,
        };
        self.slots[last] =
            StopSlot { previous: first, next: last, vehicle: Some(vehicle), position: 1, ..self.slots[first] };

        for (expression_idx, expression) in model.expressions().iter().enumerate() {
            let value = expression.value(vehicle_type, model.stop(first), model.stop(first));
            self.values[expression_idx][first] = value;
            self.cumulative_values[expression_idx][first] = value;
        }

        if let Some(violation) = self.propagate(first, true)? {
            return Err(format!(
                "failed creating new vehicle `{}`: constraint `{}` is violated",
                model_vehicle.id(),
                model.constraints()[violation.constraint].name()
            )
            .into());
        }

        Ok(())
    }

    fn update_stop_data(&mut self, state: &LockedState, stop: usize) -> GenericResult<()> {
        for (slot, updater) in state.constraint_stop_data.iter().enumerate() {
            let data = updater.inner.update_stop_data(self.stop(stop))?;
            self.constraint_stop_data[slot][stop] = data;
        }

        for (slot, updater) in state.objective_stop_data.iter().enumerate() {
            let data = updater.inner.update_stop_data(self.stop(stop))?;
            self.objective_stop_data[slot][stop] = data;
        }

        Ok(())
    }

    fn update_slack(&mut self, last: usize) {
        let mut slack = 0.;
        let mut current = last;

        loop {
            let slot = &mut self.slots[current];
            slack += slot.start - slot.arrival;
            slot.slack = slack;

            if slot.previous == current {
                break;
            }
            current = slot.previous;
        }
    }

    fn update_scores(&mut self) {
        let model = self.model.clone();

        let mut score = 0.;
        for (idx, term) in model.objective().terms().iter().enumerate() {
            let value = term.objective().value(self);
            self.scores[idx] = value;
            score += term.factor() * value;
        }

        self.score = score;
    }
}
