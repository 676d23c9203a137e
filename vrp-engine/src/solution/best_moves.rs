#[cfg(test)]
#[path = "../../tests/unit/solution/best_moves_test.rs"]
mod best_moves_test;

use crate::models::{ModelPlanUnit, PlanStopsUnit, PlanUnitsUnit};
use crate::solution::generators::generate_moves;
use crate::solution::moves::revert_moves;
use crate::solution::sequences::sample_sequences;
use crate::solution::*;
use crate::utils::{GenericResult, compare_floats, shuffle};
use std::cmp::Ordering;
use std::ops::ControlFlow;

impl Solution {
    /// Returns the best move of the plan unit over all vehicles, or a non executable move when
    /// the plan unit cannot be planned anywhere.
    pub fn best_move(&mut self, plan_unit: usize) -> GenericResult<Move> {
        if !self.is_plan_unit_plannable(plan_unit) {
            return Ok(Move::NotExecutable);
        }

        let mut best = Move::NotExecutable;
        for vehicle in 0..self.model.vehicles().len() {
            if self.is_quota_reached() {
                break;
            }

            let candidate = self.vehicle_best_move(vehicle, plan_unit)?;
            best = best.take_best(candidate, self.random.as_ref());
        }

        Ok(best)
    }

    /// Returns the best move of the plan unit on the given vehicle.
    ///
    /// Composite plan units with the all semantics are evaluated by executing children moves
    /// one by one, so the solution is temporarily modified. It is restored before return.
    pub fn vehicle_best_move(&mut self, vehicle: usize, plan_unit: usize) -> GenericResult<Move> {
        self.vehicle_move(vehicle, plan_unit, false)
    }

    /// Returns the first executable move of the plan unit found on the given vehicle.
    pub fn vehicle_first_move(&mut self, vehicle: usize, plan_unit: usize) -> GenericResult<Move> {
        self.vehicle_move(vehicle, plan_unit, true)
    }

    fn vehicle_move(&mut self, vehicle: usize, plan_unit: usize, is_first: bool) -> GenericResult<Move> {
        if !self.is_plan_unit_plannable(plan_unit) {
            return Ok(Move::NotExecutable);
        }

        let model = self.model.clone();
        match model.plan_unit(plan_unit) {
            ModelPlanUnit::Stops(unit) if unit.stops().len() == 1 && !is_first => {
                Ok(self.best_move_single_stop(vehicle, plan_unit, unit.stops()[0]))
            }
            ModelPlanUnit::Stops(unit) => Ok(self.move_multiple_stops(vehicle, plan_unit, unit, is_first)),
            ModelPlanUnit::Units(unit) if unit.is_one_of() => self.move_one_of(vehicle, unit, is_first),
            ModelPlanUnit::Units(unit) => self.move_all(vehicle, plan_unit, unit, is_first),
        }
    }

    fn best_move_single_stop(&self, vehicle: usize, plan_unit: usize, stop: usize) -> Move {
        let route = self.vehicle(vehicle).stop_indices();
        let mut move_stops = MoveStops::new(plan_unit, vec![StopPosition { previous: route[0], stop, next: route[1] }]);

        let mut candidates = Vec::with_capacity(route.len() - 1);
        let mut best: Option<(usize, f64)> = None;

        for (idx, pair) in route.windows(2).enumerate() {
            move_stops.positions[0].previous = pair[0];
            move_stops.positions[0].next = pair[1];

            // only the first position is checked upfront, the rest rely on the estimate
            if idx == 0 {
                let (is_allowed, hint) = self.check_constraints(&move_stops);
                if hint.should_skip_vehicle() {
                    return Move::NotExecutable;
                }
                if !is_allowed {
                    continue;
                }
            }

            let value = self.estimate_delta_score(&move_stops);
            let is_better = best.is_none_or(|(_, best_value)| match compare_floats(value, best_value) {
                Ordering::Less => true,
                Ordering::Equal => self.random.is_head_not_tails(),
                Ordering::Greater => false,
            });
            if is_better {
                best = Some((idx, value));
            }

            candidates.push((idx, value));
        }

        let Some((best_idx, best_value)) = best else { return Move::NotExecutable };

        let mut place = |idx: usize, value: f64| {
            move_stops.positions[0].previous = route[idx];
            move_stops.positions[0].next = route[idx + 1];
            move_stops.value = value;
            move_stops.allowed = self.check_constraints(&move_stops).0;
            move_stops.allowed
        };

        if place(best_idx, best_value) {
            return move_stops.into();
        }

        shuffle(self.random(), &mut candidates);
        candidates.sort_by(|(_, a), (_, b)| compare_floats(*a, *b));

        if candidates.into_iter().any(|(idx, value)| place(idx, value)) {
            return move_stops.into();
        }

        Move::NotExecutable
    }

    fn move_multiple_stops(&self, vehicle: usize, plan_unit: usize, unit: &PlanStopsUnit, is_first: bool) -> Move {
        let mut best = Move::NotExecutable;

        // a break of any sequence stops the whole search: the best move so far is kept
        let _ = sample_sequences(self, unit, &mut |sequence| {
            generate_moves(self, vehicle, plan_unit, sequence, &mut |candidate| {
                if self.is_quota_reached() {
                    return ControlFlow::Break(());
                }

                let (value, is_allowed, hint) = self.check_constraints_and_estimate(candidate);
                if hint.should_skip_vehicle() {
                    return ControlFlow::Break(());
                }

                if is_allowed && (!best.is_executable() || value <= best.value()) {
                    let mut candidate = candidate.clone();
                    candidate.value = value;
                    candidate.allowed = true;
                    candidate.value_seen = 1;

                    best = std::mem::take(&mut best).take_best(candidate.into(), self.random());

                    if is_first {
                        return ControlFlow::Break(());
                    }
                }

                ControlFlow::Continue(())
            })
        });

        best
    }

    fn move_one_of(&mut self, vehicle: usize, unit: &PlanUnitsUnit, is_first: bool) -> GenericResult<Move> {
        let mut children = unit.units().to_vec();
        if is_first {
            shuffle(self.random(), &mut children);
        }

        let mut best = Move::NotExecutable;
        for child in children {
            let candidate = self.vehicle_move(vehicle, child, is_first)?;
            best = best.take_best(candidate, self.random.as_ref());

            if is_first && best.is_executable() {
                break;
            }
        }

        Ok(best)
    }

    fn move_all(
        &mut self,
        vehicle: usize,
        plan_unit: usize,
        unit: &PlanUnitsUnit,
        is_first: bool,
    ) -> GenericResult<Move> {
        // children planned by the initial solution are kept
        let mut children =
            unit.units().iter().copied().filter(|&child| !self.is_plan_unit_planned(child)).collect::<Vec<_>>();
        shuffle(self.random(), &mut children);

        let mut moves = Vec::with_capacity(children.len());
        for (idx, &child) in children.iter().enumerate() {
            let candidate = if idx == 0 || unit.is_same_vehicle() {
                self.vehicle_move(vehicle, child, is_first)?
            } else {
                self.best_move(child)?
            };

            if !candidate.is_executable() || !candidate.execute(self)? {
                revert_moves(self, &moves)?;
                return Ok(Move::NotExecutable);
            }

            moves.push(candidate);
        }

        revert_moves(self, &moves)?;

        if moves.is_empty() {
            return Ok(Move::NotExecutable);
        }

        Ok(Move::Units(MoveUnits::new(plan_unit, moves)))
    }
}
