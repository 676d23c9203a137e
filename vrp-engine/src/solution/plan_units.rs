#[cfg(test)]
#[path = "../../tests/unit/solution/plan_units_test.rs"]
mod plan_units_test;

use crate::models::ModelPlanUnit;
use crate::solution::*;
use crate::utils::GenericResult;

impl Solution {
    /// Returns true if the plan unit is planned: all stops of a stops unit, any child of a one-of
    /// unit, or all children of an all unit are planned.
    pub fn is_plan_unit_planned(&self, plan_unit: usize) -> bool {
        match self.model.plan_unit(plan_unit) {
            ModelPlanUnit::Stops(unit) => unit.stops().iter().all(|&stop| self.stop(stop).is_planned()),
            ModelPlanUnit::Units(unit) if unit.is_one_of() => {
                unit.units().iter().any(|&child| self.is_plan_unit_planned(child))
            }
            ModelPlanUnit::Units(unit) => unit.units().iter().all(|&child| self.is_plan_unit_planned(child)),
        }
    }

    /// Returns true if the plan unit, or one of its descendants, has a fixed stop.
    pub fn is_plan_unit_fixed(&self, plan_unit: usize) -> bool {
        self.model.is_plan_unit_fixed(plan_unit)
    }

    /// Returns true if any stop of the plan unit or its descendants is planned.
    pub fn has_planned_stops(&self, plan_unit: usize) -> bool {
        self.model.plan_unit_stops(plan_unit).into_iter().any(|stop| self.stop(stop).is_planned())
    }

    /// Returns planned stops of the plan unit in route order.
    pub fn planned_stops(&self, plan_unit: usize) -> Vec<usize> {
        let mut stops = self
            .model
            .plan_unit_stops(plan_unit)
            .into_iter()
            .filter(|&stop| self.stop(stop).is_planned())
            .collect::<Vec<_>>();
        stops.sort_by_key(|&stop| (self.stop(stop).vehicle(), self.stop(stop).position()));

        stops
    }

    /// Unplans the plan unit. Returns false, leaving the solution unchanged, when the plan unit is
    /// not planned, fixed, or its removal violates a constraint.
    pub fn unplan(&mut self, plan_unit: usize) -> GenericResult<bool> {
        self.unplan_with_undo(plan_unit, &mut Vec::new())
    }

    /// Unplans all stops of the vehicle which do not belong to a fixed plan unit. Returns false,
    /// leaving the solution unchanged, when there is nothing to unplan or the removal violates a
    /// constraint.
    pub fn unplan_vehicle(&mut self, vehicle: usize) -> GenericResult<bool> {
        let model = self.model.clone();

        let stops = self
            .vehicle(vehicle)
            .stops()
            .filter_map(|stop| stop.plan_unit().map(|unit| (stop.index(), model.root_plan_unit(unit))))
            .filter(|&(_, root)| !model.is_plan_unit_fixed(root))
            .map(|(stop, _)| stop)
            .collect::<Vec<_>>();

        let Some(&first_stop) = stops.first() else { return Ok(false) };

        let mut roots = Vec::<usize>::new();
        for &stop in stops.iter() {
            let root = model.stop(stop).plan_unit().map(|unit| model.root_plan_unit(unit));
            if let Some(root) = root.filter(|root| !roots.contains(root)) {
                roots.push(root);
            }
        }

        let positions = stops
            .iter()
            .map(|&stop| StopPosition { previous: self.slots[stop].previous, stop, next: self.slots[stop].next })
            .collect::<Vec<_>>();
        let start = self.slots[first_stop].previous;

        stops.iter().for_each(|&stop| self.detach(stop));
        roots.iter().for_each(|&root| self.sync_root(root));

        if self.propagate(start, true)?.is_none() {
            // composite units may still have stops on other vehicles
            for &root in roots.iter() {
                if self.has_planned_stops(root) {
                    self.unplan(root)?;
                }
            }

            return Ok(true);
        }

        for position in positions.iter().rev() {
            let after = self.slots[position.next].previous;
            self.attach(position.stop, after);
        }
        roots.iter().for_each(|&root| self.sync_root(root));

        if let Some(violation) = self.propagate(start, true)? {
            return Err(format!(
                "undoing failed unplan of vehicle `{}` failed: constraint `{}` is violated",
                model.vehicle(vehicle).id(),
                model.constraints()[violation.constraint].name()
            )
            .into());
        }

        Ok(false)
    }

    /// Returns true if the plan unit can be planned: neither it nor its root is planned and it is
    /// not fixed.
    pub(crate) fn is_plan_unit_plannable(&self, plan_unit: usize) -> bool {
        !self.is_plan_unit_fixed(plan_unit)
            && !self.is_plan_unit_planned(plan_unit)
            && !self.is_plan_unit_planned(self.model.root_plan_unit(plan_unit))
    }

    /// Moves the root of the plan unit to the collection which reflects its current state.
    pub(crate) fn sync_root(&mut self, plan_unit: usize) {
        let root = self.model.root_plan_unit(plan_unit);

        if self.fixed.contains(root) {
            return;
        }

        if self.is_plan_unit_planned(root) {
            self.unplanned.remove(root);
            self.planned.add(root);
        } else {
            self.planned.remove(root);
            self.unplanned.add(root);
        }
    }

    /// Unplans the plan unit and pushes moves which replan its stops units to `undo`.
    fn unplan_with_undo(&mut self, plan_unit: usize, undo: &mut Vec<MoveStops>) -> GenericResult<bool> {
        if self.is_plan_unit_fixed(plan_unit) {
            return Ok(false);
        }

        let model = self.model.clone();
        let unit = match model.plan_unit(plan_unit) {
            ModelPlanUnit::Stops(_) => {
                let Some(replan) = self.unplan_stops(plan_unit)? else { return Ok(false) };
                undo.push(replan);

                return Ok(true);
            }
            ModelPlanUnit::Units(unit) => unit,
        };

        if !self.has_planned_stops(plan_unit) {
            return Ok(false);
        }

        let mark = undo.len();
        for &child in unit.units() {
            if !self.has_planned_stops(child) || self.unplan_with_undo(child, undo)? {
                continue;
            }

            for replan in undo.split_off(mark).iter().rev() {
                if !replan.execute(self)? {
                    return Err(format!("failed undoing failed unplan of plan unit {plan_unit}").into());
                }
            }
            self.sync_root(plan_unit);

            return Ok(false);
        }
        self.sync_root(plan_unit);

        Ok(true)
    }

    /// Unplans stops of the stops plan unit. Returns a move which plans them back at their
    /// previous positions, or none when the solution is left unchanged.
    fn unplan_stops(&mut self, plan_unit: usize) -> GenericResult<Option<MoveStops>> {
        if !self.is_plan_unit_planned(plan_unit) {
            return Ok(None);
        }

        let stops = self.planned_stops(plan_unit);
        let Some(&first_stop) = stops.first() else { return Ok(None) };

        let positions = stops
            .iter()
            .map(|&stop| StopPosition { previous: self.slots[stop].previous, stop, next: self.slots[stop].next })
            .collect::<Vec<_>>();
        let start = self.slots[first_stop].previous;
        let replan = MoveStops { plan_unit, positions, value: 0., value_seen: 1, allowed: true };

        stops.iter().for_each(|&stop| self.detach(stop));
        self.sync_root(plan_unit);

        if self.propagate(start, true)?.is_none() {
            return Ok(Some(replan));
        }

        if !replan.execute(self)? {
            return Err(format!("failed undoing failed unplan of plan unit {plan_unit}").into());
        }

        Ok(None)
    }
}
