#[cfg(test)]
#[path = "../../tests/unit/solution/initial_test.rs"]
mod initial_test;

use crate::models::{Model, ModelVehicle};
use crate::solution::*;
use crate::utils::{GenericError, GenericResult};
use std::sync::Arc;

impl Solution {
    /// Plans initial stops of all vehicles. Plan units which cannot be planned are left unplanned
    /// unless they are fixed: an infeasible fixed plan unit fails the whole solution.
    pub(crate) fn add_initial_solution(&mut self) -> GenericResult<()> {
        let model = self.model.clone();

        for vehicle in model.vehicles().iter().filter(|vehicle| !vehicle.initial_stops().is_empty()) {
            let units = initial_plan_units(&model, vehicle);

            let mut roots = Vec::<usize>::new();
            let mut infeasible = Vec::<usize>::new();

            for &unit in units.iter() {
                let root = model.root_plan_unit(unit);
                if !roots.contains(&root) {
                    roots.push(root);
                }

                if let Some(parent) = model.plan_unit(unit).parent() {
                    let is_one_of = model.plan_unit(parent).as_units().is_some_and(|parent| parent.is_one_of());
                    if is_one_of && self.is_plan_unit_planned(parent) {
                        return Err(format!(
                            "infeasible initial solution: vehicle `{}` has stops of a plan unit whose one-of parent \
                             is already planned",
                            vehicle.id()
                        )
                        .into());
                    }
                }

                if infeasible.contains(&root) {
                    continue;
                }

                let positions = self.initial_positions(vehicle, unit);
                let move_stops = self.new_unchecked_move_stops(unit, positions)?;

                if let Some((constraint, _)) = self.estimate_violation(&move_stops, false) {
                    if model.is_plan_unit_fixed(root) {
                        return Err(self.infeasible_error(vehicle, constraint, &move_stops));
                    }

                    infeasible.push(root);
                    continue;
                }

                let start = self.attach_positions(move_stops.positions())?;
                if let Some(violation) = self.propagate(start, false)? {
                    if model.is_plan_unit_fixed(root) {
                        return Err(self.infeasible_error(vehicle, violation.constraint, &move_stops));
                    }

                    move_stops.positions().iter().for_each(|position| self.detach(position.stop));
                    // restores positions of the remaining stops
                    self.propagate(start, false)?;
                    infeasible.push(root);
                }
            }

            let mut affected = Vec::<usize>::new();
            for &root in infeasible.iter() {
                self.detach_plan_unit(root, &mut affected);
            }

            let (first, last) = (vehicle.first(), vehicle.last());
            while let Some(violation) = self.propagate(first, true)? {
                let constraint = model.constraints()[violation.constraint].name();

                if violation.stop == first {
                    return Err(format!(
                        "infeasible initial solution at start of vehicle `{}`: constraint `{constraint}` is violated",
                        vehicle.id()
                    )
                    .into());
                }

                let mut index = violation.stop;
                let root = loop {
                    let root = self.stop(index).plan_unit().map(|unit| model.root_plan_unit(unit));
                    match root {
                        Some(root) if index != last && !model.is_plan_unit_fixed(root) => break root,
                        _ => index = self.stop(index).previous(),
                    }

                    if index == first {
                        return Err(format!(
                            "no feasible route from start to end found for vehicle `{}` due to constraint \
                             `{constraint}`, no further stops to remove",
                            vehicle.id()
                        )
                        .into());
                    }
                };

                self.detach_plan_unit(root, &mut affected);
                infeasible.push(root);
            }

            for other in affected.into_iter().filter(|&other| other != vehicle.index()) {
                let first = model.vehicle(other).first();
                if let Some(violation) = self.propagate(first, true)? {
                    return Err(format!(
                        "infeasible initial solution: vehicle `{}` violates constraint `{}` after removing stops",
                        model.vehicle(other).id(),
                        model.constraints()[violation.constraint].name()
                    )
                    .into());
                }
            }

            for &root in roots.iter().filter(|root| !infeasible.contains(root)) {
                if !self.is_plan_unit_planned(root) {
                    continue;
                }

                self.unplanned.remove(root);
                if model.is_plan_unit_fixed(root) {
                    self.fixed.add(root);
                } else {
                    self.planned.add(root);
                }
            }

            if !infeasible.is_empty() {
                (self.logger)(&format!(
                    "vehicle `{}`: {} plan unit(s) of the initial solution are infeasible and left unplanned",
                    vehicle.id(),
                    infeasible.len()
                ));
            }
        }

        Ok(())
    }

    /// Returns positions of unplanned initial stops of the plan unit. Every stop is placed after
    /// the closest preceding initial stop which is planned or belongs to the same plan unit.
    fn initial_positions(&self, vehicle: &ModelVehicle, unit: usize) -> Vec<StopPosition> {
        let initial = vehicle.initial_stops();
        let is_same_unit = |stop: usize| self.model.stop(stop).plan_unit() == Some(unit);

        let mut previous = vehicle.first();
        let mut positions = Vec::new();

        for (idx, &stop) in initial.iter().enumerate() {
            if self.stop(stop).is_planned() {
                previous = stop;
                continue;
            }

            if !is_same_unit(stop) {
                continue;
            }

            let next = initial[idx + 1..]
                .iter()
                .copied()
                .find(|&other| self.stop(other).is_planned() || is_same_unit(other))
                .unwrap_or(vehicle.last());

            positions.push(StopPosition { previous, stop, next });
            previous = stop;
        }

        positions
    }

    /// Detaches all planned stops of the plan unit and collects vehicles they were planned on.
    fn detach_plan_unit(&mut self, plan_unit: usize, vehicles: &mut Vec<usize>) {
        let model: Arc<Model> = self.model.clone();

        for stop in model.plan_unit_stops(plan_unit) {
            let Some(vehicle) = self.stop(stop).vehicle() else { continue };

            if !vehicles.contains(&vehicle) {
                vehicles.push(vehicle);
            }
            self.detach(stop);
        }
    }

    fn infeasible_error(&self, vehicle: &ModelVehicle, constraint: usize, move_stops: &MoveStops) -> GenericError {
        let ids = move_stops
            .positions()
            .iter()
            .map(|position| format!("`{}`", self.model.stop(position.stop).id()))
            .collect::<Vec<_>>();

        format!(
            "infeasible initial solution: vehicle `{}` violates constraint `{}` for stops [{}]",
            vehicle.id(),
            self.model.constraints()[constraint].name(),
            ids.join(", ")
        )
        .into()
    }
}

/// Returns plan units of initial stops of the vehicle in order of their first appearance.
fn initial_plan_units(model: &Model, vehicle: &ModelVehicle) -> Vec<usize> {
    vehicle.initial_stops().iter().filter_map(|&stop| model.stop(stop).plan_unit()).fold(Vec::new(), |mut acc, unit| {
        if !acc.contains(&unit) {
            acc.push(unit);
        }
        acc
    })
}
