#[cfg(test)]
#[path = "../../tests/unit/models/model_test.rs"]
mod model_test;

use crate::config::EngineConfig;
use crate::models::common::{Location, TimeWindow, Timestamp};
use crate::models::*;
use crate::utils::{Environment, GenericError, GenericResult};
use nohash_hasher::{IntMap, IntSet};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

/// A capability of a constraint or an objective collected at lock time.
pub(crate) struct Capability<T: ?Sized> {
    /// Index of the owning constraint or objective term.
    pub(crate) owner: usize,
    pub(crate) is_temporal: bool,
    pub(crate) inner: Arc<T>,
}

impl<T: ?Sized> Capability<T> {
    fn new(owner: usize, is_temporal: bool, inner: &Arc<T>) -> Self {
        Self { owner, is_temporal, inner: inner.clone() }
    }
}

/// Derived, read-only state of the model built once by [`Model::lock`] and shared by all
/// solutions of the model.
pub struct LockedState {
    pub(crate) estimate_order: Vec<usize>,
    pub(crate) stop_checks: Vec<Capability<dyn StopViolationCheck + Send + Sync>>,
    pub(crate) vehicle_checks: Vec<Capability<dyn VehicleViolationCheck + Send + Sync>>,
    pub(crate) solution_checks: Vec<Capability<dyn SolutionViolationCheck + Send + Sync>>,
    pub(crate) constraint_stop_data: Vec<Capability<dyn StopDataUpdater + Send + Sync>>,
    pub(crate) constraint_solution_data: Vec<Capability<dyn SolutionDataUpdater + Send + Sync>>,
    pub(crate) objective_stop_data: Vec<Capability<dyn StopDataUpdater + Send + Sync>>,
    pub(crate) objective_solution_data: Vec<Capability<dyn SolutionDataUpdater + Send + Sync>>,
    pub(crate) constraint_stop_data_keys: FxHashMap<String, usize>,
    pub(crate) constraint_solution_data_keys: FxHashMap<String, usize>,
    pub(crate) objective_stop_data_keys: FxHashMap<String, usize>,
    pub(crate) objective_solution_data_keys: FxHashMap<String, usize>,
    disallowed: Option<Vec<Vec<bool>>>,
    has_direct_successors: bool,
}

impl LockedState {
    /// Returns indices of constraints in the order their estimates are asked: cheapest first,
    /// constraints without a cost hint last.
    pub fn estimate_order(&self) -> &[usize] {
        self.estimate_order.as_slice()
    }

    /// Returns true if `successor` is not allowed to directly follow `stop`.
    pub fn is_disallowed_successor(&self, stop: usize, successor: usize) -> bool {
        self.disallowed.as_ref().is_some_and(|matrix| matrix[stop][successor])
    }

    /// Returns true if there is at least one disallowed successor pair.
    pub fn has_disallowed_successors(&self) -> bool {
        self.disallowed.is_some()
    }

    /// Returns true if some plan unit has a direct arc in its sequencing graph.
    pub fn has_direct_successors(&self) -> bool {
        self.has_direct_successors
    }
}

/// A topology model: stops, vehicles, plan units, expressions, constraints and objectives.
/// The model is mutable until it is locked, which happens when the first solution is created.
pub struct Model {
    config: EngineConfig,
    stops: Vec<ModelStop>,
    vehicle_types: Vec<ModelVehicleType>,
    vehicles: Vec<ModelVehicle>,
    plan_units: Vec<ModelPlanUnit>,
    expressions: Vec<Arc<dyn ModelExpression>>,
    constraints: Vec<ModelConstraint>,
    objective: ObjectiveSum,
    disallowed_successors: IntMap<usize, Vec<usize>>,
    stop_vehicles: IntMap<usize, usize>,
    locked: Mutex<Option<Arc<LockedState>>>,
}

impl Default for Model {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Model {
    /// Creates a new empty model with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty model with given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            stops: Vec::default(),
            vehicle_types: Vec::default(),
            vehicles: Vec::default(),
            plan_units: Vec::default(),
            expressions: Vec::default(),
            constraints: Vec::default(),
            objective: ObjectiveSum::default(),
            disallowed_successors: IntMap::default(),
            stop_vehicles: IntMap::default(),
            locked: Mutex::new(None),
        }
    }

    /// Returns engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns all stops.
    pub fn stops(&self) -> &[ModelStop] {
        self.stops.as_slice()
    }

    /// Returns a stop by its index.
    pub fn stop(&self, index: usize) -> &ModelStop {
        &self.stops[index]
    }

    /// Returns all vehicle types.
    pub fn vehicle_types(&self) -> &[ModelVehicleType] {
        self.vehicle_types.as_slice()
    }

    /// Returns all vehicles.
    pub fn vehicles(&self) -> &[ModelVehicle] {
        self.vehicles.as_slice()
    }

    /// Returns a vehicle by its index.
    pub fn vehicle(&self, index: usize) -> &ModelVehicle {
        &self.vehicles[index]
    }

    /// Returns a vehicle type of the given vehicle.
    pub fn vehicle_type_of(&self, vehicle: usize) -> &ModelVehicleType {
        &self.vehicle_types[self.vehicles[vehicle].vehicle_type]
    }

    /// Returns all plan units.
    pub fn plan_units(&self) -> &[ModelPlanUnit] {
        self.plan_units.as_slice()
    }

    /// Returns a plan unit by its index.
    pub fn plan_unit(&self, index: usize) -> &ModelPlanUnit {
        &self.plan_units[index]
    }

    /// Returns registered expressions.
    pub fn expressions(&self) -> &[Arc<dyn ModelExpression>] {
        self.expressions.as_slice()
    }

    /// Returns registered constraints.
    pub fn constraints(&self) -> &[ModelConstraint] {
        self.constraints.as_slice()
    }

    /// Returns the objective sum.
    pub fn objective(&self) -> &ObjectiveSum {
        &self.objective
    }

    /// Returns stops which are not allowed to directly follow the given stop.
    pub fn disallowed_successors(&self, stop: usize) -> &[usize] {
        self.disallowed_successors.get(&stop).map_or(&[], |successors| successors.as_slice())
    }

    /// Returns a vehicle the stop is pre-assigned to.
    pub fn initial_vehicle(&self, stop: usize) -> Option<usize> {
        self.stop_vehicles.get(&stop).copied()
    }

    /// Returns true if the model is locked.
    pub fn is_locked(&self) -> bool {
        self.locked.lock().map(|state| state.is_some()).unwrap_or(true)
    }

    /// Returns true if the plan unit contains a fixed stop or a fixed child.
    pub fn is_plan_unit_fixed(&self, unit: usize) -> bool {
        match &self.plan_units[unit] {
            ModelPlanUnit::Stops(unit) => unit.stops.iter().any(|&stop| self.stops[stop].fixed),
            ModelPlanUnit::Units(unit) => unit.units.iter().any(|&child| self.is_plan_unit_fixed(child)),
        }
    }

    /// Returns stops of the plan unit and all of its descendants.
    pub fn plan_unit_stops(&self, unit: usize) -> Vec<usize> {
        match &self.plan_units[unit] {
            ModelPlanUnit::Stops(unit) => unit.stops.clone(),
            ModelPlanUnit::Units(unit) => unit.units.iter().flat_map(|&child| self.plan_unit_stops(child)).collect(),
        }
    }

    /// Returns the topmost ancestor of the plan unit, or the unit itself.
    pub fn root_plan_unit(&self, unit: usize) -> usize {
        let mut root = unit;
        while let Some(parent) = self.plan_units[root].parent() {
            root = parent;
        }

        root
    }

    /// Adds a new stop and returns its index.
    pub fn add_stop(&mut self, location: Location) -> GenericResult<usize> {
        self.ensure_unlocked("stop")?;

        let index = self.stops.len();
        self.stops.push(ModelStop::new(index, location));

        Ok(index)
    }

    /// Sets a user defined identifier of the stop.
    pub fn set_stop_id(&mut self, stop: usize, id: &str) -> GenericResult<()> {
        self.ensure_unlocked("stop id")?;
        self.stop_mut(stop)?.id = id.to_string();

        Ok(())
    }

    /// Sets the earliest time a stop can be started.
    pub fn set_stop_earliest_start(&mut self, stop: usize, earliest_start: Timestamp) -> GenericResult<()> {
        self.ensure_unlocked("stop earliest start")?;
        self.stop_mut(stop)?.earliest_start = Some(earliest_start);

        Ok(())
    }

    /// Sets time windows given as sorted, non overlapping `[open, close]` pairs.
    pub fn set_stop_windows(&mut self, stop: usize, windows: &[(Timestamp, Timestamp)]) -> GenericResult<()> {
        self.ensure_unlocked("stop windows")?;

        let windows = windows.iter().map(|&(start, end)| TimeWindow::new(start, end)).collect::<Vec<_>>();
        if windows.iter().any(|tw| tw.start > tw.end) {
            return Err(format!("stop `{}` has a window which closes before it opens", self.stop_mut(stop)?.id).into());
        }
        if windows.windows(2).any(|pair| pair[0].end >= pair[1].start) {
            return Err(format!("stop `{}` has unsorted or overlapping windows", self.stop_mut(stop)?.id).into());
        }

        self.stop_mut(stop)?.windows = windows;

        Ok(())
    }

    /// Adds a vehicle type and returns its index.
    pub fn add_vehicle_type(
        &mut self,
        travel_duration: Arc<dyn ModelExpression>,
        duration: Arc<dyn ModelExpression>,
    ) -> GenericResult<usize> {
        self.ensure_unlocked("vehicle type")?;

        let index = self.vehicle_types.len();
        self.vehicle_types.push(ModelVehicleType { index, id: index.to_string(), travel_duration, duration });

        Ok(index)
    }

    /// Sets a user defined identifier of the vehicle type.
    pub fn set_vehicle_type_id(&mut self, vehicle_type: usize, id: &str) -> GenericResult<()> {
        self.ensure_unlocked("vehicle type id")?;
        let vehicle_type = self
            .vehicle_types
            .get_mut(vehicle_type)
            .ok_or_else(|| format!("vehicle type with index {vehicle_type} does not exist"))?;
        vehicle_type.id = id.to_string();

        Ok(())
    }

    /// Adds a vehicle which starts at `first` stop and ends at `last` stop. Both stops become fixed
    /// anchors of the vehicle.
    pub fn add_vehicle(
        &mut self,
        vehicle_type: usize,
        start: Timestamp,
        first: usize,
        last: usize,
    ) -> GenericResult<usize> {
        self.ensure_unlocked("vehicle")?;

        if vehicle_type >= self.vehicle_types.len() {
            return Err(format!("vehicle type with index {vehicle_type} does not exist").into());
        }
        if first == last {
            return Err(format!("vehicle cannot start and end at the same stop `{}`", self.stop_mut(first)?.id).into());
        }

        for anchor in [first, last] {
            let stop = self.stop_mut(anchor)?;
            if stop.first_or_last {
                return Err(format!("stop `{}` is already an anchor of another vehicle", stop.id).into());
            }
            if stop.plan_unit.is_some() {
                return Err(format!("stop `{}` belongs to a plan unit and cannot be a vehicle anchor", stop.id).into());
            }
        }

        for anchor in [first, last] {
            let stop = self.stop_mut(anchor)?;
            stop.first_or_last = true;
            stop.fixed = true;
        }

        let index = self.vehicles.len();
        self.vehicles.push(ModelVehicle {
            index,
            id: index.to_string(),
            vehicle_type,
            start,
            first,
            last,
            initial_stops: Vec::default(),
        });

        Ok(index)
    }

    /// Sets a user defined identifier of the vehicle.
    pub fn set_vehicle_id(&mut self, vehicle: usize, id: &str) -> GenericResult<()> {
        self.ensure_unlocked("vehicle id")?;
        let vehicle =
            self.vehicles.get_mut(vehicle).ok_or_else(|| format!("vehicle with index {vehicle} does not exist"))?;
        vehicle.id = id.to_string();

        Ok(())
    }

    /// Pre-assigns a stop to the vehicle: it is appended to the vehicle's initial stops. A fixed
    /// stop cannot be moved by the search.
    pub fn add_vehicle_initial_stop(&mut self, vehicle: usize, stop: usize, fixed: bool) -> GenericResult<()> {
        self.ensure_unlocked("initial stop")?;

        if vehicle >= self.vehicles.len() {
            return Err(format!("vehicle with index {vehicle} does not exist").into());
        }

        let model_stop = self.stop_mut(stop)?;
        if model_stop.first_or_last {
            return Err(format!("stop `{}` is a vehicle anchor and cannot be an initial stop", model_stop.id).into());
        }
        if model_stop.plan_unit.is_none() {
            return Err(format!("initial stop `{}` does not belong to a plan unit", model_stop.id).into());
        }
        if self.stop_vehicles.contains_key(&stop) {
            return Err(format!("stop `{}` is already an initial stop of a vehicle", self.stops[stop].id).into());
        }

        self.stops[stop].fixed |= fixed;
        self.stop_vehicles.insert(stop, vehicle);
        self.vehicles[vehicle].initial_stops.push(stop);

        Ok(())
    }

    /// Creates a plan unit of a single stop.
    pub fn new_plan_single_stop(&mut self, stop: usize) -> GenericResult<usize> {
        self.ensure_unlocked("plan unit")?;
        self.new_plan_stops(vec![stop], DirectedAcyclicGraph::default())
    }

    /// Creates a plan unit of stops which have to be visited in the given order.
    pub fn new_plan_sequence(&mut self, stops: &[usize]) -> GenericResult<usize> {
        self.ensure_unlocked("plan unit")?;

        let mut dag = DirectedAcyclicGraph::default();
        for pair in stops.windows(2) {
            dag.add_arc(pair[0], pair[1])?;
        }

        self.new_plan_stops(stops.to_vec(), dag)
    }

    /// Creates a plan unit of at least two stops which are visited in an order allowed by `dag`.
    pub fn new_plan_multiple_stops(&mut self, stops: &[usize], dag: DirectedAcyclicGraph) -> GenericResult<usize> {
        self.ensure_unlocked("plan unit")?;

        if stops.len() < 2 {
            return Err("plan unit of multiple stops must have at least two stops".into());
        }

        let unique = stops.iter().copied().collect::<IntSet<_>>();
        let is_foreign = |arc: &&DagArc| !unique.contains(&arc.origin) || !unique.contains(&arc.destination);
        if let Some(arc) = dag.arcs().iter().find(is_foreign) {
            return Err(format!("arc {} -> {} references a stop outside of the plan unit", arc.origin, arc.destination)
                .into());
        }

        self.new_plan_stops(stops.to_vec(), dag)
    }

    /// Creates a composite plan unit where exactly one of the units has to be planned.
    pub fn new_plan_one_of(&mut self, units: &[usize]) -> GenericResult<usize> {
        self.ensure_unlocked("plan unit")?;
        self.new_plan_units(units, true, false)
    }

    /// Creates a composite plan unit where all the units have to be planned, optionally on the
    /// same vehicle.
    pub fn new_plan_all(&mut self, same_vehicle: bool, units: &[usize]) -> GenericResult<usize> {
        self.ensure_unlocked("plan unit")?;
        self.new_plan_units(units, false, same_vehicle)
    }

    /// Registers an expression. Each solution maintains its value and cumulative value per stop.
    pub fn add_expression(&mut self, expression: Arc<dyn ModelExpression>) -> GenericResult<usize> {
        self.ensure_unlocked("expression")?;

        self.expressions.push(expression);

        Ok(self.expressions.len() - 1)
    }

    /// Disallows the given stops to directly follow `stop`.
    pub fn disallow_successors(&mut self, stop: usize, successors: &[usize]) -> GenericResult<()> {
        self.ensure_unlocked("disallowed successors")?;

        for &index in std::iter::once(&stop).chain(successors.iter()) {
            self.stop_mut(index)?;
        }

        let entry = self.disallowed_successors.entry(stop).or_default();
        successors.iter().for_each(|successor| {
            if !entry.contains(successor) {
                entry.push(*successor);
            }
        });

        Ok(())
    }

    /// Adds a constraint with a unique name.
    pub fn add_constraint(&mut self, constraint: ModelConstraint) -> GenericResult<()> {
        self.ensure_unlocked("constraint")?;

        if self.constraints.iter().any(|other| other.name == constraint.name) {
            return Err(format!("constraint with name `{}` is already added", constraint.name).into());
        }

        self.constraints.push(constraint);

        Ok(())
    }

    /// Adds an objective with a unique name to the objective sum. Zero factor is ignored.
    pub fn add_objective(&mut self, objective: ModelObjective, factor: f64) -> GenericResult<()> {
        self.ensure_unlocked("objective")?;

        if self.objective.terms.iter().any(|term| term.objective.name == objective.name) {
            return Err(format!("objective with name `{}` is already added", objective.name).into());
        }

        if factor != 0. {
            self.objective.terms.push(ObjectiveTerm { factor, objective });
        }

        Ok(())
    }

    /// Computes nearest neighbours of every stop in parallel.
    pub fn warm_closest_stops(&self) {
        self.stops.par_iter().for_each(|stop| {
            stop.closest_stops(self);
        });
    }

    /// Locks the model: no mutation is possible afterwards. Returns derived state shared by
    /// solutions. Locking an already locked model returns the same state.
    pub fn lock(&self, environment: &Environment) -> GenericResult<Arc<LockedState>> {
        let mut locked = self.locked.lock().map_err(|_| "model lock is poisoned")?;

        if let Some(state) = locked.as_ref() {
            return Ok(state.clone());
        }

        self.validate()?;

        let state = Arc::new(self.create_locked_state());
        *locked = Some(state.clone());

        (environment.logger)(&format!(
            "model locked: {} stops, {} vehicles, {} plan units, {} constraints, {} objectives",
            self.stops.len(),
            self.vehicles.len(),
            self.plan_units.len(),
            self.constraints.len(),
            self.objective.terms.len()
        ));

        Ok(state)
    }

    fn ensure_unlocked(&self, what: &str) -> GenericResult<()> {
        if self.is_locked() {
            return Err(format!("model is locked, cannot add {what}").into());
        }

        Ok(())
    }

    fn stop_mut(&mut self, stop: usize) -> GenericResult<&mut ModelStop> {
        self.stops.get_mut(stop).ok_or_else(|| format!("stop with index {stop} does not exist").into())
    }

    fn new_plan_stops(&mut self, stops: Vec<usize>, dag: DirectedAcyclicGraph) -> GenericResult<usize> {
        if stops.is_empty() {
            return Err("plan unit must have at least one stop".into());
        }

        let mut unique = IntSet::default();
        for &stop in stops.iter() {
            let model_stop = self.stop_mut(stop)?;
            if model_stop.first_or_last {
                return Err(format!("stop `{}` is a vehicle anchor and cannot be planned", model_stop.id).into());
            }
            if model_stop.plan_unit.is_some() {
                return Err(format!("stop `{}` already belongs to a plan unit", model_stop.id).into());
            }
            if !unique.insert(stop) {
                return Err(format!("stop `{}` is used more than once in a plan unit", model_stop.id).into());
            }
        }

        let index = self.plan_units.len();
        stops.iter().for_each(|&stop| self.stops[stop].plan_unit = Some(index));
        self.plan_units.push(ModelPlanUnit::Stops(PlanStopsUnit { index, stops, dag, parent: None }));

        Ok(index)
    }

    fn new_plan_units(&mut self, units: &[usize], one_of: bool, same_vehicle: bool) -> GenericResult<usize> {
        if units.is_empty() {
            return Err("composite plan unit must have at least one plan unit".into());
        }

        let mut unique = IntSet::default();
        for &unit in units.iter() {
            let plan_unit =
                self.plan_units.get(unit).ok_or_else(|| format!("plan unit with index {unit} does not exist"))?;
            if plan_unit.parent().is_some() {
                return Err(format!("plan unit {unit} already belongs to a composite plan unit").into());
            }
            if !unique.insert(unit) {
                return Err(format!("plan unit {unit} is used more than once in a composite plan unit").into());
            }
        }

        let index = self.plan_units.len();
        units.iter().for_each(|&unit| self.plan_units[unit].set_parent(index));
        self.plan_units.push(ModelPlanUnit::Units(PlanUnitsUnit {
            index,
            units: units.to_vec(),
            one_of,
            same_vehicle,
            parent: None,
        }));

        Ok(index)
    }

    fn validate(&self) -> GenericResult<()> {
        let errors = self.stops.iter().filter_map(|stop| stop.validate().err()).collect::<Vec<_>>();
        if !errors.is_empty() {
            return Err(GenericError::join_many(&errors, "; ").into());
        }

        for vehicle in self.vehicles.iter() {
            let mut unit_stops: IntMap<usize, Vec<usize>> = IntMap::default();
            for &stop in vehicle.initial_stops.iter() {
                if let Some(unit) = self.stops[stop].plan_unit {
                    unit_stops.entry(unit).or_default().push(stop);
                }
            }

            for (unit, assigned) in unit_stops.into_iter() {
                let Some(stops_unit) = self.plan_units[unit].as_stops() else { continue };

                let is_elsewhere = |stop: &&usize| self.stop_vehicles.get(stop) != Some(&vehicle.index);
                if let Some(&missing) = stops_unit.stops.iter().find(is_elsewhere) {
                    return Err(format!(
                        "stop `{}` of a plan unit with initial stops on vehicle `{}` is not assigned \
                         to the same vehicle",
                        self.stops[missing].id, vehicle.id
                    )
                    .into());
                }

                if !stops_unit.dag.is_allowed(&assigned)? {
                    let ids = assigned.iter().map(|&stop| self.stops[stop].id.as_str()).collect::<Vec<_>>();
                    return Err(format!(
                        "initial stops [{}] of vehicle `{}` are not in an order allowed by their plan unit",
                        ids.join(", "),
                        vehicle.id
                    )
                    .into());
                }
            }
        }

        Ok(())
    }

    fn create_locked_state(&self) -> LockedState {
        let mut estimate_order = (0..self.constraints.len()).collect::<Vec<_>>();
        estimate_order.sort_by_key(|&idx| {
            let cost = self.constraints[idx].estimation_cost;
            (cost.is_none(), cost)
        });

        let mut state = LockedState {
            estimate_order,
            stop_checks: Vec::default(),
            vehicle_checks: Vec::default(),
            solution_checks: Vec::default(),
            constraint_stop_data: Vec::default(),
            constraint_solution_data: Vec::default(),
            objective_stop_data: Vec::default(),
            objective_solution_data: Vec::default(),
            constraint_stop_data_keys: FxHashMap::default(),
            constraint_solution_data_keys: FxHashMap::default(),
            objective_stop_data_keys: FxHashMap::default(),
            objective_solution_data_keys: FxHashMap::default(),
            disallowed: self.create_disallowed_matrix(),
            has_direct_successors: self
                .plan_units
                .iter()
                .filter_map(|unit| unit.as_stops())
                .any(|unit| unit.dag.has_direct_arcs()),
        };

        for (idx, constraint) in self.constraints.iter().enumerate() {
            let temporal = constraint.is_temporal;
            if let Some(check) = constraint.stop_check.as_ref() {
                state.stop_checks.push(Capability::new(idx, temporal, check));
            }
            if let Some(check) = constraint.vehicle_check.as_ref() {
                state.vehicle_checks.push(Capability::new(idx, temporal, check));
            }
            if let Some(check) = constraint.solution_check.as_ref() {
                state.solution_checks.push(Capability::new(idx, temporal, check));
            }
            if let Some(updater) = constraint.stop_data.as_ref() {
                state.constraint_stop_data_keys.insert(constraint.name.clone(), state.constraint_stop_data.len());
                state.constraint_stop_data.push(Capability::new(idx, temporal, updater));
            }
            if let Some(updater) = constraint.solution_data.as_ref() {
                let slot = state.constraint_solution_data.len();
                state.constraint_solution_data_keys.insert(constraint.name.clone(), slot);
                state.constraint_solution_data.push(Capability::new(idx, temporal, updater));
            }
        }

        for (idx, term) in self.objective.terms.iter().enumerate() {
            let objective = &term.objective;
            if let Some(updater) = objective.stop_data.as_ref() {
                state.objective_stop_data_keys.insert(objective.name.clone(), state.objective_stop_data.len());
                state.objective_stop_data.push(Capability::new(idx, false, updater));
            }
            if let Some(updater) = objective.solution_data.as_ref() {
                state.objective_solution_data_keys.insert(objective.name.clone(), state.objective_solution_data.len());
                state.objective_solution_data.push(Capability::new(idx, false, updater));
            }
        }

        state
    }

    fn create_disallowed_matrix(&self) -> Option<Vec<Vec<bool>>> {
        if self.disallowed_successors.values().all(|successors| successors.is_empty()) {
            return None;
        }

        let size = self.stops.len();
        let mut matrix = vec![vec![false; size]; size];
        self.disallowed_successors.iter().for_each(|(&stop, successors)| {
            successors.iter().for_each(|&successor| matrix[stop][successor] = true);
        });

        Some(matrix)
    }
}
