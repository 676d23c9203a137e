//! Specifies the constraint protocol. A constraint always provides a cheap estimate used while
//! scanning candidate moves; exact checks and derived data updaters are optional capabilities
//! which are sorted into purpose specific lists when the model is locked.

#[cfg(test)]
#[path = "../../tests/unit/models/constraints_test.rs"]
mod constraints_test;

use crate::solution::{MoveStops, Solution, SolutionStop, SolutionVehicle};
use crate::utils::GenericResult;
use std::any::Any;
use std::sync::Arc;

/// Derived data kept by constraints and objectives per stop or per solution. Data is replaced,
/// never mutated, so solution copies share it freely.
pub type StopData = Arc<dyn Any + Send + Sync>;

/// Specifies how expensive a constraint estimate is: cheaper constraints are asked first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EstimationCost {
    /// Does not depend on route length.
    Constant,
    /// Linear in amount of vehicles.
    LinearVehicle,
    /// Linear in amount of stops.
    LinearStop,
    /// Quadratic in amount of stops.
    Quadratic,
    /// Exponential in amount of stops.
    Exponential,
}

/// A hint returned together with an estimate: it allows the move generator to abandon the
/// whole vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StopPositionsHint {
    skip_vehicle: bool,
}

impl StopPositionsHint {
    /// No hint: continue scanning.
    pub fn none() -> Self {
        Self { skip_vehicle: false }
    }

    /// No move of the plan unit is feasible on this vehicle.
    pub fn skip_vehicle() -> Self {
        Self { skip_vehicle: true }
    }

    /// Returns true if the vehicle has to be skipped.
    pub fn should_skip_vehicle(&self) -> bool {
        self.skip_vehicle
    }
}

/// A fast, necessary but not sufficient feasibility check of a move which is not executed yet.
pub trait ConstraintEstimate {
    /// Returns true if the move is estimated to violate the constraint.
    fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint);
}

/// An exact check performed at every stop visited by propagation.
pub trait StopViolationCheck {
    /// Returns true if the stop violates the constraint.
    fn does_stop_have_violations(&self, stop: SolutionStop<'_>) -> bool;
}

/// An exact check performed when propagation reaches the last stop of a vehicle.
pub trait VehicleViolationCheck {
    /// Returns true if the vehicle violates the constraint.
    fn does_vehicle_have_violations(&self, vehicle: SolutionVehicle<'_>) -> bool;
}

/// An exact check performed once propagation has finished.
pub trait SolutionViolationCheck {
    /// Returns true if the solution violates the constraint.
    fn does_solution_have_violations(&self, solution: &Solution) -> bool;
}

/// Maintains derived data per stop. Called for every stop visited by propagation, before checks.
pub trait StopDataUpdater {
    /// Returns new data of the stop.
    fn update_stop_data(&self, stop: SolutionStop<'_>) -> GenericResult<Option<StopData>>;
}

/// Maintains derived data per solution. Called once propagation has finished.
pub trait SolutionDataUpdater {
    /// Returns new data of the solution.
    fn update_solution_data(&self, solution: &Solution) -> GenericResult<Option<StopData>>;
}

/// A constraint registered in the model.
#[derive(Clone)]
pub struct ModelConstraint {
    pub(crate) name: String,
    pub(crate) estimate: Arc<dyn ConstraintEstimate + Send + Sync>,
    pub(crate) stop_check: Option<Arc<dyn StopViolationCheck + Send + Sync>>,
    pub(crate) vehicle_check: Option<Arc<dyn VehicleViolationCheck + Send + Sync>>,
    pub(crate) solution_check: Option<Arc<dyn SolutionViolationCheck + Send + Sync>>,
    pub(crate) stop_data: Option<Arc<dyn StopDataUpdater + Send + Sync>>,
    pub(crate) solution_data: Option<Arc<dyn SolutionDataUpdater + Send + Sync>>,
    pub(crate) is_temporal: bool,
    pub(crate) estimation_cost: Option<EstimationCost>,
}

impl ModelConstraint {
    /// Returns the constraint name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns true if the constraint depends only on timing.
    pub fn is_temporal(&self) -> bool {
        self.is_temporal
    }

    /// Returns the estimation cost hint.
    pub fn estimation_cost(&self) -> Option<EstimationCost> {
        self.estimation_cost
    }

    /// Estimates whether the move violates the constraint.
    pub fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint) {
        self.estimate.estimate_is_violated(move_stops, solution)
    }
}

impl std::fmt::Debug for ModelConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConstraint").field("name", &self.name).field("is_temporal", &self.is_temporal).finish()
    }
}

/// Provides the way to build a constraint from capabilities.
#[derive(Default)]
pub struct ConstraintBuilder {
    name: Option<String>,
    estimate: Option<Arc<dyn ConstraintEstimate + Send + Sync>>,
    stop_check: Option<Arc<dyn StopViolationCheck + Send + Sync>>,
    vehicle_check: Option<Arc<dyn VehicleViolationCheck + Send + Sync>>,
    solution_check: Option<Arc<dyn SolutionViolationCheck + Send + Sync>>,
    stop_data: Option<Arc<dyn StopDataUpdater + Send + Sync>>,
    solution_data: Option<Arc<dyn SolutionDataUpdater + Send + Sync>>,
    is_temporal: bool,
    estimation_cost: Option<EstimationCost>,
}

impl ConstraintBuilder {
    /// Sets a name which has to be unique across constraints.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Sets the estimate. Mandatory.
    pub fn with_estimate<T: ConstraintEstimate + Send + Sync + 'static>(mut self, estimate: Arc<T>) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Adds an exact per stop check.
    pub fn with_stop_check<T: StopViolationCheck + Send + Sync + 'static>(mut self, check: Arc<T>) -> Self {
        self.stop_check = Some(check);
        self
    }

    /// Adds an exact per vehicle check.
    pub fn with_vehicle_check<T: VehicleViolationCheck + Send + Sync + 'static>(mut self, check: Arc<T>) -> Self {
        self.vehicle_check = Some(check);
        self
    }

    /// Adds an exact per solution check.
    pub fn with_solution_check<T: SolutionViolationCheck + Send + Sync + 'static>(mut self, check: Arc<T>) -> Self {
        self.solution_check = Some(check);
        self
    }

    /// Adds a stop data updater.
    pub fn with_stop_data<T: StopDataUpdater + Send + Sync + 'static>(mut self, updater: Arc<T>) -> Self {
        self.stop_data = Some(updater);
        self
    }

    /// Adds a solution data updater.
    pub fn with_solution_data<T: SolutionDataUpdater + Send + Sync + 'static>(mut self, updater: Arc<T>) -> Self {
        self.solution_data = Some(updater);
        self
    }

    /// Marks constraint as purely temporal: such constraints are skipped while testing structural
    /// feasibility of an initial solution.
    pub fn with_temporal(mut self, is_temporal: bool) -> Self {
        self.is_temporal = is_temporal;
        self
    }

    /// Sets the estimation cost hint.
    pub fn with_estimation_cost(mut self, cost: EstimationCost) -> Self {
        self.estimation_cost = Some(cost);
        self
    }

    /// Builds a constraint.
    pub fn build(self) -> GenericResult<ModelConstraint> {
        let name = self.name.filter(|name| !name.is_empty()).ok_or_else(|| "constraint name must be set".to_string())?;
        let estimate = self.estimate.ok_or_else(|| format!("constraint `{name}` has no estimate"))?;

        Ok(ModelConstraint {
            name,
            estimate,
            stop_check: self.stop_check,
            vehicle_check: self.vehicle_check,
            solution_check: self.solution_check,
            stop_data: self.stop_data,
            solution_data: self.solution_data,
            is_temporal: self.is_temporal,
            estimation_cost: self.estimation_cost,
        })
    }
}
