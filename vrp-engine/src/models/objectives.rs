//! Specifies the objective protocol: a cheap delta estimate used to rank candidate moves and an
//! authoritative value recomputed by propagation.

use crate::models::{SolutionDataUpdater, StopDataUpdater};
use crate::solution::{MoveStops, Solution};
use crate::utils::GenericResult;
use std::sync::Arc;

/// An objective function.
pub trait ObjectiveFunction {
    /// Estimates the change of the objective value if the move is executed.
    fn estimate_delta_value(&self, move_stops: &MoveStops, solution: &Solution) -> f64;

    /// Returns the objective value of the solution.
    fn value(&self, solution: &Solution) -> f64;
}

/// An objective registered in the model.
#[derive(Clone)]
pub struct ModelObjective {
    pub(crate) name: String,
    pub(crate) function: Arc<dyn ObjectiveFunction + Send + Sync>,
    pub(crate) stop_data: Option<Arc<dyn StopDataUpdater + Send + Sync>>,
    pub(crate) solution_data: Option<Arc<dyn SolutionDataUpdater + Send + Sync>>,
}

impl ModelObjective {
    /// Returns the objective name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Estimates the change of the objective value.
    pub fn estimate_delta_value(&self, move_stops: &MoveStops, solution: &Solution) -> f64 {
        self.function.estimate_delta_value(move_stops, solution)
    }

    /// Returns the objective value.
    pub fn value(&self, solution: &Solution) -> f64 {
        self.function.value(solution)
    }
}

/// Provides the way to build an objective.
#[derive(Default)]
pub struct ObjectiveBuilder {
    name: Option<String>,
    function: Option<Arc<dyn ObjectiveFunction + Send + Sync>>,
    stop_data: Option<Arc<dyn StopDataUpdater + Send + Sync>>,
    solution_data: Option<Arc<dyn SolutionDataUpdater + Send + Sync>>,
}

impl ObjectiveBuilder {
    /// Sets a name which has to be unique across objectives.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Sets objective function. Mandatory.
    pub fn with_function<T: ObjectiveFunction + Send + Sync + 'static>(mut self, function: Arc<T>) -> Self {
        self.function = Some(function);
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

    /// Builds an objective.
    pub fn build(self) -> GenericResult<ModelObjective> {
        let name = self.name.filter(|name| !name.is_empty()).ok_or_else(|| "objective name must be set".to_string())?;
        let function = self.function.ok_or_else(|| format!("objective `{name}` has no function"))?;

        Ok(ModelObjective { name, function, stop_data: self.stop_data, solution_data: self.solution_data })
    }
}

/// A weighted objective in the objective sum.
#[derive(Clone)]
pub struct ObjectiveTerm {
    pub(crate) factor: f64,
    pub(crate) objective: ModelObjective,
}

impl ObjectiveTerm {
    /// Returns the factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns the objective.
    pub fn objective(&self) -> &ModelObjective {
        &self.objective
    }
}

/// A weighted sum of objectives which defines solution score.
#[derive(Clone, Default)]
pub struct ObjectiveSum {
    pub(crate) terms: Vec<ObjectiveTerm>,
}

impl ObjectiveSum {
    /// Returns objective terms.
    pub fn terms(&self) -> &[ObjectiveTerm] {
        self.terms.as_slice()
    }

    /// Estimates weighted change of the score.
    pub fn estimate_delta_value(&self, move_stops: &MoveStops, solution: &Solution) -> f64 {
        self.terms.iter().map(|term| term.factor * term.objective.estimate_delta_value(move_stops, solution)).sum()
    }
}
