//! A feature to penalize unplanned plan units.

#[cfg(test)]
#[path = "../../tests/unit/features/unplanned_test.rs"]
mod unplanned_test;

use super::*;
use crate::models::expressions::StopExpression;
use std::sync::OnceLock;

/// Creates an objective which sums penalties of unplanned root plan units. A penalty of a stops
/// plan unit is the sum of `penalty` values of its stops, a penalty of a composite plan unit is the
/// sum of its children penalties, averaged for one-of plan units.
pub fn create_unplanned_objective(name: &str, penalty: Arc<StopExpression>) -> GenericResult<ModelObjective> {
    ObjectiveBuilder::default()
        .with_name(name)
        .with_function(Arc::new(UnplannedObjective { penalty, costs: OnceLock::new() }))
        .build()
}

struct UnplannedObjective {
    penalty: Arc<StopExpression>,
    costs: OnceLock<Vec<f64>>,
}

impl UnplannedObjective {
    fn costs(&self, model: &Model) -> &[f64] {
        self.costs.get_or_init(|| (0..model.plan_units().len()).map(|unit| self.cost(model, unit)).collect())
    }

    fn cost(&self, model: &Model, unit: usize) -> f64 {
        match model.plan_unit(unit) {
            ModelPlanUnit::Stops(unit) => unit.stops().iter().map(|&stop| self.penalty.stop_value(stop)).sum(),
            ModelPlanUnit::Units(unit) => {
                let cost = unit.units().iter().map(|&child| self.cost(model, child)).sum::<f64>();
                if unit.is_one_of() { cost / unit.units().len() as f64 } else { cost }
            }
        }
    }
}

impl ObjectiveFunction for UnplannedObjective {
    fn estimate_delta_value(&self, move_stops: &MoveStops, solution: &Solution) -> f64 {
        let model = solution.model();
        let unit = move_stops.plan_unit();

        let charged = match model.plan_unit(unit).parent() {
            Some(parent) if model.plan_unit(parent).as_units().is_some_and(|parent| parent.is_one_of()) => parent,
            _ => unit,
        };

        -self.costs(model)[charged]
    }

    fn value(&self, solution: &Solution) -> f64 {
        let costs = self.costs(solution.model());
        solution.unplanned_plan_units().iter().map(|unit| costs[unit]).sum()
    }
}
