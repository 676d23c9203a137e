use crate::config::EngineConfig;
use crate::models::common::Location;
use crate::models::expressions::ConstantExpression;
use crate::models::{Model, ModelExpression, ModelStop, ModelVehicleType};
use crate::utils::{DefaultRandom, Environment};
use std::sync::Arc;

/// A travel duration expression for stops placed on a line: the duration is the difference of
/// their longitudes, so one degree takes one second.
pub struct LineExpression;

impl ModelExpression for LineExpression {
    fn name(&self) -> &str {
        "line"
    }

    fn value(&self, _: &ModelVehicleType, from: &ModelStop, to: &ModelStop) -> f64 {
        (to.location().lon - from.location().lon).abs()
    }

    fn has_negative_values(&self) -> bool {
        false
    }

    fn has_positive_values(&self) -> bool {
        true
    }
}

pub fn test_environment() -> Arc<Environment> {
    test_environment_with_seed(0)
}

pub fn test_environment_with_seed(seed: u64) -> Arc<Environment> {
    Arc::new(Environment::new(Arc::new(DefaultRandom::new_repeatable(seed)), None, Arc::new(|_: &str| {})))
}

/// Builds a model with stops placed on a line and vehicles which start and end at zero.
pub struct TestModelBuilder {
    model: Model,
    vehicle_type: usize,
}

impl Default for TestModelBuilder {
    fn default() -> Self {
        Self::with_process_duration(0.)
    }
}

impl TestModelBuilder {
    pub fn with_process_duration(duration: f64) -> Self {
        Self::with_config(EngineConfig::default(), duration)
    }

    pub fn with_config(config: EngineConfig, duration: f64) -> Self {
        let mut model = Model::with_config(config);
        let vehicle_type = model
            .add_vehicle_type(Arc::new(LineExpression), Arc::new(ConstantExpression::new("duration", duration)))
            .expect("cannot add vehicle type");

        Self { model, vehicle_type }
    }

    pub fn add_stop(&mut self, id: &str, lon: f64) -> usize {
        let stop = self.model.add_stop(Location::new(lon, 0.)).expect("cannot add stop");
        self.model.set_stop_id(stop, id).expect("cannot set stop id");

        stop
    }

    /// Adds stops with ids `s0`, `s1`, .. placed at given longitudes.
    pub fn add_stops(&mut self, lons: &[f64]) -> Vec<usize> {
        lons.iter().enumerate().map(|(idx, &lon)| self.add_stop(&format!("s{idx}"), lon)).collect()
    }

    pub fn add_vehicle(&mut self, id: &str) -> usize {
        self.add_vehicle_at(id, 0., 0.)
    }

    pub fn add_vehicle_at(&mut self, id: &str, start: f64, lon: f64) -> usize {
        self.add_vehicle_between(id, start, lon, lon)
    }

    /// Adds a vehicle which starts at `first_lon` and ends at `last_lon`.
    pub fn add_vehicle_between(&mut self, id: &str, start: f64, first_lon: f64, last_lon: f64) -> usize {
        let first = self.add_stop(&format!("{id}_first"), first_lon);
        let last = self.add_stop(&format!("{id}_last"), last_lon);

        let vehicle = self.model.add_vehicle(self.vehicle_type, start, first, last).expect("cannot add vehicle");
        self.model.set_vehicle_id(vehicle, id).expect("cannot set vehicle id");

        vehicle
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn build(self) -> Model {
        self.model
    }
}
