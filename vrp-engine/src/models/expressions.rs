//! Specifies expressions: functions which give a value for moving from one stop to another
//! using a given vehicle type.

#[cfg(test)]
#[path = "../../tests/unit/models/expressions_test.rs"]
mod expressions_test;

use crate::models::{ModelStop, ModelVehicleType};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// An expression evaluated for every leg of a route. Registered expressions get their per-stop
/// value and cumulative value maintained by the solution.
pub trait ModelExpression: Send + Sync {
    /// Returns a name of the expression.
    fn name(&self) -> &str;

    /// Returns a value of the leg `from` -> `to` for the given vehicle type.
    fn value(&self, vehicle_type: &ModelVehicleType, from: &ModelStop, to: &ModelStop) -> f64;

    /// Returns true if the expression can produce negative values.
    fn has_negative_values(&self) -> bool;

    /// Returns true if the expression can produce positive values.
    fn has_positive_values(&self) -> bool;

    /// Returns a value when the expression does not depend on its arguments.
    fn as_constant(&self) -> Option<f64> {
        None
    }
}

/// An expression which always returns the same value.
pub struct ConstantExpression {
    name: String,
    value: f64,
}

impl ConstantExpression {
    /// Creates a new instance of `ConstantExpression`.
    pub fn new(name: &str, value: f64) -> Self {
        Self { name: name.to_string(), value }
    }
}

impl ModelExpression for ConstantExpression {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn value(&self, _: &ModelVehicleType, _: &ModelStop, _: &ModelStop) -> f64 {
        self.value
    }

    fn has_negative_values(&self) -> bool {
        self.value < 0.
    }

    fn has_positive_values(&self) -> bool {
        self.value > 0.
    }

    fn as_constant(&self) -> Option<f64> {
        Some(self.value)
    }
}

/// Haversine distance in meters between stop locations.
pub struct HaversineExpression {
    name: String,
}

impl HaversineExpression {
    /// Creates a new instance of `HaversineExpression`.
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Default for HaversineExpression {
    fn default() -> Self {
        Self::new("haversine_distance")
    }
}

impl ModelExpression for HaversineExpression {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn value(&self, _: &ModelVehicleType, from: &ModelStop, to: &ModelStop) -> f64 {
        from.location().haversine_distance(&to.location())
    }

    fn has_negative_values(&self) -> bool {
        false
    }

    fn has_positive_values(&self) -> bool {
        true
    }
}

/// Travel duration in seconds: a distance expression divided by a constant speed in meters per second.
pub struct TravelDurationExpression {
    name: String,
    distance: Arc<dyn ModelExpression>,
    speed: f64,
}

impl TravelDurationExpression {
    /// Creates a new instance of `TravelDurationExpression`. Speed must be positive.
    pub fn new(name: &str, distance: Arc<dyn ModelExpression>, speed: f64) -> Self {
        Self { name: name.to_string(), distance, speed: speed.max(f64::EPSILON) }
    }

    /// Returns speed in meters per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl ModelExpression for TravelDurationExpression {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn value(&self, vehicle_type: &ModelVehicleType, from: &ModelStop, to: &ModelStop) -> f64 {
        self.distance.value(vehicle_type, from, to) / self.speed
    }

    fn has_negative_values(&self) -> bool {
        self.distance.has_negative_values()
    }

    fn has_positive_values(&self) -> bool {
        self.distance.has_positive_values()
    }
}

/// An expression which value depends only on the destination stop, e.g. service duration or demand.
pub struct StopExpression {
    name: String,
    default: f64,
    values: FxHashMap<usize, f64>,
}

impl StopExpression {
    /// Creates a new instance of `StopExpression` with default value.
    pub fn new(name: &str, default: f64) -> Self {
        Self { name: name.to_string(), default, values: FxHashMap::default() }
    }

    /// Sets the value for given stop.
    pub fn with_value(mut self, stop: usize, value: f64) -> Self {
        self.values.insert(stop, value);
        self
    }

    /// Sets the value for given stop.
    pub fn set_value(&mut self, stop: usize, value: f64) {
        self.values.insert(stop, value);
    }

    /// Returns the value defined for the stop.
    pub fn stop_value(&self, stop: usize) -> f64 {
        self.values.get(&stop).copied().unwrap_or(self.default)
    }
}

impl ModelExpression for StopExpression {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn value(&self, _: &ModelVehicleType, _: &ModelStop, to: &ModelStop) -> f64 {
        self.stop_value(to.index())
    }

    fn has_negative_values(&self) -> bool {
        self.default < 0. || self.values.values().any(|&value| value < 0.)
    }

    fn has_positive_values(&self) -> bool {
        self.default > 0. || self.values.values().any(|&value| value > 0.)
    }
}

/// An expression backed by a square matrix addressed by stop indices. Legs outside of the matrix
/// have zero value.
pub struct MatrixExpression {
    name: String,
    matrix: Vec<Vec<f64>>,
}

impl MatrixExpression {
    /// Creates a new instance of `MatrixExpression`.
    pub fn new(name: &str, matrix: Vec<Vec<f64>>) -> Self {
        Self { name: name.to_string(), matrix }
    }
}

impl ModelExpression for MatrixExpression {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn value(&self, _: &ModelVehicleType, from: &ModelStop, to: &ModelStop) -> f64 {
        self.matrix.get(from.index()).and_then(|row| row.get(to.index())).copied().unwrap_or(0.)
    }

    fn has_negative_values(&self) -> bool {
        self.matrix.iter().flatten().any(|&value| value < 0.)
    }

    fn has_positive_values(&self) -> bool {
        self.matrix.iter().flatten().any(|&value| value > 0.)
    }
}
