use crate::models::common::{Duration, Timestamp};
use crate::models::{ModelExpression, ModelStop};
use std::sync::Arc;

/// Represents a vehicle type: it defines how long it takes to travel between stops and how long
/// it takes to process a stop.
pub struct ModelVehicleType {
    pub(crate) index: usize,
    pub(crate) id: String,
    pub(crate) travel_duration: Arc<dyn ModelExpression>,
    pub(crate) duration: Arc<dyn ModelExpression>,
}

impl ModelVehicleType {
    /// Returns index of the vehicle type.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns user defined identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns travel duration expression.
    pub fn travel_duration_expression(&self) -> &Arc<dyn ModelExpression> {
        &self.travel_duration
    }

    /// Returns process duration expression.
    pub fn duration_expression(&self) -> &Arc<dyn ModelExpression> {
        &self.duration
    }

    /// Returns travel duration between stops, zero when either location is not valid.
    pub fn travel_duration_value(&self, from: &ModelStop, to: &ModelStop) -> Duration {
        if from.location().is_valid() && to.location().is_valid() {
            self.travel_duration.value(self, from, to)
        } else {
            0.
        }
    }

    /// Returns process duration of the `to` stop when arriving from `from`.
    pub fn duration_value(&self, from: &ModelStop, to: &ModelStop) -> Duration {
        self.duration.value(self, from, to)
    }

    /// Calculates temporal values of visiting `to` after departing from `from` at `departure`:
    /// travel duration, arrival, start and end.
    pub fn temporal_values(
        &self,
        departure: Timestamp,
        from: &ModelStop,
        to: &ModelStop,
    ) -> (Duration, Timestamp, Timestamp, Timestamp) {
        let travel = self.travel_duration_value(from, to);
        let arrival = departure + travel;
        let start = arrival.max(to.to_earliest_start_value(arrival));
        let end = start + self.duration_value(from, to);

        (travel, arrival, start, end)
    }
}

/// Represents a vehicle: its type, start time, anchor stops and pre-assigned stops.
pub struct ModelVehicle {
    pub(crate) index: usize,
    pub(crate) id: String,
    pub(crate) vehicle_type: usize,
    pub(crate) start: Timestamp,
    pub(crate) first: usize,
    pub(crate) last: usize,
    pub(crate) initial_stops: Vec<usize>,
}

impl ModelVehicle {
    /// Returns index of the vehicle.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns user defined identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns index of the vehicle type.
    pub fn vehicle_type(&self) -> usize {
        self.vehicle_type
    }

    /// Returns start time.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Returns index of the first anchor stop.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Returns index of the last anchor stop.
    pub fn last(&self) -> usize {
        self.last
    }

    /// Returns pre-assigned stops in their route order, anchors excluded.
    pub fn initial_stops(&self) -> &[usize] {
        self.initial_stops.as_slice()
    }
}
