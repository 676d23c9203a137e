#[cfg(test)]
#[path = "../../tests/unit/models/stop_test.rs"]
mod stop_test;

use crate::models::Model;
use crate::models::common::{Location, TimeWindow, Timestamp};
use crate::utils::{GenericResult, compare_floats};
use std::sync::OnceLock;

/// Represents a stop: a location which is visited by a vehicle. A stop either belongs to exactly
/// one plan unit or serves as a first or last anchor of a vehicle.
#[derive(Debug)]
pub struct ModelStop {
    pub(crate) index: usize,
    pub(crate) id: String,
    pub(crate) location: Location,
    pub(crate) earliest_start: Option<Timestamp>,
    pub(crate) windows: Vec<TimeWindow>,
    pub(crate) plan_unit: Option<usize>,
    pub(crate) fixed: bool,
    pub(crate) first_or_last: bool,
    pub(crate) closest: OnceLock<Vec<usize>>,
}

impl ModelStop {
    pub(crate) fn new(index: usize, location: Location) -> Self {
        Self {
            index,
            id: index.to_string(),
            location,
            earliest_start: None,
            windows: Vec::default(),
            plan_unit: None,
            fixed: false,
            first_or_last: false,
            closest: OnceLock::new(),
        }
    }

    /// Returns index of the stop in the model.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns user defined identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns stop location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the earliest start if it is set.
    pub fn earliest_start(&self) -> Option<Timestamp> {
        self.earliest_start
    }

    /// Returns time windows.
    pub fn windows(&self) -> &[TimeWindow] {
        self.windows.as_slice()
    }

    /// Returns index of the plan unit this stop belongs to.
    pub fn plan_unit(&self) -> Option<usize> {
        self.plan_unit
    }

    /// Returns true if the stop cannot be moved by the search: vehicle anchors and stops
    /// pre-assigned as fixed.
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Returns true if the stop is a first or last anchor of some vehicle.
    pub fn is_first_or_last(&self) -> bool {
        self.first_or_last
    }

    /// Determines the earliest time to start servicing the stop given arrival time.
    pub fn to_earliest_start_value(&self, arrival: Timestamp) -> Timestamp {
        if !self.windows.is_empty() {
            if self.windows.iter().any(|tw| tw.contains(arrival)) {
                return arrival;
            }

            // arrival after the last window closes has no meaningful start, keep arrival
            return self.windows.iter().find(|tw| tw.start > arrival).map_or(arrival, |tw| tw.start);
        }

        self.earliest_start.map_or(arrival, |earliest| arrival.max(earliest))
    }

    /// Returns true if servicing the stop may require waiting.
    pub fn can_incur_waiting_time(&self) -> bool {
        !self.windows.is_empty() || self.earliest_start.is_some()
    }

    /// Returns the closest stops which belong to a plan unit, nearest first. Computed once.
    pub fn closest_stops<'a>(&'a self, model: &Model) -> &'a [usize] {
        self.closest.get_or_init(|| {
            if !self.location.is_valid() {
                return Vec::default();
            }

            let mut candidates = model
                .stops()
                .iter()
                .filter(|other| other.index != self.index && other.plan_unit.is_some() && other.location.is_valid())
                .map(|other| (other.index, self.location.haversine_distance(&other.location)))
                .collect::<Vec<_>>();

            candidates.sort_by(|(_, a), (_, b)| compare_floats(*a, *b));
            candidates.truncate(model.config().closest_stops);

            candidates.into_iter().map(|(index, _)| index).collect()
        })
    }

    pub(crate) fn validate(&self) -> GenericResult<()> {
        if self.earliest_start.is_some() && !self.windows.is_empty() {
            return Err(format!("stop `{}` has both earliest start and windows set", self.id).into());
        }

        Ok(())
    }
}
