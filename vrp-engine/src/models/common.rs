//! Common models used by the topology model and the solution.

#[cfg(test)]
#[path = "../../tests/unit/models/common_test.rs"]
mod common_test;

/// Represents a time value measured in seconds from the epoch.
pub type Timestamp = f64;

/// Represents a time duration in seconds.
pub type Duration = f64;

/// Represents a distance in meters.
pub type Distance = f64;

const EARTH_RADIUS_METERS: f64 = 6_371_000.;

/// Represents a geographical location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Location {
    /// Creates a new instance of `Location`.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Creates a location which is never valid: travel from or to it takes no time.
    pub fn invalid() -> Self {
        Self { lon: f64::NAN, lat: f64::NAN }
    }

    /// Returns true if coordinates are within valid ranges.
    pub fn is_valid(&self) -> bool {
        (-180. ..=180.).contains(&self.lon) && (-90. ..=90.).contains(&self.lat)
    }

    /// Returns haversine distance in meters to another location, zero when any of them is not valid.
    pub fn haversine_distance(&self, other: &Location) -> Distance {
        if !self.is_valid() || !other.is_valid() {
            return 0.;
        }

        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.).sin().powi(2);
        let c = 2. * a.sqrt().atan2((1. - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

/// Represents a closed time interval when a stop can be serviced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    /// Start of time window.
    pub start: Timestamp,
    /// End of time window.
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a new [`TimeWindow`].
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Checks whether time window contains given time.
    pub fn contains(&self, time: Timestamp) -> bool {
        time >= self.start && time <= self.end
    }
}
