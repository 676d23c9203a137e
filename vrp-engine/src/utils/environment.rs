#[cfg(test)]
#[path = "../../tests/unit/utils/environment_test.rs"]
mod environment_test;

use crate::config::EngineConfig;
use crate::utils::{DefaultRandom, Random};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A logger type which is called with informative messages.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Specifies a computational quota for the search. Once the quota is reached, best move
/// queries stop scanning and return the best result found so far.
pub trait Quota {
    /// Returns true when computation should be stopped.
    fn is_reached(&self) -> bool;
}

/// A quota which is reached once the given amount of time has passed since its creation.
pub struct TimeQuota {
    start: Instant,
    limit: Duration,
}

impl TimeQuota {
    /// Creates a new instance of `TimeQuota`.
    pub fn new(limit_in_secs: f64) -> Self {
        Self { start: Instant::now(), limit: Duration::from_secs_f64(limit_in_secs.max(0.)) }
    }
}

impl Quota for TimeQuota {
    fn is_reached(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// Keeps track of environment specific information which influences engine behavior.
#[derive(Clone)]
pub struct Environment {
    /// A wrapper on random generator.
    pub random: Arc<dyn Random + Send + Sync>,

    /// A global execution quota.
    pub quota: Option<Arc<dyn Quota + Send + Sync>>,

    /// An information logger.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates an instance of `Environment`.
    pub fn new(
        random: Arc<dyn Random + Send + Sync>,
        quota: Option<Arc<dyn Quota + Send + Sync>>,
        logger: InfoLogger,
    ) -> Self {
        Self { random, quota, logger }
    }

    /// Creates an instance of `Environment` using time quota.
    pub fn new_with_time_quota(max_time: Option<f64>) -> Self {
        Self {
            quota: max_time.map::<Arc<dyn Quota + Send + Sync>, _>(|time| Arc::new(TimeQuota::new(time))),
            ..Self::default()
        }
    }

    /// Creates an instance of `Environment` from engine configuration: a configured seed makes
    /// random generation repeatable.
    pub fn from_config(config: &EngineConfig) -> Self {
        match config.seed {
            Some(seed) => Self { random: Arc::new(DefaultRandom::new_repeatable(seed)), ..Self::default() },
            None => Self::default(),
        }
    }

    /// Returns true if the quota is defined and reached.
    pub fn is_quota_reached(&self) -> bool {
        self.quota.as_ref().is_some_and(|quota| quota.is_reached())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Arc::new(DefaultRandom::default()), None, Arc::new(|msg: &str| println!("{msg}")))
    }
}
