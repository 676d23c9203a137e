//! Specifies engine configuration.

#[cfg(test)]
#[path = "../tests/unit/config_test.rs"]
mod config_test;

use crate::utils::GenericResult;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read};

/// An engine configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum amount of stop sequences sampled from a plan unit's DAG for one move query.
    pub sequence_sample_size: usize,
    /// Amount of nearest stops memoized for every stop.
    pub closest_stops: usize,
    /// A seed for repeatable random generation.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { sequence_sample_size: 24, closest_stops: 20, seed: None }
    }
}

/// Reads engine configuration from json.
pub fn read_engine_config<R: Read>(reader: R) -> GenericResult<EngineConfig> {
    let config: EngineConfig = serde_json::from_reader(BufReader::new(reader))?;

    if config.sequence_sample_size == 0 {
        return Err("sequence sample size must be positive".into());
    }

    Ok(config)
}
