//! This module reimports commonly used types.

pub use crate::config::{EngineConfig, read_engine_config};

pub use crate::models::common::{Duration, Location, Timestamp};
pub use crate::models::{
    ConstraintBuilder, DirectedAcyclicGraph, EstimationCost, Model, ModelConstraint, ModelExpression, ModelObjective,
    ObjectiveBuilder, StopPositionsHint,
};

pub use crate::solution::{Move, MoveStops, MoveUnits, Solution, SolutionStop, SolutionVehicle, StopPosition};

pub use crate::utils::{
    DefaultRandom, Environment, GenericError, GenericResult, InfoLogger, Quota, Random, TimeQuota,
};
