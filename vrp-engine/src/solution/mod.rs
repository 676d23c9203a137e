//! Contains the mutable solution: routes of vehicles, moves which change them and
//! generators of candidate moves.

mod best_moves;
mod collection;
pub use self::collection::PlanUnitCollection;

mod generators;
pub use self::generators::MoveStopsGenerator;

mod initial;

mod moves;
pub use self::moves::*;

mod plan_units;

mod positions;
pub use self::positions::StopPosition;

mod sequences;

#[allow(clippy::module_inception)]
mod solution;
pub use self::solution::Solution;

mod stop;
pub use self::stop::SolutionStop;

mod vehicle;
pub use self::vehicle::SolutionVehicle;
