//! Contains the topology model: an immutable, once locked, description of the routing problem.

pub mod common;

mod constraints;
pub use self::constraints::*;

mod dag;
pub use self::dag::*;

pub mod expressions;
pub use self::expressions::ModelExpression;

mod model;
pub use self::model::*;

mod objectives;
pub use self::objectives::*;

mod plan_units;
pub use self::plan_units::*;

mod stop;
pub use self::stop::ModelStop;

mod vehicle;
pub use self::vehicle::*;
