//! Provides reference constraints and objectives built on top of the constraint and objective
//! protocol.

use crate::models::*;
use crate::solution::*;
use crate::utils::GenericResult;
use std::sync::Arc;

mod interleave;
pub use self::interleave::*;

mod latest;
pub use self::latest::*;

mod maximum;
pub use self::maximum::*;

mod successor;
pub use self::successor::*;

mod travel_duration;
pub use self::travel_duration::*;

mod unplanned;
pub use self::unplanned::*;
