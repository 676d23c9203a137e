use crate::models::DirectedAcyclicGraph;

/// A plan unit which consists of one or more stops which are planned together, in an order
/// allowed by the unit's sequencing graph.
#[derive(Debug)]
pub struct PlanStopsUnit {
    pub(crate) index: usize,
    pub(crate) stops: Vec<usize>,
    pub(crate) dag: DirectedAcyclicGraph,
    pub(crate) parent: Option<usize>,
}

impl PlanStopsUnit {
    /// Returns stop indices.
    pub fn stops(&self) -> &[usize] {
        self.stops.as_slice()
    }

    /// Returns the sequencing graph.
    pub fn dag(&self) -> &DirectedAcyclicGraph {
        &self.dag
    }
}

/// A composite plan unit: either exactly one of its children is planned, or all of them
/// (optionally on the same vehicle).
#[derive(Debug)]
pub struct PlanUnitsUnit {
    pub(crate) index: usize,
    pub(crate) units: Vec<usize>,
    pub(crate) one_of: bool,
    pub(crate) same_vehicle: bool,
    pub(crate) parent: Option<usize>,
}

impl PlanUnitsUnit {
    /// Returns child plan unit indices.
    pub fn units(&self) -> &[usize] {
        self.units.as_slice()
    }

    /// Returns true if exactly one child has to be planned.
    pub fn is_one_of(&self) -> bool {
        self.one_of
    }

    /// Returns true if all children have to be planned.
    pub fn is_all(&self) -> bool {
        !self.one_of
    }

    /// Returns true if all children have to be planned on the same vehicle.
    pub fn is_same_vehicle(&self) -> bool {
        self.same_vehicle
    }
}

/// An atomic planning target of the model.
#[derive(Debug)]
pub enum ModelPlanUnit {
    /// A unit of stops.
    Stops(PlanStopsUnit),
    /// A unit of other plan units.
    Units(PlanUnitsUnit),
}

impl ModelPlanUnit {
    /// Returns index of the plan unit.
    pub fn index(&self) -> usize {
        match self {
            ModelPlanUnit::Stops(unit) => unit.index,
            ModelPlanUnit::Units(unit) => unit.index,
        }
    }

    /// Returns index of the composite plan unit this unit belongs to.
    pub fn parent(&self) -> Option<usize> {
        match self {
            ModelPlanUnit::Stops(unit) => unit.parent,
            ModelPlanUnit::Units(unit) => unit.parent,
        }
    }

    /// Returns a stops unit if it is the one.
    pub fn as_stops(&self) -> Option<&PlanStopsUnit> {
        match self {
            ModelPlanUnit::Stops(unit) => Some(unit),
            ModelPlanUnit::Units(_) => None,
        }
    }

    /// Returns a composite unit if it is the one.
    pub fn as_units(&self) -> Option<&PlanUnitsUnit> {
        match self {
            ModelPlanUnit::Stops(_) => None,
            ModelPlanUnit::Units(unit) => Some(unit),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: usize) {
        match self {
            ModelPlanUnit::Stops(unit) => unit.parent = Some(parent),
            ModelPlanUnit::Units(unit) => unit.parent = Some(parent),
        }
    }
}
