//! A feature to forbid interleaving of plan units on the same route.

#[cfg(test)]
#[path = "../../tests/unit/features/interleave_test.rs"]
mod interleave_test;

use super::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// A rule which disallows stops of `sources` plan units to interleave with stops of `target`.
#[derive(Clone, Debug)]
pub struct DisallowedInterleave {
    /// A root plan unit which span must not be interleaved.
    pub target: usize,
    /// Root plan units which must be planned completely before or after the target span.
    pub sources: Vec<usize>,
}

/// Creates a constraint which enforces disallowed interleaves. A span of a plan unit on a route
/// is the range of positions of its stops. A source span is violating when it lies strictly inside
/// the target span or partially overlaps it.
pub fn create_interleave_constraint(
    model: &Model,
    name: &str,
    rules: Vec<DisallowedInterleave>,
) -> GenericResult<ModelConstraint> {
    let mut pairs = Vec::new();

    for rule in rules.iter() {
        for unit in std::iter::once(rule.target).chain(rule.sources.iter().copied()) {
            let plan_unit =
                model.plan_units().get(unit).ok_or_else(|| format!("interleave: unknown plan unit {unit}"))?;
            if plan_unit.parent().is_some() {
                return Err(format!("interleave: plan unit {unit} cannot be a part of a composite plan unit").into());
            }
            validate_same_vehicle(model, unit)?;
        }

        for &source in rule.sources.iter() {
            if source == rule.target {
                return Err(format!("interleave: target plan unit {source} is also a source").into());
            }
            if pairs.contains(&(rule.target, source)) {
                return Err(format!("interleave: source plan unit {source} is duplicated").into());
            }
            pairs.push((rule.target, source));
        }
    }

    let mut targets: FxHashMap<usize, Vec<(usize, usize)>> = FxHashMap::default();
    let mut units = FxHashSet::default();
    for &(target, source) in pairs.iter() {
        targets.entry(target).or_default().push((target, source));
        units.extend([target, source]);
    }

    let constraint = Arc::new(InterleaveConstraint { pairs, targets, units });

    ConstraintBuilder::default()
        .with_name(name)
        .with_estimate(constraint.clone())
        .with_vehicle_check(constraint)
        .with_estimation_cost(EstimationCost::LinearStop)
        .build()
}

fn validate_same_vehicle(model: &Model, unit: usize) -> GenericResult<()> {
    match model.plan_unit(unit) {
        ModelPlanUnit::Stops(_) => Ok(()),
        ModelPlanUnit::Units(units) => {
            if units.is_all() && !units.is_same_vehicle() {
                return Err(format!(
                    "interleave: all plan units of composite plan unit {unit} must be on the same vehicle"
                )
                .into());
            }
            units.units().iter().try_for_each(|&child| validate_same_vehicle(model, child))
        }
    }
}

/// First and last positions of stops of a plan unit on a route.
type Span = (usize, usize);

struct InterleaveConstraint {
    pairs: Vec<(usize, usize)>,
    targets: FxHashMap<usize, Vec<(usize, usize)>>,
    units: FxHashSet<usize>,
}

impl InterleaveConstraint {
    fn collect_spans<'a>(
        &self,
        model: &Model,
        stops: impl Iterator<Item = SolutionStop<'a>>,
        is_relevant: impl Fn(usize) -> bool,
    ) -> FxHashMap<usize, Span> {
        let mut spans = FxHashMap::<usize, Span>::default();

        for (position, stop) in stops.enumerate() {
            let Some(root) = stop.plan_unit().map(|unit| model.root_plan_unit(unit)) else { continue };

            if is_relevant(root) {
                spans.entry(root).and_modify(|span| span.1 = position).or_insert((position, position));
            }
        }

        spans
    }

    fn has_violations<'a>(spans: &FxHashMap<usize, Span>, mut pairs: impl Iterator<Item = &'a (usize, usize)>) -> bool {
        pairs.any(|(target, source)| match (spans.get(target), spans.get(source)) {
            (Some(&target), Some(&source)) => is_interleaved(source, target),
            _ => false,
        })
    }
}

impl ConstraintEstimate for InterleaveConstraint {
    /// Estimates moves of target plan units only: a move of a source plan unit is left to the exact
    /// vehicle check.
    fn estimate_is_violated(&self, move_stops: &MoveStops, solution: &Solution) -> (bool, StopPositionsHint) {
        let model = solution.model();
        let root = model.root_plan_unit(move_stops.plan_unit());

        let Some(pairs) = self.targets.get(&root) else { return (false, StopPositionsHint::none()) };

        let is_relevant = |unit: usize| unit == root || pairs.iter().any(|&(_, source)| unit == source);
        let spans = self.collect_spans(model, move_stops.stops(solution, true, true), is_relevant);

        (Self::has_violations(&spans, pairs.iter()), StopPositionsHint::none())
    }
}

impl VehicleViolationCheck for InterleaveConstraint {
    fn does_vehicle_have_violations(&self, vehicle: SolutionVehicle<'_>) -> bool {
        let model = vehicle.first().solution().model();
        let spans = self.collect_spans(model, vehicle.stops(), |unit| self.units.contains(&unit));

        Self::has_violations(&spans, self.pairs.iter())
    }
}

fn is_interleaved(source: Span, target: Span) -> bool {
    let (source_first, source_last) = source;
    let (target_first, target_last) = target;

    let is_inside = source_first > target_first && source_last < target_last;
    let overlaps_start = source_first < target_first && source_last > target_first && source_last < target_last;
    let overlaps_end = source_first > target_first && source_first < target_last && source_last > target_last;

    is_inside || overlaps_start || overlaps_end
}
