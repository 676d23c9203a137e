#[cfg(test)]
#[path = "../../tests/unit/solution/sequences_test.rs"]
mod sequences_test;

use crate::models::{DirectedAcyclicGraph, PlanStopsUnit};
use crate::solution::Solution;
use crate::utils::shuffle;
use nohash_hasher::IntMap;
use std::ops::ControlFlow;

/// Samples orders of stops of the plan unit which respect its sequencing graph. Stops are
/// expanded in a random order and at most `sequence_sample_size` sequences are yielded.
pub(crate) fn sample_sequences(
    solution: &Solution,
    plan_unit: &PlanStopsUnit,
    consumer: &mut dyn FnMut(&[usize]) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let stops = plan_unit.stops();
    if stops.len() == 1 {
        return consumer(stops);
    }

    let mut order = (0..stops.len()).collect::<Vec<_>>();
    shuffle(solution.random(), &mut order);

    let mut in_degree = stops.iter().map(|&stop| (stop, 0)).collect::<IntMap<usize, usize>>();
    plan_unit.dag().arcs().iter().for_each(|arc| *in_degree.entry(arc.destination).or_default() += 1);

    let mut sampler = SequenceSampler {
        stops,
        dag: plan_unit.dag(),
        order,
        used: vec![false; stops.len()],
        in_degree,
        sequence: Vec::with_capacity(stops.len()),
        remaining: solution.model.config().sequence_sample_size,
    };

    sampler.expand(None, consumer)
}

struct SequenceSampler<'a> {
    stops: &'a [usize],
    dag: &'a DirectedAcyclicGraph,
    order: Vec<usize>,
    used: Vec<bool>,
    in_degree: IntMap<usize, usize>,
    sequence: Vec<usize>,
    remaining: usize,
}

impl SequenceSampler<'_> {
    fn expand(
        &mut self,
        direct_successor: Option<usize>,
        consumer: &mut dyn FnMut(&[usize]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if self.sequence.len() == self.stops.len() {
            if self.remaining == 0 {
                return ControlFlow::Break(());
            }
            self.remaining -= 1;

            consumer(self.sequence.as_slice())?;

            return if self.remaining == 0 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) };
        }

        let forced = direct_successor.and_then(|successor| self.stops.iter().position(|&stop| stop == successor));
        let candidates = if forced.is_some() { 1 } else { self.order.len() };

        for k in 0..candidates {
            let idx = forced.unwrap_or(self.order[k]);
            let stop = self.stops[idx];

            if self.used[idx] || self.in_degree.get(&stop).is_some_and(|&degree| degree > 0) {
                continue;
            }

            let dag = self.dag;
            let arcs = dag.outbound_arcs(stop);

            self.used[idx] = true;
            self.sequence.push(stop);
            arcs.iter().for_each(|arc| self.change_degree(arc.destination, false));

            let next_direct = arcs.iter().find(|arc| arc.is_direct).map(|arc| arc.destination);
            let flow = self.expand(next_direct, consumer);

            arcs.iter().for_each(|arc| self.change_degree(arc.destination, true));
            self.sequence.pop();
            self.used[idx] = false;

            flow?;
        }

        ControlFlow::Continue(())
    }

    fn change_degree(&mut self, stop: usize, is_increment: bool) {
        if let Some(degree) = self.in_degree.get_mut(&stop) {
            *degree = if is_increment { *degree + 1 } else { degree.saturating_sub(1) };
        }
    }
}
