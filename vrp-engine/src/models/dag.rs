#[cfg(test)]
#[path = "../../tests/unit/models/dag_test.rs"]
mod dag_test;

use crate::utils::GenericResult;
use nohash_hasher::{IntMap, IntSet};

/// An arc of a sequencing graph: `origin` must be visited before `destination`. A direct arc
/// additionally requires `destination` to immediately follow `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DagArc {
    /// Stop index of the arc origin.
    pub origin: usize,
    /// Stop index of the arc destination.
    pub destination: usize,
    /// True if destination must directly follow origin.
    pub is_direct: bool,
}

/// A directed acyclic graph of "must precede" arcs between stops of one plan unit.
#[derive(Clone, Debug, Default)]
pub struct DirectedAcyclicGraph {
    arcs: Vec<DagArc>,
    adjacency: IntMap<usize, Vec<usize>>,
    outbound: IntMap<usize, Vec<DagArc>>,
    outbound_direct: IntMap<usize, DagArc>,
    inbound_direct: IntMap<usize, DagArc>,
}

impl DirectedAcyclicGraph {
    /// Adds an arc. Fails and leaves the graph unchanged if the arc introduces a cycle.
    pub fn add_arc(&mut self, origin: usize, destination: usize) -> GenericResult<()> {
        self.insert_arc(DagArc { origin, destination, is_direct: false })
    }

    /// Adds a direct arc: no other stop can be visited between `origin` and `destination`.
    pub fn add_direct_arc(&mut self, origin: usize, destination: usize) -> GenericResult<()> {
        self.insert_arc(DagArc { origin, destination, is_direct: true })
    }

    /// Returns all arcs in insertion order.
    pub fn arcs(&self) -> &[DagArc] {
        self.arcs.as_slice()
    }

    /// Returns true if there are no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Returns arcs leaving the given stop.
    pub fn outbound_arcs(&self, stop: usize) -> &[DagArc] {
        self.outbound.get(&stop).map_or(&[], |arcs| arcs.as_slice())
    }

    /// Returns true if there is a direct arc `origin` -> `destination`.
    pub fn has_direct_arc(&self, origin: usize, destination: usize) -> bool {
        self.outbound_direct.get(&origin).is_some_and(|arc| arc.destination == destination)
    }

    /// Returns true if the graph has at least one direct arc.
    pub fn has_direct_arcs(&self) -> bool {
        !self.outbound_direct.is_empty()
    }

    /// Returns unique stops referenced by arcs in order of their appearance.
    pub fn stops(&self) -> Vec<usize> {
        let mut seen = IntSet::default();
        self.arcs
            .iter()
            .flat_map(|arc| [arc.origin, arc.destination])
            .filter(|stop| seen.insert(*stop))
            .collect()
    }

    /// Checks whether visiting stops in the given order violates no arc.
    pub fn is_allowed(&self, stops: &[usize]) -> GenericResult<bool> {
        if stops.len() < 2 {
            return Ok(true);
        }

        let unique = stops.iter().copied().collect::<IntSet<_>>();
        if unique.len() != stops.len() {
            return Err("stops are not unique".into());
        }

        let mut adjacency = self.adjacency.clone();

        for pair in stops.windows(2) {
            let (origin, destination) = (pair[0], pair[1]);

            let breaks_direct_arc = self.arcs.iter().filter(|arc| arc.is_direct).any(|arc| {
                (arc.origin == origin && arc.destination != destination)
                    || (arc.destination == destination && arc.origin != origin)
            });
            if breaks_direct_arc {
                return Ok(false);
            }

            if self.arcs.iter().any(|arc| arc.origin == origin && arc.destination == destination) {
                continue;
            }

            adjacency.entry(origin).or_default().push(destination);
            if is_cyclic(&adjacency) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Splits the graph into weakly connected components.
    pub fn independent_dags(&self) -> GenericResult<Vec<DirectedAcyclicGraph>> {
        let mut components: Vec<(IntSet<usize>, DirectedAcyclicGraph)> = Vec::new();

        for arc in self.arcs.iter() {
            let touching = components
                .iter()
                .enumerate()
                .filter(|(_, (stops, _))| stops.contains(&arc.origin) || stops.contains(&arc.destination))
                .map(|(idx, _)| idx)
                .collect::<Vec<_>>();

            let (mut stops, mut dag) = (IntSet::default(), DirectedAcyclicGraph::default());
            // merge in reverse to keep indices valid while removing
            for idx in touching.into_iter().rev() {
                let (other_stops, other_dag) = components.remove(idx);
                stops.extend(other_stops);
                for other_arc in other_dag.arcs {
                    dag.insert_arc(other_arc)?;
                }
            }

            stops.insert(arc.origin);
            stops.insert(arc.destination);
            dag.insert_arc(*arc)?;
            components.push((stops, dag));
        }

        Ok(components.into_iter().map(|(_, dag)| dag).collect())
    }

    fn insert_arc(&mut self, arc: DagArc) -> GenericResult<()> {
        if arc.is_direct {
            if let Some(existing) = self.outbound_direct.get(&arc.origin) {
                return if existing.destination == arc.destination {
                    Ok(())
                } else {
                    Err(format!(
                        "origin stop already has a direct arc: {} -> {}",
                        existing.origin, existing.destination
                    )
                    .into())
                };
            }

            if let Some(existing) = self.inbound_direct.get(&arc.destination) {
                return Err(format!(
                    "destination stop already has a direct arc: {} -> {}",
                    existing.origin, existing.destination
                )
                .into());
            }
        }

        self.adjacency.entry(arc.origin).or_default().push(arc.destination);
        if is_cyclic(&self.adjacency) {
            if let Some(destinations) = self.adjacency.get_mut(&arc.origin) {
                destinations.pop();
                if destinations.is_empty() {
                    self.adjacency.remove(&arc.origin);
                }
            }

            return Err(format!(
                "arc would create a cycle and cannot be added to the DAG: {} -> {}",
                arc.origin, arc.destination
            )
            .into());
        }

        self.arcs.push(arc);
        self.outbound.entry(arc.origin).or_default().push(arc);
        if arc.is_direct {
            self.outbound_direct.insert(arc.origin, arc);
            self.inbound_direct.insert(arc.destination, arc);
        }

        Ok(())
    }
}

fn is_cyclic(adjacency: &IntMap<usize, Vec<usize>>) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    fn visit(vertex: usize, adjacency: &IntMap<usize, Vec<usize>>, marks: &mut IntMap<usize, Mark>) -> bool {
        match marks.get(&vertex) {
            Some(Mark::InProgress) => return true,
            Some(Mark::Done) => return false,
            None => {}
        }

        marks.insert(vertex, Mark::InProgress);
        let has_cycle = adjacency
            .get(&vertex)
            .is_some_and(|next| next.iter().any(|&adjacent| visit(adjacent, adjacency, marks)));
        marks.insert(vertex, Mark::Done);

        has_cycle
    }

    let mut marks = IntMap::default();
    adjacency.keys().any(|&vertex| visit(vertex, adjacency, &mut marks))
}
